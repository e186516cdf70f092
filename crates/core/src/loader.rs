//! The source loader: reads the root model file, resolves `include`
//! directives into a set of absorbed files (rejecting traversal, cycles,
//! and non-`.tml` paths), and produces the combined, priority-ordered
//! directive stream the interpreter consumes.

use std::collections::HashSet;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::directive::{self, Directive};
use crate::error::{CompileError, Result};

pub struct LoadResult {
    pub directives: Vec<Directive>,
    pub absorbed_files: Vec<PathBuf>,
}

/// Validates an `include` path: must end in `.tml`, must not begin with
/// `../`, must not contain `*`, an interior `/../`, or any whitespace other
/// than the space character.
pub fn validate_path(raw: &str) -> std::result::Result<(), &'static str> {
    if !raw.ends_with(".tml") {
        return Err("include path must end in .tml");
    }
    if raw.starts_with("../") {
        return Err("include path must not begin with ../");
    }
    if raw.contains('*') {
        return Err("include path must not contain *");
    }
    if raw.contains("/../") {
        return Err("include path must not contain an interior /../");
    }
    if raw.chars().any(|c| c.is_whitespace() && c != ' ') {
        return Err("include path must not contain whitespace other than space");
    }
    Ok(())
}

/// Ancestor directories of the root model file's own directory, ordered
/// from the filesystem root down to that directory (inclusive). Scanning in
/// this order is surprising: a shallower directory's file wins even if a
/// deeper one also matches.
fn candidate_dirs(root_model_path: &Path) -> Vec<PathBuf> {
    let absolute = root_model_path
        .canonicalize()
        .unwrap_or_else(|_| root_model_path.to_path_buf());
    let parent = absolute.parent().unwrap_or_else(|| Path::new("/"));
    let mut dirs: Vec<PathBuf> = parent.ancestors().map(Path::to_path_buf).collect();
    dirs.reverse();
    dirs
}

fn resolve_include_path(root_model_path: &Path, include_rel: &str) -> Option<PathBuf> {
    candidate_dirs(root_model_path)
        .into_iter()
        .map(|dir| dir.join(include_rel))
        .find(|candidate| candidate.is_file())
}

fn canonical_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Reads the root model file and recursively absorbs its includes,
/// returning the combined directive stream in priority order (source order
/// within each file, root file's directives and each include's directives
/// appended in the order they're encountered).
pub fn load(root_path: &Path) -> Result<LoadResult> {
    let root_text = fs::read_to_string(root_path).map_err(|source| CompileError::RootFileUnreadable {
        path: root_path.to_path_buf(),
        source,
    })?;
    Ok(load_str(root_path, &root_text))
}

/// Like [`load`], but takes the root model's text directly (e.g. when the
/// model was supplied on stdin). Includes are still resolved relative to
/// `root_path`'s directory (or the current directory, if `root_path` is a
/// pseudo-path such as `-`).
pub fn load_str(root_path: &Path, root_text: &str) -> LoadResult {
    let mut absorbed = HashSet::new();
    let mut directives = Vec::new();
    let mut absorbed_files = Vec::new();
    absorb(root_path, root_text, root_path, &mut absorbed, &mut directives, &mut absorbed_files);
    LoadResult {
        directives,
        absorbed_files,
    }
}

fn absorb(
    root_path: &Path,
    text: &str,
    this_file: &Path,
    absorbed: &mut HashSet<PathBuf>,
    out: &mut Vec<Directive>,
    absorbed_files: &mut Vec<PathBuf>,
) {
    absorbed.insert(canonical_key(this_file));
    absorbed_files.push(this_file.to_path_buf());

    let parsed = directive::parse(text);
    for (d, _range) in parsed.directives {
        match d {
            Directive::Include { path: include_rel } => {
                if let Err(reason) = validate_path(&include_rel) {
                    warn!(path = include_rel, reason, "rejected include path");
                    continue;
                }
                match resolve_include_path(root_path, &include_rel) {
                    None => warn!(path = include_rel, "include file not found or unreadable; skipped"),
                    Some(resolved) => {
                        let key = canonical_key(&resolved);
                        if absorbed.contains(&key) {
                            info!(path = %resolved.display(), "include already absorbed; skipped");
                            continue;
                        }
                        match fs::read_to_string(&resolved) {
                            Ok(included_text) => {
                                absorb(root_path, &included_text, &resolved, absorbed, out, absorbed_files);
                            }
                            Err(err) => {
                                warn!(path = %resolved.display(), error = %err, "include unreadable; skipped");
                            }
                        }
                    }
                }
            }
            other => out.push(other),
        }
    }
}

/// Diagnostic `-c`/`--check-file` mode: returns, for the root file and every
/// file it absorbs, the file's text and the byte ranges that matched no
/// directive grammar.
pub fn check(root_path: &Path, root_text: &str) -> Vec<(PathBuf, String, Vec<Range<usize>>)> {
    let mut absorbed = HashSet::new();
    let mut report = Vec::new();
    check_recursive(root_path, root_text, root_path, &mut absorbed, &mut report);
    report
}

fn check_recursive(
    root_path: &Path,
    text: &str,
    this_file: &Path,
    absorbed: &mut HashSet<PathBuf>,
    report: &mut Vec<(PathBuf, String, Vec<Range<usize>>)>,
) {
    absorbed.insert(canonical_key(this_file));
    let parsed = directive::parse(text);
    report.push((this_file.to_path_buf(), text.to_string(), parsed.unmatched));

    for (d, _range) in parsed.directives {
        if let Directive::Include { path: include_rel } = d {
            if validate_path(&include_rel).is_err() {
                continue;
            }
            if let Some(resolved) = resolve_include_path(root_path, &include_rel) {
                let key = canonical_key(&resolved);
                if absorbed.contains(&key) {
                    continue;
                }
                if let Ok(included_text) = fs::read_to_string(&resolved) {
                    check_recursive(root_path, &included_text, &resolved, absorbed, report);
                }
            }
        }
    }
}
