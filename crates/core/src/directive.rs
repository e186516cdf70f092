//! Typed parse records (plain attribute bundles, one variant per directive
//! kind) and the source scanner that turns raw text into an ordered stream
//! of them, respecting the grammar's textual matching priority (most
//! specific construct first, alias fallback last).

use std::ops::Range;

use crate::grammar::{self, *};

#[derive(Debug, Clone)]
pub enum Directive {
    Include {
        path: String,
    },
    Alias {
        names: Vec<String>,
        members: Vec<String>,
    },
    Note {
        names: Vec<String>,
        color: Option<String>,
        parent: Option<String>,
        targets: Vec<String>,
        description: Option<String>,
    },
    Cluster {
        names: Vec<String>,
        parent: Option<String>,
        description: Option<String>,
    },
    Element {
        names: Vec<String>,
        profile: String,
        role: String,
        parent: Option<String>,
        description: Option<String>,
    },
    Datum {
        names: Vec<String>,
        classification: String,
        description: Option<String>,
    },
    Threat {
        names: Vec<String>,
        impact: String,
        probability: String,
        description: Option<String>,
    },
    Measure {
        names: Vec<String>,
        capability: String,
        threats: Vec<String>,
        description: Option<String>,
    },
    Modification {
        names: Vec<String>,
        profile: Option<String>,
        role: Option<String>,
        parent: Option<String>,
        classification: Option<String>,
        impact: Option<String>,
        probability: Option<String>,
        capability: Option<String>,
        new_name: Option<String>,
        description: Option<String>,
    },
    Interaction {
        action: String,
        sources: Vec<String>,
        targets: Vec<String>,
        data: Vec<String>,
        notes: Option<String>,
    },
    Mitigation {
        measure: String,
        imperative: Option<String>,
        state: String,
        affected: String,
    },
    Risk {
        threat: String,
        affected: String,
    },
}

impl Directive {
    /// The fixed dispatch priority class this directive belongs to.
    /// Lower sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            Directive::Include { .. } => 0,
            Directive::Alias { .. } => 1,
            Directive::Note { .. }
            | Directive::Cluster { .. }
            | Directive::Element { .. }
            | Directive::Datum { .. }
            | Directive::Threat { .. }
            | Directive::Measure { .. } => 2,
            Directive::Modification { .. } => 3,
            Directive::Interaction { .. } => 4,
            Directive::Mitigation { .. } => 5,
            Directive::Risk { .. } => 6,
        }
    }
}

pub struct ParseResult {
    pub directives: Vec<(Directive, Range<usize>)>,
    pub unmatched: Vec<Range<usize>>,
}

fn opt(caps: &regex::Captures, group: &str) -> Option<String> {
    caps.name(group).map(|m| grammar::unescape(m.as_str()))
}

fn opt_raw(caps: &regex::Captures, group: &str) -> Option<String> {
    caps.name(group).map(|m| m.as_str().to_string())
}

/// Scans `text` against every directive pattern in matching-priority order,
/// claiming non-overlapping spans. A span already claimed by an
/// earlier (more specific) pattern is not reconsidered by a later one, which
/// is how the generic alias fallback avoids swallowing e.g. element lines.
pub fn parse(text: &str) -> ParseResult {
    let mut claimed: Vec<Range<usize>> = Vec::new();
    let mut directives: Vec<(Directive, Range<usize>)> = Vec::new();

    macro_rules! scan {
        ($regex:expr, $build:expr) => {
            for m in $regex.captures_iter(text) {
                let whole = m.get(0).unwrap().range();
                if claimed.iter().any(|r| ranges_overlap(r, &whole)) {
                    continue;
                }
                claimed.push(whole.clone());
                directives.push(($build(&m), whole));
            }
        };
    }

    scan!(INCLUDE, |c: &regex::Captures| Directive::Include {
        path: opt(c, "path").unwrap_or_default(),
    });

    scan!(NOTE, |c: &regex::Captures| Directive::Note {
        names: grammar::split_name_list(&c["names"]),
        color: opt_raw(c, "color"),
        parent: opt(c, "parent"),
        targets: c
            .name("targets")
            .map(|m| grammar::split_name_list(m.as_str()))
            .unwrap_or_default(),
        description: opt(c, "description"),
    });

    scan!(CLUSTER, |c: &regex::Captures| Directive::Cluster {
        names: grammar::split_name_list(&c["names"]),
        parent: opt(c, "parent"),
        description: opt(c, "description"),
    });

    scan!(ELEMENT, |c: &regex::Captures| Directive::Element {
        names: grammar::split_name_list(&c["names"]),
        profile: c["profile"].to_ascii_lowercase(),
        role: c["role"].to_ascii_lowercase(),
        parent: opt(c, "parent"),
        description: opt(c, "description"),
    });

    scan!(DATUM, |c: &regex::Captures| Directive::Datum {
        names: grammar::split_name_list(&c["names"]),
        classification: c["classification"].to_ascii_lowercase(),
        description: opt(c, "description"),
    });

    scan!(THREAT, |c: &regex::Captures| {
        let impact = opt_raw(c, "impact1").or_else(|| opt_raw(c, "impact2")).unwrap_or_default();
        let probability = opt_raw(c, "probability1")
            .or_else(|| opt_raw(c, "probability2"))
            .unwrap_or_default();
        Directive::Threat {
            names: grammar::split_name_list(&c["names"]),
            impact: impact.to_ascii_lowercase(),
            probability: probability.to_ascii_lowercase(),
            description: opt(c, "description"),
        }
    });

    scan!(MEASURE, |c: &regex::Captures| Directive::Measure {
        names: grammar::split_name_list(&c["names"]),
        capability: c["capability"].to_ascii_lowercase(),
        threats: grammar::split_name_list(&c["threats"]),
        description: opt(c, "description"),
    });

    scan!(MODIFICATION, |c: &regex::Captures| Directive::Modification {
        names: grammar::split_name_list(&c["names"]),
        profile: opt_raw(c, "profile").map(|s| s.to_ascii_lowercase()),
        role: opt_raw(c, "role").map(|s| s.to_ascii_lowercase()),
        parent: opt(c, "parent"),
        classification: opt_raw(c, "classification").map(|s| s.to_ascii_lowercase()),
        impact: opt_raw(c, "impact").map(|s| s.to_ascii_lowercase()),
        probability: opt_raw(c, "probability").map(|s| s.to_ascii_lowercase()),
        capability: opt_raw(c, "capability").map(|s| s.to_ascii_lowercase()),
        new_name: opt(c, "new_name"),
        description: opt(c, "description"),
    });

    scan!(INTERACTION_PROCESS_STORE, |c: &regex::Captures| {
        let action = if c["action"].to_ascii_lowercase().starts_with("proc") {
            "process"
        } else {
            "store"
        };
        let sources = grammar::split_name_list(&c["sources"]);
        Directive::Interaction {
            action: action.to_string(),
            targets: sources.clone(),
            sources,
            data: grammar::split_name_list(&c["data"]),
            notes: opt(c, "notes"),
        }
    });

    scan!(INTERACTION_SEND, |c: &regex::Captures| Directive::Interaction {
        action: "send".to_string(),
        sources: grammar::split_name_list(&c["sources"]),
        targets: grammar::split_name_list(&c["targets"]),
        data: grammar::split_name_list(&c["data"]),
        notes: opt(c, "notes"),
    });

    scan!(INTERACTION_RECEIVE, |c: &regex::Captures| Directive::Interaction {
        action: "receive".to_string(),
        sources: grammar::split_name_list(&c["sources"]),
        targets: grammar::split_name_list(&c["targets"]),
        data: grammar::split_name_list(&c["data"]),
        notes: opt(c, "notes"),
    });

    scan!(MITIGATION, |c: &regex::Captures| Directive::Mitigation {
        measure: grammar::unescape(&c["measure"]),
        imperative: opt_raw(c, "imperative").map(|s| s.to_ascii_lowercase()),
        state: c["state"].to_ascii_lowercase(),
        affected: c["affected"].trim().to_string(),
    });

    scan!(RISK, |c: &regex::Captures| Directive::Risk {
        threat: grammar::unescape(&c["threat"]),
        affected: c["affected"].trim().to_string(),
    });

    scan!(ALIAS, |c: &regex::Captures| Directive::Alias {
        names: grammar::split_name_list(&c["lhs"]),
        members: grammar::split_name_list(&c["rhs"]),
    });

    directives.sort_by_key(|(_, range)| range.start);
    let unmatched = unmatched_ranges(text, &claimed);

    ParseResult { directives, unmatched }
}

fn ranges_overlap(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Byte ranges of `text` not covered by any claimed directive span, used by
/// `-c`/`--check-file` diagnostic mode.
fn unmatched_ranges(text: &str, claimed: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut sorted: Vec<Range<usize>> = claimed.to_vec();
    sorted.sort_by_key(|r| r.start);
    let mut gaps = Vec::new();
    let mut cursor = 0usize;
    for r in &sorted {
        if r.start > cursor {
            gaps.push(cursor..r.start);
        }
        cursor = cursor.max(r.end);
    }
    if cursor < text.len() {
        gaps.push(cursor..text.len());
    }
    gaps
}
