//! Compiler pipeline for the TML threat-modeling language.
//!
//! `compile`/`compile_str` take a root model file and walk it through every
//! pipeline stage: load (resolve includes), interpret (dispatch directives
//! into a `ModelStore`), finalize (canonical ordering), and hand back a
//! `CompiledModel` whose `view()` is the only thing a renderer ever
//! touches.

pub mod affected;
pub mod directive;
pub mod enums;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod loader;
pub mod model;
pub mod ordering;
pub mod renderer_view;
pub mod resolver;

use std::path::{Path, PathBuf};

pub use error::{CompileError, Result};
pub use model::ModelStore;
pub use renderer_view::{DiagramOptions, RendererView};

/// A fully interpreted and finalized model, ready to render.
pub struct CompiledModel {
    pub store: ModelStore,
    /// Every file absorbed while loading, root first, in include order.
    pub absorbed_files: Vec<PathBuf>,
}

impl CompiledModel {
    pub fn view(&self) -> RendererView<'_> {
        RendererView::new(&self.store)
    }
}

/// Compiles the model file at `path` through the full pipeline.
/// The only fatal failure is the root file itself being unreadable;
/// everything else surfaces as logged warnings on an otherwise-best-effort
/// model.
pub fn compile(path: &Path) -> Result<CompiledModel> {
    let loaded = loader::load(path)?;
    Ok(finish(loaded))
}

/// Compiles model text already in memory (e.g. read from stdin). Includes
/// are still resolved against `virtual_path`'s directory.
pub fn compile_str(virtual_path: &Path, text: &str) -> CompiledModel {
    let loaded = loader::load_str(virtual_path, text);
    finish(loaded)
}

fn finish(loaded: loader::LoadResult) -> CompiledModel {
    let mut store = ModelStore::new();
    interpreter::interpret(&mut store, loaded.directives);
    ordering::finalize(&mut store);
    CompiledModel {
        store,
        absorbed_files: loaded.absorbed_files,
    }
}
