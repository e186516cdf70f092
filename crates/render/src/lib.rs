//! External renderer collaborators for `tml-core`: the diagram and table
//! builders, CSS injection, and dead-anchor stripping.
//!
//! Everything here consumes a [`tml_core::RendererView`] and produces bytes
//! or HTML fragments; nothing in this crate ever mutates the model.

pub mod anchors;
pub mod css;
pub mod diagram;
pub mod tables;

pub use anchors::strip_dead_anchors;
pub use css::{resolve as resolve_css, DEFAULT_STYLE};
pub use diagram::{build_diagram_dot, render_bytes, DiagramError};
pub use tables::{build_data_table, build_interaction_table, build_measure_table, build_threat_table};
