//! The model store: typed containers for every component kind plus the
//! alias table and interaction list, with canonical ordering rules applied
//! at finalization (see `crate::ordering`).

mod alias;
mod cluster;
mod common;
mod datum;
mod element;
mod interaction;
mod measure;
mod note;
mod store;
mod threat;

pub use alias::Alias;
pub use cluster::Cluster;
pub use common::{Common, ComponentKind};
pub use datum::Datum;
pub use element::Element;
pub use interaction::{Interaction, Mitigation, Risk};
pub use measure::Measure;
pub use note::Note;
pub use store::ModelStore;
pub use threat::Threat;
