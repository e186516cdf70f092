//! The read-only surface handed to renderer collaborators: a `tml-render`
//! diagram/table builder only ever sees a `ModelStore` through this view,
//! never mutates it, and never needs to know about directive parsing or
//! interpretation.

use crate::enums::Rating;
use crate::model::{Cluster, Datum, Element, Interaction, Measure, ModelStore, Note, Threat};
use crate::resolver;

/// Rendering defaults mirrored from the CLI's own flag defaults, so a
/// renderer invoked outside the `tml` binary (e.g. from a test, or a future
/// editor integration) gets the same behavior the CLI
/// would have produced with no flags at all.
#[derive(Debug, Clone)]
pub struct DiagramOptions {
    pub format: String,
    pub combine: bool,
    pub numbers: bool,
    pub css: bool,
    pub anchors: bool,
    pub wrap_labels: Option<u32>,
    pub seed: Option<u64>,
    pub graph_attrs: Vec<(String, String)>,
    pub cluster_attrs: Vec<(String, String)>,
    pub node_attrs: Vec<(String, String)>,
    pub edge_attrs: Vec<(String, String)>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            format: "svg".to_string(),
            combine: false,
            numbers: true,
            css: true,
            anchors: true,
            wrap_labels: None,
            seed: None,
            graph_attrs: Vec::new(),
            cluster_attrs: Vec::new(),
            node_attrs: Vec::new(),
            edge_attrs: Vec::new(),
        }
    }
}

pub struct RendererView<'a> {
    store: &'a ModelStore,
}

impl<'a> RendererView<'a> {
    pub fn new(store: &'a ModelStore) -> Self {
        Self { store }
    }

    pub fn clusters(&self) -> impl Iterator<Item = &'a Cluster> {
        self.store.clusters.values()
    }

    pub fn root_clusters(&self) -> impl Iterator<Item = &'a Cluster> {
        self.store.clusters.values().filter(|c| c.level == 1)
    }

    pub fn elements(&self) -> impl Iterator<Item = &'a Element> {
        self.store.elements.values()
    }

    pub fn active_elements(&self) -> impl Iterator<Item = &'a Element> {
        self.store.elements.values().filter(|e| e.common.active)
    }

    pub fn notes(&self) -> impl Iterator<Item = &'a Note> {
        self.store.notes.values()
    }

    pub fn data(&self) -> impl Iterator<Item = &'a Datum> {
        self.store.data.values()
    }

    pub fn active_data(&self) -> impl Iterator<Item = &'a Datum> {
        self.store.data.values().filter(|d| d.common.active)
    }

    pub fn threats(&self) -> impl Iterator<Item = &'a Threat> {
        self.store.threats.values()
    }

    pub fn active_threats(&self) -> impl Iterator<Item = &'a Threat> {
        self.store.threats.values().filter(|t| t.common.active)
    }

    pub fn measures(&self) -> impl Iterator<Item = &'a Measure> {
        self.store.measures.values()
    }

    pub fn active_measures(&self) -> impl Iterator<Item = &'a Measure> {
        self.store.measures.values().filter(|m| m.common.active)
    }

    pub fn interactions(&self) -> impl Iterator<Item = &'a Interaction> {
        self.store.interactions.iter()
    }

    pub fn risk_rating(&self, interaction: &Interaction, datum: &str, threat: &str) -> Rating {
        resolver::risk_rating(self.store, interaction, datum, threat)
    }

    pub fn highest_risk(&self, interaction: &Interaction) -> Rating {
        resolver::highest_risk(self.store, interaction)
    }

    pub fn entirely_affects(&self, interaction: &Interaction, threat: &str) -> bool {
        resolver::entirely_affects(interaction, threat)
    }

    /// The renderer interface's stated default diagram options, for a
    /// collaborator that wants a `DiagramOptions` without building one from
    /// CLI flags itself.
    pub fn get_diagram_options(&self) -> DiagramOptions {
        DiagramOptions::default()
    }
}
