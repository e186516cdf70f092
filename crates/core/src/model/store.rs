use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use tracing::warn;

use super::alias::Alias;
use super::cluster::Cluster;
use super::common::ComponentKind;
use super::datum::Datum;
use super::element::Element;
use super::interaction::Interaction;
use super::measure::Measure;
use super::note::Note;
use super::threat::Threat;

/// Typed containers for every component kind, the name registry that
/// enforces cross-kind uniqueness, the alias table, and a compilation-scoped
/// interaction-ordinal allocator (fresh per compile, rather than a process-
/// global counter).
#[derive(Debug, Default)]
pub struct ModelStore {
    pub clusters: IndexMap<String, Cluster>,
    pub elements: IndexMap<String, Element>,
    pub data: IndexMap<String, Datum>,
    pub threats: IndexMap<String, Threat>,
    pub measures: IndexMap<String, Measure>,
    pub notes: IndexMap<String, Note>,
    pub interactions: Vec<Interaction>,
    pub aliases: IndexMap<String, Alias>,

    name_kind: HashMap<String, ComponentKind>,
    next_ordinal: u32,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind_of(&self, name: &str) -> Option<ComponentKind> {
        self.name_kind.get(name).copied()
    }

    /// Registers `name` as belonging to `kind`, warning and evicting any
    /// prior component under that name from its old container first: a
    /// redefinition warns and overrides rather than erroring.
    fn claim_name(&mut self, name: &str, kind: ComponentKind) {
        if let Some(prev) = self.name_kind.insert(name.to_string(), kind) {
            warn!(name, previous_kind = %prev, new_kind = %kind, "redefining component, overriding previous declaration");
            match prev {
                ComponentKind::Cluster => {
                    self.clusters.shift_remove(name);
                }
                ComponentKind::Element => {
                    self.elements.shift_remove(name);
                }
                ComponentKind::Datum => {
                    self.data.shift_remove(name);
                }
                ComponentKind::Threat => {
                    self.threats.shift_remove(name);
                }
                ComponentKind::Measure => {
                    self.measures.shift_remove(name);
                }
                ComponentKind::Note => {
                    self.notes.shift_remove(name);
                }
            }
        }
    }

    pub fn insert_cluster(&mut self, cluster: Cluster) {
        self.claim_name(&cluster.common.name, ComponentKind::Cluster);
        if let Some(parent) = cluster.parent.clone() {
            if let Some(p) = self.clusters.get_mut(&parent) {
                p.children.insert(cluster.common.name.clone(), ());
            }
        }
        self.clusters.insert(cluster.common.name.clone(), cluster);
    }

    pub fn insert_element(&mut self, element: Element) {
        self.claim_name(&element.common.name, ComponentKind::Element);
        if let Some(parent) = element.parent.clone() {
            if let Some(p) = self.clusters.get_mut(&parent) {
                p.children.insert(element.common.name.clone(), ());
            }
        }
        self.elements.insert(element.common.name.clone(), element);
    }

    pub fn insert_datum(&mut self, datum: Datum) {
        self.claim_name(&datum.common.name, ComponentKind::Datum);
        self.data.insert(datum.common.name.clone(), datum);
    }

    pub fn insert_threat(&mut self, threat: Threat) {
        self.claim_name(&threat.common.name, ComponentKind::Threat);
        self.threats.insert(threat.common.name.clone(), threat);
    }

    pub fn insert_measure(&mut self, measure: Measure) {
        self.claim_name(&measure.common.name, ComponentKind::Measure);
        self.measures.insert(measure.common.name.clone(), measure);
    }

    pub fn insert_note(&mut self, note: Note) {
        self.claim_name(&note.common.name, ComponentKind::Note);
        self.notes.insert(note.common.name.clone(), note);
    }

    /// Creates or overwrites the alias `name -> members`. Rejected (warn,
    /// no-op) if `name` already names a component.
    pub fn define_alias(&mut self, name: &str, members: IndexSet<String>) {
        if let Some(kind) = self.kind_of(name) {
            warn!(name, existing_kind = %kind, "alias name collides with an existing component; alias rejected");
            return;
        }
        self.aliases
            .entry(name.to_string())
            .or_default()
            .members
            .extend(members);
    }

    /// Expands every name in `names`, resolving aliases transitively (one
    /// level at a time, cycle-guarded) and dropping names of the wrong kind.
    /// Returns resolved, deduplicated, order-preserving names.
    pub fn expand_names(&self, names: &[String], expected_kind: Option<ComponentKind>) -> Vec<String> {
        let mut out = IndexSet::new();
        for name in names {
            let mut visited = HashSet::new();
            self.expand_one(name, expected_kind, &mut out, &mut visited);
        }
        out.into_iter().collect()
    }

    fn expand_one(
        &self,
        name: &str,
        expected_kind: Option<ComponentKind>,
        out: &mut IndexSet<String>,
        visited: &mut HashSet<String>,
    ) {
        if !visited.insert(name.to_string()) {
            return;
        }
        if let Some(kind) = self.kind_of(name) {
            match expected_kind {
                Some(k) if k != kind => {
                    warn!(name, expected = %k, found = %kind, "name resolved to the wrong component kind; dropped");
                }
                _ => {
                    out.insert(name.to_string());
                }
            }
            return;
        }
        if let Some(alias) = self.aliases.get(name) {
            for member in alias.members.clone() {
                self.expand_one(&member, expected_kind, out, visited);
            }
            return;
        }
        warn!(name, "unresolved name");
    }

    /// Marks components active. Elements/data become active when referenced
    /// by any interaction; threats/measures when used in a risk/mitigation.
    pub fn mark_active(&mut self, kind: ComponentKind, name: &str) {
        match kind {
            ComponentKind::Cluster => {
                if let Some(c) = self.clusters.get_mut(name) {
                    c.common.active = true;
                }
            }
            ComponentKind::Element => {
                if let Some(c) = self.elements.get_mut(name) {
                    c.common.active = true;
                }
            }
            ComponentKind::Datum => {
                if let Some(c) = self.data.get_mut(name) {
                    c.common.active = true;
                }
            }
            ComponentKind::Threat => {
                if let Some(c) = self.threats.get_mut(name) {
                    c.common.active = true;
                }
            }
            ComponentKind::Measure => {
                if let Some(c) = self.measures.get_mut(name) {
                    c.common.active = true;
                }
            }
            ComponentKind::Note => {
                if let Some(c) = self.notes.get_mut(name) {
                    c.common.active = true;
                }
            }
        }
    }

    pub fn allocate_ordinal(&mut self) -> u32 {
        self.next_ordinal += 1;
        self.next_ordinal
    }

    pub fn push_interaction(&mut self, interaction: Interaction) {
        for name in interaction.sources.keys().chain(interaction.targets.keys()) {
            self.mark_active(ComponentKind::Element, name);
        }
        for name in interaction.data.keys() {
            self.mark_active(ComponentKind::Datum, name);
        }
        self.interactions.push(interaction);
    }

    /// The full chain of ancestor cluster names for `cluster`, nearest first,
    /// not including `cluster` itself.
    fn ancestors_of_cluster(&self, cluster: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.clusters.get(cluster).and_then(|c| c.parent.clone());
        while let Some(name) = current {
            chain.push(name.clone());
            current = self.clusters.get(&name).and_then(|c| c.parent.clone());
        }
        chain
    }

    /// The cluster an element belongs to, including itself-as-start for the
    /// ancestor walk (used by note-parent defaulting).
    fn self_and_ancestors_of_element(&self, element: &str) -> Vec<String> {
        let mut chain = Vec::new();
        if let Some(parent) = self.elements.get(element).and_then(|e| e.parent.clone()) {
            chain.push(parent.clone());
            chain.extend(self.ancestors_of_cluster(&parent));
        }
        chain
    }

    /// Deepest cluster containing every named target element; used as the
    /// default parent for a note with no explicit `in` clause. `None` if
    /// targets is empty or the targets share no common ancestor cluster.
    pub fn lowest_common_ancestor(&self, targets: &IndexSet<String>) -> Option<String> {
        let mut targets = targets.iter();
        let first = targets.next()?;
        let mut common: Vec<String> = self.self_and_ancestors_of_element(first);
        for t in targets {
            let chain: HashSet<String> = self.self_and_ancestors_of_element(t).into_iter().collect();
            common.retain(|c| chain.contains(c));
        }
        // `common` is ordered nearest-to-furthest for the first target;
        // since retain preserves order, the first surviving entry is the
        // deepest shared ancestor.
        common.into_iter().next()
    }

    /// Re-parents a cluster, recomputing its (and its descendants') levels.
    pub fn reparent_cluster(&mut self, cluster_name: &str, new_parent: Option<String>) {
        let old_parent = self.clusters.get(cluster_name).and_then(|c| c.parent.clone());
        if let Some(old) = &old_parent {
            if let Some(p) = self.clusters.get_mut(old) {
                p.children.shift_remove(cluster_name);
            }
        }
        let new_level = match &new_parent {
            Some(p) => self.clusters.get(p).map(|c| c.level + 1).unwrap_or(1),
            None => 1,
        };
        if let Some(new) = &new_parent {
            if let Some(p) = self.clusters.get_mut(new) {
                p.children.insert(cluster_name.to_string(), ());
            }
        }
        if let Some(c) = self.clusters.get_mut(cluster_name) {
            c.parent = new_parent;
            c.level = new_level;
        }
        self.recompute_descendant_levels(cluster_name);
    }

    fn recompute_descendant_levels(&mut self, cluster_name: &str) {
        let (level, children): (u32, Vec<String>) = match self.clusters.get(cluster_name) {
            Some(c) => (c.level, c.children.keys().cloned().collect()),
            None => return,
        };
        for child in children {
            if let Some(c) = self.clusters.get_mut(&child) {
                c.level = level + 1;
            }
            self.recompute_descendant_levels(&child);
        }
    }
}
