use indexmap::IndexMap;

use crate::enums::{Action, Imperative, Status};

/// A Measure instantiated against a specific (interaction, datum) pair.
/// Re-assertion by a later mitigation directive overwrites the prior value
/// for the same measure, and downgrades (e.g. verified back to implemented)
/// are permitted.
#[derive(Debug, Clone)]
pub struct Mitigation {
    pub measure: String,
    pub imperative: Imperative,
    pub status: Status,
}

/// A Threat instantiated against a specific (interaction, datum) pair. The
/// rating is computed on demand from the current contents of
/// `Interaction::mitigations[affected_datum]`, rather than stored, so later
/// mitigation directives are reflected without re-walking risk directives.
#[derive(Debug, Clone)]
pub struct Risk {
    pub threat: String,
    pub affected_datum: String,
}

/// A directed action between elements involving data. Ordinals are assigned
/// in source order by `ModelStore`, regardless of any user-supplied ordinal
/// prefix in the source text.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub ordinal: u32,
    pub action: Action,
    pub sources: IndexMap<String, ()>,
    pub targets: IndexMap<String, ()>,
    pub data: IndexMap<String, ()>,
    /// datum name -> threat name -> Risk
    pub risks: IndexMap<String, IndexMap<String, Risk>>,
    /// datum name -> measure name -> Mitigation
    pub mitigations: IndexMap<String, IndexMap<String, Mitigation>>,
    pub notes: Vec<String>,
}

impl Interaction {
    pub fn new(
        ordinal: u32,
        action: Action,
        sources: IndexMap<String, ()>,
        targets: IndexMap<String, ()>,
        data: IndexMap<String, ()>,
        notes: Vec<String>,
    ) -> Self {
        let risks = data.keys().map(|d| (d.clone(), IndexMap::new())).collect();
        let mitigations = data.keys().map(|d| (d.clone(), IndexMap::new())).collect();
        Self {
            ordinal,
            action,
            sources,
            targets,
            data,
            risks,
            mitigations,
            notes,
        }
    }

    /// The Cartesian product of sources x targets, i.e. every
    /// (source, target) element-name pair this interaction implies.
    pub fn source_target_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.sources.len() * self.targets.len());
        for s in self.sources.keys() {
            for t in self.targets.keys() {
                pairs.push((s.clone(), t.clone()));
            }
        }
        pairs
    }
}
