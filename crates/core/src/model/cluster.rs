use indexmap::IndexMap;

use super::common::Common;

/// A nesting group for elements, notes and other clusters.
///
/// Children are tracked by name only (an arena-of-names edge, since
/// clusters/elements/notes can reference each other in either direction);
/// the owning `ModelStore` resolves names back to `Cluster` values.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub common: Common,
    /// 1 for a root cluster (no parent), otherwise 1 + parent.level.
    pub level: u32,
    pub parent: Option<String>,
    /// Ordered by insertion (i.e. by first-seen child-of-this-cluster directive).
    pub children: IndexMap<String, ()>,
}

impl Cluster {
    pub fn new_root(name: impl Into<String>) -> Self {
        Self {
            common: Common::new(name),
            level: 1,
            parent: None,
            children: IndexMap::new(),
        }
    }

    pub fn new_child(name: impl Into<String>, parent: impl Into<String>, parent_level: u32) -> Self {
        Self {
            common: Common::new(name),
            level: parent_level + 1,
            parent: Some(parent.into()),
            children: IndexMap::new(),
        }
    }
}
