use indexmap::IndexSet;

use super::common::Common;

#[derive(Debug, Clone)]
pub struct Note {
    pub common: Common,
    pub color: Option<String>,
    pub parent: Option<String>,
    pub targets: IndexSet<String>,
}

impl Note {
    pub fn new(name: impl Into<String>, color: Option<String>, targets: IndexSet<String>) -> Self {
        Self {
            common: Common::new(name),
            color,
            parent: None,
            targets,
        }
    }
}
