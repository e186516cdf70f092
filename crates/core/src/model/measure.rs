use indexmap::IndexMap;

use crate::enums::Capability;

use super::common::Common;

#[derive(Debug, Clone)]
pub struct Measure {
    pub common: Common,
    pub capability: Capability,
    /// Threats this measure was declared `against`, in declaration order.
    pub mitigable_threats: IndexMap<String, ()>,
}

impl Measure {
    pub fn new(name: impl Into<String>, capability: Capability) -> Self {
        Self {
            common: Common::new(name),
            capability,
            mitigable_threats: IndexMap::new(),
        }
    }
}
