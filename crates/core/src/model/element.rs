use crate::enums::{Profile, Role};

use super::common::Common;

#[derive(Debug, Clone)]
pub struct Element {
    pub common: Common,
    pub profile: Profile,
    pub role: Role,
    pub parent: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>, profile: Profile, role: Role, parent: Option<String>) -> Self {
        Self {
            common: Common::new(name),
            profile,
            role,
            parent,
        }
    }
}
