use crate::enums::Classification;

use super::common::Common;

#[derive(Debug, Clone)]
pub struct Datum {
    pub common: Common,
    pub classification: Classification,
}

impl Datum {
    pub fn new(name: impl Into<String>, classification: Classification) -> Self {
        Self {
            common: Common::new(name),
            classification,
        }
    }
}
