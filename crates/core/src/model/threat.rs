use indexmap::IndexMap;

use crate::enums::{rating_for_sum, Impact, Probability, Rating};

use super::common::Common;

#[derive(Debug, Clone)]
pub struct Threat {
    pub common: Common,
    pub impact: Impact,
    pub probability: Probability,
    /// Measures whose capability applies against this threat, in the order
    /// they were declared with `measure against threat`.
    pub applicable_measures: IndexMap<String, ()>,
}

impl Threat {
    pub fn new(name: impl Into<String>, impact: Impact, probability: Probability) -> Self {
        Self {
            common: Common::new(name),
            impact,
            probability,
            applicable_measures: IndexMap::new(),
        }
    }

    /// Unmitigated, datum-agnostic risk sum (classification contributes 0).
    pub fn base_sum(&self) -> i32 {
        self.impact.as_i32() + self.probability.as_i32()
    }

    /// A threat's intrinsic rating, independent of any particular
    /// interaction/datum/mitigation. Used for finalization ordering.
    pub fn potential_risk(&self) -> Rating {
        rating_for_sum(self.base_sum())
    }
}
