//! On-demand risk rating computation: a Risk's rating is never stored, only
//! recomputed from the interaction's current mitigations whenever it's
//! asked for, so a mitigation directive applied after a risk directive is
//! reflected without revisiting the risk.

use crate::enums::{rating_for_sum, Rating, Status};
use crate::model::{Interaction, ModelStore};

/// The rating of `threat` against `datum` within `interaction`, per the risk
/// matrix formula: impact + probability + classification, minus the
/// capability of every verified, applicable measure mitigating that datum,
/// clamped to `[1, 7]` before the sum-to-rating mapping.
pub fn risk_rating(store: &ModelStore, interaction: &Interaction, datum: &str, threat: &str) -> Rating {
    let Some(threat_obj) = store.threats.get(threat) else {
        return Rating::Unknown;
    };
    let Some(datum_obj) = store.data.get(datum) else {
        return Rating::Unknown;
    };

    let mut sum = threat_obj.base_sum() + datum_obj.classification.as_i32();

    if let Some(per_measure) = interaction.mitigations.get(datum) {
        for mitigation in per_measure.values() {
            if mitigation.status != Status::Verified {
                continue;
            }
            let Some(measure) = store.measures.get(&mitigation.measure) else {
                continue;
            };
            if !threat_obj.applicable_measures.contains_key(&mitigation.measure) {
                continue;
            }
            sum -= measure.capability.as_i32();
        }
    }

    rating_for_sum(sum)
}

/// The highest rating across every risk recorded for `interaction`, or
/// `Rating::Unknown` if it carries none.
pub fn highest_risk(store: &ModelStore, interaction: &Interaction) -> Rating {
    interaction
        .risks
        .iter()
        .flat_map(|(datum, per_threat)| per_threat.keys().map(move |threat| risk_rating(store, interaction, datum, threat)))
        .max()
        .unwrap_or(Rating::Unknown)
}

/// True iff `threat` is recorded as a risk against every datum carried by
/// `interaction` ("entirely affects").
pub fn entirely_affects(interaction: &Interaction, threat: &str) -> bool {
    !interaction.risks.is_empty()
        && interaction
            .risks
            .values()
            .all(|per_threat| per_threat.contains_key(threat))
}
