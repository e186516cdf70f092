//! Finalization / canonical ordering. Applied once, after every directive
//! has been interpreted, so renderer output is deterministic and
//! independent of source order except where ordinal order is explicitly
//! preserved (interactions keep their declared sequence).

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::enums::{Capability, Classification, Rating};
use crate::model::{Datum, Element, Measure, ModelStore, Threat};

type LabelKey = (String, String);

fn label_key(label: &str, description: &str) -> LabelKey {
    (label.to_string(), description.to_string())
}

fn element_key(e: &Element) -> (Reverse<crate::enums::Profile>, LabelKey) {
    (Reverse(e.profile), label_key(&e.common.label, &e.common.description))
}

fn datum_key(d: &Datum) -> (Reverse<Classification>, LabelKey) {
    (Reverse(d.classification), label_key(&d.common.label, &d.common.description))
}

fn threat_key(t: &Threat) -> (Reverse<Rating>, LabelKey) {
    (Reverse(t.potential_risk()), label_key(&t.common.label, &t.common.description))
}

fn measure_key(m: &Measure) -> (Reverse<Capability>, LabelKey) {
    (Reverse(m.capability), label_key(&m.common.label, &m.common.description))
}

/// Applies every canonical ordering rule to `store` in place. Idempotent:
/// running it twice in a row produces the same result both times.
pub fn finalize(store: &mut ModelStore) {
    sort_elements(store);
    sort_data(store);
    sort_threats(store);
    sort_measures(store);
    sort_clusters(store);
    sort_interactions(store);
}

fn sort_elements(store: &mut ModelStore) {
    store.elements.sort_by(|_, a, _, b| element_key(a).cmp(&element_key(b)));
}

fn sort_data(store: &mut ModelStore) {
    store.data.sort_by(|_, a, _, b| datum_key(a).cmp(&datum_key(b)));
}

fn sort_threats(store: &mut ModelStore) {
    store.threats.sort_by(|_, a, _, b| threat_key(a).cmp(&threat_key(b)));
    let measure_keys: HashMap<String, (Reverse<Capability>, LabelKey)> =
        store.measures.iter().map(|(name, m)| (name.clone(), measure_key(m))).collect();
    for threat in store.threats.values_mut() {
        threat
            .applicable_measures
            .sort_by(|a, _, b, _| measure_keys.get(a).cmp(&measure_keys.get(b)));
    }
}

fn sort_measures(store: &mut ModelStore) {
    store.measures.sort_by(|_, a, _, b| measure_key(a).cmp(&measure_key(b)));
    let threat_keys: HashMap<String, (Reverse<Rating>, LabelKey)> =
        store.threats.iter().map(|(name, t)| (name.clone(), threat_key(t))).collect();
    for measure in store.measures.values_mut() {
        measure
            .mitigable_threats
            .sort_by(|a, _, b, _| threat_keys.get(a).cmp(&threat_keys.get(b)));
    }
}

/// Clusters, elements, and notes share one child namespace per cluster, so
/// their combined label/description keys are needed to sort `children`.
fn sort_clusters(store: &mut ModelStore) {
    let mut keys: HashMap<String, LabelKey> = HashMap::new();
    for (name, c) in &store.clusters {
        keys.insert(name.clone(), label_key(&c.common.label, &c.common.description));
    }
    for (name, e) in &store.elements {
        keys.insert(name.clone(), label_key(&e.common.label, &e.common.description));
    }
    for (name, n) in &store.notes {
        keys.insert(name.clone(), label_key(&n.common.label, &n.common.description));
    }

    store
        .clusters
        .sort_by(|_, a, _, b| label_key(&a.common.label, &a.common.description).cmp(&label_key(&b.common.label, &b.common.description)));
    for cluster in store.clusters.values_mut() {
        cluster.children.sort_by(|a, _, b, _| keys.get(a).cmp(&keys.get(b)));
    }
}

/// Interactions keep their ordinal (source) order; only the data carried by
/// each, and the risk/mitigation maps keyed by datum, are reordered.
fn sort_interactions(store: &mut ModelStore) {
    let datum_keys: HashMap<String, (Reverse<Classification>, LabelKey)> =
        store.data.iter().map(|(name, d)| (name.clone(), datum_key(d))).collect();
    let threat_keys: HashMap<String, (Reverse<Rating>, LabelKey)> =
        store.threats.iter().map(|(name, t)| (name.clone(), threat_key(t))).collect();
    let measure_keys: HashMap<String, (Reverse<Capability>, LabelKey)> =
        store.measures.iter().map(|(name, m)| (name.clone(), measure_key(m))).collect();

    for interaction in &mut store.interactions {
        interaction.data.sort_by(|a, _, b, _| datum_keys.get(a).cmp(&datum_keys.get(b)));
        interaction.risks.sort_by(|a, _, b, _| datum_keys.get(a).cmp(&datum_keys.get(b)));
        interaction.mitigations.sort_by(|a, _, b, _| datum_keys.get(a).cmp(&datum_keys.get(b)));
        for per_threat in interaction.risks.values_mut() {
            per_threat.sort_by(|a, _, b, _| threat_keys.get(a).cmp(&threat_keys.get(b)));
        }
        for per_measure in interaction.mitigations.values_mut() {
            per_measure.sort_by(|a, _, b, _| measure_keys.get(a).cmp(&measure_keys.get(b)));
        }
    }
}
