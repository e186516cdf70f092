//! Directive dispatch: walks the loader's combined directive stream in the
//! fixed priority order and mutates a `ModelStore` accordingly. Unresolved
//! names, wrong-kind references, and malformed modifications are logged
//! and skipped rather than aborting the compile.

use indexmap::{IndexMap, IndexSet};
use tracing::warn;

use crate::affected;
use crate::directive::Directive;
use crate::enums::{Action, Capability, Classification, Imperative, Impact, Probability, Profile, Role, Status};
use crate::model::{Cluster, ComponentKind, Datum, Element, Interaction, Measure, Mitigation, ModelStore, Note, Risk, Threat};

/// Applies every directive to `store` in dispatch-priority order, stable
/// within a priority class so that e.g. two `Element` directives keep their
/// source order relative to each other.
pub fn interpret(store: &mut ModelStore, mut directives: Vec<Directive>) {
    directives.sort_by_key(Directive::priority);
    for directive in directives {
        match directive {
            Directive::Include { .. } => {
                // Resolved by the loader before the directive stream reaches here.
            }
            Directive::Alias { names, members } => apply_alias(store, names, members),
            Directive::Note {
                names,
                color,
                parent,
                targets,
                description,
            } => apply_note(store, names, color, parent, targets, description),
            Directive::Cluster {
                names,
                parent,
                description,
            } => apply_cluster(store, names, parent, description),
            Directive::Element {
                names,
                profile,
                role,
                parent,
                description,
            } => apply_element(store, names, profile, role, parent, description),
            Directive::Datum {
                names,
                classification,
                description,
            } => apply_datum(store, names, classification, description),
            Directive::Threat {
                names,
                impact,
                probability,
                description,
            } => apply_threat(store, names, impact, probability, description),
            Directive::Measure {
                names,
                capability,
                threats,
                description,
            } => apply_measure(store, names, capability, threats, description),
            Directive::Modification {
                names,
                profile,
                role,
                parent,
                classification,
                impact,
                probability,
                capability,
                new_name,
                description,
            } => apply_modification(
                store,
                names,
                profile,
                role,
                parent,
                classification,
                impact,
                probability,
                capability,
                new_name,
                description,
            ),
            Directive::Interaction {
                action,
                sources,
                targets,
                data,
                notes,
            } => apply_interaction(store, action, sources, targets, data, notes),
            Directive::Mitigation {
                measure,
                imperative,
                state,
                affected,
            } => apply_mitigation(store, measure, imperative, state, affected),
            Directive::Risk { threat, affected } => apply_risk(store, threat, affected),
        }
    }
}

fn apply_alias(store: &mut ModelStore, names: Vec<String>, members: Vec<String>) {
    let members: IndexSet<String> = members.into_iter().collect();
    for name in names {
        store.define_alias(&name, members.clone());
    }
}

fn apply_note(
    store: &mut ModelStore,
    names: Vec<String>,
    color: Option<String>,
    parent: Option<String>,
    targets: Vec<String>,
    description: Option<String>,
) {
    let resolved_targets: IndexSet<String> = store
        .expand_names(&targets, Some(ComponentKind::Element))
        .into_iter()
        .collect();
    let parent = parent.or_else(|| store.lowest_common_ancestor(&resolved_targets));

    for name in names {
        let mut note = Note::new(name.clone(), color.clone(), resolved_targets.clone());
        note.parent = parent.clone();
        if let Some(d) = &description {
            note.common.description = d.clone();
        }
        store.insert_note(note);
        store.mark_active(ComponentKind::Note, &name);
    }
}

fn apply_cluster(store: &mut ModelStore, names: Vec<String>, parent: Option<String>, description: Option<String>) {
    for name in names {
        let cluster = match &parent {
            Some(p) => match store.clusters.get(p) {
                Some(existing) => Cluster::new_child(name.clone(), p.clone(), existing.level),
                None => {
                    warn!(parent = p, "cluster's parent not declared yet; treated as a root cluster");
                    Cluster::new_root(name.clone())
                }
            },
            None => Cluster::new_root(name.clone()),
        };
        let mut cluster = cluster;
        if let Some(d) = &description {
            cluster.common.description = d.clone();
        }
        store.insert_cluster(cluster);
        store.mark_active(ComponentKind::Cluster, &name);
    }
}

fn apply_element(
    store: &mut ModelStore,
    names: Vec<String>,
    profile: String,
    role: String,
    parent: Option<String>,
    description: Option<String>,
) {
    let Some(profile) = Profile::from_str_ci(&profile) else {
        warn!(profile, "unrecognized element profile; directive skipped");
        return;
    };
    let Some(role) = Role::from_str_ci(&role) else {
        warn!(role, "unrecognized element role; directive skipped");
        return;
    };
    if let Some(p) = &parent {
        if !store.clusters.contains_key(p) {
            warn!(parent = p, "element's parent cluster not declared; element left at top level");
        }
    }
    for name in names {
        let mut element = Element::new(name.clone(), profile, role, parent.clone());
        if let Some(d) = &description {
            element.common.description = d.clone();
        }
        store.insert_element(element);
    }
}

fn apply_datum(store: &mut ModelStore, names: Vec<String>, classification: String, description: Option<String>) {
    let Some(classification) = Classification::from_str_ci(&classification) else {
        warn!(classification, "unrecognized datum classification; directive skipped");
        return;
    };
    for name in names {
        let mut datum = Datum::new(name.clone(), classification);
        if let Some(d) = &description {
            datum.common.description = d.clone();
        }
        store.insert_datum(datum);
    }
}

fn apply_threat(
    store: &mut ModelStore,
    names: Vec<String>,
    impact: String,
    probability: String,
    description: Option<String>,
) {
    let Some(impact) = Impact::from_str_ci(&impact) else {
        warn!(impact, "unrecognized threat impact; directive skipped");
        return;
    };
    let Some(probability) = Probability::from_str_ci(&probability) else {
        warn!(probability, "unrecognized threat probability; directive skipped");
        return;
    };
    for name in names {
        let mut threat = Threat::new(name.clone(), impact, probability);
        if let Some(d) = &description {
            threat.common.description = d.clone();
        }
        store.insert_threat(threat);
    }
}

fn apply_measure(
    store: &mut ModelStore,
    names: Vec<String>,
    capability: String,
    threats: Vec<String>,
    description: Option<String>,
) {
    let Some(capability) = Capability::from_str_ci(&capability) else {
        warn!(capability, "unrecognized measure capability; directive skipped");
        return;
    };
    let resolved_threats = store.expand_names(&threats, Some(ComponentKind::Threat));
    for name in names {
        let mut measure = Measure::new(name.clone(), capability);
        for t in &resolved_threats {
            measure.mitigable_threats.insert(t.clone(), ());
        }
        if let Some(d) = &description {
            measure.common.description = d.clone();
        }
        store.insert_measure(measure);
        for t in &resolved_threats {
            if let Some(threat) = store.threats.get_mut(t) {
                threat.applicable_measures.insert(name.clone(), ());
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_modification(
    store: &mut ModelStore,
    names: Vec<String>,
    profile: Option<String>,
    role: Option<String>,
    parent: Option<String>,
    classification: Option<String>,
    impact: Option<String>,
    probability: Option<String>,
    capability: Option<String>,
    new_name: Option<String>,
    description: Option<String>,
) {
    let resolved = store.expand_names(&names, None);
    for name in resolved {
        let Some(kind) = store.kind_of(&name) else {
            warn!(name, "modification target not found; skipped");
            continue;
        };
        let wrong = |attr: &str| warn!(name, kind = %kind, attr, "attribute does not apply to this component kind; ignored");

        match kind {
            ComponentKind::Element => {
                let Some(element) = store.elements.get_mut(&name) else { continue };
                if let Some(p) = &profile {
                    match Profile::from_str_ci(p) {
                        Some(v) => element.profile = v,
                        None => warn!(name, profile = p, "unrecognized profile in modification; ignored"),
                    }
                }
                if let Some(r) = &role {
                    match Role::from_str_ci(r) {
                        Some(v) => element.role = v,
                        None => warn!(name, role = r, "unrecognized role in modification; ignored"),
                    }
                }
                if let Some(new_parent) = &parent {
                    let old_parent = element.parent.clone();
                    element.parent = Some(new_parent.clone());
                    if let Some(old) = old_parent {
                        if let Some(c) = store.clusters.get_mut(&old) {
                            c.children.shift_remove(&name);
                        }
                    }
                    if let Some(c) = store.clusters.get_mut(new_parent) {
                        c.children.insert(name.clone(), ());
                    }
                }
                if classification.is_some() {
                    wrong("classification");
                }
                if impact.is_some() {
                    wrong("impact");
                }
                if probability.is_some() {
                    wrong("probability");
                }
                if capability.is_some() {
                    wrong("capability");
                }
            }
            ComponentKind::Datum => {
                let Some(datum) = store.data.get_mut(&name) else { continue };
                if let Some(c) = &classification {
                    match Classification::from_str_ci(c) {
                        Some(v) => datum.classification = v,
                        None => warn!(name, classification = c, "unrecognized classification in modification; ignored"),
                    }
                }
                if profile.is_some() {
                    wrong("profile");
                }
                if role.is_some() {
                    wrong("role");
                }
                if parent.is_some() {
                    wrong("parent");
                }
                if impact.is_some() {
                    wrong("impact");
                }
                if probability.is_some() {
                    wrong("probability");
                }
                if capability.is_some() {
                    wrong("capability");
                }
            }
            ComponentKind::Threat => {
                let Some(threat) = store.threats.get_mut(&name) else { continue };
                if let Some(i) = &impact {
                    match Impact::from_str_ci(i) {
                        Some(v) => threat.impact = v,
                        None => warn!(name, impact = i, "unrecognized impact in modification; ignored"),
                    }
                }
                if let Some(p) = &probability {
                    match Probability::from_str_ci(p) {
                        Some(v) => threat.probability = v,
                        None => warn!(name, probability = p, "unrecognized probability in modification; ignored"),
                    }
                }
                if profile.is_some() {
                    wrong("profile");
                }
                if role.is_some() {
                    wrong("role");
                }
                if parent.is_some() {
                    wrong("parent");
                }
                if classification.is_some() {
                    wrong("classification");
                }
                if capability.is_some() {
                    wrong("capability");
                }
            }
            ComponentKind::Measure => {
                let Some(measure) = store.measures.get_mut(&name) else { continue };
                if let Some(c) = &capability {
                    match Capability::from_str_ci(c) {
                        Some(v) => measure.capability = v,
                        None => warn!(name, capability = c, "unrecognized capability in modification; ignored"),
                    }
                }
                if profile.is_some() {
                    wrong("profile");
                }
                if role.is_some() {
                    wrong("role");
                }
                if parent.is_some() {
                    wrong("parent");
                }
                if classification.is_some() {
                    wrong("classification");
                }
                if impact.is_some() {
                    wrong("impact");
                }
                if probability.is_some() {
                    wrong("probability");
                }
            }
            ComponentKind::Cluster => {
                if let Some(new_parent) = &parent {
                    store.reparent_cluster(&name, Some(new_parent.clone()));
                }
                if profile.is_some() || role.is_some() || classification.is_some() || impact.is_some() || probability.is_some() || capability.is_some()
                {
                    warn!(name, kind = %kind, "attributes do not apply to a cluster; ignored");
                }
            }
            ComponentKind::Note => {
                if profile.is_some() || role.is_some() || parent.is_some() || classification.is_some() || impact.is_some() || probability.is_some() || capability.is_some()
                {
                    warn!(name, kind = %kind, "attributes do not apply to a note; ignored");
                }
            }
        }

        if let Some(nn) = &new_name {
            set_label(store, kind, &name, nn);
        }
        if let Some(d) = &description {
            set_description(store, kind, &name, d);
        }
    }
}

fn set_label(store: &mut ModelStore, kind: ComponentKind, name: &str, label: &str) {
    match kind {
        ComponentKind::Cluster => store.clusters.get_mut(name).map(|c| c.common.label = label.to_string()),
        ComponentKind::Element => store.elements.get_mut(name).map(|c| c.common.label = label.to_string()),
        ComponentKind::Datum => store.data.get_mut(name).map(|c| c.common.label = label.to_string()),
        ComponentKind::Threat => store.threats.get_mut(name).map(|c| c.common.label = label.to_string()),
        ComponentKind::Measure => store.measures.get_mut(name).map(|c| c.common.label = label.to_string()),
        ComponentKind::Note => store.notes.get_mut(name).map(|c| c.common.label = label.to_string()),
    };
}

fn set_description(store: &mut ModelStore, kind: ComponentKind, name: &str, description: &str) {
    match kind {
        ComponentKind::Cluster => store.clusters.get_mut(name).map(|c| c.common.description = description.to_string()),
        ComponentKind::Element => store.elements.get_mut(name).map(|c| c.common.description = description.to_string()),
        ComponentKind::Datum => store.data.get_mut(name).map(|c| c.common.description = description.to_string()),
        ComponentKind::Threat => store.threats.get_mut(name).map(|c| c.common.description = description.to_string()),
        ComponentKind::Measure => store.measures.get_mut(name).map(|c| c.common.description = description.to_string()),
        ComponentKind::Note => store.notes.get_mut(name).map(|c| c.common.description = description.to_string()),
    };
}

fn apply_interaction(
    store: &mut ModelStore,
    action: String,
    sources: Vec<String>,
    targets: Vec<String>,
    data: Vec<String>,
    notes: Option<String>,
) {
    let Some(action) = Action::from_str_ci(&action) else {
        warn!(action, "unrecognized interaction action; directive skipped");
        return;
    };
    let sources = store.expand_names(&sources, Some(ComponentKind::Element));
    let targets = store.expand_names(&targets, Some(ComponentKind::Element));
    let data = store.expand_names(&data, Some(ComponentKind::Datum));
    if sources.is_empty() || targets.is_empty() || data.is_empty() {
        warn!(%action, "interaction has no resolved sources, targets, or data; skipped");
        return;
    }

    let ordinal = store.allocate_ordinal();
    let sources: IndexMap<String, ()> = sources.into_iter().map(|n| (n, ())).collect();
    let targets: IndexMap<String, ()> = targets.into_iter().map(|n| (n, ())).collect();
    let data: IndexMap<String, ()> = data.into_iter().map(|n| (n, ())).collect();
    let notes = notes.into_iter().collect();

    store.push_interaction(Interaction::new(ordinal, action, sources, targets, data, notes));
}

fn derive_mitigation(imperative: &Option<String>, state: &str) -> (Imperative, Status) {
    match imperative {
        Some(raw) => {
            let imperative = Imperative::from_str_ci(raw).unwrap_or(Imperative::None);
            let status = if state.eq_ignore_ascii_case("verified") {
                Status::Implemented
            } else {
                Status::Pending
            };
            (imperative, status)
        }
        None => {
            let status = if state.eq_ignore_ascii_case("verified") {
                Status::Verified
            } else {
                Status::Implemented
            };
            (Imperative::None, status)
        }
    }
}

fn apply_mitigation(store: &mut ModelStore, measure: String, imperative: Option<String>, state: String, affected: String) {
    let resolved_measures = store.expand_names(std::slice::from_ref(&measure), Some(ComponentKind::Measure));
    if resolved_measures.is_empty() {
        warn!(measure, "mitigation names an unresolved measure; skipped");
        return;
    }
    let (imperative, status) = derive_mitigation(&imperative, &state);
    // An `all ... except ...` clause that resolves to the empty set is
    // intentionally silent (no effect, no warning); see affected::resolve.
    let resolved = affected::resolve(store, &affected);

    for measure_name in resolved_measures {
        store.mark_active(ComponentKind::Measure, &measure_name);
        for interaction in &mut store.interactions {
            if !affected::interaction_is_affected(interaction, &resolved.pairs) {
                continue;
            }
            for datum in &resolved.data {
                if let Some(per_datum) = interaction.mitigations.get_mut(datum) {
                    per_datum.insert(
                        measure_name.clone(),
                        Mitigation {
                            measure: measure_name.clone(),
                            imperative,
                            status,
                        },
                    );
                }
            }
        }
    }
}

fn apply_risk(store: &mut ModelStore, threat: String, affected: String) {
    let resolved_threats = store.expand_names(std::slice::from_ref(&threat), Some(ComponentKind::Threat));
    if resolved_threats.is_empty() {
        warn!(threat, "risk names an unresolved threat; skipped");
        return;
    }
    let resolved = affected::resolve(store, &affected);

    for threat_name in resolved_threats {
        store.mark_active(ComponentKind::Threat, &threat_name);
        for interaction in &mut store.interactions {
            if !affected::interaction_is_affected(interaction, &resolved.pairs) {
                continue;
            }
            for datum in &resolved.data {
                if let Some(per_datum) = interaction.risks.get_mut(datum) {
                    per_datum.insert(
                        threat_name.clone(),
                        Risk {
                            threat: threat_name.clone(),
                            affected_datum: datum.clone(),
                        },
                    );
                }
            }
        }
    }
}
