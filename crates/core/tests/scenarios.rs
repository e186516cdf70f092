//! End-to-end scenarios covering the compiler's core behaviors: a minimal
//! model, threat/risk rating, mitigation status and its effect on rating,
//! detective measures, alias-scoped exclusion, and include-cycle dedup.

use std::path::Path;

use tml_core::enums::{Action, Rating, Status};
use tml_core::{compile_str, CompiledModel};

fn compile(text: &str) -> CompiledModel {
    compile_str(Path::new("model.tml"), text)
}

#[test]
fn scenario_a_minimal_model() {
    let model = compile(
        r#"
        "U" is a black box agent.
        "S" is a white box service.
        "X" is a public datum.
        "U" sends "X" to "S".
        "#,
    );
    let store = &model.store;
    assert_eq!(store.interactions.len(), 1);
    let interaction = &store.interactions[0];
    assert_eq!(interaction.ordinal, 1);
    assert_eq!(interaction.action, Action::Send);
    assert_eq!(interaction.sources.keys().cloned().collect::<Vec<_>>(), vec!["U"]);
    assert_eq!(interaction.targets.keys().cloned().collect::<Vec<_>>(), vec!["S"]);
    assert_eq!(interaction.data.keys().cloned().collect::<Vec<_>>(), vec!["X"]);
    assert!(interaction.risks.get("X").unwrap().is_empty());
    assert!(interaction.mitigations.get("X").unwrap().is_empty());
    assert_eq!(model.view().highest_risk(interaction), Rating::Unknown);
    assert!(store.elements["U"].common.active);
    assert!(store.elements["S"].common.active);
    assert!(store.data["X"].common.active);
}

const BASE_WITH_THREAT: &str = r#"
    "U" is a black box agent.
    "S" is a white box service.
    "X" is a public datum.
    "U" sends "X" to "S".
    "T" is a high impact, high probability threat.
    "T" applies to all data between all elements.
"#;

#[test]
fn scenario_b_threat_and_risk() {
    let model = compile(BASE_WITH_THREAT);
    let store = &model.store;
    let interaction = &store.interactions[0];
    assert!(interaction.risks["X"].contains_key("T"));
    assert_eq!(model.view().risk_rating(interaction, "X", "T"), Rating::High);
}

#[test]
fn scenario_c_verified_mitigation_reduces_risk() {
    let mut text = BASE_WITH_THREAT.to_string();
    text.push_str(
        r#"
        "M" is a full measure against "T".
        "M" has been verified on all data between all elements.
        "#,
    );
    let model = compile(&text);
    let store = &model.store;
    let interaction = &store.interactions[0];
    assert_eq!(interaction.mitigations["X"]["M"].status, Status::Verified);
    assert_eq!(model.view().risk_rating(interaction, "X", "T"), Rating::Low);
}

#[test]
fn scenario_c_implemented_mitigation_does_not_reduce_risk() {
    let mut text = BASE_WITH_THREAT.to_string();
    text.push_str(
        r#"
        "M" is a full measure against "T".
        "M" has been implemented on all data between all elements.
        "#,
    );
    let model = compile(&text);
    let store = &model.store;
    let interaction = &store.interactions[0];
    assert_eq!(interaction.mitigations["X"]["M"].status, Status::Implemented);
    assert_eq!(model.view().risk_rating(interaction, "X", "T"), Rating::High);
}

#[test]
fn scenario_d_detective_measure_never_changes_rating() {
    let mut text = BASE_WITH_THREAT.to_string();
    text.push_str(
        r#"
        "D" is a detective measure against "T".
        "D" has been verified on all data between all elements.
        "#,
    );
    let model = compile(&text);
    let store = &model.store;
    let interaction = &store.interactions[0];
    assert_eq!(interaction.mitigations["X"]["D"].status, Status::Verified);
    assert_eq!(model.view().risk_rating(interaction, "X", "T"), Rating::High);
}

#[test]
fn scenario_e_alias_scope_excludes_self_pair() {
    let model = compile(
        r#"
        "U" is a black box agent.
        "S" is a white box service.
        "X" is a public datum.
        "U" sends "X" to "S".
        "T" is a high impact, high probability threat.
        "all" is "U", "S".
        "T" applies to "X" within "all" except "U".
        "#,
    );
    let store = &model.store;
    let interaction = &store.interactions[0];
    assert!(
        !interaction.risks["X"].contains_key("T"),
        "U->S interaction should not be affected by a within-all-except-U selector"
    );
}

#[test]
fn scenario_f_include_cycle_absorbs_once() {
    let dir = tempfile::tempdir().unwrap();
    let a_path = dir.path().join("a.tml");
    std::fs::write(
        &a_path,
        r#"
        include "a.tml".
        "U" is a black box agent.
        "#,
    )
    .unwrap();
    let root_path = dir.path().join("root.tml");
    std::fs::write(&root_path, r#"include "a.tml"."#).unwrap();

    let model = tml_core::compile(&root_path).unwrap();
    assert_eq!(model.store.elements.len(), 1);
    assert_eq!(model.absorbed_files.len(), 2);
}
