//! Cross-linked HTML tables, modeled on `dfdone.plot`'s
//! `build_interaction_table`/`build_assumption_table`: one `<table>` per
//! component kind, rows colored by risk/classification via CSS classes from
//! [`crate::css`].

use std::fmt::Write as _;

use tml_core::model::Interaction;
use tml_core::RendererView;

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn anchor_id(kind: &str, name: &str) -> String {
    format!("{kind}-{}", name.chars().map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' }).collect::<String>())
}

pub fn build_data_table(view: &RendererView<'_>, active_only: bool) -> String {
    let mut html = String::from("<table class=\"data-table\">\n<thead><tr><th>#</th><th>Name</th><th>Classification</th><th>Description</th></tr></thead>\n<tbody>\n");
    let data: Vec<_> = if active_only { view.active_data().collect() } else { view.data().collect() };
    for (i, datum) in data.into_iter().enumerate() {
        writeln!(
            html,
            "<tr id=\"{id}\"><td><div class=\"row-number data-number\">{n}</div></td><td><div class=\"label data-label classification-{cls}\">{label}</div></td><td>{cls}</td><td>{desc}</td></tr>",
            id = anchor_id("datum", &datum.common.name),
            n = i + 1,
            cls = datum.classification,
            label = escape_html(&datum.common.label),
            desc = escape_html(&datum.common.description),
        )
        .unwrap();
    }
    html.push_str("</tbody>\n</table>");
    html
}

pub fn build_threat_table(view: &RendererView<'_>, active_only: bool) -> String {
    let mut html = String::from("<table class=\"threat-table\">\n<thead><tr><th>#</th><th>Name</th><th>Potential risk</th><th>Description</th></tr></thead>\n<tbody>\n");
    let threats: Vec<_> = if active_only { view.active_threats().collect() } else { view.threats().collect() };
    for (i, threat) in threats.into_iter().enumerate() {
        let rating = threat.potential_risk();
        writeln!(
            html,
            "<tr id=\"{id}\"><td><div class=\"row-number threat-number\">{n}</div></td><td><div class=\"label threat-label risk-{risk}\">{label}</div></td><td>{risk}</td><td>{desc}</td></tr>",
            id = anchor_id("threat", &threat.common.name),
            n = i + 1,
            risk = rating,
            label = escape_html(&threat.common.label),
            desc = escape_html(&threat.common.description),
        )
        .unwrap();
    }
    html.push_str("</tbody>\n</table>");
    html
}

pub fn build_measure_table(view: &RendererView<'_>, active_only: bool) -> String {
    let mut html = String::from("<table class=\"measure-table\">\n<thead><tr><th>#</th><th>Name</th><th>Capability</th><th>Mitigates</th><th>Description</th></tr></thead>\n<tbody>\n");
    let measures: Vec<_> = if active_only { view.active_measures().collect() } else { view.measures().collect() };
    for (i, measure) in measures.into_iter().enumerate() {
        let mitigates = measure
            .mitigable_threats
            .keys()
            .map(|t| format!("<a href=\"#{}\">{}</a>", anchor_id("threat", t), escape_html(t)))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            html,
            "<tr id=\"{id}\"><td><div class=\"row-number measure-number\">{n}</div></td><td><div class=\"label measure-label\">{label}</div></td><td>{cap}</td><td>{mitigates}</td><td>{desc}</td></tr>",
            id = anchor_id("measure", &measure.common.name),
            n = i + 1,
            cap = measure.capability,
            label = escape_html(&measure.common.label),
            desc = escape_html(&measure.common.description),
        )
        .unwrap();
    }
    html.push_str("</tbody>\n</table>");
    html
}

fn interaction_notes_cell(interaction: &Interaction) -> String {
    if interaction.notes.is_empty() {
        "<div class=\"dash\">-</div>".to_string()
    } else {
        format!("<div class=\"notes\">{}</div>", escape_html(&interaction.notes.join("; ")))
    }
}

/// One row per (interaction, datum); threats for that datum are stacked in
/// a single cell, as are mitigations, each tinted by its own risk/status.
/// With `active_only`, interactions touching no active element are skipped.
pub fn build_interaction_table(view: &RendererView<'_>, active_only: bool) -> String {
    let mut html = String::from(
        "<table class=\"interaction-table\">\n<thead><tr><th>#</th><th>Action</th><th>Source</th><th>Target</th><th>Data</th><th>Threats</th><th>Mitigations</th><th>Notes</th></tr></thead>\n<tbody>\n",
    );
    let active_names: std::collections::HashSet<String> =
        view.active_elements().map(|e| e.common.name.clone()).collect();
    for interaction in view.interactions() {
        if active_only
            && !interaction.sources.keys().chain(interaction.targets.keys()).any(|n| active_names.contains(n))
        {
            continue;
        }
        let data_count = interaction.data.len().max(1);
        let mut first = true;
        for datum in interaction.data.keys() {
            html.push_str("<tr>");
            if first {
                write!(
                    html,
                    "<td rowspan=\"{rs}\"><div class=\"row-number interaction-number\">{ord}</div></td><td rowspan=\"{rs}\">{action}</td><td rowspan=\"{rs}\">{src}</td><td rowspan=\"{rs}\">{dst}</td>",
                    rs = data_count,
                    ord = interaction.ordinal,
                    action = interaction.action,
                    src = escape_html(&interaction.sources.keys().cloned().collect::<Vec<_>>().join(", ")),
                    dst = escape_html(&interaction.targets.keys().cloned().collect::<Vec<_>>().join(", ")),
                )
                .unwrap();
            }

            write!(
                html,
                "<td><div class=\"label data-label\">{}</div></td>",
                escape_html(datum)
            )
            .unwrap();

            let threats_cell = match interaction.risks.get(datum) {
                Some(risks) if !risks.is_empty() => risks
                    .keys()
                    .map(|t| {
                        let rating = view.risk_rating(interaction, datum, t);
                        format!(
                            "<div class=\"label threat-label risk-{}\"><a href=\"#{}\">{}</a></div>",
                            rating,
                            anchor_id("threat", t),
                            escape_html(t)
                        )
                    })
                    .collect::<String>(),
                _ => "<div class=\"dash\">-</div>".to_string(),
            };
            write!(html, "<td>{threats_cell}</td>").unwrap();

            let mitigations_cell = match interaction.mitigations.get(datum) {
                Some(mitigations) if !mitigations.is_empty() => mitigations
                    .values()
                    .map(|m| {
                        format!(
                            "<div class=\"label measure-label status-{}\"><a href=\"#{}\">{}</a></div>",
                            m.status,
                            anchor_id("measure", &m.measure),
                            escape_html(&m.measure)
                        )
                    })
                    .collect::<String>(),
                _ => "<div class=\"dash\">-</div>".to_string(),
            };
            write!(html, "<td>{mitigations_cell}</td>").unwrap();

            if first {
                write!(html, "<td rowspan=\"{}\">{}</td>", data_count, interaction_notes_cell(interaction)).unwrap();
            }
            html.push_str("</tr>\n");
            first = false;
        }
        if interaction.data.is_empty() {
            writeln!(
                html,
                "<tr><td><div class=\"row-number interaction-number\">{}</div></td><td>{}</td><td>{}</td><td>{}</td><td colspan=\"2\"><div class=\"dash\">-</div></td><td>{}</td></tr>",
                interaction.ordinal,
                interaction.action,
                escape_html(&interaction.sources.keys().cloned().collect::<Vec<_>>().join(", ")),
                escape_html(&interaction.targets.keys().cloned().collect::<Vec<_>>().join(", ")),
                interaction_notes_cell(interaction),
            )
            .unwrap();
        }
    }
    html.push_str("</tbody>\n</table>");
    html
}
