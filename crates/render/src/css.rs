//! CSS injection for rendered HTML tables, ported from `dfdone.plot`'s
//! `default_style` constant and extended with the extra label/rating
//! classes this language's richer component set needs (measures, status).

use std::fs;
use std::path::Path;

pub const DEFAULT_STYLE: &str = r#"<style>
  table {
    border-collapse: collapse;
  }
  table.data-table {
  }
  table.threat-table {
  }
  table.measure-table {
  }
  table.interaction-table {
  }

  td {
    border: 1px solid black;
  }

  div.label {
  }
  div.data-label {
  }
  div.threat-label {
  }
  div.measure-label {
  }

  div.row-number {
  }
  div.data-number {
  }
  div.threat-number {
  }
  div.measure-number {
  }
  div.interaction-number {
  }

  div.classification-public {
  }
  div.classification-restricted {
  }
  div.classification-confidential {
  }

  div.risk-unknown {
  }
  div.risk-minimal {
    background: lightgreen;
  }
  div.risk-low {
    background: khaki;
  }
  div.risk-medium {
    background: sandybrown;
  }
  div.risk-high {
    background: tomato;
  }
  div.risk-critical {
    background: firebrick;
    color: white;
  }

  div.status-pending {
  }
  div.status-implemented {
  }
  div.status-verified {
  }

  div.dash {
  }

  div.notes {
  }
</style>
"#;

/// Resolves the CSS block to inject ahead of the rendered tables, per the
/// `--css`/`--no-css` flags: `None` suppresses it entirely, `Some(path)`
/// reads that file verbatim, and omitting the flag falls back to
/// [`DEFAULT_STYLE`].
pub fn resolve(enabled: bool, override_path: Option<&Path>) -> std::io::Result<String> {
    if !enabled {
        return Ok(String::new());
    }
    match override_path {
        Some(path) => fs::read_to_string(path),
        None => Ok(DEFAULT_STYLE.to_string()),
    }
}
