//! Dead-anchor stripping: when `-i`/`-x`/`-a` filters drop a component from
//! the rendered view, any `<a href="#id">` cross-link pointing at it would
//! otherwise point nowhere. This unwraps such links down to their inner
//! text, keeping every other link intact.

use once_cell::sync::Lazy;
use regex::Regex;

static ID_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"id="([^"]+)""#).unwrap());
static ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a href="#([^"]+)">(.*?)</a>"#).unwrap());

/// Removes `<a href="#id">label</a>` wrappers whose `id` has no matching
/// `id="..."` anywhere else in `html`, replacing them with just `label`.
pub fn strip_dead_anchors(html: &str) -> String {
    let live_ids: std::collections::HashSet<&str> =
        ID_ATTR.captures_iter(html).map(|c| c.get(1).unwrap().as_str()).collect();

    ANCHOR
        .replace_all(html, |caps: &regex::Captures| {
            let target = &caps[1];
            let label = &caps[2];
            if live_ids.contains(target) {
                caps[0].to_string()
            } else {
                label.to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_link_to_missing_id() {
        let html = r#"<div id="threat-t1">T1</div><a href="#threat-t1">T1</a><a href="#threat-t2">T2</a>"#;
        let cleaned = strip_dead_anchors(html);
        assert!(cleaned.contains(r#"<a href="#threat-t1">T1</a>"#));
        assert!(!cleaned.contains("#threat-t2"));
        assert!(cleaned.ends_with("T2"));
    }

    #[test]
    fn leaves_html_with_no_anchors_untouched() {
        let html = "<table><tr><td>plain</td></tr></table>";
        assert_eq!(strip_dead_anchors(html), html);
    }
}
