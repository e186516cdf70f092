//! The lexical/grammar layer: a declarative, line-anchored,
//! case-insensitive (except inside quoted literals) ordered alternation,
//! one pattern per directive kind. Mirrors the structure of
//! `dfdone.tml.grammar`'s `constructs` list, but expressed with the `regex`
//! crate's named capture groups instead of `pyparsing` combinators.
//!
//! Textual *matching* order (which pattern a line is tried against first)
//! is independent of the *dispatch* order directives are later applied in
//! (`crate::interpreter`): specific, keyword-anchored constructs are tried
//! before the generic alias fallback, exactly as `dfdone.tml.grammar`'s
//! comment instructs ("construct definitions should come after INCLUDE").

use once_cell::sync::Lazy;
use regex::Regex;

/// `"..."` with `""` as the escaped literal quote.
const QUOTED: &str = r#""(?:[^"]|"")*""#;

fn anchored(body: &str) -> Regex {
    let pattern = format!(r"(?mi)^[ \t]*{body}[ \t]*\.?[ \t]*$");
    Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid grammar pattern {pattern:?}: {e}"))
}

fn name_list(group: &str) -> String {
    format!(r#"(?P<{group}>{QUOTED}(?:\s*,\s*{QUOTED})*)"#)
}

static IS_A: &str = r"(?:is|are)\s*(?:an?|the)?\s*";
static DESCRIBED: &str = r#"(?:\s+described\s+as\s+"(?P<description>(?:[^"]|"")*)")?"#;

pub static INCLUDE: Lazy<Regex> =
    Lazy::new(|| anchored(&format!(r#"include\s+"(?P<path>(?:[^"]|"")*)""#)));

pub static NOTE: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"{names}\s+{is_a}(?:(?P<color>[A-Za-z]+)\s+)?note(?:\s+in\s+"(?P<parent>(?:[^"]|"")*)")?(?:\s+attached\s+to\s+{targets})?{desc}"#,
        names = name_list("names"),
        is_a = IS_A,
        targets = name_list("targets"),
        desc = DESCRIBED,
    ))
});

pub static CLUSTER: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"{names}\s+{is_a}cluster(?:\s+in\s+"(?P<parent>(?:[^"]|"")*)")?{desc}"#,
        names = name_list("names"),
        is_a = IS_A,
        desc = DESCRIBED,
    ))
});

pub static ELEMENT: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"{names}\s+{is_a}(?P<profile>white|gr[ae]y|black)[- ]box\s+(?P<role>agent|service|storage)(?:\s+in\s+"(?P<parent>(?:[^"]|"")*)")?{desc}"#,
        names = name_list("names"),
        is_a = IS_A,
        desc = DESCRIBED,
    ))
});

pub static DATUM: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"{names}\s+{is_a}(?P<classification>public|restricted|confidential)\s+dat[ua]m?{desc}"#,
        names = name_list("names"),
        is_a = IS_A,
        desc = DESCRIBED,
    ))
});

pub static THREAT: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"{names}\s+{is_a}(?:(?P<impact1>high|medium|low)\s+impact,?\s+(?P<probability1>high|medium|low)\s+probability|(?P<probability2>high|medium|low)\s+probability,?\s+(?P<impact2>high|medium|low)\s+impact)\s+threat{desc}"#,
        names = name_list("names"),
        is_a = IS_A,
        desc = DESCRIBED,
    ))
});

pub static MEASURE: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"{names}\s+{is_a}(?P<capability>detective|partial|full)\s+measure\s+against\s+{threats}{desc}"#,
        names = name_list("names"),
        is_a = IS_A,
        threats = name_list("threats"),
        desc = DESCRIBED,
    ))
});

pub static MODIFICATION: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        concat!(
            r#"{names}\s+(?:is|are)\s+now\s*(?:an?|the)?\s*"#,
            r#"(?:(?P<profile>white|gr[ae]y|black)[- ]box\s*)?"#,
            r#"(?:(?P<role>agent|service|storage)\s*)?"#,
            r#"(?:in\s+"(?P<parent>(?:[^"]|"")*)"\s*)?"#,
            r#"(?:(?P<classification>public|restricted|confidential)\s+dat[ua]m?\s*)?"#,
            r#"(?:(?P<impact>high|medium|low)\s+impact,?\s*)?"#,
            r#"(?:(?P<probability>high|medium|low)\s+probability,?\s*)?"#,
            r#"(?:(?P<capability>detective|partial|full)\s+measure\s*)?"#,
            r#"(?:labell?ed\s+"(?P<new_name>(?:[^"]|"")*)"\s*)?"#,
            r#"(?:described\s+as\s+"(?P<description>(?:[^"]|"")*)")?"#,
        ),
        names = name_list("names"),
    ))
});

pub static INTERACTION_PROCESS_STORE: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"(?:\(?\d{{1,2}}[.)]?\s*-?\s*)?{sources}\s+(?P<action>process(?:es)?|store[sd]?)\s+{data}(?:\s+with\s+notes\s+"(?P<notes>(?:[^"]|"")*)")?"#,
        sources = name_list("sources"),
        data = name_list("data"),
    ))
});

pub static INTERACTION_SEND: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"(?:\(?\d{{1,2}}[.)]?\s*-?\s*)?{sources}\s+(?P<action>sends?)\s+{data}\s+to\s+{targets}(?:\s+with\s+notes\s+"(?P<notes>(?:[^"]|"")*)")?"#,
        sources = name_list("sources"),
        data = name_list("data"),
        targets = name_list("targets"),
    ))
});

pub static INTERACTION_RECEIVE: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"(?:\(?\d{{1,2}}[.)]?\s*-?\s*)?{targets}\s+(?P<action>receives?)\s+{data}\s+from\s+{sources}(?:\s+with\s+notes\s+"(?P<notes>(?:[^"]|"")*)")?"#,
        targets = name_list("targets"),
        data = name_list("data"),
        sources = name_list("sources"),
    ))
});

pub static MITIGATION: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        concat!(
            r#""(?P<measure>(?:[^"]|"")*)"\s+"#,
            r#"(?:(?:(?P<imperative>may|should|must)\s+be)|(?:has|have)\s+been)\s+"#,
            r#"(?P<state>implemented|verified)\s+"#,
            r#"(?:on\s+|for\s+)?(?P<affected>.+)"#,
        ),
    ))
});

pub static RISK: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#""(?P<threat>(?:[^"]|"")*)"\s+(?:applies|apply)\s+(?:to\s+)?(?P<affected>.+)"#,
    ))
});

pub static ALIAS: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!(
        r#"{lhs}\s+{is_a}{rhs}"#,
        lhs = name_list("lhs"),
        is_a = IS_A,
        rhs = name_list("rhs"),
    ))
});

/// Unescapes `""` to `"` inside an already-dequoted literal.
pub fn unescape(s: &str) -> String {
    s.replace("\"\"", "\"")
}

/// Splits a `NAME_LIST` capture (`"a", "b", "c"`) into its component names,
/// stripping quotes and unescaping `""`.
pub fn split_name_list(raw: &str) -> Vec<String> {
    let quote = Regex::new(QUOTED).expect("static QUOTED pattern is valid");
    quote
        .find_iter(raw)
        .map(|m| {
            let inner = &m.as_str()[1..m.as_str().len() - 1];
            unescape(inner)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_matches_scenario_a() {
        let caps = ELEMENT.captures(r#""U" is a black box agent."#).unwrap();
        assert_eq!(&caps["profile"], "black");
        assert_eq!(&caps["role"], "agent");
        assert_eq!(split_name_list(&caps["names"]), vec!["U".to_string()]);
    }

    #[test]
    fn datum_matches_scenario_a() {
        let caps = DATUM.captures(r#""X" is a public datum."#).unwrap();
        assert_eq!(&caps["classification"], "public");
    }

    #[test]
    fn threat_matches_either_order() {
        assert!(THREAT.is_match(r#""T" is a high impact, high probability threat."#));
        assert!(THREAT.is_match(r#""T" is a high probability, high impact threat."#));
    }

    #[test]
    fn interaction_send_matches_scenario_a() {
        let caps = INTERACTION_SEND.captures(r#""U" sends "X" to "S"."#).unwrap();
        assert_eq!(split_name_list(&caps["sources"]), vec!["U".to_string()]);
        assert_eq!(split_name_list(&caps["targets"]), vec!["S".to_string()]);
        assert_eq!(split_name_list(&caps["data"]), vec!["X".to_string()]);
    }

    #[test]
    fn risk_matches_scenario_b() {
        let caps = RISK
            .captures(r#""T" applies to all data between all elements."#)
            .unwrap();
        assert_eq!(&caps["threat"], "T");
        assert_eq!(&caps["affected"], "all data between all elements");
    }

    #[test]
    fn alias_is_tried_and_does_not_swallow_element_lines() {
        assert!(!ELEMENT.is_match(r#""all" is "U", "S"."#));
        let caps = ALIAS.captures(r#""all" is "U", "S"."#).unwrap();
        assert_eq!(split_name_list(&caps["rhs"]), vec!["U".to_string(), "S".to_string()]);
    }
}
