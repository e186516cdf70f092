//! The affected-set calculus: turns the free-text tail of a
//! mitigation/risk directive into a datum-name set and an element-pair
//! universe, then decides which interactions are affected.

use std::collections::HashSet;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::grammar;
use crate::model::{ComponentKind, Interaction, ModelStore};

#[derive(Debug, Clone)]
pub enum DataSelector {
    Explicit(Vec<String>),
    All { except: Vec<String> },
}

#[derive(Debug, Clone)]
pub enum ElementSelector {
    /// A bare name list with no `between`/`within` keyword: the pair
    /// universe is the full Cartesian product of the list with itself.
    Explicit { names: Vec<String>, except: Vec<String> },
    /// `between A and B, C and D, ...`: each pair is unordered.
    Pairs { pairs: Vec<(String, String)>, except: Vec<String> },
    /// `within LIST`: only self-pairs (E, E).
    Within { names: Vec<String>, except: Vec<String> },
    /// `all elements [except ...]`: every element-pair observed across all
    /// interactions compiled so far.
    All { except: Vec<String> },
}

static BETWEEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bbetween\b").unwrap());
static WITHIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwithin\b").unwrap());
static ALL_ELEMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\ball\s+elements\b").unwrap());
static ALL_DATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\ball\s+data\b").unwrap());
static EXCEPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[,;]?\s*except(?:\s+for)?\s+").unwrap());
static AND: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)"\s*and\s*""#).unwrap());

/// Splits `affected_text` into its data-selector clause and
/// element-selector clause, at the first `between`/`within`/`all elements`
/// marker.
fn split_data_and_elements(affected: &str) -> (&str, &str) {
    let candidates = [
        BETWEEN.find(affected),
        WITHIN.find(affected),
        ALL_ELEMENTS.find(affected),
    ];
    let marker = candidates.into_iter().flatten().min_by_key(|m| m.start());
    match marker {
        Some(m) => (affected[..m.start()].trim(), affected[m.start()..].trim()),
        None => (affected.trim(), ""),
    }
}

fn split_except(s: &str) -> (&str, Vec<String>) {
    match EXCEPT.find(s) {
        Some(m) => (s[..m.start()].trim(), grammar::split_name_list(&s[m.end()..])),
        None => (s.trim(), Vec::new()),
    }
}

pub fn parse_data_selector(clause: &str) -> DataSelector {
    if ALL_DATA.is_match(clause) {
        let (_, except) = split_except(clause);
        DataSelector::All { except }
    } else {
        DataSelector::Explicit(grammar::split_name_list(clause))
    }
}

pub fn parse_element_selector(clause: &str) -> ElementSelector {
    if clause.is_empty() {
        return ElementSelector::Explicit {
            names: Vec::new(),
            except: Vec::new(),
        };
    }
    if let Some(m) = ALL_ELEMENTS.find(clause) {
        let (_, except) = split_except(&clause[m.end()..]);
        return ElementSelector::All { except };
    }
    if let Some(m) = BETWEEN.find(clause) {
        let rest = &clause[m.end()..];
        let (pair_text, except) = split_except(rest);
        let pairs = pair_text
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|group| {
                let names: Vec<&str> = AND.split(group.trim()).collect();
                if names.len() != 2 {
                    warn!(group, "malformed element pair in `between` clause; skipped");
                    return None;
                }
                let a = grammar::split_name_list(&format!("{}\"", names[0]));
                let b = grammar::split_name_list(&format!("\"{}", names[1]));
                match (a.first(), b.first()) {
                    (Some(a), Some(b)) => Some((a.clone(), b.clone())),
                    _ => None,
                }
            })
            .collect();
        return ElementSelector::Pairs { pairs, except };
    }
    if let Some(m) = WITHIN.find(clause) {
        let rest = &clause[m.end()..];
        let (list_text, except) = split_except(rest);
        return ElementSelector::Within {
            names: grammar::split_name_list(list_text),
            except,
        };
    }
    let (list_text, except) = split_except(clause);
    ElementSelector::Explicit {
        names: grammar::split_name_list(list_text),
        except,
    }
}

/// The resolved datum-name set and element-pair universe for one
/// mitigation/risk directive's affected-components clause.
pub struct Affected {
    pub data: IndexSet<String>,
    pub pairs: HashSet<(String, String)>,
}

pub fn resolve(store: &ModelStore, affected_text: &str) -> Affected {
    let (data_clause, element_clause) = split_data_and_elements(affected_text);

    let data = match parse_data_selector(data_clause) {
        DataSelector::Explicit(names) => store
            .expand_names(&names, Some(ComponentKind::Datum))
            .into_iter()
            .collect(),
        DataSelector::All { except } => {
            let excepted = store.expand_names(&except, Some(ComponentKind::Datum));
            store
                .data
                .values()
                .filter(|d| d.common.active && !excepted.contains(&d.common.name))
                .map(|d| d.common.name.clone())
                .collect()
        }
    };

    let pairs = resolve_element_pairs(store, parse_element_selector(element_clause));

    Affected { data, pairs }
}

fn resolve_element_pairs(store: &ModelStore, selector: ElementSelector) -> HashSet<(String, String)> {
    match selector {
        ElementSelector::Explicit { names, except } => {
            let names = store.expand_names(&names, Some(ComponentKind::Element));
            let excepted: HashSet<String> = store
                .expand_names(&except, Some(ComponentKind::Element))
                .into_iter()
                .collect();
            let mut pairs = HashSet::new();
            for a in &names {
                for b in &names {
                    if !excepted.contains(a) && !excepted.contains(b) {
                        pairs.insert((a.clone(), b.clone()));
                    }
                }
            }
            pairs
        }
        ElementSelector::Pairs { pairs, except } => {
            let excepted: HashSet<String> = store
                .expand_names(&except, Some(ComponentKind::Element))
                .into_iter()
                .collect();
            let mut out = HashSet::new();
            for (a, b) in pairs {
                let resolved_a = store.expand_names(std::slice::from_ref(&a), Some(ComponentKind::Element));
                let resolved_b = store.expand_names(std::slice::from_ref(&b), Some(ComponentKind::Element));
                for ra in &resolved_a {
                    for rb in &resolved_b {
                        if excepted.contains(ra) || excepted.contains(rb) {
                            continue;
                        }
                        out.insert((ra.clone(), rb.clone()));
                        out.insert((rb.clone(), ra.clone()));
                    }
                }
            }
            out
        }
        ElementSelector::Within { names, except } => {
            let names = store.expand_names(&names, Some(ComponentKind::Element));
            let excepted: HashSet<String> = store
                .expand_names(&except, Some(ComponentKind::Element))
                .into_iter()
                .collect();
            names
                .into_iter()
                .filter(|n| !excepted.contains(n))
                .map(|n| (n.clone(), n))
                .collect()
        }
        ElementSelector::All { except } => {
            let excepted: HashSet<String> = store
                .expand_names(&except, Some(ComponentKind::Element))
                .into_iter()
                .collect();
            let mut pairs = HashSet::new();
            for interaction in &store.interactions {
                for (a, b) in interaction.source_target_pairs() {
                    if !excepted.contains(&a) && !excepted.contains(&b) {
                        pairs.insert((a, b));
                    }
                }
            }
            pairs
        }
    }
}

/// True iff every (source, target) pair implied by `interaction` lies in
/// `pairs`. An interaction with no source/target pairs never matches.
pub fn interaction_is_affected(interaction: &Interaction, pairs: &HashSet<(String, String)>) -> bool {
    let implied = interaction.source_target_pairs();
    !implied.is_empty() && implied.iter().all(|p| pairs.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_data_and_between_clause() {
        let (data, elements) = split_data_and_elements("all data between all elements");
        assert_eq!(data, "all data");
        assert_eq!(elements, "between all elements");
    }

    #[test]
    fn splits_explicit_datum_and_within_except() {
        let (data, elements) = split_data_and_elements(r#""X" within "all" except "U""#);
        assert_eq!(data, r#""X""#);
        assert_eq!(elements, r#"within "all" except "U""#);
    }
}
