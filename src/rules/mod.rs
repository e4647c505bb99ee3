//! Authored rule configuration: validation and the uniform rule view used by resolution.

use crate::model::{KeywordRule, NameSearchRule, RecordAttributes, RuleGroup};

mod names;
mod validate;

pub use self::names::ScriptUniverse;
pub use self::validate::{ConfigError, ValidatedRules};

/// One rewrite rule of a group, regardless of how it matches.
#[derive(Clone, Copy, Debug)]
pub enum Rule<'a> {
    Keyword(&'a KeywordRule),
    NameSearch(&'a NameSearchRule),
}

impl<'a> Rule<'a> {
    /// Output name if the rule fires for `attrs`.
    pub fn evaluate(&self, attrs: &RecordAttributes) -> Option<&'a str> {
        match self {
            Rule::Keyword(rule) => {
                let hit = rule.keywords.iter().any(|k| attrs.keywords.contains(k));
                if hit {
                    rule.output_script.as_deref()
                } else {
                    None
                }
            }
            Rule::NameSearch(rule) => {
                let name = attrs.name.as_deref().filter(|n| !n.is_empty())?;
                if name.contains(rule.search_text.as_str()) {
                    Some(rule.output_script.as_str())
                } else {
                    None
                }
            }
        }
    }

    pub fn output(&self) -> Option<&'a str> {
        match self {
            Rule::Keyword(rule) => rule.output_script.as_deref(),
            Rule::NameSearch(rule) => Some(rule.output_script.as_str()),
        }
    }
}

impl std::fmt::Display for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Keyword(rule) => write!(
                f,
                "keyword rule -> {}",
                rule.output_script.as_deref().unwrap_or("<none>")
            ),
            Rule::NameSearch(rule) => write!(
                f,
                "name rule '{}' -> {}",
                rule.search_text, rule.output_script
            ),
        }
    }
}

/// Keyword rules first, then name-search rules, each in authored order.
pub fn group_rules(group: &RuleGroup) -> impl Iterator<Item = Rule<'_>> {
    group
        .keyword_match
        .iter()
        .map(Rule::Keyword)
        .chain(group.name_match.iter().map(Rule::NameSearch))
}

#[cfg(test)]
#[path = "../tests/rules/rules_tests.rs"]
mod tests;
