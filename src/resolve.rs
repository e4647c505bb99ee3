use std::collections::HashSet;

use tracing::debug;

use crate::model::{RecordAttributes, RuleSet};
use crate::rules::ValidatedRules;

mod other_rules;

pub use self::other_rules::apply_other_rules;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no direct match for script {script}")]
    NoDirectMapping { script: String },

    #[error("looping rules ({})", chain.join(" -> "))]
    CyclicResolution { chain: Vec<String> },
}

/// Maps an input-scheme script name to the output-scheme script a record should carry.
#[derive(Clone, Copy, Debug)]
pub struct ScriptNameResolver<'a> {
    rules: &'a RuleSet,
}

impl<'a> ScriptNameResolver<'a> {
    pub fn new(rules: &'a ValidatedRules) -> Self {
        Self {
            rules: rules.rule_set(),
        }
    }

    /// Output name whose direct-match list contains `input`, first in authored order.
    pub fn direct_match(&self, input: &str) -> Option<&'a str> {
        self.rules
            .script_matches
            .iter()
            .find(|(_, inputs)| inputs.iter().any(|s| s == input))
            .map(|(output, _)| output.as_str())
    }

    pub fn resolve(&self, start: &str, attrs: &RecordAttributes) -> Result<String, ResolveError> {
        let canonical = self
            .direct_match(start)
            .ok_or_else(|| ResolveError::NoDirectMapping {
                script: start.to_string(),
            })?;

        let mut chain = vec![canonical];
        let mut visited: HashSet<&str> = HashSet::from([canonical]);
        let mut current = canonical;
        loop {
            let next = apply_other_rules(self.rules, current, attrs);
            if next == current {
                return Ok(current.to_string());
            }
            chain.push(next);
            if !visited.insert(next) {
                return Err(ResolveError::CyclicResolution {
                    chain: chain.into_iter().map(str::to_string).collect(),
                });
            }
            debug!(from = current, to = next, "script rule applied");
            current = next;
        }
    }
}

#[cfg(test)]
#[path = "tests/resolve/resolver_tests.rs"]
mod tests;
