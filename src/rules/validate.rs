use crate::model::RuleSet;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rule set has no direct script matches")]
    NoDirectMatches,

    #[error("direct match {output:?} lists no input scripts")]
    EmptyDirectMatch { output: String },

    #[error("rule group #{group} has no input scripts")]
    NoInputScripts { group: usize },

    #[error("keyword rule #{rule} of rule group #{group} has no output script")]
    MissingOutputScript { group: usize, rule: usize },

    #[error("name rule #{rule} of rule group #{group} has empty search text")]
    EmptySearchText { group: usize, rule: usize },
}

/// A rule set that passed load-time validation.
#[derive(Clone, Debug)]
pub struct ValidatedRules(RuleSet);

impl ValidatedRules {
    pub fn new(rules: RuleSet) -> Result<Self, ConfigError> {
        validate(&rules)?;
        Ok(Self(rules))
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.0
    }
}

impl std::ops::Deref for ValidatedRules {
    type Target = RuleSet;

    fn deref(&self) -> &RuleSet {
        &self.0
    }
}

pub fn validate(rules: &RuleSet) -> Result<(), ConfigError> {
    if rules.script_matches.is_empty() {
        return Err(ConfigError::NoDirectMatches);
    }
    for (output, inputs) in &rules.script_matches {
        if inputs.is_empty() {
            return Err(ConfigError::EmptyDirectMatch {
                output: output.clone(),
            });
        }
    }

    for (gi, group) in rules.other_matches.iter().enumerate() {
        if group.input_scripts.is_empty() {
            return Err(ConfigError::NoInputScripts { group: gi });
        }
        if let Some(ri) = group
            .keyword_match
            .iter()
            .position(|r| r.output_script.is_none())
        {
            return Err(ConfigError::MissingOutputScript {
                group: gi,
                rule: ri,
            });
        }
        if let Some(ri) = group
            .name_match
            .iter()
            .position(|r| r.search_text.is_empty())
        {
            return Err(ConfigError::EmptySearchText {
                group: gi,
                rule: ri,
            });
        }
    }

    Ok(())
}
