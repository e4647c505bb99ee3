use std::collections::BTreeSet;

use crate::model::{KnownRecords, RuleSet};

use super::group_rules;

/// Script names recognised on records, split by naming scheme.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct ScriptUniverse {
    pub output: BTreeSet<String>,
    pub input: BTreeSet<String>,
}

impl ScriptUniverse {
    pub fn from_rules(rules: &RuleSet, known: &KnownRecords) -> Self {
        let mut output = BTreeSet::new();
        let mut input = BTreeSet::new();

        for (ud, zads) in &rules.script_matches {
            output.insert(ud.clone());
            input.extend(zads.iter().cloned());
        }
        for group in &rules.other_matches {
            output.extend(group.input_scripts.iter().cloned());
            output.extend(group_rules(group).filter_map(|r| r.output()).map(str::to_string));
        }
        output.insert(known.inventory_script.clone());

        Self { output, input }
    }

    pub fn is_output(&self, name: &str) -> bool {
        self.output.contains(name)
    }

    pub fn is_input(&self, name: &str) -> bool {
        self.input.contains(name)
    }
}
