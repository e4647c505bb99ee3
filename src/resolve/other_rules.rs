use crate::model::{RecordAttributes, RuleSet};
use crate::rules::group_rules;

/// One rewrite step. Returns `name` itself when no applicable group yields a new name.
///
/// Groups are tried in authored order and the first rule producing a name outside its
/// own group's input scripts wins.
pub fn apply_other_rules<'a>(rules: &'a RuleSet, name: &'a str, attrs: &RecordAttributes) -> &'a str {
    let groups = rules
        .other_matches
        .iter()
        .filter(|g| g.input_scripts.iter().any(|s| s == name));

    for group in groups {
        for rule in group_rules(group) {
            if let Some(out) = rule.evaluate(attrs)
                && !group.input_scripts.iter().any(|s| s == out)
            {
                return out;
            }
        }
    }
    name
}
