use serde::Serialize;

use crate::model::{FormKey, Record};
use crate::mutate::MutationOutcome;

use super::PairSkip;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    StructuralGap,
    NotEligible,
    NoKnownScript,
    UnresolvedReference,
    NoMatch,
    CyclicResolution,
    Mutation,
}

#[derive(Clone, Debug, Serialize)]
pub struct SkippedPair {
    pub form_key: FormKey,
    pub record: String,
    pub kind: SkipKind,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct PatchSummary {
    pub candidates: usize,
    /// Render records patched in place.
    pub patched: usize,
    /// New render records created to avoid overwriting an existing binding.
    pub forked: usize,
    pub repatched: usize,
    pub already_patched: usize,
    pub ineligible: usize,
    pub skipped: Vec<SkippedPair>,
}

impl PatchSummary {
    pub(super) fn record_outcome(&mut self, outcome: &MutationOutcome) {
        match outcome {
            MutationOutcome::Patched { .. } => self.patched += 1,
            MutationOutcome::Forked { .. } => self.forked += 1,
            MutationOutcome::Repatched { .. } => self.repatched += 1,
            MutationOutcome::Unchanged => self.already_patched += 1,
        }
    }

    pub(super) fn record_skip(&mut self, record: &Record, skip: &PairSkip) {
        self.skipped.push(SkippedPair {
            form_key: record.form_key.clone(),
            record: record.to_string(),
            kind: skip.kind(),
            reason: skip.to_string(),
        });
    }

    pub fn skipped_of(&self, kind: SkipKind) -> impl Iterator<Item = &SkippedPair> {
        self.skipped.iter().filter(move |s| s.kind == kind)
    }
}
