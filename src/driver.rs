//! Walks candidate inventory records and patches each pair independently.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::model::{ModKey, PatchSettings, Record, RecordKind, ScriptBinding};
use crate::mutate::{MutateError, MutationOutcome, RENDER_REFERENCE, RecordMutator};
use crate::plan::{PairSnapshot, PlanError, RecordPatchPlanner};
use crate::resolve::{ResolveError, ScriptNameResolver};
use crate::rules::{ScriptUniverse, ValidatedRules};
use crate::store::{LinkCache, LoadOrder, PatchLayer, StoreError};

mod summary;

pub use self::summary::{PatchSummary, SkipKind, SkippedPair};

/// Why a candidate pair was left alone.
#[derive(Debug, thiserror::Error)]
pub enum PairSkip {
    #[error("record has no keywords")]
    NoKeywords,

    #[error("record has no scripts")]
    NoScripts,

    #[error("record is not an inventory device")]
    NotEligible,

    #[error("record carries no known device script")]
    NoKnownScript,

    #[error("script {script} has no deviceRendered reference")]
    MissingRenderReference { script: String },

    #[error("invalid render target: {0}")]
    UnresolvedReference(#[from] StoreError),

    #[error(transparent)]
    Resolution(#[from] PlanError),

    #[error(transparent)]
    Mutation(#[from] MutateError),
}

pub struct PatchDriver<'a> {
    settings: &'a PatchSettings,
    universe: ScriptUniverse,
    planner: RecordPatchPlanner<'a>,
}

impl<'a> PatchDriver<'a> {
    pub fn new(settings: &'a PatchSettings, rules: &'a ValidatedRules) -> Self {
        let resolver = ScriptNameResolver::new(rules);
        Self {
            settings,
            universe: ScriptUniverse::from_rules(rules, &settings.records),
            planner: RecordPatchPlanner::new(resolver, &settings.records.legacy_seed_script),
        }
    }

    /// Processes `candidates` in order. Per-pair failures are recorded, never returned.
    pub fn run<'r>(
        &self,
        candidates: impl IntoIterator<Item = &'r Record>,
        cache: &LinkCache,
        layer: &mut PatchLayer,
    ) -> PatchSummary {
        let mut summary = PatchSummary::default();
        for inventory in candidates {
            summary.candidates += 1;
            debug!(record = %inventory, "checking armor");
            match self.process(inventory, cache, layer) {
                Ok(outcome) => summary.record_outcome(&outcome),
                Err(PairSkip::NotEligible) => summary.ineligible += 1,
                Err(skip) => {
                    if skip.is_warning() {
                        warn!(record = %inventory, "{}", skip);
                    } else {
                        info!(record = %inventory, "{}", skip);
                    }
                    summary.record_skip(inventory, &skip);
                }
            }
        }
        summary
    }

    fn process(
        &self,
        candidate: &Record,
        cache: &LinkCache,
        layer: &mut PatchLayer,
    ) -> Result<MutationOutcome, PairSkip> {
        if candidate.keywords.is_none() {
            return Err(PairSkip::NoKeywords);
        }
        if candidate.scripts.is_none() {
            return Err(PairSkip::NoScripts);
        }
        if !candidate.has_keyword(&self.settings.records.zad_inventory_keyword) {
            return Err(PairSkip::NotEligible);
        }

        let inventory = layer
            .get(&candidate.form_key)
            .cloned()
            .unwrap_or_else(|| candidate.clone());
        let (selected, inventory_patched) = self
            .select_binding(inventory.bindings())
            .ok_or(PairSkip::NoKnownScript)?;
        let render_key = selected
            .object(RENDER_REFERENCE)
            .ok_or_else(|| PairSkip::MissingRenderReference {
                script: selected.name.clone(),
            })?;
        let render_input = cache.resolve(render_key, RecordKind::Armor)?;
        let render = layer
            .get(render_key)
            .cloned()
            .unwrap_or_else(|| render_input.clone());

        let pair = PairSnapshot {
            inventory: inventory.form_key.clone(),
            inventory_binding: selected.name.clone(),
            inventory_patched,
            render: render.form_key.clone(),
            render_attributes: render.attributes(),
            render_output_binding: render
                .bindings()
                .iter()
                .find(|b| self.universe.is_output(&b.name))
                .map(|b| b.name.clone()),
        };

        let plan = self.planner.plan(&pair)?;
        debug!(inventory = %pair.inventory, render = %pair.render, ?plan, "planned pair");
        let mut mutator = RecordMutator::new(layer, &self.settings.records, self.settings.use_modes);
        Ok(mutator.apply(&pair, &plan, &inventory, &render)?)
    }

    /// First output-scheme binding, otherwise first input-scheme binding.
    fn select_binding<'b>(&self, bindings: &'b [ScriptBinding]) -> Option<(&'b ScriptBinding, bool)> {
        if let Some(b) = bindings.iter().find(|b| self.universe.is_output(&b.name)) {
            return Some((b, true));
        }
        bindings
            .iter()
            .find(|b| self.universe.is_input(&b.name))
            .map(|b| (b, false))
    }
}

impl PairSkip {
    pub fn kind(&self) -> SkipKind {
        match self {
            PairSkip::NoKeywords | PairSkip::NoScripts => SkipKind::StructuralGap,
            PairSkip::NotEligible => SkipKind::NotEligible,
            PairSkip::NoKnownScript => SkipKind::NoKnownScript,
            PairSkip::MissingRenderReference { .. } | PairSkip::UnresolvedReference(_) => {
                SkipKind::UnresolvedReference
            }
            PairSkip::Resolution(err) => match &err.source {
                ResolveError::NoDirectMapping { .. } => SkipKind::NoMatch,
                ResolveError::CyclicResolution { .. } => SkipKind::CyclicResolution,
            },
            PairSkip::Mutation(_) => SkipKind::Mutation,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(
            self.kind(),
            SkipKind::UnresolvedReference | SkipKind::CyclicResolution | SkipKind::Mutation
        )
    }
}

/// Full pipeline over a loaded dataset: validates rules, builds both caches and patches.
///
/// Only configuration problems are returned as errors.
pub fn run_patch(
    load_order: &LoadOrder,
    settings: &PatchSettings,
    patch_mod: ModKey,
) -> Result<(PatchLayer, PatchSummary)> {
    let rules = ValidatedRules::new(settings.rules.clone()).context("invalid rule settings")?;

    let masters = settings.records.masters();
    let candidates_cache = load_order.link_cache(|k| settings.mods_to_patch.contains(k));
    let cache = load_order
        .link_cache(|k| settings.mods_to_patch.contains(k) || masters.contains(k));

    let known = &settings.records;
    for (form_key, kind) in [
        (&known.zad_inventory_keyword, RecordKind::Keyword),
        (&known.ud_inventory_keyword, RecordKind::Keyword),
        (&known.ud_patch_keyword, RecordKind::Keyword),
        (&known.ud_keyword, RecordKind::Keyword),
        (&known.ud_patch_no_mode_keyword, RecordKind::Keyword),
        (&known.ud_main_quest, RecordKind::Quest),
    ] {
        cache
            .resolve(form_key, kind)
            .with_context(|| format!("required record {} missing", form_key))?;
    }

    let driver = PatchDriver::new(settings, &rules);
    let mut layer = PatchLayer::new(patch_mod);
    let summary = driver.run(
        candidates_cache.winning_overrides(RecordKind::Armor),
        &cache,
        &mut layer,
    );
    info!(
        patched = summary.patched,
        forked = summary.forked,
        repatched = summary.repatched,
        "patch finished"
    );
    Ok((layer, summary))
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
