//! Decides what a record pair needs, before anything is written.

use crate::model::{FormKey, RecordAttributes};
use crate::resolve::{ResolveError, ScriptNameResolver};

/// By-value view of an inventory/render pair as it currently stands.
#[derive(Clone, Debug)]
pub struct PairSnapshot {
    pub inventory: FormKey,
    /// Binding selected on the inventory record.
    pub inventory_binding: String,
    /// True when the selected binding already uses the output scheme.
    pub inventory_patched: bool,
    pub render: FormKey,
    pub render_attributes: RecordAttributes,
    /// First output-scheme binding already present on the render record.
    pub render_output_binding: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchPlan {
    /// Rewrite the inventory binding and give the render side `render_script`.
    FullPatch {
        render_script: String,
        target: RenderTarget,
    },
    /// Inventory already patched; only the render record lacks its binding.
    RepatchRender { render_script: String },
    AlreadyPatched,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    Attach,
    /// Duplicate the render record and put the new binding in place of `replace` on the copy.
    Fork { replace: String },
}

#[derive(Debug, thiserror::Error)]
#[error("unable to find render script for {script} ({render}): {source}")]
pub struct PlanError {
    pub script: String,
    pub render: FormKey,
    #[source]
    pub source: ResolveError,
}

#[derive(Clone, Copy, Debug)]
pub struct RecordPatchPlanner<'a> {
    resolver: ScriptNameResolver<'a>,
    legacy_seed: &'a str,
}

impl<'a> RecordPatchPlanner<'a> {
    pub fn new(resolver: ScriptNameResolver<'a>, legacy_seed: &'a str) -> Self {
        Self {
            resolver,
            legacy_seed,
        }
    }

    pub fn plan(&self, pair: &PairSnapshot) -> Result<PatchPlan, PlanError> {
        if pair.inventory_patched {
            if pair.render_output_binding.is_some() {
                return Ok(PatchPlan::AlreadyPatched);
            }
            let render_script = self.resolve(self.legacy_seed, pair)?;
            return Ok(PatchPlan::RepatchRender { render_script });
        }

        let render_script = self.resolve(&pair.inventory_binding, pair)?;
        let target = match &pair.render_output_binding {
            None => RenderTarget::Attach,
            Some(existing) => RenderTarget::Fork {
                replace: existing.clone(),
            },
        };
        Ok(PatchPlan::FullPatch {
            render_script,
            target,
        })
    }

    fn resolve(&self, seed: &str, pair: &PairSnapshot) -> Result<String, PlanError> {
        self.resolver
            .resolve(seed, &pair.render_attributes)
            .map_err(|source| PlanError {
                script: seed.to_string(),
                render: pair.render.clone(),
                source,
            })
    }
}

#[cfg(test)]
#[path = "tests/plan_tests.rs"]
mod tests;
