//! Applies a [`PatchPlan`] to the output layer.

use tracing::{info, warn};

use crate::model::{FormKey, KnownRecords, Record, ScriptBinding};
use crate::plan::{PairSnapshot, PatchPlan, RenderTarget};
use crate::store::{PatchLayer, StoreError};

mod binding;
mod keywords;

pub use self::binding::{
    CROSS_RECORD_PROPERTIES, MAIN_QUEST_PROPERTY, PROPERTY_RENAMES, RENDER_REFERENCE,
    copy_binding_for_cross_record_use, redirect_render_reference, rewrite_inventory_binding,
};
pub use self::keywords::{add_keywords, tag_keywords};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    Patched { render: FormKey },
    Forked { original: FormKey, fork: FormKey },
    Repatched { render: FormKey },
    Unchanged,
}

#[derive(Debug, thiserror::Error)]
pub enum MutateError {
    #[error("{record} has no script {script}")]
    MissingBinding { record: FormKey, script: String },

    #[error("{record} has no {property} property on {script}")]
    MissingProperty {
        record: FormKey,
        script: String,
        property: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct RecordMutator<'a> {
    layer: &'a mut PatchLayer,
    known: &'a KnownRecords,
    use_modes: bool,
}

impl<'a> RecordMutator<'a> {
    pub fn new(layer: &'a mut PatchLayer, known: &'a KnownRecords, use_modes: bool) -> Self {
        Self {
            layer,
            known,
            use_modes,
        }
    }

    /// `inventory` and `render` are the current versions of the pair's records.
    pub fn apply(
        &mut self,
        pair: &PairSnapshot,
        plan: &PatchPlan,
        inventory: &Record,
        render: &Record,
    ) -> Result<MutationOutcome, MutateError> {
        match plan {
            PatchPlan::AlreadyPatched => Ok(MutationOutcome::Unchanged),
            PatchPlan::RepatchRender { render_script } => {
                let source = selected_binding(pair, inventory)?;
                let binding = copy_binding_for_cross_record_use(source, render_script);
                self.attach(render, binding);
                info!(render = %render, inventory = %inventory, "repatched render device");
                Ok(MutationOutcome::Repatched {
                    render: render.form_key.clone(),
                })
            }
            PatchPlan::FullPatch {
                render_script,
                target,
            } => {
                let source = selected_binding(pair, inventory)?;
                let binding = copy_binding_for_cross_record_use(source, render_script);
                info!(script = %render_script, "created render script");

                match target {
                    RenderTarget::Attach => {
                        self.rewrite_inventory(pair, inventory, None)?;
                        self.attach(render, binding);
                        info!(render = %render, "device patched");
                        Ok(MutationOutcome::Patched {
                            render: render.form_key.clone(),
                        })
                    }
                    RenderTarget::Fork { replace } => {
                        warn!(
                            render = %render,
                            existing = %replace,
                            "render device already has an output script, creating new render device"
                        );
                        let fork = self.fork_record(render, replace, binding)?;
                        self.rewrite_inventory(pair, inventory, Some(&fork))?;
                        info!(fork = %fork, "new render device created");
                        Ok(MutationOutcome::Forked {
                            original: render.form_key.clone(),
                            fork,
                        })
                    }
                }
            }
        }
    }

    /// Duplicates `render` and swaps binding `replace` on the copy for `binding`.
    pub fn fork_record(
        &mut self,
        render: &Record,
        replace: &str,
        binding: ScriptBinding,
    ) -> Result<FormKey, MutateError> {
        let index = render
            .bindings()
            .iter()
            .position(|s| s.name == replace)
            .ok_or_else(|| MutateError::MissingBinding {
                record: render.form_key.clone(),
                script: replace.to_string(),
            })?;

        let editor_id = self.fork_editor_id(render);
        let fork = self.layer.duplicate_as_new_record(render, Some(editor_id))?;
        if let Some(vm) = fork.scripts.as_mut() {
            vm.scripts[index] = binding;
        }
        tag_keywords(fork, self.known, self.use_modes);
        Ok(fork.form_key.clone())
    }

    fn fork_editor_id(&self, render: &Record) -> String {
        let base = format!(
            "{}{}",
            render.editor_id.as_deref().unwrap_or_default(),
            self.known.fork_suffix
        );
        if !self.layer.editor_id_in_use(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", base, n);
            if !self.layer.editor_id_in_use(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn attach(&mut self, render: &Record, binding: ScriptBinding) {
        let target = self.layer.get_or_add_as_override(render);
        target
            .scripts
            .get_or_insert_with(Default::default)
            .scripts
            .push(binding);
        tag_keywords(target, self.known, self.use_modes);
    }

    fn rewrite_inventory(
        &mut self,
        pair: &PairSnapshot,
        inventory: &Record,
        redirect_to: Option<&FormKey>,
    ) -> Result<(), MutateError> {
        let known = self.known;
        let record = self.layer.get_or_add_as_override(inventory);
        add_keywords(record, [&known.ud_inventory_keyword]);

        let binding = record
            .binding_mut(&pair.inventory_binding)
            .ok_or_else(|| MutateError::MissingBinding {
                record: inventory.form_key.clone(),
                script: pair.inventory_binding.clone(),
            })?;
        rewrite_inventory_binding(binding, &known.inventory_script, &known.ud_main_quest);

        if let Some(target) = redirect_to
            && !redirect_render_reference(binding, target)
        {
            return Err(MutateError::MissingProperty {
                record: inventory.form_key.clone(),
                script: known.inventory_script.clone(),
                property: RENDER_REFERENCE,
            });
        }
        Ok(())
    }
}

fn selected_binding<'r>(
    pair: &PairSnapshot,
    inventory: &'r Record,
) -> Result<&'r ScriptBinding, MutateError> {
    inventory
        .binding(&pair.inventory_binding)
        .ok_or_else(|| MutateError::MissingBinding {
            record: inventory.form_key.clone(),
            script: pair.inventory_binding.clone(),
        })
}

#[cfg(test)]
#[path = "../tests/mutate/mutate_tests.rs"]
mod tests;
