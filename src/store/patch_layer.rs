use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::model::{FormKey, MAX_LOCAL_ID, ModKey, Plugin, PropertyValue, Record};

use super::{LoadOrder, StoreError};

/// First local id handed out to records created in the patch.
pub const FIRST_NEW_ID: u32 = 0x000800;

/// Output layer: overrides of existing records plus newly minted ones.
///
/// Input records are never touched; every write lands on a copy held here.
#[derive(Clone, Debug)]
pub struct PatchLayer {
    mod_key: ModKey,
    records: IndexMap<FormKey, Record>,
    next_id: u32,
}

impl PatchLayer {
    pub fn new(mod_key: ModKey) -> Self {
        Self {
            mod_key,
            records: IndexMap::new(),
            next_id: FIRST_NEW_ID,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, form_key: &FormKey) -> Option<&Record> {
        self.records.get(form_key)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// The layer's copy of `source`, created from `source` on first use.
    pub fn get_or_add_as_override(&mut self, source: &Record) -> &mut Record {
        self.records
            .entry(source.form_key.clone())
            .or_insert_with(|| source.clone())
    }

    /// Copies `source` under a freshly minted form key owned by this layer.
    pub fn duplicate_as_new_record(
        &mut self,
        source: &Record,
        editor_id: Option<String>,
    ) -> Result<&mut Record, StoreError> {
        let form_key = self.mint_form_key()?;
        let mut record = source.clone();
        record.form_key = form_key.clone();
        record.editor_id = editor_id;
        Ok(self.records.entry(form_key).or_insert(record))
    }

    pub fn editor_id_in_use(&self, editor_id: &str) -> bool {
        self.records
            .values()
            .any(|r| r.editor_id.as_deref() == Some(editor_id))
    }

    fn mint_form_key(&mut self) -> Result<FormKey, StoreError> {
        while self.next_id <= MAX_LOCAL_ID {
            let candidate = FormKey::new(self.mod_key.clone(), self.next_id);
            self.next_id += 1;
            if !self.records.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(StoreError::IdSpaceExhausted {
            mod_key: self.mod_key.clone(),
        })
    }

    /// Serializable plugin; masters are every other plugin the records point into.
    ///
    /// Masters follow `load_order`. Mods missing from it trail in name order.
    pub fn into_plugin(self, load_order: &LoadOrder, created_at: Option<String>) -> Plugin {
        let mut masters = BTreeSet::new();
        for record in self.records.values() {
            masters.insert(record.form_key.mod_key.clone());
            for kw in record.keywords.iter().flatten() {
                masters.insert(kw.mod_key.clone());
            }
            for binding in record.bindings() {
                for prop in &binding.properties {
                    match &prop.value {
                        PropertyValue::Object { form_key } => {
                            masters.insert(form_key.mod_key.clone());
                        }
                        PropertyValue::ObjectList { form_keys } => {
                            masters.extend(form_keys.iter().map(|k| k.mod_key.clone()));
                        }
                        _ => {}
                    }
                }
            }
        }
        masters.remove(&self.mod_key);

        let mut ordered: Vec<ModKey> = load_order
            .mod_keys()
            .filter(|k| masters.remove(*k))
            .cloned()
            .collect();
        ordered.extend(masters);

        Plugin {
            masters: ordered,
            created_at,
            records: self.records.into_values().collect(),
            ..Plugin::new(self.mod_key)
        }
    }
}

#[cfg(test)]
#[path = "../tests/store/patch_layer_tests.rs"]
mod tests;
