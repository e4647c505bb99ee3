use std::collections::HashMap;

use crate::model::{FormKey, ModKey, Plugin, Record, RecordKind};

use super::StoreError;

/// Loaded plugins, lowest priority first.
#[derive(Clone, Debug, Default)]
pub struct LoadOrder {
    pub plugins: Vec<Plugin>,
}

impl LoadOrder {
    pub fn new(plugins: Vec<Plugin>) -> Self {
        Self { plugins }
    }

    pub fn mod_keys(&self) -> impl Iterator<Item = &ModKey> {
        self.plugins.iter().map(|p| &p.mod_key)
    }

    /// Cache over the plugins accepted by `keep`, preserving priority.
    pub fn link_cache(&self, keep: impl Fn(&ModKey) -> bool) -> LinkCache {
        LinkCache::new(
            self.plugins
                .iter()
                .filter(|p| keep(&p.mod_key))
                .cloned()
                .collect(),
        )
    }
}

/// Read-only view resolving each form key to its winning override.
#[derive(Clone, Debug, Default)]
pub struct LinkCache {
    // Highest priority first.
    plugins: Vec<Plugin>,
    winners: HashMap<FormKey, (usize, usize)>,
}

impl LinkCache {
    /// `plugins` in load order, lowest priority first.
    pub fn new(mut plugins: Vec<Plugin>) -> Self {
        plugins.reverse();
        let mut winners = HashMap::new();
        for (pi, plugin) in plugins.iter().enumerate() {
            for (ri, record) in plugin.records.iter().enumerate() {
                winners.entry(record.form_key.clone()).or_insert((pi, ri));
            }
        }
        Self { plugins, winners }
    }

    pub fn resolve(&self, form_key: &FormKey, kind: RecordKind) -> Result<&Record, StoreError> {
        let (pi, ri) = self
            .winners
            .get(form_key)
            .copied()
            .ok_or_else(|| StoreError::Unresolved {
                form_key: form_key.clone(),
            })?;
        let record = &self.plugins[pi].records[ri];
        if record.kind != kind {
            return Err(StoreError::WrongKind {
                form_key: form_key.clone(),
                expected: kind,
                found: record.kind,
            });
        }
        Ok(record)
    }

    /// Every record of `kind` once, as its winning version.
    ///
    /// Yielded plugin by plugin from the highest priority down, file order within a plugin.
    pub fn winning_overrides(&self, kind: RecordKind) -> impl Iterator<Item = &Record> {
        self.plugins.iter().enumerate().flat_map(move |(pi, plugin)| {
            plugin
                .records
                .iter()
                .enumerate()
                .filter(move |(ri, record)| {
                    record.kind == kind
                        && self.winners.get(&record.form_key) == Some(&(pi, *ri))
                })
                .map(|(_, record)| record)
        })
    }
}
