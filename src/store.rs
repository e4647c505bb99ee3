use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{FormKey, ModKey, RecordKind};

mod link_cache;
mod patch_layer;
mod plugin_io;

pub use self::link_cache::{LinkCache, LoadOrder};
pub use self::patch_layer::{FIRST_NEW_ID, PatchLayer};
pub use self::plugin_io::{
    load_plugins, read_load_order, read_plugin, read_settings, write_plugin,
};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record {form_key} not found")]
    Unresolved { form_key: FormKey },

    #[error("record {form_key} is a {found:?}, expected {expected:?}")]
    WrongKind {
        form_key: FormKey,
        expected: RecordKind,
        found: RecordKind,
    },

    #[error("no free form ids left in {mod_key}")]
    IdSpaceExhausted { mod_key: ModKey },
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
