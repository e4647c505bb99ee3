use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::model::{ModKey, PLUGIN_VERSION, PatchSettings, Plugin};

use super::{LoadOrder, write_atomic};

/// Plugin names in a load-order file, lowest priority first.
///
/// Blank lines and `#` comments are ignored; a leading `*` active marker is stripped.
pub fn read_load_order(path: &Path) -> Result<Vec<ModKey>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read load order {}", path.display()))?;
    let mut out: Vec<ModKey> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let name = line.trim_start_matches('*').trim();
        let key = ModKey::new(name);
        if out.contains(&key) {
            return Err(anyhow!("{} listed twice in {}", key, path.display()));
        }
        out.push(key);
    }
    Ok(out)
}

pub fn read_plugin(path: &Path) -> Result<Plugin> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let plugin: Plugin = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse plugin {}", path.display()))?;
    if plugin.version != PLUGIN_VERSION {
        return Err(anyhow!(
            "unsupported plugin version {} in {}",
            plugin.version,
            path.display()
        ));
    }
    Ok(plugin)
}

/// Reads `<data_dir>/<mod key>.json` for every listed plugin.
pub fn load_plugins(data_dir: &Path, order: &[ModKey]) -> Result<LoadOrder> {
    let mut plugins = Vec::with_capacity(order.len());
    for key in order {
        let path = data_dir.join(format!("{}.json", key));
        let plugin = read_plugin(&path)?;
        if &plugin.mod_key != key {
            return Err(anyhow!(
                "{} declares mod key {} (expected {})",
                path.display(),
                plugin.mod_key,
                key
            ));
        }
        plugins.push(plugin);
    }
    Ok(LoadOrder::new(plugins))
}

pub fn write_plugin(path: &Path, plugin: &Plugin) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(plugin).context("serialize plugin")?;
    write_atomic(path, &bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_settings(path: &Path) -> Result<PatchSettings> {
    let bytes = fs::read(path).with_context(|| format!("read settings {}", path.display()))?;
    let settings: PatchSettings = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse settings {}", path.display()))?;
    Ok(settings)
}
