use serde::{Deserialize, Serialize};

use super::ids::ModKey;
use super::record::Record;

pub const PLUGIN_VERSION: u32 = 1;

/// One source layer of the dataset, or the generated output layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub version: u32,
    pub mod_key: ModKey,

    #[serde(default)]
    pub masters: Vec<ModKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default)]
    pub records: Vec<Record>,
}

impl Plugin {
    pub fn new(mod_key: ModKey) -> Self {
        Self {
            version: PLUGIN_VERSION,
            mod_key,
            masters: Vec::new(),
            created_at: None,
            records: Vec::new(),
        }
    }
}
