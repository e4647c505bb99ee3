use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ids::{FormKey, ModKey};

pub const DDI_MASTER: &str = "Devious Devices - Integration.esm";
pub const UD_MASTER: &str = "UnforgivingDevices.esp";

/// Contents of `settings.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatchSettings {
    #[serde(flatten)]
    pub rules: RuleSet,

    /// Source layers whose armors are patch candidates.
    #[serde(default)]
    pub mods_to_patch: Vec<ModKey>,

    #[serde(default)]
    pub use_modes: bool,

    #[serde(default)]
    pub records: KnownRecords,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleSet {
    /// Output-scheme name -> input-scheme names it accepts, in authored order.
    pub script_matches: IndexMap<String, Vec<String>>,

    #[serde(default)]
    pub other_matches: Vec<RuleGroup>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleGroup {
    #[serde(default)]
    pub input_scripts: Vec<String>,

    #[serde(default)]
    pub keyword_match: Vec<KeywordRule>,

    #[serde(default)]
    pub name_match: Vec<NameSearchRule>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeywordRule {
    #[serde(default)]
    pub keywords: Vec<FormKey>,

    // Optional here so a missing output is reported by validation instead of a parse error.
    #[serde(default)]
    pub output_script: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NameSearchRule {
    pub search_text: String,
    pub output_script: String,
}

/// Records and names the patcher writes or keys off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KnownRecords {
    /// Marks inventory devices eligible for patching.
    pub zad_inventory_keyword: FormKey,
    pub ud_inventory_keyword: FormKey,
    pub ud_patch_keyword: FormKey,
    pub ud_keyword: FormKey,
    pub ud_patch_no_mode_keyword: FormKey,
    pub ud_main_quest: FormKey,
    pub inventory_script: String,
    /// Resolution seed when the inventory side is already patched.
    pub legacy_seed_script: String,
    pub fork_suffix: String,
}

impl Default for KnownRecords {
    fn default() -> Self {
        Self {
            zad_inventory_keyword: FormKey::new(DDI_MASTER, 0x02B5F0),
            ud_inventory_keyword: FormKey::new(UD_MASTER, 0x1553DD),
            ud_patch_keyword: FormKey::new(UD_MASTER, 0x13A977),
            ud_keyword: FormKey::new(UD_MASTER, 0x11A352),
            ud_patch_no_mode_keyword: FormKey::new(UD_MASTER, 0x1579BE),
            ud_main_quest: FormKey::new(UD_MASTER, 0x15E73C),
            inventory_script: "UD_CustomDevice_EquipScript".to_string(),
            legacy_seed_script: "zadequipscript".to_string(),
            fork_suffix: "_AddedRenderDevice".to_string(),
        }
    }
}

impl KnownRecords {
    /// Plugins that must be visible to the link cache besides the patched ones.
    pub fn masters(&self) -> Vec<ModKey> {
        let mut out: Vec<ModKey> = Vec::new();
        for fk in [
            &self.zad_inventory_keyword,
            &self.ud_inventory_keyword,
            &self.ud_patch_keyword,
            &self.ud_keyword,
            &self.ud_patch_no_mode_keyword,
            &self.ud_main_quest,
        ] {
            if !out.contains(&fk.mod_key) {
                out.push(fk.mod_key.clone());
            }
        }
        out
    }
}
