use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Patch device scripts across the load order and write the patch plugin
    Patch(PatchArgs),

    /// Validate settings.json and list the known script names
    CheckRules(CheckRulesArgs),

    /// Resolve the output script for an input script and record attributes
    Resolve(ResolveArgs),
}

#[derive(Args)]
pub(crate) struct PatchArgs {
    /// Directory holding `<plugin>.json` files
    #[arg(long)]
    pub(crate) data_dir: PathBuf,

    /// Load order file, lowest priority first
    #[arg(long)]
    pub(crate) load_order: PathBuf,

    #[arg(long, default_value = "settings.json")]
    pub(crate) settings: PathBuf,

    /// Mod key of the generated plugin
    #[arg(long, default_value = "UD_Patch.esp")]
    pub(crate) patch_name: String,

    /// Output file (defaults to `<data-dir>/<patch-name>.json`)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,

    /// Emit the summary as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct CheckRulesArgs {
    #[arg(long, default_value = "settings.json")]
    pub(crate) settings: PathBuf,

    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ResolveArgs {
    #[arg(long, default_value = "settings.json")]
    pub(crate) settings: PathBuf,

    /// Input-scheme script name
    #[arg(long)]
    pub(crate) script: String,

    /// Keyword carried by the record (XXXXXX:Plugin.esp); repeatable
    #[arg(long = "keyword")]
    pub(crate) keywords: Vec<String>,

    /// Display name of the record
    #[arg(long)]
    pub(crate) name: Option<String>,
}
