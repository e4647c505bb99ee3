use std::collections::BTreeSet;

use anyhow::{Context, Result};

use udpatch::model::{FormKey, ModKey, RecordAttributes};
use udpatch::resolve::ScriptNameResolver;
use udpatch::rules::{ScriptUniverse, ValidatedRules};
use udpatch::store;

use crate::Commands;
use crate::cli_commands::{CheckRulesArgs, PatchArgs, ResolveArgs};

pub(crate) fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Patch(args) => handle_patch(args),
        Commands::CheckRules(args) => handle_check_rules(args),
        Commands::Resolve(args) => handle_resolve(args),
    }
}

fn handle_patch(args: PatchArgs) -> Result<()> {
    let settings = store::read_settings(&args.settings)?;
    let order = store::read_load_order(&args.load_order)?;
    let load_order = store::load_plugins(&args.data_dir, &order)?;

    let patch_mod = ModKey::new(args.patch_name);
    let (layer, summary) = udpatch::driver::run_patch(&load_order, &settings, patch_mod.clone())?;

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .context("format timestamp")?;
    let output = args
        .output
        .unwrap_or_else(|| args.data_dir.join(format!("{}.json", patch_mod)));
    let records = layer.len();
    store::write_plugin(&output, &layer.into_plugin(&load_order, Some(created_at)))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serialize patch summary")?
        );
    } else {
        println!("Wrote {} records to {}", records, output.display());
        println!(
            "patched={} forked={} repatched={} already_patched={} skipped={}",
            summary.patched,
            summary.forked,
            summary.repatched,
            summary.already_patched,
            summary.skipped.len()
        );
    }
    Ok(())
}

fn handle_check_rules(args: CheckRulesArgs) -> Result<()> {
    let settings = store::read_settings(&args.settings)?;
    let rules = ValidatedRules::new(settings.rules.clone()).context("invalid rule settings")?;
    let universe = ScriptUniverse::from_rules(&rules, &settings.records);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&universe).context("serialize script names")?
        );
    } else {
        println!(
            "ok: {} direct matches, {} rule groups",
            rules.script_matches.len(),
            rules.other_matches.len()
        );
        println!("output scripts: {}", join(&universe.output));
        println!("input scripts: {}", join(&universe.input));
    }
    Ok(())
}

fn handle_resolve(args: ResolveArgs) -> Result<()> {
    let settings = store::read_settings(&args.settings)?;
    let rules = ValidatedRules::new(settings.rules).context("invalid rule settings")?;

    let keywords = args
        .keywords
        .iter()
        .map(|k| k.parse::<FormKey>())
        .collect::<Result<BTreeSet<_>, _>>()?;
    let attrs = RecordAttributes {
        keywords,
        name: args.name,
    };

    let resolved = ScriptNameResolver::new(&rules).resolve(&args.script, &attrs)?;
    println!("{}", resolved);
    Ok(())
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}
