use super::*;

use crate::model::{RecordKind, ScriptBinding, ScriptProperty, VirtualMachineAdapter};

fn source(id: u32) -> Record {
    Record {
        editor_id: Some(format!("Armor{:X}", id)),
        keywords: Some(vec![FormKey::new("Keywords.esm", 0x10)]),
        scripts: Some(VirtualMachineAdapter {
            scripts: vec![ScriptBinding {
                name: "zadX".to_string(),
                properties: vec![ScriptProperty::object(
                    "libs",
                    FormKey::new("Libs.esm", 0x20),
                )],
            }],
        }),
        ..Record::new(FormKey::new("Devices.esp", id), RecordKind::Armor)
    }
}

#[test]
fn override_is_created_once_and_reused() {
    let mut layer = PatchLayer::new(ModKey::new("UD_Patch.esp"));
    let input = source(0x1);

    layer.get_or_add_as_override(&input).name = Some("Changed".to_string());
    let again = layer.get_or_add_as_override(&input);
    assert_eq!(again.name.as_deref(), Some("Changed"));
    assert_eq!(layer.len(), 1);
    assert_eq!(input.name, None);
}

#[test]
fn duplicates_get_fresh_ids_in_the_patch_mod() {
    let mut layer = PatchLayer::new(ModKey::new("UD_Patch.esp"));
    let input = source(0x1);

    let a = layer
        .duplicate_as_new_record(&input, Some("A".to_string()))
        .expect("dup a")
        .form_key
        .clone();
    let b = layer
        .duplicate_as_new_record(&input, Some("B".to_string()))
        .expect("dup b")
        .form_key
        .clone();

    assert_eq!(a, FormKey::new("UD_Patch.esp", FIRST_NEW_ID));
    assert_eq!(b, FormKey::new("UD_Patch.esp", FIRST_NEW_ID + 1));
    assert!(layer.editor_id_in_use("A"));
    assert!(!layer.editor_id_in_use("Armor1"));
    assert_eq!(layer.get(&a).map(|r| r.bindings().len()), Some(1));
}

#[test]
fn plugin_masters_follow_the_load_order() {
    let mut layer = PatchLayer::new(ModKey::new("UD_Patch.esp"));
    layer.get_or_add_as_override(&source(0x1));
    layer
        .duplicate_as_new_record(&source(0x2), None)
        .expect("dup");

    // Keywords.esm is referenced but not loaded; it goes last.
    let load_order = LoadOrder::new(vec![
        Plugin::new(ModKey::new("Libs.esm")),
        Plugin::new(ModKey::new("Devices.esp")),
        Plugin::new(ModKey::new("Unused.esp")),
    ]);
    let plugin = layer.into_plugin(&load_order, Some("2026-01-01T00:00:00Z".to_string()));
    assert_eq!(plugin.mod_key, ModKey::new("UD_Patch.esp"));
    assert_eq!(
        plugin.masters,
        vec![
            ModKey::new("Libs.esm"),
            ModKey::new("Devices.esp"),
            ModKey::new("Keywords.esm"),
        ]
    );
    assert_eq!(plugin.records.len(), 2);
}
