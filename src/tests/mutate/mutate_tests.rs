use super::*;

use crate::model::{
    ModKey, PropertyValue, RecordAttributes, RecordKind, ScriptProperty, VirtualMachineAdapter,
};

fn fk(id: u32) -> FormKey {
    FormKey::new("Devices.esp", id)
}

fn int_prop(name: &str, value: i32) -> ScriptProperty {
    ScriptProperty {
        name: name.to_string(),
        flags: Vec::new(),
        value: PropertyValue::Int { value },
    }
}

fn inventory_binding(render: &FormKey) -> ScriptBinding {
    ScriptBinding {
        name: "zadX".to_string(),
        properties: vec![
            ScriptProperty::object("deviceInventory", fk(0x10)),
            ScriptProperty::object("libs", fk(0x11)),
            ScriptProperty::object("zad_DeviousDevice", fk(0x12)),
            ScriptProperty::object("deviceRendered", render.clone()),
            int_prop("other", 3),
        ],
    }
}

fn armor(id: u32, edid: &str, scripts: Vec<ScriptBinding>) -> Record {
    Record {
        editor_id: Some(edid.to_string()),
        name: Some("Collar".to_string()),
        keywords: Some(Vec::new()),
        scripts: Some(VirtualMachineAdapter { scripts }),
        ..Record::new(fk(id), RecordKind::Armor)
    }
}

fn snapshot(inventory: &Record, render: &Record, existing: Option<&str>) -> PairSnapshot {
    PairSnapshot {
        inventory: inventory.form_key.clone(),
        inventory_binding: "zadX".to_string(),
        inventory_patched: false,
        render: render.form_key.clone(),
        render_attributes: RecordAttributes::default(),
        render_output_binding: existing.map(str::to_string),
    }
}

#[test]
fn cross_record_copy_keeps_only_allow_listed_properties() {
    let source = inventory_binding(&fk(0x2));
    let copy = copy_binding_for_cross_record_use(&source, "UD_X");

    assert_eq!(copy.name, "UD_X");
    let names: Vec<_> = copy.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["deviceInventory", "libs", "UD_DeviceKeyword"]);
    assert_eq!(copy.object("UD_DeviceKeyword"), Some(&fk(0x12)));

    // The source is left as it was.
    assert_eq!(source.properties.len(), 5);
    assert!(source.property("zad_DeviousDevice").is_some());
}

#[test]
fn tagging_twice_adds_no_duplicates() {
    let known = KnownRecords::default();
    let mut record = armor(0x1, "Collar", Vec::new());
    record.keywords = None;

    assert_eq!(tag_keywords(&mut record, &known, true), 2);
    assert_eq!(tag_keywords(&mut record, &known, true), 0);
    assert_eq!(record.keywords.as_ref().map(Vec::len), Some(2));

    // Turning modes off only adds the missing no-mode keyword.
    assert_eq!(tag_keywords(&mut record, &known, false), 1);
    assert!(record.has_keyword(&known.ud_patch_no_mode_keyword));
    assert_eq!(record.keywords.as_ref().map(Vec::len), Some(3));
}

#[test]
fn attach_rewrites_inventory_and_renders_in_the_layer() {
    let known = KnownRecords::default();
    let render = armor(0x2, "CollarRend", Vec::new());
    let inventory = armor(0x1, "CollarInv", vec![inventory_binding(&render.form_key)]);
    let pair = snapshot(&inventory, &render, None);
    let plan = PatchPlan::FullPatch {
        render_script: "UD_X".to_string(),
        target: RenderTarget::Attach,
    };

    let mut layer = PatchLayer::new(ModKey::new("UD_Patch.esp"));
    let outcome = RecordMutator::new(&mut layer, &known, false)
        .apply(&pair, &plan, &inventory, &render)
        .expect("apply");
    assert_eq!(
        outcome,
        MutationOutcome::Patched {
            render: render.form_key.clone()
        }
    );

    let inv = layer.get(&inventory.form_key).expect("inventory override");
    assert!(inv.has_keyword(&known.ud_inventory_keyword));
    let inv_script = inv.binding(&known.inventory_script).expect("renamed");
    assert_eq!(inv_script.object(MAIN_QUEST_PROPERTY), Some(&known.ud_main_quest));
    assert_eq!(inv_script.object(RENDER_REFERENCE), Some(&render.form_key));

    let rend = layer.get(&render.form_key).expect("render override");
    assert!(rend.binding("UD_X").is_some());
    assert!(rend.has_keyword(&known.ud_keyword));
    assert!(rend.has_keyword(&known.ud_patch_no_mode_keyword));

    // Input records are untouched.
    assert!(inventory.binding("zadX").is_some());
    assert!(render.bindings().is_empty());
}

#[test]
fn fork_leaves_the_original_render_alone_and_redirects_inventory() {
    let known = KnownRecords::default();
    let render = armor(0x2, "CollarRend", vec![ScriptBinding::new("UD_Other")]);
    let inventory = armor(0x1, "CollarInv", vec![inventory_binding(&render.form_key)]);
    let pair = snapshot(&inventory, &render, Some("UD_Other"));
    let plan = PatchPlan::FullPatch {
        render_script: "UD_X".to_string(),
        target: RenderTarget::Fork {
            replace: "UD_Other".to_string(),
        },
    };

    let mut layer = PatchLayer::new(ModKey::new("UD_Patch.esp"));
    let outcome = RecordMutator::new(&mut layer, &known, true)
        .apply(&pair, &plan, &inventory, &render)
        .expect("apply");

    let (original, fork) = match outcome {
        MutationOutcome::Forked { original, fork } => (original, fork),
        other => panic!("expected fork, got {:?}", other),
    };
    assert_eq!(original, render.form_key);
    assert_eq!(fork.mod_key, ModKey::new("UD_Patch.esp"));
    assert!(layer.get(&render.form_key).is_none());

    let forked = layer.get(&fork).expect("fork in layer");
    assert_eq!(
        forked.editor_id.as_deref(),
        Some("CollarRend_AddedRenderDevice")
    );
    let names: Vec<_> = forked.bindings().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["UD_X"]);

    let inv = layer.get(&inventory.form_key).expect("inventory override");
    let inv_script = inv.binding(&known.inventory_script).expect("renamed");
    assert_eq!(inv_script.object(RENDER_REFERENCE), Some(&fork));
}

#[test]
fn repeated_forks_of_one_render_get_numbered_editor_ids() {
    let known = KnownRecords::default();
    let render = armor(0x2, "CollarRend", vec![ScriptBinding::new("UD_Other")]);
    let mut layer = PatchLayer::new(ModKey::new("UD_Patch.esp"));
    let mut mutator = RecordMutator::new(&mut layer, &known, true);

    let a = mutator
        .fork_record(&render, "UD_Other", ScriptBinding::new("UD_A"))
        .expect("fork a");
    let b = mutator
        .fork_record(&render, "UD_Other", ScriptBinding::new("UD_B"))
        .expect("fork b");
    assert_ne!(a, b);

    assert_eq!(
        layer.get(&a).and_then(|r| r.editor_id.as_deref()),
        Some("CollarRend_AddedRenderDevice")
    );
    assert_eq!(
        layer.get(&b).and_then(|r| r.editor_id.as_deref()),
        Some("CollarRend_AddedRenderDevice_2")
    );
}

#[test]
fn repatch_adds_binding_without_touching_inventory() {
    let known = KnownRecords::default();
    let render = armor(0x2, "CollarRend", Vec::new());
    let mut inv_binding = inventory_binding(&render.form_key);
    inv_binding.name = known.inventory_script.clone();
    let inventory = armor(0x1, "CollarInv", vec![inv_binding]);

    let mut pair = snapshot(&inventory, &render, None);
    pair.inventory_binding = known.inventory_script.clone();
    pair.inventory_patched = true;
    let plan = PatchPlan::RepatchRender {
        render_script: "UD_X".to_string(),
    };

    let mut layer = PatchLayer::new(ModKey::new("UD_Patch.esp"));
    let outcome = RecordMutator::new(&mut layer, &known, true)
        .apply(&pair, &plan, &inventory, &render)
        .expect("apply");
    assert_eq!(
        outcome,
        MutationOutcome::Repatched {
            render: render.form_key.clone()
        }
    );
    assert!(layer.get(&inventory.form_key).is_none());
    let rend = layer.get(&render.form_key).expect("render override");
    assert_eq!(
        rend.binding("UD_X").and_then(|b| b.object("UD_DeviceKeyword")),
        Some(&fk(0x12))
    );
}
