use crate::model::{FormKey, PropertyFlag, PropertyValue, ScriptBinding, ScriptProperty};

/// Properties that survive a copy from the inventory binding to a render binding.
pub const CROSS_RECORD_PROPERTIES: [&str; 3] = ["deviceInventory", "libs", "zad_DeviousDevice"];

/// Legacy property name -> output-scheme name, applied while copying.
pub const PROPERTY_RENAMES: [(&str, &str); 1] = [("zad_DeviousDevice", "UD_DeviceKeyword")];

pub const RENDER_REFERENCE: &str = "deviceRendered";
pub const MAIN_QUEST_PROPERTY: &str = "UDCDmain";

/// Copy of `source` named `name`, keeping only allow-listed properties.
pub fn copy_binding_for_cross_record_use(source: &ScriptBinding, name: &str) -> ScriptBinding {
    let properties = source
        .properties
        .iter()
        .filter(|p| CROSS_RECORD_PROPERTIES.contains(&p.name.as_str()))
        .map(|p| {
            let mut p = p.clone();
            if let Some((_, renamed)) = PROPERTY_RENAMES.iter().find(|(old, _)| *old == p.name) {
                p.name = renamed.to_string();
            }
            p
        })
        .collect();
    ScriptBinding {
        name: name.to_string(),
        properties,
    }
}

/// Turns the inventory binding into the output-scheme equip script.
pub fn rewrite_inventory_binding(binding: &mut ScriptBinding, script: &str, main_quest: &FormKey) {
    binding.name = script.to_string();
    if binding.property(MAIN_QUEST_PROPERTY).is_none() {
        let mut prop = ScriptProperty::object(MAIN_QUEST_PROPERTY, main_quest.clone());
        prop.flags.push(PropertyFlag::Edited);
        binding.set_property(prop);
    }
}

/// Points the binding's render reference at `target`. False if it had none.
pub fn redirect_render_reference(binding: &mut ScriptBinding, target: &FormKey) -> bool {
    match binding.properties.iter_mut().find(|p| p.name == RENDER_REFERENCE) {
        Some(prop) => {
            prop.value = PropertyValue::Object {
                form_key: target.clone(),
            };
            true
        }
        None => false,
    }
}
