#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use udpatch::model::{
    DDI_MASTER, FormKey, KnownRecords, ModKey, Plugin, Record, RecordKind, ScriptBinding,
    ScriptProperty, UD_MASTER, VirtualMachineAdapter,
};
use udpatch::store::write_plugin;

pub const DEVICES: &str = "Devices.esp";

pub fn fk(id: u32) -> FormKey {
    FormKey::new(DEVICES, id)
}

/// A data directory with both masters, a device plugin and a load order file.
pub struct Fixture {
    pub dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new(devices: Vec<Record>) -> Result<Self> {
        let dir = tempfile::tempdir().context("create fixture dir")?;
        let known = KnownRecords::default();

        let mut ddi = Plugin::new(ModKey::new(DDI_MASTER));
        ddi.records
            .push(Record::new(known.zad_inventory_keyword.clone(), RecordKind::Keyword));
        write_plugin(&dir.path().join(format!("{}.json", DDI_MASTER)), &ddi)?;

        let mut ud = Plugin::new(ModKey::new(UD_MASTER));
        for kw in [
            &known.ud_inventory_keyword,
            &known.ud_patch_keyword,
            &known.ud_keyword,
            &known.ud_patch_no_mode_keyword,
        ] {
            ud.records.push(Record::new(kw.clone(), RecordKind::Keyword));
        }
        ud.records
            .push(Record::new(known.ud_main_quest.clone(), RecordKind::Quest));
        ud.masters.push(ModKey::new(DDI_MASTER));
        write_plugin(&dir.path().join(format!("{}.json", UD_MASTER)), &ud)?;

        let mut plugin = Plugin::new(ModKey::new(DEVICES));
        plugin.masters = vec![ModKey::new(DDI_MASTER)];
        plugin.records = devices;
        write_plugin(&dir.path().join(format!("{}.json", DEVICES)), &plugin)?;

        std::fs::write(
            dir.path().join("loadorder.txt"),
            format!("# test load order\n{}\n*{}\n*{}\n", DDI_MASTER, UD_MASTER, DEVICES),
        )
        .context("write load order")?;

        std::fs::write(
            dir.path().join("settings.json"),
            serde_json::to_vec_pretty(&settings_json()).context("serialize settings")?,
        )
        .context("write settings")?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn settings_path(&self) -> PathBuf {
        self.path().join("settings.json")
    }

    pub fn load_order_path(&self) -> PathBuf {
        self.path().join("loadorder.txt")
    }
}

pub fn settings_json() -> serde_json::Value {
    serde_json::json!({
        "ScriptMatches": {
            "UD_X": ["zadX", "zadequipscript"],
            "UD_Other": ["zadOther"]
        },
        "OtherMatches": [
            {
                "InputScripts": ["UD_X"],
                "KeywordMatch": [
                    { "Keywords": ["000D00:Devices.esp"], "OutputScript": "UD_X_Kw" }
                ],
                "NameMatch": [
                    { "SearchText": "Heavy", "OutputScript": "UD_X_Heavy" }
                ]
            }
        ],
        "ModsToPatch": [DEVICES],
        "UseModes": false
    })
}

pub fn inventory(id: u32, script: &str, render: FormKey) -> Record {
    let known = KnownRecords::default();
    Record {
        editor_id: Some(format!("Inv{:X}", id)),
        name: Some("Collar".to_string()),
        keywords: Some(vec![known.zad_inventory_keyword]),
        scripts: Some(VirtualMachineAdapter {
            scripts: vec![ScriptBinding {
                name: script.to_string(),
                properties: vec![
                    ScriptProperty::object("deviceInventory", fk(id)),
                    ScriptProperty::object("libs", fk(0x50)),
                    ScriptProperty::object("zad_DeviousDevice", fk(0x51)),
                    ScriptProperty::object("deviceRendered", render),
                ],
            }],
        }),
        ..Record::new(fk(id), RecordKind::Armor)
    }
}

pub fn render(id: u32, name: &str, scripts: Vec<ScriptBinding>) -> Record {
    Record {
        editor_id: Some(format!("Rend{:X}", id)),
        name: Some(name.to_string()),
        keywords: Some(Vec::new()),
        scripts: Some(VirtualMachineAdapter { scripts }),
        ..Record::new(fk(id), RecordKind::Armor)
    }
}
