use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::FormKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Armor,
    Keyword,
    Quest,
}

impl RecordKind {
    pub fn tag(self) -> &'static str {
        match self {
            RecordKind::Armor => "ARMO",
            RecordKind::Keyword => "KYWD",
            RecordKind::Quest => "QUST",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub form_key: FormKey,
    pub kind: RecordKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_id: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    // `None` and an empty list are different records: absent keywords are a structural gap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<FormKey>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<VirtualMachineAdapter>,
}

impl Record {
    pub fn new(form_key: FormKey, kind: RecordKind) -> Self {
        Self {
            form_key,
            kind,
            editor_id: None,
            name: None,
            keywords: None,
            scripts: None,
        }
    }

    pub fn has_keyword(&self, keyword: &FormKey) -> bool {
        self.keywords
            .as_ref()
            .is_some_and(|kws| kws.contains(keyword))
    }

    pub fn bindings(&self) -> &[ScriptBinding] {
        self.scripts
            .as_ref()
            .map(|vm| vm.scripts.as_slice())
            .unwrap_or_default()
    }

    pub fn binding(&self, name: &str) -> Option<&ScriptBinding> {
        self.bindings().iter().find(|s| s.name == name)
    }

    pub fn binding_mut(&mut self, name: &str) -> Option<&mut ScriptBinding> {
        self.scripts
            .as_mut()?
            .scripts
            .iter_mut()
            .find(|s| s.name == name)
    }

    /// Snapshot of what script-name resolution is allowed to look at.
    pub fn attributes(&self) -> RecordAttributes {
        RecordAttributes {
            keywords: self
                .keywords
                .iter()
                .flatten()
                .cloned()
                .collect(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.editor_id {
            Some(edid) => write!(f, "{} [{}:{}]", edid, self.kind.tag(), self.form_key),
            None => write!(f, "[{}:{}]", self.kind.tag(), self.form_key),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordAttributes {
    pub keywords: BTreeSet<FormKey>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualMachineAdapter {
    #[serde(default)]
    pub scripts: Vec<ScriptBinding>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptBinding {
    pub name: String,

    #[serde(default)]
    pub properties: Vec<ScriptProperty>,
}

impl ScriptBinding {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&ScriptProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn object(&self, name: &str) -> Option<&FormKey> {
        match &self.property(name)?.value {
            PropertyValue::Object { form_key } => Some(form_key),
            _ => None,
        }
    }

    /// Inserts or replaces a property, keeping names unique.
    pub fn set_property(&mut self, prop: ScriptProperty) {
        match self.properties.iter_mut().find(|p| p.name == prop.name) {
            Some(existing) => *existing = prop,
            None => self.properties.push(prop),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptProperty {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<PropertyFlag>,

    #[serde(flatten)]
    pub value: PropertyValue,
}

impl ScriptProperty {
    pub fn object(name: impl Into<String>, form_key: FormKey) -> Self {
        Self {
            name: name.into(),
            flags: Vec::new(),
            value: PropertyValue::Object { form_key },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyFlag {
    Edited,
    Removed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyValue {
    Object { form_key: FormKey },
    ObjectList { form_keys: Vec<FormKey> },
    Bool { value: bool },
    Int { value: i32 },
    Float { value: f32 },
    String { value: String },
}
