use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Plugin file name, e.g. `UnforgivingDevices.esp`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModKey(pub String);

impl ModKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Record identity: a 24-bit local id scoped to the plugin that introduced it.
///
/// Serialized as `XXXXXX:Plugin.esp`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormKey {
    pub id: u32,
    pub mod_key: ModKey,
}

pub const MAX_LOCAL_ID: u32 = 0x00FF_FFFF;

impl FormKey {
    pub fn new(mod_key: impl Into<ModKey>, id: u32) -> Self {
        debug_assert!(id <= MAX_LOCAL_ID, "local id {:#X} out of range", id);
        Self {
            id,
            mod_key: mod_key.into(),
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}:{}", self.id, self.mod_key)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid form key {0:?} (expected XXXXXX:Plugin.esp)")]
pub struct FormKeyParseError(pub String);

impl FromStr for FormKey {
    type Err = FormKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FormKeyParseError(s.to_string());
        let (id, mod_key) = s.split_once(':').ok_or_else(bad)?;
        let id = id
            .strip_prefix("0x")
            .or_else(|| id.strip_prefix("0X"))
            .unwrap_or(id);
        if id.is_empty()
            || id.len() > 6
            || !id.bytes().all(|b| b.is_ascii_hexdigit())
            || mod_key.is_empty()
        {
            return Err(bad());
        }
        let id = u32::from_str_radix(id, 16).map_err(|_| bad())?;
        Ok(Self {
            id,
            mod_key: ModKey::new(mod_key),
        })
    }
}

impl TryFrom<String> for FormKey {
    type Error = FormKeyParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FormKey> for String {
    fn from(k: FormKey) -> Self {
        k.to_string()
    }
}
