mod ids;
mod plugin;
mod record;
mod settings;

pub use self::ids::{FormKey, FormKeyParseError, MAX_LOCAL_ID, ModKey};
pub use self::plugin::{PLUGIN_VERSION, Plugin};
pub use self::record::{
    PropertyFlag, PropertyValue, Record, RecordAttributes, RecordKind, ScriptBinding,
    ScriptProperty, VirtualMachineAdapter,
};
pub use self::settings::{
    DDI_MASTER, KeywordRule, KnownRecords, NameSearchRule, PatchSettings, RuleGroup, RuleSet,
    UD_MASTER,
};
