// ABOUTME: Declarative table of persisted settings: registry key, encoding kind, and value source.
// ABOUTME: Includes the default display-settings table and validation against the status flag key.

use std::collections::HashSet;

use regprefs_host::{Host, SourceError, Value};

use crate::encode;
use crate::error::TableError;

/// Zero-argument value computation run against the host.
pub type Producer = fn(&dyn Host) -> Result<Value, SourceError>;

/// How a resolved value becomes registry text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingKind {
    /// Any value, written as "on"/"off" by truthiness.
    Bool,
    /// Integers only; anything else clears the key.
    Int,
    /// Any non-nil value in printed form.
    Object,
    /// Text computed by a producer, written verbatim when non-empty.
    Function,
}

/// Where a descriptor's raw value comes from.
#[derive(Debug, Clone, Copy)]
pub enum ValueSource {
    GlobalVariable(&'static str),
    FrameParameter(&'static str),
    Producer(Producer),
}

impl ValueSource {
    pub fn resolve(&self, host: &dyn Host) -> Result<Value, SourceError> {
        match self {
            ValueSource::GlobalVariable(name) => host.global(name),
            ValueSource::FrameParameter(name) => host.frame_parameter(name),
            ValueSource::Producer(produce) => produce(host),
        }
    }
}

/// One registry value and the rule for computing it.
#[derive(Debug, Clone, Copy)]
pub struct SettingDescriptor {
    pub key: &'static str,
    pub kind: EncodingKind,
    pub source: ValueSource,
}

impl SettingDescriptor {
    pub const fn global(key: &'static str, kind: EncodingKind, name: &'static str) -> Self {
        Self {
            key,
            kind,
            source: ValueSource::GlobalVariable(name),
        }
    }

    pub const fn frame(key: &'static str, kind: EncodingKind, name: &'static str) -> Self {
        Self {
            key,
            kind,
            source: ValueSource::FrameParameter(name),
        }
    }

    pub const fn function(key: &'static str, produce: Producer) -> Self {
        Self {
            key,
            kind: EncodingKind::Function,
            source: ValueSource::Producer(produce),
        }
    }

    /// Registry text for `value`, or None when the key should be cleared.
    pub fn encode(&self, value: &Value) -> Option<String> {
        match self.kind {
            EncodingKind::Bool => Some(encode::encode_bool(value.is_truthy()).to_string()),
            EncodingKind::Int => encode::encode_int(value),
            EncodingKind::Object => encode::encode_object(value),
            EncodingKind::Function => match value {
                Value::Str(s) if s.is_empty() => None,
                Value::Str(s) => Some(s.clone()),
                other => encode::encode_object(other),
            },
        }
    }

    /// Value read back from stored text. Printed objects are not parsed and come back
    /// as their text; Bool and Int text that does not decode yields None.
    pub fn decode(&self, text: &str) -> Option<Value> {
        match self.kind {
            EncodingKind::Bool => encode::decode_bool(text).map(Value::Bool),
            EncodingKind::Int => text.parse().ok().map(Value::Int),
            EncodingKind::Object | EncodingKind::Function => Some(Value::from(text)),
        }
    }
}

/// Reserved key recording that settings are currently stored.
pub const STATUS_FLAG: &str = "Frame.SettingsStored";

fn geometry(host: &dyn Host) -> Result<Value, SourceError> {
    encode::encode_geometry(host).map(Value::Str)
}

/// Window display settings persisted by default.
pub static DISPLAY_SETTINGS: &[SettingDescriptor] = &[
    SettingDescriptor::function("Frame.Geometry", geometry),
    SettingDescriptor::global("Frame.ToolBar", EncodingKind::Bool, "tool-bar-mode"),
    SettingDescriptor::global("Frame.MenuBar", EncodingKind::Bool, "menu-bar-mode"),
    SettingDescriptor::frame(
        "Frame.VerticalScrollBars",
        EncodingKind::Bool,
        "vertical-scroll-bars",
    ),
    SettingDescriptor::frame("Frame.ScrollBarWidth", EncodingKind::Int, "scroll-bar-width"),
    SettingDescriptor::frame("Frame.LineSpacing", EncodingKind::Object, "line-spacing"),
];

/// Reject tables with repeated keys or a key shadowing the status flag.
pub fn validate_table(table: &[SettingDescriptor], status_key: &str) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for descriptor in table {
        if descriptor.key == status_key {
            return Err(TableError::ReservedKey(descriptor.key.to_string()));
        }
        if !seen.insert(descriptor.key) {
            return Err(TableError::DuplicateKey(descriptor.key.to_string()));
        }
    }
    Ok(())
}
