// ABOUTME: Value-source contract shared between regprefs and the host application it persists.
// ABOUTME: Defines the Value model, the Host accessor trait, and a TOML-backed host snapshot.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A host-side setting value as seen by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawValue", into = "RawValue")]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    List(Vec<Value>),
}

impl Value {
    /// Lisp truthiness: only `Nil` and `Bool(false)` are false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(name.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

/// Wire shape of a `Value` in TOML/JSON. An empty array is nil.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol { symbol: String },
    List(Vec<RawValue>),
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Bool(b) => Value::Bool(b),
            RawValue::Int(i) => Value::Int(i),
            RawValue::Float(f) => Value::Float(f),
            RawValue::Str(s) => Value::Str(s),
            RawValue::Symbol { symbol } => Value::Symbol(symbol),
            RawValue::List(items) if items.is_empty() => Value::Nil,
            RawValue::List(items) => Value::List(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => RawValue::List(Vec::new()),
            Value::Bool(b) => RawValue::Bool(b),
            Value::Int(i) => RawValue::Int(i),
            Value::Float(f) => RawValue::Float(f),
            Value::Str(s) => RawValue::Str(s),
            Value::Symbol(symbol) => RawValue::Symbol { symbol },
            Value::List(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
        }
    }
}

/// Failure reading a value from the host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("unbound: {0}")]
    Unbound(String),

    #[error("source failed: {0}")]
    Failed(String),
}

/// Read-only accessors into the running host application.
pub trait Host {
    /// Value of a named global setting. Unknown names are an error.
    fn global(&self, name: &str) -> Result<Value, SourceError>;

    /// Value of a parameter of the current window. Unknown parameters read as nil.
    fn frame_parameter(&self, name: &str) -> Result<Value, SourceError>;
}

/// A frozen copy of host state, usually loaded from a TOML file.
///
/// ```toml
/// [globals]
/// tool-bar-mode = true
///
/// [frame]
/// width = 80
/// vertical-scroll-bars = { symbol = "right" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHost {
    #[serde(default)]
    pub globals: BTreeMap<String, Value>,
    #[serde(default)]
    pub frame: BTreeMap<String, Value>,
}

impl SnapshotHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.globals.insert(name.to_string(), value.into());
        self
    }

    pub fn with_frame_parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.frame.insert(name.to_string(), value.into());
        self
    }

    pub fn set_global(&mut self, name: &str, value: impl Into<Value>) {
        self.globals.insert(name.to_string(), value.into());
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&contents)?)
    }
}

impl Host for SnapshotHost {
    fn global(&self, name: &str) -> Result<Value, SourceError> {
        self.globals
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::Unbound(name.to_string()))
    }

    fn frame_parameter(&self, name: &str) -> Result<Value, SourceError> {
        Ok(self.frame.get(name).cloned().unwrap_or(Value::Nil))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_lisp_rules() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(0).is_truthy());
        assert!(Value::Str(String::new()).is_truthy());
        assert!(Value::symbol("right").is_truthy());
    }

    #[test]
    fn snapshot_parses_all_value_shapes() {
        let toml = r#"
[globals]
tool-bar-mode = true
menu-bar-mode = false

[frame]
width = 80
line-spacing = 0.5
font = "Consolas-10"
vertical-scroll-bars = { symbol = "right" }
left = [{ symbol = "+" }, -8]
scroll-bar-width = []
"#;
        let host = SnapshotHost::from_toml_str(toml).unwrap();
        assert_eq!(host.global("tool-bar-mode").unwrap(), Value::Bool(true));
        assert_eq!(host.global("menu-bar-mode").unwrap(), Value::Bool(false));
        assert_eq!(host.frame_parameter("width").unwrap(), Value::Int(80));
        assert_eq!(host.frame_parameter("line-spacing").unwrap(), Value::Float(0.5));
        assert_eq!(
            host.frame_parameter("font").unwrap(),
            Value::Str("Consolas-10".to_string())
        );
        assert_eq!(
            host.frame_parameter("vertical-scroll-bars").unwrap(),
            Value::symbol("right")
        );
        assert_eq!(
            host.frame_parameter("left").unwrap(),
            Value::List(vec![Value::symbol("+"), Value::Int(-8)])
        );
        assert_eq!(host.frame_parameter("scroll-bar-width").unwrap(), Value::Nil);
    }

    #[test]
    fn unknown_global_is_unbound() {
        let host = SnapshotHost::new();
        assert_eq!(
            host.global("tool-bar-mode"),
            Err(SourceError::Unbound("tool-bar-mode".to_string()))
        );
    }

    #[test]
    fn unknown_frame_parameter_reads_as_nil() {
        let host = SnapshotHost::new();
        assert_eq!(host.frame_parameter("scroll-bar-width").unwrap(), Value::Nil);
    }

    #[test]
    fn empty_toml_gives_empty_snapshot() {
        let host = SnapshotHost::from_toml_str("").unwrap();
        assert!(host.globals.is_empty());
        assert!(host.frame.is_empty());
    }

    #[test]
    fn snapshot_json_round_trip() {
        let host = SnapshotHost::new()
            .with_global("tool-bar-mode", true)
            .with_frame_parameter("width", 120)
            .with_frame_parameter("vertical-scroll-bars", Value::symbol("left"))
            .with_frame_parameter("line-spacing", Value::Nil);
        let json = serde_json::to_string(&host).unwrap();
        let parsed: SnapshotHost = serde_json::from_str(&json).unwrap();
        assert_eq!(host, parsed);
    }

    #[test]
    fn snapshot_toml_round_trip() {
        let host = SnapshotHost::new()
            .with_global("menu-bar-mode", false)
            .with_frame_parameter("font", "Consolas-10");
        let toml_str = toml::to_string(&host).unwrap();
        let parsed = SnapshotHost::from_toml_str(&toml_str).unwrap();
        assert_eq!(host, parsed);
    }
}
