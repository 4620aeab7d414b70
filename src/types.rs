use crate::codec::Key;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bare attribute name reserved for primary keys of nested records
pub const KEY_ATTRIBUTE: &str = "id";

/// Payload of a single attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Key(Key),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<Key> for AttributeValue {
    fn from(value: Key) -> Self {
        AttributeValue::Key(value)
    }
}

/// One flat, named value as the backing store sees it.
///
/// `name` is `<namespace>.<bare-name>`, or just the bare name at the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,

    /// Whether the store should index this attribute
    #[serde(default)]
    pub indexed: bool,

    /// Storage hint: the attribute belongs to a repeated child group.
    /// Loading never trusts it.
    #[serde(default)]
    pub multiple: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
            indexed: false,
            multiple: false,
        }
    }

    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }
}

/// Ordered attributes describing a whole entity graph
pub type AttributeList = Vec<Attribute>;

/// Configuration for saving and loading entity graphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Deepest relation level processed below the root (0 = root only).
    /// Deeper records are silently neither saved nor loaded.
    pub max_depth: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        SerializerConfig { max_depth: 2 }
    }
}

impl SerializerConfig {
    /// Read a config from a JSON file; missing fields fall back to defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}
