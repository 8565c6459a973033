use nodegate_canonical::OpaqueId;
use serde::Serialize;

use crate::node::Node;

/// Value produced by a field resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value: missing, optional, or hidden from the caller.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    String(String),
    /// Opaque global ID.
    Id(OpaqueId),
    /// Unix time in seconds; rendering is left to the engine's scalar.
    Timestamp(i64),
    /// List of values.
    List(Vec<FieldValue>),
    /// Nested object, resolved further by its own type's fields.
    Node(Node),
}

impl FieldValue {
    /// Whether the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Borrows a nested node.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            FieldValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Borrows a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            FieldValue::Id(id) => Some(id.as_str()),
            _ => None,
        }
    }

    /// Borrows list items.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<OpaqueId> for FieldValue {
    fn from(value: OpaqueId) -> Self {
        FieldValue::Id(value)
    }
}

impl From<&[String]> for FieldValue {
    fn from(value: &[String]) -> Self {
        FieldValue::List(value.iter().map(|s| FieldValue::from(s.as_str())).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}
