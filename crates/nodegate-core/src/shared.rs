use nodegate_canonical::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name, namespace and labels carried by every domain object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Object name, unique within its namespace and kind.
    pub name: String,
    /// Namespace the object belongs to.
    #[serde(default)]
    pub namespace: Namespace,
    /// Free-form labels; not part of any identifier.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Creates metadata in the given namespace with no labels.
    pub fn new(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
            labels: BTreeMap::new(),
        }
    }
}
