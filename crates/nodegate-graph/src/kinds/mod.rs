//! Built-in node kinds: check events, entities and check configurations.
//!
//! Each kind contributes a node resolver, registered under its resource
//! tag, and the object type describing its fields.

use std::sync::Arc;

use crate::backend::Backend;
use crate::registry::NodeResolver;
use crate::schema::ObjectType;

/// Check event kind.
pub mod check_event;
/// Check configuration kind.
pub mod check_config;
/// Entity kind.
pub mod entity;

/// Interface every fetchable type implements.
pub const NODE_INTERFACE: &str = "Node";

/// A resolver together with the object type it produces.
pub struct KindRegistration {
    /// Fetches the kind by global ID.
    pub resolver: Arc<dyn NodeResolver>,
    /// Field layout of the kind.
    pub object: ObjectType,
}

/// Registrations for every built-in kind.
pub fn all(backend: &Backend) -> Vec<KindRegistration> {
    vec![
        check_event::registration(backend),
        entity::registration(backend),
        check_config::registration(backend),
    ]
}
