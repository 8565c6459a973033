//! Global object identification and capability-gated resolution.
//!
//! This crate is the surface a graph query engine is wired to:
//! - [`NodeRegistry`]: one resolver per resource tag, built once at start-up
//! - [`NodeDispatcher`]: the single "fetch any object by global ID" entry point
//! - [`ObjectType`] / [`Schema`]: named types with per-field resolvers
//! - Gated relationship resolvers that hide objects the caller cannot read
//! - Alias resolvers exposing attributes of nested substructures
//!
//! Authorization denial is never an error. Node fetches return
//! [`Resolution::Absent`] and relationship fields return
//! [`FieldValue::Null`], exactly as if the object did not exist.
//!
#![deny(missing_docs)]

/// Field resolvers reading attributes of nested substructures.
pub mod alias;
/// Store and authorizer handles shared by resolvers.
pub mod backend;
/// Global ID dispatch.
pub mod dispatcher;
/// Error types for registration and resolution.
pub mod errors;
/// Authorization-gated field resolution.
pub mod gate;
/// Registered resource kinds.
pub mod kinds;
/// Resolved domain objects.
pub mod node;
/// Node resolver registry.
pub mod registry;
/// Found-or-absent resolution outcome.
pub mod resolution;
/// Object type descriptors and the assembled schema.
pub mod schema;
/// Field values handed back to the query engine.
pub mod value;

pub use alias::{AliasResolver, Presence};
pub use backend::Backend;
pub use dispatcher::{DispatcherConfig, NodeDispatcher};
pub use errors::{ErrorClass, RegistryError, ResolveError};
pub use gate::{reveal, source_as, GatedRelation};
pub use kinds::KindRegistration;
pub use node::{Node, NodeSource};
pub use registry::{KindInfo, NodeRegistry, NodeRegistryBuilder, NodeResolver};
pub use resolution::Resolution;
pub use schema::{FieldDef, FieldResolver, ObjectType, Property, ResolvedObject, Schema};
pub use value::FieldValue;
