//! Core domain types, request context and read authorization for nodegate.
//!
//! This crate provides:
//! - Domain objects handed out by the store (`Event`, `Entity`, `CheckConfig`)
//! - Typed global ID components for each node kind
//! - Per-request context: caller identity, cancellation and deadline
//! - The authorization collaborator (`Authorizer`, `Abilities`) and a
//!   rule-based reference implementation
//!
//! Core invariants:
//! - Domain objects are read-only snapshots; nothing here mutates them
//! - Capability checks are per caller and per instance, never per type alone
//!
#![deny(missing_docs)]

/// Read authorization: abilities, authorizer trait and rule-based authorizer.
pub mod authorization;
/// Per-request context threaded through every resolver.
pub mod context;
/// Error types for core operations.
pub mod errors;
/// Domain objects: events, entities and check configurations.
pub mod events;
/// Typed global ID components for each node kind.
pub mod ids;
/// Object metadata shared by every domain object.
pub mod shared;

pub use authorization::{
    Abilities, Authorizer, BindingSubject, Resource, ResourceCategory, RoleBinding, Rule,
    RuleAuthorizer, Verb,
};
pub use context::{Interruption, RequestContext, Subject};
pub use errors::CoreError;
pub use events::{Check, CheckConfig, Entity, Event, MetricPoint, Metrics};
pub use ids::{CheckConfigComponents, EntityComponents, EventComponents};
pub use shared::ObjectMeta;
