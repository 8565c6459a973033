//! Store collaborator for nodegate resolvers.
//!
//! This crate provides:
//! - `EventStore`, `EntityStore` and `CheckConfigStore` async lookup traits
//! - Event filtering API for in-memory narrowing of store results
//! - Scan helpers for stores without point lookups
//! - `MemoryStore`, an in-process reference implementation with JSON fixtures
//!
//! Every lookup receives the request context and must stop once the request
//! is cancelled or past its deadline.

#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// Event filtering API.
pub mod filter;
/// In-memory reference store.
pub mod memory;
/// Storage collaborator traits.
pub mod traits;
/// Scan helpers over event sequences.
pub mod view;

pub use error::StoreError;
pub use filter::{key_filter, AndFilter, CheckNameFilter, EventFilter, TimestampFilter};
pub use memory::{Fixture, MemoryStore};
pub use traits::{CheckConfigStore, EntityStore, EventStore, Store};
pub use view::{check_events, find_first};
