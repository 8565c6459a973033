//! Resource tag to node resolver mapping.
//!
//! The registry is written only while it is a [`NodeRegistryBuilder`];
//! [`NodeRegistryBuilder::build`] consumes the builder and hands out an
//! immutable [`NodeRegistry`] that is shared freely across requests.
//!
//! Dispatch first consults the declared tags. Tags nobody declared fall back
//! to each resolver's [`NodeResolver::is_kind_of`] predicate, which lets one
//! resolver serve a family of tags.

use async_trait::async_trait;
use nodegate_canonical::GlobalId;
use nodegate_core::RequestContext;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::{RegistryError, ResolveError};
use crate::node::Node;
use crate::resolution::Resolution;

/// Fetches one kind of object by decoded global ID.
#[async_trait]
pub trait NodeResolver: Send + Sync {
    /// Object type the resolver produces.
    fn type_name(&self) -> &'static str;

    /// Resource tags this resolver owns.
    fn tags(&self) -> &[&'static str];

    /// Whether this resolver handles `tag`. Defaults to the declared tags.
    fn is_kind_of(&self, tag: &str) -> bool {
        self.tags().iter().any(|declared| *declared == tag)
    }

    /// Loads the object and applies the caller's read capability.
    ///
    /// Returns `Absent` both when the object does not exist and when the
    /// caller may not read it.
    async fn resolve(
        &self,
        ctx: &RequestContext,
        id: &GlobalId,
    ) -> Result<Resolution<Node>, ResolveError>;
}

/// Registered kind, as reported by [`NodeRegistry::kinds`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindInfo {
    /// Object type name.
    pub type_name: &'static str,
    /// Declared resource tags.
    pub tags: Vec<&'static str>,
}

/// Mutable registry used during start-up.
#[derive(Default)]
pub struct NodeRegistryBuilder {
    resolvers: Vec<Arc<dyn NodeResolver>>,
    by_tag: HashMap<&'static str, usize>,
}

impl NodeRegistryBuilder {
    /// Registers a resolver.
    pub fn register<R: NodeResolver + 'static>(
        &mut self,
        resolver: R,
    ) -> Result<&mut Self, RegistryError> {
        self.register_arc(Arc::new(resolver))
    }

    /// Registers a shared resolver.
    ///
    /// # Errors
    ///
    /// Fails when the resolver declares no tags, when its type name is
    /// already registered, or when a tag is claimed in either direction:
    /// an existing resolver already handles one of its tags, or its
    /// predicate claims a tag another resolver declared.
    pub fn register_arc(
        &mut self,
        resolver: Arc<dyn NodeResolver>,
    ) -> Result<&mut Self, RegistryError> {
        let incoming = resolver.type_name();
        if resolver.tags().is_empty() {
            return Err(RegistryError::NoTags { type_name: incoming });
        }
        if self.resolvers.iter().any(|r| r.type_name() == incoming) {
            return Err(RegistryError::DuplicateType(incoming));
        }
        for &tag in resolver.tags() {
            if let Some(existing) = self.resolvers.iter().find(|r| r.is_kind_of(tag)) {
                return Err(RegistryError::TagCollision {
                    tag: tag.to_string(),
                    existing: existing.type_name(),
                    incoming,
                });
            }
        }
        if let Some((&tag, &index)) = self.by_tag.iter().find(|(tag, _)| resolver.is_kind_of(tag)) {
            return Err(RegistryError::TagCollision {
                tag: tag.to_string(),
                existing: self.resolvers[index].type_name(),
                incoming,
            });
        }

        let index = self.resolvers.len();
        for &tag in resolver.tags() {
            self.by_tag.insert(tag, index);
        }
        debug!(type_name = incoming, tags = ?resolver.tags(), "registered node resolver");
        self.resolvers.push(resolver);
        Ok(self)
    }

    /// Freezes the registry.
    pub fn build(self) -> NodeRegistry {
        NodeRegistry {
            resolvers: self.resolvers,
            by_tag: self.by_tag,
        }
    }
}

/// Immutable tag to resolver mapping.
pub struct NodeRegistry {
    resolvers: Vec<Arc<dyn NodeResolver>>,
    by_tag: HashMap<&'static str, usize>,
}

impl NodeRegistry {
    /// Starts an empty registry.
    pub fn builder() -> NodeRegistryBuilder {
        NodeRegistryBuilder::default()
    }

    /// Selects the resolver responsible for `tag`.
    pub fn lookup(&self, tag: &str) -> Result<&Arc<dyn NodeResolver>, ResolveError> {
        if let Some(&index) = self.by_tag.get(tag) {
            return Ok(&self.resolvers[index]);
        }

        let mut claimants = self.resolvers.iter().filter(|r| r.is_kind_of(tag));
        match (claimants.next(), claimants.next()) {
            (Some(resolver), None) => Ok(resolver),
            (Some(first), Some(second)) => Err(ResolveError::AmbiguousResolver {
                tag: tag.to_string(),
                first: first.type_name(),
                second: second.type_name(),
            }),
            (None, _) => Err(ResolveError::NoMatchingResolver {
                tag: tag.to_string(),
            }),
        }
    }

    /// Dispatches a decoded ID to its resolver.
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        id: &GlobalId,
    ) -> Result<Resolution<Node>, ResolveError> {
        let resolver = self.lookup(id.tag().as_str()).inspect_err(|err| {
            warn!(tag = %id.tag(), error = %err, "global id not dispatchable");
        })?;
        resolver.resolve(ctx, id).await
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> Vec<KindInfo> {
        self.resolvers
            .iter()
            .map(|r| KindInfo {
                type_name: r.type_name(),
                tags: r.tags().to_vec(),
            })
            .collect()
    }

    /// Number of registered resolvers.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
