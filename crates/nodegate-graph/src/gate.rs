//! Authorization-gated field resolution.
//!
//! Every relationship field runs the same steps:
//! 1. confirm the parent is the expected kind (otherwise an internal error)
//! 2. scope abilities to the caller and the *target's* resource category
//! 3. ask about the specific target instance
//! 4. expose it, or return null without an error
//!
//! Ability scopes differ per field even from the same parent: an event's
//! entity is checked against entity read, its configuration against check
//! read.

use async_trait::async_trait;
use nodegate_core::{Abilities, Authorizer, RequestContext, Resource, ResourceCategory};
use std::sync::Arc;
use tracing::warn;

use crate::errors::ResolveError;
use crate::node::{Node, NodeSource};
use crate::resolution::Resolution;
use crate::schema::FieldResolver;
use crate::value::FieldValue;

/// Borrows the parent object as `S`, or fails with
/// [`ResolveError::UnexpectedSource`].
pub fn source_as<S: NodeSource>(source: &Node) -> Result<&S, ResolveError> {
    source.downcast::<S>().ok_or_else(|| {
        warn!(
            expected = S::KIND,
            actual = source.kind_name(),
            "field resolver received unexpected source"
        );
        ResolveError::UnexpectedSource {
            expected: S::KIND,
            actual: source.kind_name(),
        }
    })
}

/// Hides `object` unless the caller may read it.
pub fn reveal<T: Resource>(
    abilities: &Abilities<'_>,
    object: Option<Arc<T>>,
) -> Resolution<Arc<T>> {
    match object {
        Some(object) if abilities.can_read(object.as_ref()) => Resolution::Visible(object),
        _ => Resolution::Absent,
    }
}

/// Relationship field exposing an object already embedded in the parent,
/// behind a capability check on the target.
pub struct GatedRelation<S, T> {
    category: ResourceCategory,
    authorizer: Arc<dyn Authorizer>,
    related: fn(&S) -> Option<&T>,
}

impl<S, T> GatedRelation<S, T> {
    /// Creates the relation. `related` locates the target inside the parent;
    /// `category` is the ability scope of the target.
    pub fn new(
        authorizer: Arc<dyn Authorizer>,
        category: ResourceCategory,
        related: fn(&S) -> Option<&T>,
    ) -> Self {
        Self {
            category,
            authorizer,
            related,
        }
    }
}

#[async_trait]
impl<S, T> FieldResolver for GatedRelation<S, T>
where
    S: NodeSource,
    T: NodeSource + Resource + Clone,
{
    async fn resolve(
        &self,
        source: &Node,
        ctx: &RequestContext,
    ) -> Result<FieldValue, ResolveError> {
        let parent = source_as::<S>(source)?;
        let abilities = Abilities::new(self.authorizer.as_ref(), ctx, self.category);
        let target = (self.related)(parent).map(|t| Arc::new(t.clone()));
        Ok(match reveal(&abilities, target) {
            Resolution::Visible(target) => FieldValue::Node(T::into_node(target)),
            Resolution::Absent => FieldValue::Null,
        })
    }
}
