//! Fields served from an attribute of a nested substructure.
//!
//! Accessors are plain functions chosen when the schema is built, so each
//! alias is checked by the compiler rather than looked up by name at run
//! time. Aliases perform no capability check of their own; the parent was
//! already authorized when it was fetched.

use async_trait::async_trait;
use nodegate_core::RequestContext;

use crate::errors::ResolveError;
use crate::gate::source_as;
use crate::node::{Node, NodeSource};
use crate::schema::FieldResolver;
use crate::value::FieldValue;

/// Whether the substructure must be present on a well-formed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absence means the store handed back an inconsistent object.
    Required,
    /// Absence yields a null field.
    Optional,
}

/// Reads `attribute` from the `substructure` of a source object.
pub struct AliasResolver<S, Sub> {
    type_name: &'static str,
    substructure: &'static str,
    attribute: &'static str,
    presence: Presence,
    locate: fn(&S) -> Option<&Sub>,
    read: fn(&Sub) -> FieldValue,
}

impl<S, Sub> AliasResolver<S, Sub> {
    /// Alias over a substructure every valid `type_name` source carries.
    pub fn required(
        type_name: &'static str,
        substructure: &'static str,
        attribute: &'static str,
        locate: fn(&S) -> Option<&Sub>,
        read: fn(&Sub) -> FieldValue,
    ) -> Self {
        Self {
            type_name,
            substructure,
            attribute,
            presence: Presence::Required,
            locate,
            read,
        }
    }

    /// Alias over a substructure that may legitimately be missing.
    pub fn optional(
        type_name: &'static str,
        substructure: &'static str,
        attribute: &'static str,
        locate: fn(&S) -> Option<&Sub>,
        read: fn(&Sub) -> FieldValue,
    ) -> Self {
        Self {
            presence: Presence::Optional,
            ..Self::required(type_name, substructure, attribute, locate, read)
        }
    }

    /// Substructure and attribute names, e.g. `("check", "output")`.
    pub fn path(&self) -> (&'static str, &'static str) {
        (self.substructure, self.attribute)
    }

    /// Presence rule for the substructure.
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Resolves against an already-typed source.
    pub fn resolve_source(&self, source: &S) -> Result<FieldValue, ResolveError> {
        match ((self.locate)(source), self.presence) {
            (Some(sub), _) => Ok((self.read)(sub)),
            (None, Presence::Optional) => Ok(FieldValue::Null),
            (None, Presence::Required) => Err(ResolveError::MissingSubstructure {
                type_name: self.type_name,
                substructure: self.substructure,
            }),
        }
    }
}

#[async_trait]
impl<S, Sub> FieldResolver for AliasResolver<S, Sub>
where
    S: NodeSource,
    Sub: 'static,
{
    async fn resolve(
        &self,
        source: &Node,
        _ctx: &RequestContext,
    ) -> Result<FieldValue, ResolveError> {
        self.resolve_source(source_as::<S>(source)?)
    }
}
