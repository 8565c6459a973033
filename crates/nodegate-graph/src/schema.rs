//! Object type descriptors and the assembled schema.
//!
//! A [`Schema`] is built once from the registered kinds. Building it also
//! builds the node registry, so a process that started successfully has a
//! collision-free tag space and no duplicate type names.

use async_trait::async_trait;
use nodegate_core::RequestContext;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::backend::Backend;
use crate::dispatcher::{DispatcherConfig, NodeDispatcher};
use crate::errors::{RegistryError, ResolveError};
use crate::gate::source_as;
use crate::kinds::{self, KindRegistration};
use crate::node::{Node, NodeSource};
use crate::registry::NodeRegistry;
use crate::resolution::Resolution;
use crate::value::FieldValue;

/// Resolves one field of an object.
#[async_trait]
pub trait FieldResolver: Send + Sync {
    /// Produces the field's value for `source`.
    async fn resolve(
        &self,
        source: &Node,
        ctx: &RequestContext,
    ) -> Result<FieldValue, ResolveError>;
}

/// Field read directly from the source object.
pub struct Property<S> {
    read: fn(&S) -> Result<FieldValue, ResolveError>,
}

impl<S> Property<S> {
    /// Wraps an accessor of the source object.
    pub fn new(read: fn(&S) -> Result<FieldValue, ResolveError>) -> Self {
        Self { read }
    }
}

#[async_trait]
impl<S: NodeSource> FieldResolver for Property<S> {
    async fn resolve(
        &self,
        source: &Node,
        _ctx: &RequestContext,
    ) -> Result<FieldValue, ResolveError> {
        (self.read)(source_as::<S>(source)?)
    }
}

/// Named field with its resolver.
#[derive(Clone)]
pub struct FieldDef {
    /// Field name as exposed to clients.
    pub name: &'static str,
    /// Human readable description.
    pub description: &'static str,
    /// Resolver producing the value.
    pub resolver: Arc<dyn FieldResolver>,
}

/// Object type: a name, the interfaces it implements and its fields.
pub struct ObjectType {
    name: &'static str,
    description: &'static str,
    interfaces: Vec<&'static str>,
    fields: Vec<FieldDef>,
    is_type_of: fn(&Node) -> bool,
}

impl ObjectType {
    /// Creates a type with no fields. `is_type_of` decides whether a node
    /// is presented as this type.
    pub fn new(
        name: &'static str,
        description: &'static str,
        is_type_of: fn(&Node) -> bool,
    ) -> Self {
        Self {
            name,
            description,
            interfaces: Vec::new(),
            fields: Vec::new(),
            is_type_of,
        }
    }

    /// Declares an implemented interface.
    pub fn implements(mut self, interface: &'static str) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Appends a field.
    pub fn field<R: FieldResolver + 'static>(
        mut self,
        name: &'static str,
        description: &'static str,
        resolver: R,
    ) -> Self {
        self.fields.push(FieldDef {
            name,
            description,
            resolver: Arc::new(resolver),
        });
        self
    }

    /// Type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type description.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Implemented interfaces.
    pub fn interfaces(&self) -> &[&'static str] {
        &self.interfaces
    }

    /// Field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Whether `node` is presented as this type.
    pub fn is_type_of(&self, node: &Node) -> bool {
        (self.is_type_of)(node)
    }
}

/// Every field of an object, resolved for one caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedObject {
    /// Object type the node was presented as.
    #[serde(rename = "__typename")]
    pub type_name: &'static str,
    /// Field values keyed by field name.
    #[serde(flatten)]
    pub fields: BTreeMap<&'static str, FieldValue>,
}

/// Object types plus the node dispatcher.
pub struct Schema {
    types: BTreeMap<&'static str, ObjectType>,
    dispatcher: NodeDispatcher,
}

impl Schema {
    /// Builds the schema for every built-in kind.
    ///
    /// # Errors
    ///
    /// Fails on a tag collision or a duplicate type name.
    pub fn build(backend: Backend, config: DispatcherConfig) -> Result<Self, RegistryError> {
        Self::assemble(kinds::all(&backend), config)
    }

    /// Builds a schema from explicit registrations.
    pub fn assemble(
        registrations: Vec<KindRegistration>,
        config: DispatcherConfig,
    ) -> Result<Self, RegistryError> {
        let mut registry = NodeRegistry::builder();
        let mut types = BTreeMap::new();
        for KindRegistration { resolver, object } in registrations {
            registry.register_arc(resolver)?;
            let name = object.name();
            if types.insert(name, object).is_some() {
                return Err(RegistryError::DuplicateType(name));
            }
        }
        let dispatcher = NodeDispatcher::new(Arc::new(registry.build()), config);
        Ok(Self { types, dispatcher })
    }

    /// Node dispatcher.
    pub fn dispatcher(&self) -> &NodeDispatcher {
        &self.dispatcher
    }

    /// Object type by name.
    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.types.get(name)
    }

    /// All object types, by name.
    pub fn object_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.values()
    }

    /// Type `node` is presented as, if any.
    pub fn type_of(&self, node: &Node) -> Option<&ObjectType> {
        self.types.values().find(|t| t.is_type_of(node))
    }

    /// Fetches any object by its global ID.
    pub async fn fetch(
        &self,
        token: &str,
        ctx: &RequestContext,
    ) -> Result<Resolution<Node>, ResolveError> {
        self.dispatcher.fetch_by_global_id(ctx, token).await
    }

    /// Resolves one field of `node` as `type_name`.
    pub async fn resolve_field(
        &self,
        type_name: &str,
        field: &str,
        node: &Node,
        ctx: &RequestContext,
    ) -> Result<FieldValue, ResolveError> {
        let object = self
            .object_type(type_name)
            .ok_or_else(|| ResolveError::UnknownType(type_name.to_string()))?;
        let def = object
            .get_field(field)
            .ok_or_else(|| ResolveError::UnknownField {
                type_name: object.name(),
                field: field.to_string(),
            })?;
        def.resolver.resolve(node, ctx).await
    }

    /// Resolves every field of `node` under the type it is presented as.
    pub async fn resolve_object(
        &self,
        node: &Node,
        ctx: &RequestContext,
    ) -> Result<ResolvedObject, ResolveError> {
        let object = self
            .type_of(node)
            .ok_or_else(|| ResolveError::UnknownType(node.kind_name().to_string()))?;
        let mut fields = BTreeMap::new();
        for def in &object.fields {
            if let Some(interruption) = ctx.interruption() {
                return Err(interruption.into());
            }
            fields.insert(def.name, def.resolver.resolve(node, ctx).await?);
        }
        Ok(ResolvedObject {
            type_name: object.name(),
            fields,
        })
    }
}
