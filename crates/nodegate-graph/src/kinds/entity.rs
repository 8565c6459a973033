use async_trait::async_trait;
use nodegate_canonical::{GlobalId, IdComponents};
use nodegate_core::{Entity, EntityComponents, RequestContext, ResourceCategory};
use nodegate_store::check_events;
use std::sync::Arc;

use crate::backend::Backend;
use crate::errors::ResolveError;
use crate::gate::{reveal, source_as};
use crate::kinds::{KindRegistration, NODE_INTERFACE};
use crate::node::Node;
use crate::registry::NodeResolver;
use crate::resolution::Resolution;
use crate::schema::{FieldResolver, ObjectType, Property};
use crate::value::FieldValue;

/// Object type name.
pub const TYPE_NAME: &str = "Entity";

const TAGS: &[&str] = &[EntityComponents::TAG];

/// Fetches entities by name.
pub struct EntityResolver {
    backend: Backend,
}

impl EntityResolver {
    /// Creates the resolver.
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl NodeResolver for EntityResolver {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn tags(&self) -> &[&'static str] {
        TAGS
    }

    async fn resolve(
        &self,
        ctx: &RequestContext,
        id: &GlobalId,
    ) -> Result<Resolution<Node>, ResolveError> {
        let key = EntityComponents::from_global_id(id)?;
        let entity = self
            .backend
            .store
            .get_entity_by_name(ctx, &key.namespace, &key.name)
            .await?;
        let abilities = self.backend.abilities(ctx, ResourceCategory::Entities);
        Ok(reveal(&abilities, entity).map(Node::Entity))
    }
}

/// Check events raised by the entity, oldest first, limited to those the
/// caller may read.
pub struct EntityEvents {
    backend: Backend,
}

#[async_trait]
impl FieldResolver for EntityEvents {
    async fn resolve(
        &self,
        source: &Node,
        ctx: &RequestContext,
    ) -> Result<FieldValue, ResolveError> {
        let entity = source_as::<Entity>(source)?;
        let events = self
            .backend
            .store
            .get_events_by_entity(ctx, &entity.metadata.namespace, &entity.metadata.name)
            .await?;
        let abilities = self.backend.abilities(ctx, ResourceCategory::Events);
        let visible = check_events(events)
            .into_iter()
            .filter(|event| abilities.can_read(event.as_ref()))
            .map(|event| FieldValue::Node(Node::Event(event)))
            .collect();
        Ok(FieldValue::List(visible))
    }
}

/// Field layout of `Entity`.
pub fn object_type(backend: &Backend) -> ObjectType {
    ObjectType::new(TYPE_NAME, "A monitored agent, proxy or backend.", |node| {
        node.downcast::<Entity>().is_some()
    })
    .implements(NODE_INTERFACE)
    .field(
        "id",
        "Opaque global ID of the entity.",
        Property::new(|entity: &Entity| {
            Ok(FieldValue::Id(
                EntityComponents::for_entity(entity).to_global_id().encode(),
            ))
        }),
    )
    .field(
        "name",
        "Unique name of the entity within its namespace.",
        Property::new(|entity: &Entity| Ok(FieldValue::from(entity.metadata.name.as_str()))),
    )
    .field(
        "namespace",
        "Namespace the entity belongs to.",
        Property::new(|entity: &Entity| Ok(FieldValue::from(entity.metadata.namespace.as_str()))),
    )
    .field(
        "entityClass",
        "Class of the entity, e.g. agent or proxy.",
        Property::new(|entity: &Entity| Ok(FieldValue::from(entity.entity_class.as_str()))),
    )
    .field(
        "subscriptions",
        "Subscriptions the entity listens on.",
        Property::new(|entity: &Entity| Ok(FieldValue::from(entity.subscriptions.as_slice()))),
    )
    .field(
        "lastSeen",
        "Time the entity last checked in.",
        Property::new(|entity: &Entity| Ok(FieldValue::Timestamp(entity.last_seen))),
    )
    .field(
        "events",
        "Check events raised by the entity that the caller may read.",
        EntityEvents {
            backend: backend.clone(),
        },
    )
}

/// Resolver and object type for entities.
pub fn registration(backend: &Backend) -> KindRegistration {
    KindRegistration {
        resolver: Arc::new(EntityResolver::new(backend.clone())),
        object: object_type(backend),
    }
}
