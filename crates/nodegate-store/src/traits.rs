use async_trait::async_trait;
use nodegate_canonical::Namespace;
use nodegate_core::{CheckConfig, Entity, Event, EventComponents, RequestContext};
use std::sync::Arc;

use crate::error::StoreError;
use crate::filter::key_filter;
use crate::view::find_first;

/// Event lookups.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events raised by one entity, oldest first.
    async fn get_events_by_entity(
        &self,
        ctx: &RequestContext,
        namespace: &Namespace,
        entity: &str,
    ) -> Result<Vec<Arc<Event>>, StoreError>;

    /// The check event named by `key`, if stored.
    ///
    /// The default loads every event of the entity and filters in memory,
    /// which is linear in events per entity. Stores with a point index on
    /// (entity, check, timestamp) should override it.
    async fn find_check_event(
        &self,
        ctx: &RequestContext,
        key: &EventComponents,
    ) -> Result<Option<Arc<Event>>, StoreError> {
        let events = self
            .get_events_by_entity(ctx, &key.namespace, &key.entity)
            .await?;
        Ok(find_first(events, &key_filter(key)))
    }
}

/// Entity lookups.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Entity by name.
    async fn get_entity_by_name(
        &self,
        ctx: &RequestContext,
        namespace: &Namespace,
        name: &str,
    ) -> Result<Option<Arc<Entity>>, StoreError>;
}

/// Check configuration lookups.
#[async_trait]
pub trait CheckConfigStore: Send + Sync {
    /// Check configuration by name.
    async fn get_check_config_by_name(
        &self,
        ctx: &RequestContext,
        namespace: &Namespace,
        name: &str,
    ) -> Result<Option<Arc<CheckConfig>>, StoreError>;
}

/// Full store collaborator required by the resolvers.
pub trait Store: EventStore + EntityStore + CheckConfigStore {}

impl<T: EventStore + EntityStore + CheckConfigStore> Store for T {}
