//! In-memory reference store.
//!
//! Holds `Arc` snapshots keyed by namespace and name. Check events are also
//! indexed by their full natural key, so [`EventStore::find_check_event`] is
//! a point lookup here rather than the default scan.

use async_trait::async_trait;
use nodegate_canonical::Namespace;
use nodegate_core::{CheckConfig, Entity, Event, EventComponents, RequestContext};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::error::StoreError;
use crate::traits::{CheckConfigStore, EntityStore, EventStore};

type NameKey = (Namespace, String);

/// Serialized store contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    /// Entities.
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Check configurations.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
    /// Events.
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Default)]
struct Inner {
    entities: BTreeMap<NameKey, Arc<Entity>>,
    checks: BTreeMap<NameKey, Arc<CheckConfig>>,
    events: BTreeMap<NameKey, Vec<Arc<Event>>>,
    check_events: HashMap<EventComponents, Arc<Event>>,
}

/// Store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the fixture contents.
    pub fn from_fixture(fixture: Fixture) -> Self {
        let store = Self::new();
        for entity in fixture.entities {
            store.insert_entity(entity);
        }
        for check in fixture.checks {
            store.insert_check_config(check);
        }
        for event in fixture.events {
            store.insert_event(event);
        }
        store
    }

    /// Loads a JSON fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        let fixture: Fixture = serde_json::from_str(&raw)?;
        Ok(Self::from_fixture(fixture))
    }

    /// Inserts or replaces an entity.
    pub fn insert_entity(&self, entity: Entity) {
        let key = (entity.metadata.namespace.clone(), entity.metadata.name.clone());
        self.write().entities.insert(key, Arc::new(entity));
    }

    /// Inserts or replaces a check configuration.
    pub fn insert_check_config(&self, check: CheckConfig) {
        let key = (check.metadata.namespace.clone(), check.metadata.name.clone());
        self.write().checks.insert(key, Arc::new(check));
    }

    /// Inserts an event. A check event with the same natural key replaces
    /// the stored one.
    pub fn insert_event(&self, event: Event) {
        let event = Arc::new(event);
        let key = (event.namespace().clone(), event.entity_name().to_string());
        let check_key = EventComponents::for_event(&event).ok();

        let mut inner = self.write();
        let history = inner.events.entry(key).or_default();
        if let Some(check_key) = &check_key {
            history.retain(|existing| !check_key.matches(existing));
        }
        let at = history.partition_point(|existing| existing.timestamp <= event.timestamp);
        history.insert(at, Arc::clone(&event));

        if let Some(check_key) = check_key {
            inner.check_events.insert(check_key, event);
        }
    }

    /// Number of stored events.
    pub fn event_count(&self) -> usize {
        self.read().events.values().map(Vec::len).sum()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_live(ctx: &RequestContext) -> Result<(), StoreError> {
    match ctx.interruption() {
        Some(interruption) => {
            debug!(?interruption, "store lookup abandoned");
            Err(interruption.into())
        }
        None => Ok(()),
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn get_events_by_entity(
        &self,
        ctx: &RequestContext,
        namespace: &Namespace,
        entity: &str,
    ) -> Result<Vec<Arc<Event>>, StoreError> {
        ensure_live(ctx)?;
        let key = (namespace.clone(), entity.to_string());
        Ok(self.read().events.get(&key).cloned().unwrap_or_default())
    }

    async fn find_check_event(
        &self,
        ctx: &RequestContext,
        key: &EventComponents,
    ) -> Result<Option<Arc<Event>>, StoreError> {
        ensure_live(ctx)?;
        Ok(self.read().check_events.get(key).cloned())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_entity_by_name(
        &self,
        ctx: &RequestContext,
        namespace: &Namespace,
        name: &str,
    ) -> Result<Option<Arc<Entity>>, StoreError> {
        ensure_live(ctx)?;
        let key = (namespace.clone(), name.to_string());
        Ok(self.read().entities.get(&key).cloned())
    }
}

#[async_trait]
impl CheckConfigStore for MemoryStore {
    async fn get_check_config_by_name(
        &self,
        ctx: &RequestContext,
        namespace: &Namespace,
        name: &str,
    ) -> Result<Option<Arc<CheckConfig>>, StoreError> {
        ensure_live(ctx)?;
        let key = (namespace.clone(), name.to_string());
        Ok(self.read().checks.get(&key).cloned())
    }
}
