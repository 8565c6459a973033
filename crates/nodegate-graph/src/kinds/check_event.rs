use async_trait::async_trait;
use nodegate_canonical::{GlobalId, IdComponents};
use nodegate_core::{
    Check, CheckConfig, Entity, Event, EventComponents, Metrics, RequestContext, ResourceCategory,
};
use std::sync::Arc;
use tracing::debug;

use crate::alias::AliasResolver;
use crate::backend::Backend;
use crate::errors::ResolveError;
use crate::gate::{reveal, GatedRelation};
use crate::kinds::{KindRegistration, NODE_INTERFACE};
use crate::node::Node;
use crate::registry::NodeResolver;
use crate::resolution::Resolution;
use crate::schema::{ObjectType, Property};
use crate::value::FieldValue;

/// Object type name.
pub const TYPE_NAME: &str = "CheckEvent";

const TAGS: &[&str] = &[EventComponents::TAG];

/// Fetches check events by (entity, check, timestamp).
pub struct CheckEventResolver {
    backend: Backend,
}

impl CheckEventResolver {
    /// Creates the resolver.
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl NodeResolver for CheckEventResolver {
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
        let key = EventComponents::from_global_id(id)?;
        let event = self.backend.store.find_check_event(ctx, &key).await?;
        if event.is_none() {
            debug!(
                entity = %key.entity,
                check = %key.check,
                timestamp = key.timestamp,
                "check event not found"
            );
        }
        let abilities = self.backend.abilities(ctx, ResourceCategory::Events);
        Ok(reveal(&abilities, event).map(Node::Event))
    }
}

/// A node is a check event only when it carries a check result.
pub fn is_check_event(node: &Node) -> bool {
    node.downcast::<Event>().is_some_and(Event::is_check_event)
}

fn check_of(event: &Event) -> Option<&Check> {
    event.check.as_ref()
}

fn metrics_of(event: &Event) -> Option<&Metrics> {
    event.metrics.as_ref()
}

fn entity_of(event: &Event) -> Option<&Entity> {
    Some(&event.entity)
}

fn config_of(event: &Event) -> Option<&CheckConfig> {
    event.check.as_ref().map(|check| &check.config)
}

fn check_alias(
    attribute: &'static str,
    read: fn(&Check) -> FieldValue,
) -> AliasResolver<Event, Check> {
    AliasResolver::required(TYPE_NAME, "check", attribute, check_of, read)
}

/// Field layout of `CheckEvent`.
pub fn object_type(backend: &Backend) -> ObjectType {
    ObjectType::new(TYPE_NAME, "An event that carries a check result.", is_check_event)
        .implements(NODE_INTERFACE)
        .field(
            "id",
            "Opaque global ID of the event.",
            Property::new(|event: &Event| {
                EventComponents::for_event(event)
                    .map(|key| FieldValue::Id(key.to_global_id().encode()))
                    .map_err(|_| ResolveError::MissingSubstructure {
                        type_name: TYPE_NAME,
                        substructure: "check",
                    })
            }),
        )
        .field(
            "timestamp",
            "Time the event occurred.",
            Property::new(|event: &Event| Ok(FieldValue::Timestamp(event.timestamp))),
        )
        .field(
            "entity",
            "Entity the event occurred on; null when the caller may not read it.",
            GatedRelation::new(
                backend.authorizer.clone(),
                ResourceCategory::Entities,
                entity_of,
            ),
        )
        .field(
            "output",
            "Output of the check.",
            check_alias("output", |check| FieldValue::from(check.output.as_str())),
        )
        .field(
            "status",
            "Exit status of the check.",
            check_alias("status", |check| FieldValue::from(check.status)),
        )
        .field(
            "issued",
            "Time the check was scheduled.",
            check_alias("issued", |check| FieldValue::Timestamp(check.issued)),
        )
        .field(
            "executed",
            "Time the check was executed.",
            check_alias("executed", |check| FieldValue::Timestamp(check.executed)),
        )
        .field(
            "duration",
            "Execution time of the check in seconds.",
            check_alias("duration", |check| FieldValue::from(check.duration)),
        )
        .field(
            "config",
            "Configuration the check ran with; null when the caller may not read checks.",
            GatedRelation::new(backend.authorizer.clone(), ResourceCategory::Checks, config_of),
        )
        .field(
            "metricsHandlers",
            "Handlers the event's metrics are routed to, if it carries metrics.",
            AliasResolver::optional(
                TYPE_NAME,
                "metrics",
                "handlers",
                metrics_of,
                |metrics: &Metrics| FieldValue::from(metrics.handlers.as_slice()),
            ),
        )
}

/// Resolver and object type for check events.
pub fn registration(backend: &Backend) -> KindRegistration {
    KindRegistration {
        resolver: Arc::new(CheckEventResolver::new(backend.clone())),
        object: object_type(backend),
    }
}
