use async_trait::async_trait;
use nodegate_canonical::{GlobalId, IdComponents};
use nodegate_core::{CheckConfig, CheckConfigComponents, RequestContext, ResourceCategory};
use std::sync::Arc;

use crate::backend::Backend;
use crate::errors::ResolveError;
use crate::gate::reveal;
use crate::kinds::{KindRegistration, NODE_INTERFACE};
use crate::node::Node;
use crate::registry::NodeResolver;
use crate::resolution::Resolution;
use crate::schema::{ObjectType, Property};
use crate::value::FieldValue;

/// Object type name.
pub const TYPE_NAME: &str = "CheckConfig";

const TAGS: &[&str] = &[CheckConfigComponents::TAG];

/// Fetches check configurations by name.
pub struct CheckConfigResolver {
    backend: Backend,
}

impl CheckConfigResolver {
    /// Creates the resolver.
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl NodeResolver for CheckConfigResolver {
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
        let key = CheckConfigComponents::from_global_id(id)?;
        let config = self
            .backend
            .store
            .get_check_config_by_name(ctx, &key.namespace, &key.name)
            .await?;
        let abilities = self.backend.abilities(ctx, ResourceCategory::Checks);
        Ok(reveal(&abilities, config).map(Node::CheckConfig))
    }
}

/// Field layout of `CheckConfig`.
pub fn object_type() -> ObjectType {
    ObjectType::new(TYPE_NAME, "Configuration of a scheduled check.", |node| {
        node.downcast::<CheckConfig>().is_some()
    })
    .implements(NODE_INTERFACE)
    .field(
        "id",
        "Opaque global ID of the check configuration.",
        Property::new(|config: &CheckConfig| {
            Ok(FieldValue::Id(
                CheckConfigComponents::for_config(config).to_global_id().encode(),
            ))
        }),
    )
    .field(
        "name",
        "Name of the check.",
        Property::new(|config: &CheckConfig| Ok(FieldValue::from(config.metadata.name.as_str()))),
    )
    .field(
        "namespace",
        "Namespace the check belongs to.",
        Property::new(|config: &CheckConfig| {
            Ok(FieldValue::from(config.metadata.namespace.as_str()))
        }),
    )
    .field(
        "command",
        "Command line agents execute.",
        Property::new(|config: &CheckConfig| Ok(FieldValue::from(config.command.as_str()))),
    )
    .field(
        "interval",
        "Scheduling interval in seconds.",
        Property::new(|config: &CheckConfig| Ok(FieldValue::from(config.interval))),
    )
    .field(
        "subscriptions",
        "Subscriptions the check is published to.",
        Property::new(|config: &CheckConfig| Ok(FieldValue::from(config.subscriptions.as_slice()))),
    )
    .field(
        "publish",
        "Whether the check is scheduled.",
        Property::new(|config: &CheckConfig| Ok(FieldValue::from(config.publish))),
    )
}

/// Resolver and object type for check configurations.
pub fn registration(backend: &Backend) -> KindRegistration {
    KindRegistration {
        resolver: Arc::new(CheckConfigResolver::new(backend.clone())),
        object: object_type(),
    }
}
