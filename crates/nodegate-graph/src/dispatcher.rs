use nodegate_canonical::{decode_bounded, DEFAULT_MAX_ID_LEN};
use nodegate_core::RequestContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::errors::ResolveError;
use crate::node::Node;
use crate::registry::NodeRegistry;
use crate::resolution::Resolution;

/// Dispatcher limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Longest token accepted before decoding.
    pub max_id_len: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_id_len: DEFAULT_MAX_ID_LEN,
        }
    }
}

/// Entry point for "fetch any object by global ID".
#[derive(Clone)]
pub struct NodeDispatcher {
    registry: Arc<NodeRegistry>,
    config: DispatcherConfig,
}

impl NodeDispatcher {
    /// Creates a dispatcher over a built registry.
    pub fn new(registry: Arc<NodeRegistry>, config: DispatcherConfig) -> Self {
        Self { registry, config }
    }

    /// Registry consulted for dispatch.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Active limits.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Decodes `token` and hands it to the resolver owning its tag.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidId`] for malformed or oversized tokens
    /// - [`ResolveError::NoMatchingResolver`] for tags nobody registered
    /// - [`ResolveError::Interrupted`] once the request is abandoned
    /// - whatever the selected resolver fails with
    pub async fn fetch_by_global_id(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<Resolution<Node>, ResolveError> {
        let id = decode_bounded(token, self.config.max_id_len)?;
        if let Some(interruption) = ctx.interruption() {
            return Err(interruption.into());
        }
        debug!(
            tag = %id.tag(),
            namespace = %id.namespace(),
            user = %ctx.subject().username,
            "dispatching node fetch"
        );
        self.registry.resolve(ctx, &id).await
    }
}
