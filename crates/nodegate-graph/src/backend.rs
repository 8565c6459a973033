use nodegate_core::{Abilities, Authorizer, RequestContext, ResourceCategory};
use nodegate_store::Store;
use std::sync::Arc;

/// Collaborators every resolver needs: the store and the authorizer.
#[derive(Clone)]
pub struct Backend {
    /// Domain store.
    pub store: Arc<dyn Store>,
    /// Read authorizer.
    pub authorizer: Arc<dyn Authorizer>,
}

impl Backend {
    /// Bundles a store and an authorizer.
    pub fn new(store: Arc<dyn Store>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { store, authorizer }
    }

    /// Abilities for `category`, scoped to the caller in `ctx`.
    pub fn abilities<'a>(
        &'a self,
        ctx: &'a RequestContext,
        category: ResourceCategory,
    ) -> Abilities<'a> {
        Abilities::new(self.authorizer.as_ref(), ctx, category)
    }
}
