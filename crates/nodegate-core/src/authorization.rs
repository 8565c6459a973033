//! Read authorization for domain objects.
//!
//! An [`Authorizer`] answers "may this caller read this object" for one
//! resource category at a time. [`Abilities`] binds an authorizer to a
//! request and a category so resolvers can ask about specific instances.
//! Denial is a plain `false`; it is never an error.

use nodegate_canonical::Namespace;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::RequestContext;
use crate::events::{CheckConfig, Entity, Event};

/// Category of resource a capability applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    /// Events (check results and metrics).
    Events,
    /// Entities.
    Entities,
    /// Check configurations.
    Checks,
}

impl ResourceCategory {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Events => "events",
            ResourceCategory::Entities => "entities",
            ResourceCategory::Checks => "checks",
        }
    }
}

/// Anything an authorizer can be asked about.
pub trait Resource {
    /// Namespace of the instance.
    fn namespace(&self) -> &Namespace;
    /// Name used when matching rules restricted to specific resource names.
    fn resource_name(&self) -> &str;
}

impl Resource for Event {
    fn namespace(&self) -> &Namespace {
        Event::namespace(self)
    }

    /// Events are named after the entity that raised them.
    fn resource_name(&self) -> &str {
        self.entity_name()
    }
}

impl Resource for Entity {
    fn namespace(&self) -> &Namespace {
        &self.metadata.namespace
    }

    fn resource_name(&self) -> &str {
        &self.metadata.name
    }
}

impl Resource for CheckConfig {
    fn namespace(&self) -> &Namespace {
        &self.metadata.namespace
    }

    fn resource_name(&self) -> &str {
        &self.metadata.name
    }
}

/// Authorization collaborator.
pub trait Authorizer: Send + Sync {
    /// Whether the caller in `ctx` may read the named instance of `category`.
    fn can_read(
        &self,
        ctx: &RequestContext,
        category: ResourceCategory,
        namespace: &Namespace,
        name: &str,
    ) -> bool;
}

/// Capability checker scoped to one request and one resource category.
#[derive(Clone, Copy)]
pub struct Abilities<'a> {
    authorizer: &'a dyn Authorizer,
    ctx: &'a RequestContext,
    category: ResourceCategory,
}

impl<'a> Abilities<'a> {
    /// Scopes `authorizer` to `ctx` and `category`.
    pub fn new(
        authorizer: &'a dyn Authorizer,
        ctx: &'a RequestContext,
        category: ResourceCategory,
    ) -> Self {
        Self {
            authorizer,
            ctx,
            category,
        }
    }

    /// Event read abilities.
    pub fn events(authorizer: &'a dyn Authorizer, ctx: &'a RequestContext) -> Self {
        Self::new(authorizer, ctx, ResourceCategory::Events)
    }

    /// Entity read abilities.
    pub fn entities(authorizer: &'a dyn Authorizer, ctx: &'a RequestContext) -> Self {
        Self::new(authorizer, ctx, ResourceCategory::Entities)
    }

    /// Check configuration read abilities.
    pub fn checks(authorizer: &'a dyn Authorizer, ctx: &'a RequestContext) -> Self {
        Self::new(authorizer, ctx, ResourceCategory::Checks)
    }

    /// Category these abilities are scoped to.
    pub fn category(&self) -> ResourceCategory {
        self.category
    }

    /// Whether the caller may read this specific instance.
    pub fn can_read<R: Resource + ?Sized>(&self, resource: &R) -> bool {
        let allowed = self.authorizer.can_read(
            self.ctx,
            self.category,
            resource.namespace(),
            resource.resource_name(),
        );
        if !allowed {
            debug!(
                user = %self.ctx.subject().username,
                category = self.category.as_str(),
                namespace = %resource.namespace(),
                "read denied"
            );
        }
        allowed
    }
}

/// Verb granted by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verb {
    /// Read access.
    #[serde(rename = "read")]
    Read,
    /// Every verb.
    #[serde(rename = "*")]
    All,
}

/// Grants verbs on resource categories, optionally narrowed to namespaces
/// and resource names. Empty narrowing lists match everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Granted verbs.
    pub verbs: Vec<Verb>,
    /// Categories the rule applies to.
    pub resources: Vec<ResourceCategory>,
    /// Namespaces the rule applies to; empty means all.
    #[serde(default)]
    pub namespaces: Vec<String>,
    /// Resource names the rule applies to; empty means all.
    #[serde(default)]
    pub resource_names: Vec<String>,
}

impl Rule {
    /// Rule granting read on `resources` everywhere.
    pub fn read(resources: impl IntoIterator<Item = ResourceCategory>) -> Self {
        Self {
            verbs: vec![Verb::Read],
            resources: resources.into_iter().collect(),
            namespaces: Vec::new(),
            resource_names: Vec::new(),
        }
    }

    /// Narrows the rule to one namespace.
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    /// Narrows the rule to one resource name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.resource_names.push(name.into());
        self
    }

    fn allows_read(&self, category: ResourceCategory, namespace: &Namespace, name: &str) -> bool {
        self.verbs.iter().any(|v| matches!(v, Verb::Read | Verb::All))
            && self.resources.contains(&category)
            && (self.namespaces.is_empty()
                || self.namespaces.iter().any(|ns| ns == namespace.as_str()))
            && (self.resource_names.is_empty() || self.resource_names.iter().any(|n| n == name))
    }
}

/// Who a role binding applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum BindingSubject {
    /// A single user.
    User(String),
    /// Every member of a group.
    Group(String),
}

/// Binds rules to users and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    /// Binding name, for diagnostics.
    pub name: String,
    /// Users and groups the binding applies to.
    pub subjects: Vec<BindingSubject>,
    /// Rules granted.
    pub rules: Vec<Rule>,
}

impl RoleBinding {
    fn applies_to(&self, ctx: &RequestContext) -> bool {
        let subject = ctx.subject();
        self.subjects.iter().any(|s| match s {
            BindingSubject::User(user) => *user == subject.username,
            BindingSubject::Group(group) => subject.groups.iter().any(|g| g == group),
        })
    }
}

/// Reference authorizer evaluating role bindings. Denies unless some
/// binding for the caller has a matching rule.
#[derive(Debug, Clone, Default)]
pub struct RuleAuthorizer {
    bindings: Vec<RoleBinding>,
}

impl RuleAuthorizer {
    /// Creates an authorizer from role bindings.
    pub fn new(bindings: Vec<RoleBinding>) -> Self {
        Self { bindings }
    }

    /// Installed bindings.
    pub fn bindings(&self) -> &[RoleBinding] {
        &self.bindings
    }
}

impl Authorizer for RuleAuthorizer {
    fn can_read(
        &self,
        ctx: &RequestContext,
        category: ResourceCategory,
        namespace: &Namespace,
        name: &str,
    ) -> bool {
        self.bindings
            .iter()
            .filter(|b| b.applies_to(ctx))
            .flat_map(|b| b.rules.iter())
            .any(|r| r.allows_read(category, namespace, name))
    }
}
