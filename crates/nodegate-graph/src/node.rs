use nodegate_core::{CheckConfig, Entity, Event};
use serde::Serialize;
use std::sync::Arc;

/// A domain object fetched by global ID or reached through a relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// An event; exposed as `CheckEvent` when it carries a check result.
    Event(Arc<Event>),
    /// An entity.
    Entity(Arc<Entity>),
    /// A check configuration.
    CheckConfig(Arc<CheckConfig>),
}

impl Node {
    /// Domain kind name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Event(_) => Event::KIND,
            Node::Entity(_) => Entity::KIND,
            Node::CheckConfig(_) => CheckConfig::KIND,
        }
    }

    /// Downcasts to a concrete domain object.
    pub fn downcast<S: NodeSource>(&self) -> Option<&S> {
        S::from_node(self).map(Arc::as_ref)
    }
}

/// Domain object types that can be carried by a [`Node`].
pub trait NodeSource: Send + Sync + 'static {
    /// Domain kind name.
    const KIND: &'static str;

    /// Borrows the object if `node` carries this kind.
    fn from_node(node: &Node) -> Option<&Arc<Self>>;

    /// Wraps the object in a node.
    fn into_node(object: Arc<Self>) -> Node;
}

impl NodeSource for Event {
    const KIND: &'static str = "Event";

    fn from_node(node: &Node) -> Option<&Arc<Self>> {
        match node {
            Node::Event(event) => Some(event),
            _ => None,
        }
    }

    fn into_node(object: Arc<Self>) -> Node {
        Node::Event(object)
    }
}

impl NodeSource for Entity {
    const KIND: &'static str = "Entity";

    fn from_node(node: &Node) -> Option<&Arc<Self>> {
        match node {
            Node::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    fn into_node(object: Arc<Self>) -> Node {
        Node::Entity(object)
    }
}

impl NodeSource for CheckConfig {
    const KIND: &'static str = "CheckConfig";

    fn from_node(node: &Node) -> Option<&Arc<Self>> {
        match node {
            Node::CheckConfig(config) => Some(config),
            _ => None,
        }
    }

    fn into_node(object: Arc<Self>) -> Node {
        Node::CheckConfig(object)
    }
}
