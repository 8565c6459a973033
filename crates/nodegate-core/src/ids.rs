//! Typed global ID components for each node kind.
//!
//! | Kind | Tag | Components |
//! |------|-----|------------|
//! | check event | `check` | entity, check, timestamp |
//! | entity | `entity` | name |
//! | check config | `check_config` | name |
//!
//! Tags are part of every issued token and must never change.

use nodegate_canonical::{parse_part, require_arity, DecodeError, IdComponents, Namespace};

use crate::errors::CoreError;
use crate::events::{CheckConfig, Entity, Event};

/// Natural key of a check event: owning entity, check name and result time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventComponents {
    /// Namespace of the owning entity.
    pub namespace: Namespace,
    /// Owning entity name.
    pub entity: String,
    /// Executed check name.
    pub check: String,
    /// Unix time of the result.
    pub timestamp: i64,
}

impl EventComponents {
    /// Builds the key for a check event.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingCheck`] when the event has no check result;
    /// only check events are addressable by this kind.
    pub fn for_event(event: &Event) -> Result<Self, CoreError> {
        let check = event
            .check_name()
            .ok_or_else(|| CoreError::MissingCheck {
                entity: event.entity_name().to_string(),
            })?;
        Ok(Self {
            namespace: event.namespace().clone(),
            entity: event.entity_name().to_string(),
            check: check.to_string(),
            timestamp: event.timestamp,
        })
    }

    /// Whether `event` is the one this key names.
    pub fn matches(&self, event: &Event) -> bool {
        event.timestamp == self.timestamp
            && event.check_name() == Some(self.check.as_str())
            && event.entity_name() == self.entity
            && event.namespace() == &self.namespace
    }
}

impl IdComponents for EventComponents {
    const TAG: &'static str = "check";

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn to_parts(&self) -> Vec<String> {
        vec![
            self.entity.clone(),
            self.check.clone(),
            self.timestamp.to_string(),
        ]
    }

    fn from_parts(namespace: Namespace, parts: &[String]) -> Result<Self, DecodeError> {
        require_arity(Self::TAG, parts, 3)?;
        Ok(Self {
            namespace,
            entity: parts[0].clone(),
            check: parts[1].clone(),
            timestamp: parse_part("timestamp", &parts[2])?,
        })
    }
}

/// Natural key of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityComponents {
    /// Entity namespace.
    pub namespace: Namespace,
    /// Entity name.
    pub name: String,
}

impl EntityComponents {
    /// Builds the key for an entity.
    pub fn for_entity(entity: &Entity) -> Self {
        Self {
            namespace: entity.metadata.namespace.clone(),
            name: entity.metadata.name.clone(),
        }
    }
}

impl IdComponents for EntityComponents {
    const TAG: &'static str = "entity";

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn to_parts(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn from_parts(namespace: Namespace, parts: &[String]) -> Result<Self, DecodeError> {
        require_arity(Self::TAG, parts, 1)?;
        Ok(Self {
            namespace,
            name: parts[0].clone(),
        })
    }
}

/// Natural key of a check configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckConfigComponents {
    /// Check namespace.
    pub namespace: Namespace,
    /// Check name.
    pub name: String,
}

impl CheckConfigComponents {
    /// Builds the key for a check configuration.
    pub fn for_config(config: &CheckConfig) -> Self {
        Self {
            namespace: config.metadata.namespace.clone(),
            name: config.metadata.name.clone(),
        }
    }
}

impl IdComponents for CheckConfigComponents {
    const TAG: &'static str = "check_config";

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn to_parts(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn from_parts(namespace: Namespace, parts: &[String]) -> Result<Self, DecodeError> {
        require_arity(Self::TAG, parts, 1)?;
        Ok(Self {
            namespace,
            name: parts[0].clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodegate_canonical::decode;

    #[test]
    fn event_components_round_trip() {
        let components = EventComponents {
            namespace: Namespace::default(),
            entity: "web-1".into(),
            check: "check-cpu".into(),
            timestamp: 1000,
        };
        let token = components.to_global_id().encode();
        let id = decode(token.as_str()).unwrap();
        assert_eq!(id.tag(), "check");
        assert_eq!(EventComponents::from_global_id(&id).unwrap(), components);
    }

    #[test]
    fn event_timestamp_must_be_integer() {
        let id = nodegate_canonical::GlobalId::new(
            EventComponents::resource_tag(),
            Namespace::default(),
            vec!["web-1".into(), "check-cpu".into(), "soon".into()],
        );
        assert!(matches!(
            EventComponents::from_global_id(&id),
            Err(DecodeError::InvalidComponent {
                field: "timestamp",
                ..
            })
        ));
    }

    #[test]
    fn entity_and_config_tags_do_not_collide() {
        let entity = EntityComponents {
            namespace: Namespace::default(),
            name: "web-1".into(),
        };
        let config = CheckConfigComponents {
            namespace: Namespace::default(),
            name: "web-1".into(),
        };
        assert_ne!(entity.to_global_id().encode(), config.to_global_id().encode());
    }
}
