use nodegate_canonical::Namespace;
use serde::{Deserialize, Serialize};

use crate::shared::ObjectMeta;

/// A monitored entity (agent, proxy, or backend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity metadata.
    pub metadata: ObjectMeta,
    /// Entity class (e.g., "agent", "proxy").
    pub entity_class: String,
    /// Subscriptions the entity listens on.
    #[serde(default)]
    pub subscriptions: Vec<String>,
    /// Unix time the entity last checked in.
    #[serde(default)]
    pub last_seen: i64,
}

/// Configuration of a scheduled check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Check metadata; the name identifies the check.
    pub metadata: ObjectMeta,
    /// Command line executed by agents.
    pub command: String,
    /// Scheduling interval in seconds.
    #[serde(default)]
    pub interval: u32,
    /// Subscriptions the check is published to.
    #[serde(default)]
    pub subscriptions: Vec<String>,
    /// Whether the check is scheduled.
    #[serde(default)]
    pub publish: bool,
    /// Handlers invoked for results.
    #[serde(default)]
    pub handlers: Vec<String>,
}

/// Result of one check execution, embedding the configuration it ran with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Configuration the check executed with.
    pub config: CheckConfig,
    /// Output captured from the command.
    #[serde(default)]
    pub output: String,
    /// Exit status of the command.
    #[serde(default)]
    pub status: u32,
    /// Unix time the check was scheduled.
    #[serde(default)]
    pub issued: i64,
    /// Unix time the check was executed.
    #[serde(default)]
    pub executed: i64,
    /// Execution duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

/// One metric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Metric name.
    pub name: String,
    /// Sampled value.
    pub value: f64,
    /// Unix time of the sample.
    pub timestamp: i64,
}

/// Metrics attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Handlers the metrics are routed to.
    #[serde(default)]
    pub handlers: Vec<String>,
    /// Metric samples.
    #[serde(default)]
    pub points: Vec<MetricPoint>,
}

/// Event raised by an entity: a check result, metrics, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unix time the event occurred.
    pub timestamp: i64,
    /// Entity the event occurred on.
    pub entity: Entity,
    /// Check result, present for check events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<Check>,
    /// Metrics, present for metric events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
}

impl Event {
    /// Namespace of the owning entity.
    pub fn namespace(&self) -> &Namespace {
        &self.entity.metadata.namespace
    }

    /// Name of the owning entity.
    pub fn entity_name(&self) -> &str {
        &self.entity.metadata.name
    }

    /// Name of the executed check, if this is a check event.
    pub fn check_name(&self) -> Option<&str> {
        self.check.as_ref().map(|c| c.config.metadata.name.as_str())
    }

    /// Whether the event carries a check result.
    pub fn is_check_event(&self) -> bool {
        self.check.is_some()
    }
}
