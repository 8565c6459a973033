//! Event filtering API for narrowing store results in memory.

use nodegate_core::{Event, EventComponents};

/// Trait for filtering events.
pub trait EventFilter: Send + Sync {
    /// Returns true if the event matches the filter criteria.
    fn matches(&self, event: &Event) -> bool;
}

/// Filter by executed check name. Events without a check never match.
#[derive(Debug, Clone)]
pub struct CheckNameFilter {
    /// Check name to match.
    pub check: String,
}

impl EventFilter for CheckNameFilter {
    fn matches(&self, event: &Event) -> bool {
        event.check_name() == Some(self.check.as_str())
    }
}

/// Filter by exact event timestamp.
#[derive(Debug, Clone, Copy)]
pub struct TimestampFilter {
    /// Unix time to match.
    pub timestamp: i64,
}

impl EventFilter for TimestampFilter {
    fn matches(&self, event: &Event) -> bool {
        event.timestamp == self.timestamp
    }
}

/// Composite filter: all filters must match (AND).
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn EventFilter>>,
}

impl EventFilter for AndFilter {
    fn matches(&self, event: &Event) -> bool {
        self.filters.iter().all(|f| f.matches(event))
    }
}

/// Exact match on the check event natural key (check name and timestamp;
/// the entity is assumed to be narrowed by the store lookup already).
pub fn key_filter(key: &EventComponents) -> AndFilter {
    AndFilter {
        filters: vec![
            Box::new(TimestampFilter {
                timestamp: key.timestamp,
            }),
            Box::new(CheckNameFilter {
                check: key.check.clone(),
            }),
        ],
    }
}
