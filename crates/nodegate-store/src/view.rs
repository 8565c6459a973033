//! Scan helpers over event sequences returned by a store.

use nodegate_core::Event;
use std::sync::Arc;

use crate::filter::EventFilter;

/// Returns the first event matching `filter`.
///
/// Performs a sequential scan; cost is linear in the number of events.
pub fn find_first<I, F>(events: I, filter: &F) -> Option<Arc<Event>>
where
    I: IntoIterator<Item = Arc<Event>>,
    F: EventFilter + ?Sized,
{
    events.into_iter().find(|event| filter.matches(event))
}

/// Keeps only events carrying a check result.
pub fn check_events<I>(events: I) -> Vec<Arc<Event>>
where
    I: IntoIterator<Item = Arc<Event>>,
{
    events
        .into_iter()
        .filter(|event| event.is_check_event())
        .collect()
}
