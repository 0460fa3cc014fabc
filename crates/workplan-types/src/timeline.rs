//! The [`Timeline`] aggregate.
//!
//! A timeline owns every event recorded for one person. Its event collection
//! is kept sorted ascending by timestamp: the constructor and every mutating
//! method re-sort before returning, so every read observes sorted events.
//! The sort is stable, so events with equal timestamps keep insertion order.

use serde::Serialize;
use ts_rs::TS;

use crate::event::TimelineEvent;
use crate::ids::{CorrelationId, PrisonNumber, TimelineId};

/// Chronological record of everything that happened to one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Timeline {
    reference: TimelineId,
    prison_number: PrisonNumber,
    events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Build a timeline from existing events in any order.
    pub fn new(
        reference: TimelineId,
        prison_number: PrisonNumber,
        events: impl IntoIterator<Item = TimelineEvent>,
    ) -> Self {
        let mut timeline = Self {
            reference,
            prison_number,
            events: events.into_iter().collect(),
        };
        timeline.sort();
        timeline
    }

    /// Synthesize a timeline with a fresh reference, for a person who has no
    /// persisted timeline yet.
    pub fn for_prisoner(
        prison_number: PrisonNumber,
        events: impl IntoIterator<Item = TimelineEvent>,
    ) -> Self {
        Self::new(TimelineId::new(), prison_number, events)
    }

    /// Append one event.
    pub fn add_event(&mut self, event: TimelineEvent) {
        self.events.push(event);
        self.sort();
    }

    /// Append a batch of events. The resulting order does not depend on the
    /// order of `events`, apart from ties.
    pub fn add_events(&mut self, events: impl IntoIterator<Item = TimelineEvent>) {
        self.events.extend(events);
        self.sort();
    }

    /// Keep only the events matching `keep`. Removing elements cannot break
    /// the ordering, so no re-sort is needed.
    pub fn retain_events(&mut self, keep: impl FnMut(&TimelineEvent) -> bool) {
        self.events.retain(keep);
    }

    /// Identifier of the aggregate.
    pub const fn reference(&self) -> TimelineId {
        self.reference
    }

    /// The person this timeline belongs to.
    pub const fn prison_number(&self) -> &PrisonNumber {
        &self.prison_number
    }

    /// Events sorted ascending by timestamp.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Consume the timeline and return its sorted events.
    pub fn into_events(self) -> Vec<TimelineEvent> {
        self.events
    }

    /// Events that were produced by the same business action.
    pub fn correlated_with(
        &self,
        correlation_id: CorrelationId,
    ) -> impl Iterator<Item = &TimelineEvent> {
        self.events
            .iter()
            .filter(move |e| e.correlation_id() == correlation_id)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the timeline has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn sort(&mut self) {
        self.events.sort_by_key(TimelineEvent::timestamp);
    }
}
