//! Contracts for the two upstream sources a timeline is assembled from.
//!
//! - [`NativeEventStore`] persists events recorded by this service.
//! - [`MovementHistory`] supplies admissions, releases and transfers from
//!   the external system of record.
//!
//! Trait methods return `Send` futures so the service can be driven from
//! a multi-threaded runtime (the HTTP layer). Implementations may use
//! `async fn` directly.
//!
//! In-memory implementations are provided for tests and local runs.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use workplan_types::{PrisonNumber, Timeline, TimelineEvent};

/// Store of events recorded natively by this service.
pub trait NativeEventStore: Send + Sync {
    /// Failure raised by the store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the person's stored timeline. A person with no recorded events
    /// yields `Ok(None)`, never an error.
    fn get_timeline(
        &self,
        prison_number: &PrisonNumber,
    ) -> impl Future<Output = Result<Option<Timeline>, Self::Error>> + Send;

    /// Persist one event.
    fn record_event(
        &self,
        prison_number: &PrisonNumber,
        event: TimelineEvent,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Persist a batch of events.
    fn record_events(
        &self,
        prison_number: &PrisonNumber,
        events: Vec<TimelineEvent>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Provider of prison movement events.
pub trait MovementHistory: Send + Sync {
    /// Failure raised by the provider.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Movement events for the person. A person without history yields an
    /// empty list, never an error.
    fn get_movement_events(
        &self,
        prison_number: &PrisonNumber,
    ) -> impl Future<Output = Result<Vec<TimelineEvent>, Self::Error>> + Send;
}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

/// Event store backed by a map, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    timelines: Arc<RwLock<BTreeMap<PrisonNumber, Timeline>>>,
}

impl InMemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing timelines.
    pub fn with_timelines(timelines: impl IntoIterator<Item = Timeline>) -> Self {
        let map = timelines
            .into_iter()
            .map(|t| (t.prison_number().clone(), t))
            .collect();
        Self {
            timelines: Arc::new(RwLock::new(map)),
        }
    }
}

impl NativeEventStore for InMemoryEventStore {
    type Error = Infallible;

    async fn get_timeline(
        &self,
        prison_number: &PrisonNumber,
    ) -> Result<Option<Timeline>, Self::Error> {
        Ok(self.timelines.read().await.get(prison_number).cloned())
    }

    async fn record_event(
        &self,
        prison_number: &PrisonNumber,
        event: TimelineEvent,
    ) -> Result<(), Self::Error> {
        self.record_events(prison_number, vec![event]).await
    }

    async fn record_events(
        &self,
        prison_number: &PrisonNumber,
        events: Vec<TimelineEvent>,
    ) -> Result<(), Self::Error> {
        if events.is_empty() {
            return Ok(());
        }
        let mut timelines = self.timelines.write().await;
        timelines
            .entry(prison_number.clone())
            .or_insert_with(|| Timeline::for_prisoner(prison_number.clone(), Vec::new()))
            .add_events(events);
        Ok(())
    }
}

/// Movement history backed by a fixed map.
#[derive(Debug, Clone, Default)]
pub struct StaticMovementHistory {
    movements: BTreeMap<PrisonNumber, Vec<TimelineEvent>>,
}

impl StaticMovementHistory {
    /// Create a provider with no history for anyone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register movement events for a person.
    #[must_use]
    pub fn with_movements(
        mut self,
        prison_number: PrisonNumber,
        events: impl IntoIterator<Item = TimelineEvent>,
    ) -> Self {
        self.movements
            .entry(prison_number)
            .or_default()
            .extend(events);
        self
    }
}

impl MovementHistory for StaticMovementHistory {
    type Error = Infallible;

    async fn get_movement_events(
        &self,
        prison_number: &PrisonNumber,
    ) -> Result<Vec<TimelineEvent>, Self::Error> {
        Ok(self
            .movements
            .get(prison_number)
            .cloned()
            .unwrap_or_default())
    }
}
