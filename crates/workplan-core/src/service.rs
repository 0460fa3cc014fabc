//! Timeline query service.
//!
//! Assembles a person's timeline from the native event store and the
//! movement history provider, then applies the caller's filter.
//!
//! # Query flow
//!
//! ```text
//! get_timeline(prison_number, filter)
//!     |
//!     +-- join --+-- NativeEventStore::get_timeline     (Option<Timeline>)
//!     |          +-- MovementHistory::get_movement_events (Vec<TimelineEvent>)
//!     |
//!     +-- both empty?  --> TimelineError::NotFound
//!     +-- merge         --> one sorted Timeline
//!     +-- filter        --> read-time view, nothing persisted
//! ```
//!
//! The service holds no mutable state. Every query builds a fresh
//! [`Timeline`], so concurrent queries need no coordination.

use tracing::{debug, error, warn};
use workplan_types::{PrisonNumber, Timeline, TimelineEvent, TimelineFilter};

use crate::collaborator::{MovementHistory, NativeEventStore};
use crate::error::TimelineError;
use crate::filter::apply_filter;
use crate::zone::TimelineZone;

/// Builds filtered timelines and records native events.
#[derive(Debug, Clone)]
pub struct TimelineService<S, M> {
    store: S,
    movements: M,
    zone: TimelineZone,
}

impl<S, M> TimelineService<S, M>
where
    S: NativeEventStore,
    M: MovementHistory,
{
    /// Create a service using the host's local zone for day boundaries.
    pub fn new(store: S, movements: M) -> Self {
        Self {
            store,
            movements,
            zone: TimelineZone::default(),
        }
    }

    /// Use `zone` for the `events_since` day boundary.
    #[must_use]
    pub fn with_zone(mut self, zone: TimelineZone) -> Self {
        self.zone = zone;
        self
    }

    /// The native event store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Return the person's merged timeline, filtered by `filter` if given.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::NotFound`] if the person has neither a
    /// stored timeline nor any movement history, and
    /// [`TimelineError::EventStore`] / [`TimelineError::MovementHistory`]
    /// if a collaborator fails.
    pub async fn get_timeline(
        &self,
        prison_number: &PrisonNumber,
        filter: Option<&TimelineFilter>,
    ) -> Result<Timeline, TimelineError> {
        let (native, movements) = tokio::join!(
            self.store.get_timeline(prison_number),
            self.movements.get_movement_events(prison_number),
        );

        let native = native.map_err(|e| {
            error!(%prison_number, error = %e, "Failed to load stored timeline");
            TimelineError::EventStore(Box::new(e))
        })?;
        let movements = movements.map_err(|e| {
            error!(%prison_number, error = %e, "Failed to load movement history");
            TimelineError::MovementHistory(Box::new(e))
        })?;

        let native_count = native.as_ref().map_or(0, Timeline::len);
        let movement_count = movements.len();

        let mut timeline = match native {
            Some(mut timeline) => {
                timeline.add_events(movements);
                timeline
            }
            None if movements.is_empty() => {
                warn!(%prison_number, "No stored timeline and no movement history");
                return Err(TimelineError::NotFound {
                    prison_number: prison_number.clone(),
                });
            }
            None => Timeline::for_prisoner(prison_number.clone(), movements),
        };

        debug!(
            %prison_number,
            native_count,
            movement_count,
            "Merged timeline sources"
        );

        if let Some(filter) = filter {
            apply_filter(&mut timeline, filter, self.zone);
        }

        Ok(timeline)
    }

    /// Record one native event.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::EventStore`] if the store fails.
    pub async fn record_event(
        &self,
        prison_number: &PrisonNumber,
        event: TimelineEvent,
    ) -> Result<(), TimelineError> {
        self.store
            .record_event(prison_number, event)
            .await
            .map_err(|e| TimelineError::EventStore(Box::new(e)))
    }

    /// Record a batch of native events.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::EventStore`] if the store fails.
    pub async fn record_events(
        &self,
        prison_number: &PrisonNumber,
        events: Vec<TimelineEvent>,
    ) -> Result<(), TimelineError> {
        self.store
            .record_events(prison_number, events)
            .await
            .map_err(|e| TimelineError::EventStore(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use workplan_types::{CategoryToggle, PrisonId, TimelineEventType, TimelineId};

    use super::*;
    use crate::collaborator::{InMemoryEventStore, StaticMovementHistory};

    fn prisoner() -> PrisonNumber {
        PrisonNumber::new("A1234BC")
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn event(event_type: TimelineEventType, prison: &str, at: DateTime<Utc>) -> TimelineEvent {
        TimelineEvent::new("src", event_type, PrisonId::new(prison), "user").with_timestamp(at)
    }

    fn movement(event_type: TimelineEventType, prison: &str, at: DateTime<Utc>) -> TimelineEvent {
        TimelineEvent::system("booking-1", event_type, PrisonId::new(prison)).with_timestamp(at)
    }

    fn service(
        native: Vec<TimelineEvent>,
        movements: Vec<TimelineEvent>,
    ) -> TimelineService<InMemoryEventStore, StaticMovementHistory> {
        let store = if native.is_empty() {
            InMemoryEventStore::new()
        } else {
            InMemoryEventStore::with_timelines([Timeline::new(
                TimelineId::new(),
                prisoner(),
                native,
            )])
        };
        let history = StaticMovementHistory::new().with_movements(prisoner(), movements);
        TimelineService::new(store, history).with_zone(TimelineZone::from_offset_minutes(Some(0)))
    }

    fn types(timeline: &Timeline) -> Vec<TimelineEventType> {
        timeline.events().iter().map(TimelineEvent::event_type).collect()
    }

    #[tokio::test]
    async fn merges_native_and_movement_events_in_order() {
        let service = service(
            vec![event(TimelineEventType::GoalCreated, "BXI", t0())],
            vec![
                movement(TimelineEventType::PrisonTransfer, "MDI", t0() + Duration::minutes(1)),
                movement(TimelineEventType::PrisonAdmission, "BXI", t0() - Duration::minutes(1)),
            ],
        );

        let timeline = service.get_timeline(&prisoner(), None).await;
        let timeline = timeline.ok();
        assert_eq!(
            timeline.as_ref().map(types),
            Some(vec![
                TimelineEventType::PrisonAdmission,
                TimelineEventType::GoalCreated,
                TimelineEventType::PrisonTransfer,
            ])
        );
    }

    #[tokio::test]
    async fn unfiltered_query_returns_union_of_sources() {
        let native: Vec<_> = (0..4)
            .map(|i| event(TimelineEventType::StepUpdated, "BXI", t0() + Duration::hours(i)))
            .collect();
        let movements = vec![
            movement(TimelineEventType::PrisonAdmission, "BXI", t0() - Duration::days(30)),
            movement(TimelineEventType::PrisonRelease, "BXI", t0() + Duration::days(30)),
        ];
        let service = service(native, movements);

        let count = service
            .get_timeline(&prisoner(), Some(&TimelineFilter::default()))
            .await
            .map(|t| t.len())
            .ok();
        assert_eq!(count, Some(6));
    }

    #[tokio::test]
    async fn movements_alone_synthesize_a_timeline() {
        let service = service(
            Vec::new(),
            vec![movement(TimelineEventType::PrisonAdmission, "BXI", t0())],
        );
        let timeline = service.get_timeline(&prisoner(), None).await.ok();
        assert_eq!(timeline.as_ref().map(Timeline::len), Some(1));
        assert_eq!(timeline.map(|t| t.prison_number().clone()), Some(prisoner()));
    }

    #[tokio::test]
    async fn stored_timeline_without_movements_is_returned() {
        let service = service(
            vec![event(TimelineEventType::InductionCreated, "BXI", t0())],
            Vec::new(),
        );
        let timeline = service.get_timeline(&prisoner(), None).await.ok();
        assert_eq!(
            timeline.as_ref().map(types),
            Some(vec![TimelineEventType::InductionCreated])
        );
    }

    #[tokio::test]
    async fn no_sources_is_not_found() {
        let service = service(Vec::new(), Vec::new());
        let result = service.get_timeline(&prisoner(), None).await;
        assert!(matches!(
            result,
            Err(TimelineError::NotFound { ref prison_number }) if *prison_number == prisoner()
        ));
    }

    #[tokio::test]
    async fn filter_applies_to_merged_events() {
        let service = service(
            vec![
                event(TimelineEventType::GoalCreated, "BXI", t0()),
                event(TimelineEventType::GoalCreated, "MDI", t0() + Duration::days(2)),
            ],
            vec![movement(TimelineEventType::PrisonTransfer, "MDI", t0() + Duration::days(1))],
        );
        let filter = TimelineFilter {
            goals: CategoryToggle::Enabled,
            prison_id: Some(PrisonId::new("MDI")),
            ..TimelineFilter::default()
        };
        let timeline = service.get_timeline(&prisoner(), Some(&filter)).await.ok();
        assert_eq!(timeline.as_ref().map(Timeline::len), Some(1));
    }

    #[tokio::test]
    async fn empty_filter_result_is_not_an_error() {
        let service = service(
            vec![event(TimelineEventType::GoalCreated, "BXI", t0())],
            Vec::new(),
        );
        let filter = TimelineFilter {
            events_since: NaiveDate::from_ymd_opt(2030, 1, 1),
            ..TimelineFilter::default()
        };
        let timeline = service.get_timeline(&prisoner(), Some(&filter)).await;
        assert!(matches!(timeline, Ok(ref t) if t.is_empty()));
    }

    #[tokio::test]
    async fn filtering_does_not_change_stored_events() {
        let service = service(
            vec![
                event(TimelineEventType::GoalCreated, "BXI", t0()),
                event(TimelineEventType::InductionCreated, "BXI", t0()),
            ],
            Vec::new(),
        );
        let filter = TimelineFilter {
            inductions: CategoryToggle::Enabled,
            ..TimelineFilter::default()
        };
        let filtered = service.get_timeline(&prisoner(), Some(&filter)).await.ok();
        assert_eq!(filtered.map(|t| t.len()), Some(1));

        let stored = service.store().get_timeline(&prisoner()).await.ok().flatten();
        assert_eq!(stored.map(|t| t.len()), Some(2));
    }

    #[tokio::test]
    async fn recorded_events_appear_in_later_queries() {
        let service = service(
            Vec::new(),
            vec![movement(TimelineEventType::PrisonAdmission, "BXI", t0())],
        );
        let recorded = service
            .record_events(
                &prisoner(),
                vec![
                    event(TimelineEventType::ActionPlanCreated, "BXI", t0() + Duration::hours(2)),
                    event(TimelineEventType::GoalCreated, "BXI", t0() + Duration::hours(1)),
                ],
            )
            .await;
        assert!(recorded.is_ok());
        let single = service
            .record_event(
                &prisoner(),
                event(TimelineEventType::StepStarted, "BXI", t0() + Duration::hours(3)),
            )
            .await;
        assert!(single.is_ok());

        let timeline = service.get_timeline(&prisoner(), None).await.ok();
        assert_eq!(
            timeline.as_ref().map(types),
            Some(vec![
                TimelineEventType::PrisonAdmission,
                TimelineEventType::GoalCreated,
                TimelineEventType::ActionPlanCreated,
                TimelineEventType::StepStarted,
            ])
        );
    }

    #[derive(Debug, thiserror::Error)]
    #[error("provider unavailable")]
    struct Unavailable;

    struct FailingHistory;

    impl MovementHistory for FailingHistory {
        type Error = Unavailable;

        async fn get_movement_events(
            &self,
            _prison_number: &PrisonNumber,
        ) -> Result<Vec<TimelineEvent>, Self::Error> {
            Err(Unavailable)
        }
    }

    #[tokio::test]
    async fn movement_failure_propagates() {
        let service = TimelineService::new(InMemoryEventStore::new(), FailingHistory);
        let result = service.get_timeline(&prisoner(), None).await;
        assert!(matches!(result, Err(TimelineError::MovementHistory(_))));
    }
}
