//! Error types for timeline queries and writes.

use workplan_types::PrisonNumber;

/// Boxed error raised by a collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by the [`TimelineService`](crate::service::TimelineService).
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// Neither a stored timeline nor any movement history exists for the
    /// person. Every known person has at least an admission, so this points
    /// at an upstream data problem.
    #[error("timeline not found for prisoner {prison_number}")]
    NotFound {
        /// The person that was queried.
        prison_number: PrisonNumber,
    },

    /// The native event store failed.
    #[error("event store error: {0}")]
    EventStore(#[source] BoxError),

    /// The movement history provider failed.
    #[error("movement history error: {0}")]
    MovementHistory(#[source] BoxError),
}
