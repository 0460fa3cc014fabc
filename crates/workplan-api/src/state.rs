//! Shared application state for the timeline API.

use workplan_core::{MovementHistory, NativeEventStore, TimelineService};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug)]
pub struct AppState<S, M> {
    /// The timeline query service.
    pub service: TimelineService<S, M>,
}

impl<S, M> AppState<S, M>
where
    S: NativeEventStore,
    M: MovementHistory,
{
    /// Create state around a service.
    pub const fn new(service: TimelineService<S, M>) -> Self {
        Self { service }
    }
}
