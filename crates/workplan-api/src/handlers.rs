//! REST endpoint handlers for the timeline API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness check |
//! | `GET` | `/timelines/{prison_number}` | Merged, filtered timeline |
//! | `POST` | `/timelines/{prison_number}/events` | Record native events |

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use workplan_core::{MovementHistory, NativeEventStore};
use workplan_types::{
    CategoryToggle, ContextKey, CorrelationId, PrisonId, PrisonNumber, Timeline, TimelineEvent,
    TimelineEventType, TimelineFilter,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Maximum number of events accepted by one `POST` request.
pub const MAX_EVENTS_PER_REQUEST: usize = 500;

// ---------------------------------------------------------------------------
// Query and body structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /timelines/{prison_number}`.
///
/// Category flags are enabled by their presence: `goals=false` enables the
/// goal category just as `goals=true` does.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineQuery {
    /// Include induction events.
    pub inductions: Option<bool>,
    /// Include goal and step events.
    pub goals: Option<bool>,
    /// Include review events.
    pub reviews: Option<bool>,
    /// Include prison movement events.
    pub prison_events: Option<bool>,
    /// Only events in this prison.
    pub prison_id: Option<String>,
    /// Only events after the start of this day.
    pub events_since: Option<NaiveDate>,
}

impl TimelineQuery {
    /// Build the filter this query describes. `None` when no parameter was
    /// supplied, so an empty query string skips filtering altogether.
    pub fn into_filter(self) -> Option<TimelineFilter> {
        let filter = TimelineFilter {
            inductions: CategoryToggle::from(self.inductions),
            goals: CategoryToggle::from(self.goals),
            reviews: CategoryToggle::from(self.reviews),
            prison_events: CategoryToggle::from(self.prison_events),
            prison_id: self
                .prison_id
                .filter(|p| !p.trim().is_empty())
                .map(PrisonId::new),
            events_since: self.events_since,
        };
        (!filter.is_unconstrained()).then_some(filter)
    }
}

/// One event in a `POST /timelines/{prison_number}/events` body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTimelineEvent {
    /// Identifier of the domain record the event is about.
    #[validate(length(min = 1))]
    pub source_reference: String,
    /// What happened.
    pub event_type: TimelineEventType,
    /// Extra detail about the event.
    #[serde(default)]
    pub contextual_info: BTreeMap<ContextKey, String>,
    /// Prison the event happened in.
    #[validate(length(min = 1))]
    pub prison_id: String,
    /// Actor that caused the event.
    #[validate(length(min = 1))]
    pub actioned_by: String,
    /// Actor's display name, if known.
    #[serde(default)]
    pub actioned_by_display_name: Option<String>,
    /// When the event happened. Defaults to the time of the request.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Correlation id. Events without one share a fresh id per request.
    #[serde(default)]
    pub correlation_id: Option<CorrelationId>,
}

impl NewTimelineEvent {
    fn into_event(self, batch_correlation: CorrelationId, now: DateTime<Utc>) -> TimelineEvent {
        let mut event = TimelineEvent::new(
            self.source_reference,
            self.event_type,
            PrisonId::new(self.prison_id),
            self.actioned_by,
        )
        .with_contextual_info(self.contextual_info)
        .with_timestamp(self.timestamp.unwrap_or(now))
        .with_correlation_id(self.correlation_id.unwrap_or(batch_correlation));
        if let Some(name) = self.actioned_by_display_name {
            event = event.with_actioned_by_display_name(name);
        }
        event
    }
}

/// Response body for a successful `POST`.
#[derive(Debug, Serialize)]
pub struct RecordedResponse {
    /// Number of events recorded.
    pub recorded: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Liveness check.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Return a person's merged timeline, filtered by the query parameters.
///
/// # Errors
///
/// Returns [`ApiError::InvalidPrisonNumber`] or [`ApiError::InvalidQuery`]
/// for malformed input, [`ApiError::NotFound`] if the person has no
/// history at all, and [`ApiError::Upstream`] if a collaborator fails.
pub async fn get_timeline<S, M>(
    State(state): State<Arc<AppState<S, M>>>,
    Path(prison_number): Path<String>,
    query: Result<Query<TimelineQuery>, QueryRejection>,
) -> Result<Json<Timeline>, ApiError>
where
    S: NativeEventStore + 'static,
    M: MovementHistory + 'static,
{
    let prison_number = parse_prison_number(prison_number)?;
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let filter = query.into_filter();

    let timeline = state
        .service
        .get_timeline(&prison_number, filter.as_ref())
        .await?;

    tracing::debug!(
        %prison_number,
        filtered = filter.is_some(),
        events = timeline.len(),
        "Served timeline"
    );

    Ok(Json(timeline))
}

/// Record a batch of native events on a person's timeline.
///
/// # Errors
///
/// Returns [`ApiError::InvalidPrisonNumber`], [`ApiError::InvalidBody`] or
/// [`ApiError::Validation`] for malformed input, and
/// [`ApiError::Upstream`] if the store fails.
pub async fn record_events<S, M>(
    State(state): State<Arc<AppState<S, M>>>,
    Path(prison_number): Path<String>,
    body: Result<Json<Vec<NewTimelineEvent>>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordedResponse>), ApiError>
where
    S: NativeEventStore + 'static,
    M: MovementHistory + 'static,
{
    let prison_number = parse_prison_number(prison_number)?;
    let Json(new_events) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    if new_events.is_empty() {
        return Err(ApiError::InvalidBody(String::from("no events supplied")));
    }
    if new_events.len() > MAX_EVENTS_PER_REQUEST {
        return Err(ApiError::InvalidBody(format!(
            "at most {MAX_EVENTS_PER_REQUEST} events per request, got {}",
            new_events.len()
        )));
    }
    for event in &new_events {
        event.validate()?;
    }

    let correlation_id = CorrelationId::new();
    let now = Utc::now();
    let events: Vec<_> = new_events
        .into_iter()
        .map(|e| e.into_event(correlation_id, now))
        .collect();
    let recorded = events.len();

    state.service.record_events(&prison_number, events).await?;

    tracing::info!(%prison_number, recorded, %correlation_id, "Recorded timeline events");

    Ok((StatusCode::CREATED, Json(RecordedResponse { recorded })))
}

fn parse_prison_number(raw: String) -> Result<PrisonNumber, ApiError> {
    let prison_number = PrisonNumber::new(raw);
    if prison_number.is_well_formed() {
        Ok(prison_number)
    } else {
        Err(ApiError::InvalidPrisonNumber(prison_number.into_inner()))
    }
}
