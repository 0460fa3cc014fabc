//! Axum router construction for the timeline API.
//!
//! Assembles all routes into a single [`Router`] with CORS and request
//! tracing middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workplan_core::{MovementHistory, NativeEventStore};

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness check
/// - `GET /timelines/{prison_number}` -- merged, filtered timeline
/// - `POST /timelines/{prison_number}/events` -- record native events
pub fn build_router<S, M>(state: Arc<AppState<S, M>>) -> Router
where
    S: NativeEventStore + 'static,
    M: MovementHistory + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/timelines/{prison_number}",
            get(handlers::get_timeline::<S, M>),
        )
        .route(
            "/timelines/{prison_number}/events",
            post(handlers::record_events::<S, M>),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
