//! HTTP API for the education and work plan timeline service.
//!
//! This crate provides an Axum HTTP server that exposes a person's merged
//! timeline (natively recorded events plus prison movements) with optional
//! filtering, and accepts new native events.
//!
//! # Architecture
//!
//! Handlers are generic over the [`NativeEventStore`] and
//! [`MovementHistory`] behind the shared [`TimelineService`], so the same
//! router serves `PostgreSQL` and prisoner-search in production and the
//! in-memory collaborators in tests.
//!
//! [`NativeEventStore`]: workplan_core::NativeEventStore
//! [`MovementHistory`]: workplan_core::MovementHistory
//! [`TimelineService`]: workplan_core::TimelineService

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use handlers::MAX_EVENTS_PER_REQUEST;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
