//! `PostgreSQL` persistence for natively recorded timeline events.
//!
//! ```text
//! TimelineService
//!     |
//!     +-- NativeEventStore --> TimelineStore --> PostgreSQL (PostgresPool)
//!                                 |-- timeline        (one row per person)
//!                                 +-- timeline_event  (append-only events)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`timeline_store`] -- [`NativeEventStore`] over the timeline tables
//! - [`error`] -- Shared error types
//!
//! [`NativeEventStore`]: workplan_core::NativeEventStore

pub mod error;
pub mod postgres;
pub mod timeline_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use timeline_store::{TimelineEventRow, TimelineStore};
