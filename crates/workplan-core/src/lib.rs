//! Timeline aggregation and filtering for the education and work plan
//! service.
//!
//! This crate merges a person's natively recorded events with their prison
//! movement history into one chronological timeline, then narrows it with
//! a compound filter.
//!
//! # Modules
//!
//! - [`collaborator`] -- [`NativeEventStore`] and [`MovementHistory`]
//!   contracts plus in-memory implementations.
//! - [`config`] -- Configuration loading from `workplan-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- [`TimelineError`].
//! - [`filter`] -- Compound filter evaluation.
//! - [`movement`] -- Prison periods to movement events.
//! - [`service`] -- The [`TimelineService`] query flow.
//! - [`zone`] -- Day boundaries and wall-clock interpretation.

pub mod collaborator;
pub mod config;
pub mod error;
pub mod filter;
pub mod movement;
pub mod service;
pub mod zone;

pub use collaborator::{InMemoryEventStore, MovementHistory, NativeEventStore, StaticMovementHistory};
pub use error::{BoxError, TimelineError};
pub use filter::apply_filter;
pub use service::TimelineService;
pub use zone::TimelineZone;
