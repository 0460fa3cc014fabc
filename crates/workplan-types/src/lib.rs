//! Shared timeline types for the education and work plan service.
//!
//! This crate is the single source of truth for the timeline value types
//! used across the workspace. Types defined here flow downstream to
//! `TypeScript` via `ts-rs` for the history views.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers (UUID and upstream string codes)
//! - [`enums`] -- Event types, categories, context keys and the
//!   classification table
//! - [`event`] -- The immutable [`TimelineEvent`]
//! - [`timeline`] -- The always-sorted [`Timeline`] aggregate
//! - [`filter`] -- Query filter parameters

pub mod enums;
pub mod event;
pub mod filter;
pub mod ids;
pub mod timeline;

// Re-export all public types at crate root for convenience.
pub use enums::{CATEGORY_TABLE, ContextKey, TimelineCategory, TimelineEventType, is_in_category};
pub use event::{SYSTEM_ACTOR, TimelineEvent};
pub use filter::{CategoryToggle, TimelineFilter};
pub use ids::{CorrelationId, PrisonId, PrisonNumber, TimelineEventId, TimelineId};
pub use timeline::Timeline;
