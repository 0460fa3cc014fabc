//! The immutable [`TimelineEvent`] value type.
//!
//! An event records one point-in-time fact about a person: what happened,
//! when it happened, in which prison, and who caused it. Fields are private
//! and exposed through accessors so a published event can never change.
//! The `with_*` methods consume the value and are intended for use during
//! construction only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ContextKey, TimelineCategory, TimelineEventType};
use crate::ids::{CorrelationId, PrisonId, TimelineEventId};

/// Actor recorded against events the service raises on its own behalf,
/// such as movements ingested from the prisoner-search API.
pub const SYSTEM_ACTOR: &str = "system";

/// A single immutable fact on a person's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TimelineEvent {
    reference: TimelineEventId,
    source_reference: String,
    event_type: TimelineEventType,
    #[serde(default)]
    contextual_info: BTreeMap<ContextKey, String>,
    prison_id: PrisonId,
    actioned_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    actioned_by_display_name: Option<String>,
    timestamp: DateTime<Utc>,
    correlation_id: CorrelationId,
}

impl TimelineEvent {
    /// Create an event that happened now, with a fresh reference and
    /// correlation id and no contextual information.
    pub fn new(
        source_reference: impl Into<String>,
        event_type: TimelineEventType,
        prison_id: PrisonId,
        actioned_by: impl Into<String>,
    ) -> Self {
        Self {
            reference: TimelineEventId::new(),
            source_reference: source_reference.into(),
            event_type,
            contextual_info: BTreeMap::new(),
            prison_id,
            actioned_by: actioned_by.into(),
            actioned_by_display_name: None,
            timestamp: Utc::now(),
            correlation_id: CorrelationId::new(),
        }
    }

    /// Create a system-initiated event.
    pub fn system(
        source_reference: impl Into<String>,
        event_type: TimelineEventType,
        prison_id: PrisonId,
    ) -> Self {
        Self::new(source_reference, event_type, prison_id, SYSTEM_ACTOR)
    }

    /// Use an existing reference, e.g. when rebuilding a stored event.
    #[must_use]
    pub const fn with_reference(mut self, reference: TimelineEventId) -> Self {
        self.reference = reference;
        self
    }

    /// Replace the contextual information.
    #[must_use]
    pub fn with_contextual_info(mut self, info: BTreeMap<ContextKey, String>) -> Self {
        self.contextual_info = info;
        self
    }

    /// Add a single contextual annotation.
    #[must_use]
    pub fn with_context(mut self, key: ContextKey, value: impl Into<String>) -> Self {
        self.contextual_info.insert(key, value.into());
        self
    }

    /// Set the human-readable name of the actor.
    #[must_use]
    pub fn with_actioned_by_display_name(mut self, name: impl Into<String>) -> Self {
        self.actioned_by_display_name = Some(name.into());
        self
    }

    /// Set the instant the underlying fact occurred.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Join the event to an existing correlation group.
    #[must_use]
    pub const fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    /// Globally unique id of this event.
    pub const fn reference(&self) -> TimelineEventId {
        self.reference
    }

    /// Id of the record that produced the event (goal, step, booking...).
    pub fn source_reference(&self) -> &str {
        &self.source_reference
    }

    /// What happened.
    pub const fn event_type(&self) -> TimelineEventType {
        self.event_type
    }

    /// Contextual annotations, possibly empty.
    pub const fn contextual_info(&self) -> &BTreeMap<ContextKey, String> {
        &self.contextual_info
    }

    /// Look up a single contextual annotation.
    pub fn context(&self, key: ContextKey) -> Option<&str> {
        self.contextual_info.get(&key).map(String::as_str)
    }

    /// Prison the person was in when the event occurred.
    pub const fn prison_id(&self) -> &PrisonId {
        &self.prison_id
    }

    /// Id of the actor who caused the event.
    pub fn actioned_by(&self) -> &str {
        &self.actioned_by
    }

    /// Display name of the actor, absent for system events.
    pub fn actioned_by_display_name(&self) -> Option<&str> {
        self.actioned_by_display_name.as_deref()
    }

    /// When the underlying fact occurred.
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Grouping key shared with co-occurring events.
    pub const fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    /// Whether the service raised this event itself.
    pub fn is_system_initiated(&self) -> bool {
        self.actioned_by == SYSTEM_ACTOR
    }

    /// Whether the event's type is classified under `category`.
    pub fn is_in(&self, category: TimelineCategory) -> bool {
        self.event_type.is_in(category)
    }
}
