//! Compound filter evaluation over a merged timeline.
//!
//! Evaluation runs as ordered elimination:
//!
//! 1. An unconstrained filter is a no-op.
//! 2. Recency: keep events strictly after the start of `events_since`.
//! 3. Prison: keep events that happened in `prison_id`.
//! 4. Categories: when any toggle is enabled, keep events whose type is in
//!    at least one enabled category.
//!
//! Filtering never fails; a filter that matches nothing yields an empty
//! timeline.

use workplan_types::{Timeline, TimelineEvent, TimelineFilter};

use crate::zone::TimelineZone;

/// Apply `filter` to `timeline` in place.
pub fn apply_filter(timeline: &mut Timeline, filter: &TimelineFilter, zone: TimelineZone) {
    if filter.is_unconstrained() {
        return;
    }

    let before = timeline.len();

    if let Some(since) = filter.events_since {
        let boundary = zone.start_of_day(since);
        timeline.retain_events(|e| e.timestamp() > boundary);
    }

    if let Some(prison_id) = &filter.prison_id {
        timeline.retain_events(|e| e.prison_id() == prison_id);
    }

    if filter.has_category_constraint() {
        timeline.retain_events(|e| matches_any_category(e, filter));
    }

    tracing::debug!(
        prison_number = %timeline.prison_number(),
        before,
        after = timeline.len(),
        "Applied timeline filter"
    );
}

/// Whether the event's type is in any category the filter enables.
fn matches_any_category(event: &TimelineEvent, filter: &TimelineFilter) -> bool {
    filter
        .enabled_categories()
        .any(|category| event.is_in(category))
}
