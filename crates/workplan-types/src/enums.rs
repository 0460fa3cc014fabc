//! Enumeration types for timeline events.
//!
//! Event types are grouped into the query-filterable [`TimelineCategory`]
//! values by the static [`CATEGORY_TABLE`]. Classification is a property of
//! the event type, never of an individual event.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// The kind of fact a timeline event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum TimelineEventType {
    // --- Induction ---
    /// An induction was recorded.
    InductionCreated,
    /// An induction was changed.
    InductionUpdated,
    /// An induction schedule was created.
    InductionScheduleCreated,
    /// An induction schedule deadline was changed.
    InductionScheduleUpdated,
    /// An induction schedule moved to a new status.
    InductionScheduleStatusUpdated,

    // --- Goals and steps ---
    /// The first goals were recorded, creating the action plan.
    ActionPlanCreated,
    /// A goal was added to an existing action plan.
    GoalCreated,
    /// A goal was edited.
    GoalUpdated,
    /// A goal was completed.
    GoalCompleted,
    /// A goal was archived.
    GoalArchived,
    /// An archived goal was restored.
    GoalUnarchived,
    /// A step was edited.
    StepUpdated,
    /// A step was moved back to not started.
    StepNotStarted,
    /// A step was started.
    StepStarted,
    /// A step was completed.
    StepCompleted,

    // --- Reviews ---
    /// An action plan review was completed.
    ActionPlanReviewCompleted,
    /// A review schedule was created.
    ActionPlanReviewScheduleCreated,
    /// A review schedule moved to a new status.
    ActionPlanReviewScheduleStatusUpdated,

    // --- Prison movements ---
    /// The person entered prison.
    PrisonAdmission,
    /// The person left prison.
    PrisonRelease,
    /// The person moved between prisons.
    PrisonTransfer,
}

impl TimelineEventType {
    /// Every event type, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::InductionCreated,
        Self::InductionUpdated,
        Self::InductionScheduleCreated,
        Self::InductionScheduleUpdated,
        Self::InductionScheduleStatusUpdated,
        Self::ActionPlanCreated,
        Self::GoalCreated,
        Self::GoalUpdated,
        Self::GoalCompleted,
        Self::GoalArchived,
        Self::GoalUnarchived,
        Self::StepUpdated,
        Self::StepNotStarted,
        Self::StepStarted,
        Self::StepCompleted,
        Self::ActionPlanReviewCompleted,
        Self::ActionPlanReviewScheduleCreated,
        Self::ActionPlanReviewScheduleStatusUpdated,
        Self::PrisonAdmission,
        Self::PrisonRelease,
        Self::PrisonTransfer,
    ];

    /// Whether this event type belongs to `category`.
    pub fn is_in(self, category: TimelineCategory) -> bool {
        is_in_category(self, category)
    }

    /// The categories this event type belongs to.
    pub fn categories(self) -> impl Iterator<Item = TimelineCategory> {
        CATEGORY_TABLE
            .iter()
            .filter(move |(_, members)| members.contains(&self))
            .map(|(category, _)| *category)
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A query-filterable grouping of event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum TimelineCategory {
    /// Induction and induction schedule lifecycle.
    Induction,
    /// Action plan, goal and step lifecycle.
    Goal,
    /// Review and review schedule lifecycle.
    Review,
    /// Admissions, releases and transfers.
    PrisonMovement,
}

/// Static classification of event types into categories.
///
/// New event types are added here; filter logic never names event types.
pub const CATEGORY_TABLE: &[(TimelineCategory, &[TimelineEventType])] = &[
    (
        TimelineCategory::Induction,
        &[
            TimelineEventType::InductionCreated,
            TimelineEventType::InductionUpdated,
            TimelineEventType::InductionScheduleCreated,
            TimelineEventType::InductionScheduleUpdated,
            TimelineEventType::InductionScheduleStatusUpdated,
        ],
    ),
    (
        TimelineCategory::Goal,
        &[
            TimelineEventType::ActionPlanCreated,
            TimelineEventType::GoalCreated,
            TimelineEventType::GoalUpdated,
            TimelineEventType::GoalCompleted,
            TimelineEventType::GoalArchived,
            TimelineEventType::GoalUnarchived,
            TimelineEventType::StepUpdated,
            TimelineEventType::StepNotStarted,
            TimelineEventType::StepStarted,
            TimelineEventType::StepCompleted,
        ],
    ),
    (
        TimelineCategory::Review,
        &[
            TimelineEventType::ActionPlanReviewCompleted,
            TimelineEventType::ActionPlanReviewScheduleCreated,
            TimelineEventType::ActionPlanReviewScheduleStatusUpdated,
        ],
    ),
    (
        TimelineCategory::PrisonMovement,
        &[
            TimelineEventType::PrisonAdmission,
            TimelineEventType::PrisonRelease,
            TimelineEventType::PrisonTransfer,
        ],
    ),
];

/// Whether `event_type` is classified under `category`.
pub fn is_in_category(event_type: TimelineEventType, category: TimelineCategory) -> bool {
    CATEGORY_TABLE
        .iter()
        .any(|(c, members)| *c == category && members.contains(&event_type))
}

// ---------------------------------------------------------------------------
// Contextual information keys
// ---------------------------------------------------------------------------

/// Key of a contextual annotation attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ContextKey {
    /// Title of the goal the event concerns.
    GoalTitle,
    /// Title of the step the event concerns.
    StepTitle,
    /// Reason a goal was archived.
    GoalArchivedReason,
    /// Free-text reason when the archive reason is "other".
    GoalArchivedReasonOther,
    /// Free-text note recorded when a goal was completed.
    GoalCompletedNote,
    /// Prison the person was transferred from.
    PrisonTransferredFrom,
    /// Induction schedule status before the change.
    InductionScheduleStatusOld,
    /// Induction schedule status after the change.
    InductionScheduleStatusNew,
    /// Induction deadline before the change.
    InductionScheduleDeadlineOld,
    /// Induction deadline after the change.
    InductionScheduleDeadlineNew,
    /// Review schedule status before the change.
    ReviewScheduleStatusOld,
    /// Review schedule status after the change.
    ReviewScheduleStatusNew,
    /// Review deadline before the change.
    ReviewScheduleDeadlineOld,
    /// Review deadline after the change.
    ReviewScheduleDeadlineNew,
    /// Date the completed review was held in person.
    CompletedReviewConductedInPersonDate,
    /// Who held the completed review in person.
    CompletedReviewConductedInPersonBy,
    /// Role of the person who held the completed review.
    CompletedReviewConductedInPersonByRole,
    /// When the completed review was entered online.
    CompletedReviewEnteredOnlineAt,
    /// Who entered the completed review online.
    CompletedReviewEnteredOnlineBy,
    /// Notes recorded with the completed review.
    CompletedReviewNotes,
}
