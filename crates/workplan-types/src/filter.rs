//! Timeline query filter parameters.
//!
//! Category toggles are tri-state on the wire (`true`, `false` or absent)
//! but only the absent/present distinction has ever influenced results:
//! a supplied `false` enables its category exactly like `true`.
//! [`CategoryToggle`] makes that explicit so callers cannot assume `false`
//! excludes a category.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::TimelineCategory;
use crate::ids::PrisonId;

/// Whether a category takes part in the OR-set of the category filter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum CategoryToggle {
    /// The caller did not mention the category.
    #[default]
    NotSpecified,
    /// The caller mentioned the category, whatever boolean it supplied.
    Enabled,
}

impl CategoryToggle {
    /// Whether the category is in the OR-set.
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl From<Option<bool>> for CategoryToggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(_) => Self::Enabled,
            None => Self::NotSpecified,
        }
    }
}

/// Compound filter applied to a merged timeline.
///
/// Every field is optional. Recency and prison constraints are ANDed with
/// each other and with the category constraint; categories are ORed among
/// themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TimelineFilter {
    /// Induction category toggle.
    #[serde(default)]
    pub inductions: CategoryToggle,
    /// Goal category toggle.
    #[serde(default)]
    pub goals: CategoryToggle,
    /// Review category toggle.
    #[serde(default)]
    pub reviews: CategoryToggle,
    /// Prison movement category toggle.
    #[serde(default)]
    pub prison_events: CategoryToggle,
    /// Only events that happened in this prison.
    #[serde(default)]
    pub prison_id: Option<PrisonId>,
    /// Only events strictly after the start of this day.
    #[serde(default)]
    pub events_since: Option<NaiveDate>,
}

impl TimelineFilter {
    /// Whether no parameter at all was supplied.
    pub const fn is_unconstrained(&self) -> bool {
        !self.has_category_constraint()
            && self.prison_id.is_none()
            && self.events_since.is_none()
    }

    /// Whether any category toggle was supplied.
    pub const fn has_category_constraint(&self) -> bool {
        self.inductions.is_enabled()
            || self.goals.is_enabled()
            || self.reviews.is_enabled()
            || self.prison_events.is_enabled()
    }

    /// The categories in the OR-set.
    pub fn enabled_categories(&self) -> impl Iterator<Item = TimelineCategory> {
        [
            (self.inductions, TimelineCategory::Induction),
            (self.goals, TimelineCategory::Goal),
            (self.reviews, TimelineCategory::Review),
            (self.prison_events, TimelineCategory::PrisonMovement),
        ]
        .into_iter()
        .filter(|(toggle, _)| toggle.is_enabled())
        .map(|(_, category)| category)
    }
}
