//! Conversion of prisoner-search prison periods into movement events.
//!
//! Prisoner-search reports a person's history as a list of prison periods,
//! one per booking. Each period carries the dates the person came into and
//! went out of prison plus any transfers between prisons. Every complete
//! entry becomes one system-initiated [`TimelineEvent`]:
//!
//! | Entry | Event | Prison | Timestamp |
//! |-------|-------|--------|-----------|
//! | movement in | `PRISON_ADMISSION` | `inwardPrisonId` | `dateInToPrison` |
//! | movement out | `PRISON_RELEASE` | `outwardPrisonId` | `dateOutOfPrison` |
//! | transfer | `PRISON_TRANSFER` | `toPrisonId` | `dateInToPrison` |
//!
//! Transfers record the prison they came from under
//! [`ContextKey::PrisonTransferredFrom`]. Dates are wall-clock times and are
//! interpreted in the service's [`TimelineZone`].

use chrono::NaiveDateTime;
use serde::Deserialize;
use workplan_types::{ContextKey, PrisonId, TimelineEvent, TimelineEventType};

use crate::zone::TimelineZone;

/// Response body of the prisoner-search prison periods endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrisonerInPrisonSummary {
    /// Prison number the periods belong to.
    #[serde(default)]
    pub prison_number: Option<String>,
    /// One entry per booking.
    #[serde(default)]
    pub prison_period: Vec<PrisonPeriod>,
}

/// One booking's worth of movements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrisonPeriod {
    /// Booking the movements belong to.
    pub booking_id: String,
    /// First entry into prison for this booking.
    #[serde(default)]
    pub entry_date: Option<NaiveDateTime>,
    /// Final release for this booking, if released.
    #[serde(default)]
    pub release_date: Option<NaiveDateTime>,
    /// Entries into and exits out of prison.
    #[serde(default)]
    pub movement_dates: Vec<MovementDate>,
    /// Transfers between prisons.
    #[serde(default)]
    pub transfers: Vec<TransferDetail>,
}

/// A spell in prison: how and when the person came in and went out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementDate {
    /// Reason for coming into prison.
    #[serde(default)]
    pub reason_in_to_prison: Option<String>,
    /// When the person came into prison.
    #[serde(default)]
    pub date_in_to_prison: Option<NaiveDateTime>,
    /// Prison the person came into.
    #[serde(default)]
    pub inward_prison_id: Option<String>,
    /// Reason for leaving prison.
    #[serde(default)]
    pub reason_out_of_prison: Option<String>,
    /// When the person left prison.
    #[serde(default)]
    pub date_out_of_prison: Option<NaiveDateTime>,
    /// Prison the person left.
    #[serde(default)]
    pub outward_prison_id: Option<String>,
}

/// A move from one prison to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDetail {
    /// When the person left the old prison.
    #[serde(default)]
    pub date_out_of_prison: Option<NaiveDateTime>,
    /// When the person arrived at the new prison.
    #[serde(default)]
    pub date_in_to_prison: Option<NaiveDateTime>,
    /// Prison the person left.
    #[serde(default)]
    pub from_prison_id: Option<String>,
    /// Prison the person arrived at.
    #[serde(default)]
    pub to_prison_id: Option<String>,
}

/// Convert every complete movement in `summary` into an event.
///
/// The returned events are in source order; callers sort them by adding
/// them to a [`Timeline`](workplan_types::Timeline).
pub fn movement_events(summary: &PrisonerInPrisonSummary, zone: TimelineZone) -> Vec<TimelineEvent> {
    let mut events = Vec::new();

    for period in &summary.prison_period {
        for movement in &period.movement_dates {
            events.extend(admission(period, movement, zone));
            events.extend(release(period, movement, zone));
        }
        for transfer in &period.transfers {
            events.extend(transfer_event(period, transfer, zone));
        }
    }

    tracing::debug!(
        prison_number = summary.prison_number.as_deref().unwrap_or_default(),
        periods = summary.prison_period.len(),
        events = events.len(),
        "Converted prison periods to movement events"
    );

    events
}

fn admission(
    period: &PrisonPeriod,
    movement: &MovementDate,
    zone: TimelineZone,
) -> Option<TimelineEvent> {
    match (&movement.date_in_to_prison, &movement.inward_prison_id) {
        (Some(at), Some(prison)) => Some(
            TimelineEvent::system(
                &period.booking_id,
                TimelineEventType::PrisonAdmission,
                PrisonId::new(prison.as_str()),
            )
            .with_timestamp(zone.to_utc(*at)),
        ),
        (None, None) => None,
        _ => {
            tracing::debug!(booking_id = %period.booking_id, "Skipping incomplete admission");
            None
        }
    }
}

fn release(
    period: &PrisonPeriod,
    movement: &MovementDate,
    zone: TimelineZone,
) -> Option<TimelineEvent> {
    match (&movement.date_out_of_prison, &movement.outward_prison_id) {
        (Some(at), Some(prison)) => Some(
            TimelineEvent::system(
                &period.booking_id,
                TimelineEventType::PrisonRelease,
                PrisonId::new(prison.as_str()),
            )
            .with_timestamp(zone.to_utc(*at)),
        ),
        (None, None) => None,
        _ => {
            tracing::debug!(booking_id = %period.booking_id, "Skipping incomplete release");
            None
        }
    }
}

fn transfer_event(
    period: &PrisonPeriod,
    transfer: &TransferDetail,
    zone: TimelineZone,
) -> Option<TimelineEvent> {
    let (Some(at), Some(from), Some(to)) = (
        &transfer.date_in_to_prison,
        &transfer.from_prison_id,
        &transfer.to_prison_id,
    ) else {
        tracing::debug!(booking_id = %period.booking_id, "Skipping incomplete transfer");
        return None;
    };

    Some(
        TimelineEvent::system(
            &period.booking_id,
            TimelineEventType::PrisonTransfer,
            PrisonId::new(to.as_str()),
        )
        .with_context(ContextKey::PrisonTransferredFrom, from.as_str())
        .with_timestamp(zone.to_utc(*at)),
    )
}
