//! Time zone handling for day boundaries and upstream local times.
//!
//! Both the `events_since` day boundary and the wall-clock movement dates
//! returned by prisoner-search are interpreted in the service's zone:
//! the host's local zone unless a fixed offset is configured.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Zone used to interpret dates and wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineZone {
    /// The host's local zone.
    #[default]
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl TimelineZone {
    /// Build a zone from an optional offset in minutes east of UTC.
    /// Out-of-range offsets fall back to the local zone with a warning;
    /// configuration loading rejects them before they get here.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        let Some(minutes) = minutes else {
            return Self::Local;
        };
        Self::fixed_offset(minutes).map_or_else(
            || {
                tracing::warn!(
                    utc_offset_minutes = minutes,
                    "UTC offset out of range, using local zone"
                );
                Self::Local
            },
            Self::Fixed,
        )
    }

    /// The fixed offset for `minutes` east of UTC, if it is less than a
    /// day either way.
    pub fn fixed_offset(minutes: i32) -> Option<FixedOffset> {
        minutes.checked_mul(60).and_then(FixedOffset::east_opt)
    }

    /// The instant at which `date` starts in this zone.
    pub fn start_of_day(self, date: NaiveDate) -> DateTime<Utc> {
        self.to_utc(date.and_time(NaiveTime::MIN))
    }

    /// Interpret a wall-clock time in this zone.
    pub fn to_utc(self, local: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Self::Local => to_utc_in(&Local, local),
            Self::Fixed(offset) => to_utc_in(&offset, local),
        }
    }
}

/// Ambiguous times resolve to the earlier instant. Times that do not exist
/// locally (a DST gap) are read as UTC.
fn to_utc_in<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    zone.from_local_datetime(&local)
        .earliest()
        .map_or_else(|| local.and_utc(), |dt| dt.with_timezone(&Utc))
}
