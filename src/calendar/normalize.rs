//! Re-anchoring of stored events onto a reference year.
//!
//! Stored events carry no year-aware recurrence: only their month, day and
//! time of day are meaningful. Before any comparison against "now" both
//! endpoints are moved onto the reference year and converted to UTC.

use chrono::{DateTime, Datelike, FixedOffset, Utc};

use crate::error::CalendarError;

use super::types::CalendarEvent;

/// An event's start and end after re-anchoring, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl NormalizedSpan {
    /// Whether `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Replace the year of `value` with `year`, keeping month, day, time and offset,
/// then convert to UTC.
///
/// Fails when the date does not exist in `year` (Feb 29 outside a leap year).
pub fn reanchor(
    value: &DateTime<FixedOffset>,
    year: i32,
) -> std::result::Result<DateTime<Utc>, CalendarError> {
    value
        .with_year(year)
        .map(|anchored| anchored.with_timezone(&Utc))
        .ok_or(CalendarError::InvalidDate {
            year,
            month: value.month(),
            day: value.day(),
        })
}

/// Normalize both endpoints of `event` onto `reference_year`.
pub fn normalize(
    event: &CalendarEvent,
    reference_year: i32,
) -> std::result::Result<NormalizedSpan, CalendarError> {
    Ok(NormalizedSpan {
        start: reanchor(&event.start, reference_year)?,
        end: reanchor(&event.end, reference_year)?,
    })
}
