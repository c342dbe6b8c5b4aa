//! Busy/free derivation from the events happening right now.

use chrono::{DateTime, Datelike, Utc};

use crate::error::CalendarError;

use super::normalize::normalize;
use super::types::{CalendarEvent, CalendarState};

/// Events whose normalized span contains `now`, in list order.
///
/// The span is `[start, end)` with both endpoints re-anchored onto `now`'s year.
pub fn current_events(
    events: &[CalendarEvent],
    now: DateTime<Utc>,
) -> std::result::Result<Vec<&CalendarEvent>, CalendarError> {
    let year = now.year();
    let mut current = Vec::new();
    for event in events {
        if normalize(event, year)?.contains(now) {
            current.push(event);
        }
    }
    Ok(current)
}

/// Reduce the currently happening events to a busy/free state.
///
/// An absent event list is free, not an error.
pub fn derive_status(
    events: Option<&[CalendarEvent]>,
    now: DateTime<Utc>,
) -> std::result::Result<CalendarState, CalendarError> {
    let Some(events) = events else {
        return Ok(CalendarState::Free);
    };

    if current_events(events, now)?.is_empty() {
        Ok(CalendarState::Free)
    } else {
        Ok(CalendarState::Busy)
    }
}
