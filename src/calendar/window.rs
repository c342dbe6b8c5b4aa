//! Window engine for day, week, month and schedule views.
//!
//! Day/week/month views derive a half-open [`TimeWindow`] from "now" and keep
//! the events whose normalized span matches it under the configured
//! [`MatchPolicy`]. Schedule views take the first `count` events in list order
//! with no time filtering. Results always preserve the input order.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::error::CalendarError;

use super::normalize::{normalize, NormalizedSpan};
use super::types::{CalendarEvent, MatchPolicy, ViewMode, ViewQuery};

// ============================================================================
// Time Window
// ============================================================================

/// A half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The UTC day containing `now`.
    pub fn day(now: DateTime<Utc>) -> Self {
        let start = start_of_day(now);
        Self::new(start, start + Duration::days(1))
    }

    /// From the most recent Monday (today if it is Monday) for six days.
    ///
    /// The start keeps `now`'s time of day, so the window ends on Sunday at
    /// that same time of day.
    pub fn week(now: DateTime<Utc>) -> Self {
        let start = now - Duration::days(now.weekday().num_days_from_monday() as i64);
        Self::new(start, start + Duration::days(6))
    }

    /// From midnight on the first of the month to midnight on its last day.
    pub fn month(now: DateTime<Utc>) -> Self {
        let today = start_of_day(now);
        let start = today - Duration::days(now.day0() as i64);
        let remaining = days_in_month(now.year(), now.month()) - now.day();
        Self::new(start, today + Duration::days(remaining as i64))
    }

    /// Window for a view mode, or `None` for schedule views.
    pub fn for_mode(mode: ViewMode, now: DateTime<Utc>) -> Option<Self> {
        match mode {
            ViewMode::Day => Some(Self::day(now)),
            ViewMode::Week => Some(Self::week(now)),
            ViewMode::Month => Some(Self::month(now)),
            ViewMode::Schedule => None,
        }
    }

    /// Whether `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether a normalized event span matches this window.
    pub fn matches(&self, span: &NormalizedSpan, policy: MatchPolicy) -> bool {
        match policy {
            MatchPolicy::Endpoint => self.contains(span.start) || self.contains(span.end),
            MatchPolicy::Overlap => span.start < self.end && span.end > self.start,
        }
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN))
}

/// Get the number of days in a month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

// ============================================================================
// View Computation
// ============================================================================

/// Take the first `count` events in list order.
pub fn schedule(events: &[CalendarEvent], count: usize) -> Vec<&CalendarEvent> {
    events.iter().take(count).collect()
}

/// Compute the events matching `query` at `now`, in their original order.
///
/// Day/week/month views normalize every event onto `now`'s year; the first
/// event that cannot be normalized aborts the query.
pub fn compute_view<'a>(
    events: &'a [CalendarEvent],
    query: &ViewQuery,
    now: DateTime<Utc>,
    policy: MatchPolicy,
) -> std::result::Result<Vec<&'a CalendarEvent>, CalendarError> {
    let Some(window) = TimeWindow::for_mode(query.mode, now) else {
        return Ok(schedule(events, query.count));
    };

    debug!(
        mode = %query.mode,
        start = %window.start,
        end = %window.end,
        "Computing calendar view"
    );

    let year = now.year();
    let mut matched = Vec::new();
    for event in events {
        let span = normalize(event, year)?;
        if window.matches(&span, policy) {
            matched.push(event);
        }
    }

    Ok(matched)
}

// ============================================================================
// Tests
// ============================================================================
