//! Calendar types for events, view queries and entity state.
//!
//! This module defines the value types shared by the window engine, the
//! calendar entity and the HTTP surface.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Default number of events returned by schedule and upcoming queries.
pub const DEFAULT_COUNT: usize = 10;

/// Attribute key for the currently happening events.
pub const ATTR_CURRENT: &str = "current";
/// Attribute key for the next events in list order.
pub const ATTR_UPCOMING: &str = "upcoming";

// ============================================================================
// Calendar Event
// ============================================================================

/// A single calendar event.
///
/// Start and end are wall-clock date-times carrying their original offset.
/// Every other attribute is optional and is omitted from the serialized form
/// when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Identifier assigned by the backing source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Event title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Event description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location of the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Start of the event.
    pub start: DateTime<FixedOffset>,
    /// End of the event.
    pub end: DateTime<FixedOffset>,
    /// Confirmation status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    /// Organizer of the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    /// Creator of the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// When the event was created upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<FixedOffset>>,
    /// When the event was last updated upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
    /// iCalendar UID, used to deduplicate events across sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ical_uid: Option<String>,
    /// Link to the event in its source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CalendarEvent {
    /// Create an event spanning `start` to `end` with no other attributes.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            id: None,
            title: None,
            description: None,
            location: None,
            start,
            end,
            status: None,
            organizer: None,
            creator: None,
            created: None,
            updated: None,
            ical_uid: None,
            url: None,
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the organizer.
    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }

    /// Set the creator.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the created and updated timestamps.
    pub fn with_timestamps(
        mut self,
        created: DateTime<FixedOffset>,
        updated: DateTime<FixedOffset>,
    ) -> Self {
        self.created = Some(created);
        self.updated = Some(updated);
        self
    }

    /// Set the iCalendar UID.
    pub fn with_ical_uid(mut self, ical_uid: impl Into<String>) -> Self {
        self.ical_uid = Some(ical_uid.into());
        self
    }

    /// Set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Serialize the event into its attribute map.
    pub fn attributes(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Confirmation status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

// ============================================================================
// Entity State
// ============================================================================

/// Derived busy/free state of a calendar entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarState {
    /// At least one event is currently happening.
    Busy,
    /// Nothing is happening right now.
    Free,
}

impl CalendarState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarState::Busy => "busy",
            CalendarState::Free => "free",
        }
    }
}

impl fmt::Display for CalendarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// View Queries
// ============================================================================

/// How the window of a view query is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// From the first of the current month to the start of its last day.
    Month,
    /// Seven calendar days starting at the most recent Monday.
    Week,
    /// The current UTC day.
    Day,
    /// The next `count` events in list order, no time filtering.
    Schedule,
}

impl ViewMode {
    /// All recognized view modes.
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Month,
        ViewMode::Week,
        ViewMode::Day,
        ViewMode::Schedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
            ViewMode::Schedule => "schedule",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| CalendarError::UnknownViewMode(s.to_string()))
    }
}

/// An ephemeral view request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewQuery {
    /// View mode.
    pub mode: ViewMode,
    /// Number of events for schedule views; ignored by the other modes.
    pub count: usize,
}

impl ViewQuery {
    /// Create a query for the given mode with the default count.
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            count: DEFAULT_COUNT,
        }
    }

    /// Create a schedule query for the next `count` events.
    pub fn schedule(count: usize) -> Self {
        Self {
            mode: ViewMode::Schedule,
            count,
        }
    }

    /// Set the count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// How day/week/month views decide whether an event falls inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The event's start or its end lies inside the window.
    ///
    /// Events spanning the whole window are not matched.
    #[default]
    Endpoint,
    /// The event interval intersects the window.
    Overlap,
}

// ============================================================================
// Directory
// ============================================================================

/// A single entry of the calendar directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarListing {
    /// Display name of the calendar.
    pub name: String,
    /// Entity identifier, e.g. `calendar.personal`.
    pub entity_id: String,
}
