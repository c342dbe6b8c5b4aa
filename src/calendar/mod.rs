//! Calendar entities and event-window queries.
//!
//! This module answers three questions about a list of events:
//!
//! - **Now**: which events are currently happening, and whether the calendar
//!   is therefore busy or free
//! - **Upcoming**: the next N events in list order
//! - **View**: which events fall in the current day, week or month, or the
//!   next N events for a schedule view
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Calendar Layer                              │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │              CalendarRegistry                             │  │
//! │  │  - Lookup by entity id                                    │  │
//! │  │  - Sorted directory                                       │  │
//! │  │  - Periodic refresh                                       │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │                           │                                      │
//! │                           ▼                                      │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │              CalendarEntity                               │  │
//! │  │  - Event list snapshot                                    │  │
//! │  │  - current / upcoming / view queries                      │  │
//! │  │  - busy/free state                                        │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │                           │                                      │
//! │                           ▼                                      │
//! │  ┌──────────────────────┐  ┌──────────────────────────────────┐ │
//! │  │  window / status     │  │  normalize                       │ │
//! │  │  - TimeWindow        │─▶│  - re-anchor onto current year   │ │
//! │  │  - busy/free         │  │  - convert to UTC                │ │
//! │  └──────────────────────┘  └──────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use almanac::calendar::{CalendarEntity, CalendarRegistry, ViewMode, ViewQuery};
//!
//! let registry = CalendarRegistry::new();
//! let entity = registry.register(CalendarEntity::new("calendar.work", "Work", events))?;
//!
//! let today = entity.view_events(&ViewQuery::new(ViewMode::Day))?;
//! let next_three = entity.upcoming_events(3);
//! let state = entity.refresh()?;
//! ```

pub mod clock;
mod entity;
pub mod normalize;
pub mod registry;
pub mod status;
pub mod types;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::{CalendarEntity, EventList};
pub use normalize::{normalize, reanchor, NormalizedSpan};
pub use registry::{directory, refresh_all, spawn_refresh_loop, CalendarLookup, CalendarRegistry};
pub use status::{current_events, derive_status};
pub use types::{
    CalendarEvent, CalendarListing, CalendarState, EventStatus, MatchPolicy, ViewMode, ViewQuery,
    ATTR_CURRENT, ATTR_UPCOMING, DEFAULT_COUNT,
};
pub use window::{compute_view, days_in_month, schedule, TimeWindow};
