//! Almanac: calendar entities with time-window queries
//!
//! Calendars hold a list of events and answer "what is happening now",
//! "what is coming up next" and "what falls in this day/week/month/schedule
//! view". Each calendar derives a busy/free state from its current events,
//! and the whole set is served over a small HTTP API.

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod server;

pub use api::{create_rest_router, ApiState, RestApiConfig};
pub use calendar::{
    CalendarEntity, CalendarEvent, CalendarListing, CalendarLookup, CalendarRegistry,
    CalendarState, Clock, EventStatus, FixedClock, MatchPolicy, SystemClock, TimeWindow, ViewMode,
    ViewQuery,
};
pub use config::Config;
pub use error::{AlmanacError, CalendarError, ConfigError, Result};
