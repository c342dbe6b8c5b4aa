//! Error types for Almanac.

use thiserror::Error;

/// Main error type for Almanac operations.
#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to load events from {path}: {reason}")]
    Events { path: String, reason: String },
}

/// Calendar query and normalization errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Re-anchoring a date onto another year produced a date that does not exist.
    #[error("Invalid date: {year:04}-{month:02}-{day:02} does not exist")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Unknown view mode: {0}")]
    UnknownViewMode(String),

    #[error("Unknown calendar: {0}")]
    UnknownCalendar(String),

    #[error("Calendar already registered: {0}")]
    DuplicateCalendar(String),
}

/// Result type alias for Almanac operations.
pub type Result<T> = std::result::Result<T, AlmanacError>;
