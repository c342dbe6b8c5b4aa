//! Configuration settings for Almanac.

use crate::calendar::{CalendarEvent, MatchPolicy, DEFAULT_COUNT};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Domain every calendar entity id must belong to.
pub const CALENDAR_DOMAIN: &str = "calendar";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub calendar: CalendarSettings,
    pub calendars: Vec<CalendarSource>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("almanac.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("almanac/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".almanac/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if !self.api.prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "api.prefix must start with '/': {:?}",
                self.api.prefix
            ))
            .into());
        }

        if self.calendar.default_count == 0 {
            return Err(
                ConfigError::Invalid("calendar.default_count must be > 0".to_string()).into(),
            );
        }

        let mut seen = HashSet::new();
        for source in &self.calendars {
            if source.entity_id.is_empty() {
                return Err(ConfigError::MissingField("calendars.entity_id".to_string()).into());
            }
            let in_domain = source
                .entity_id
                .split_once('.')
                .is_some_and(|(domain, object_id)| {
                    domain == CALENDAR_DOMAIN && !object_id.is_empty()
                });
            if !in_domain {
                return Err(ConfigError::Invalid(format!(
                    "entity_id must look like '{}.<name>': {}",
                    CALENDAR_DOMAIN, source.entity_id
                ))
                .into());
            }
            if !seen.insert(source.entity_id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate calendar entity_id: {}",
                    source.entity_id
                ))
                .into());
            }
        }

        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: String,
    /// HTTP port.
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            http_port: 8123,
        }
    }
}

/// HTTP API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Route prefix for the calendar endpoints.
    pub prefix: String,
    /// Enable permissive CORS.
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api/v2".to_string(),
            enable_cors: true,
        }
    }
}

/// Calendar query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Count used by schedule views when the request carries none.
    pub default_count: usize,
    /// How day/week/month views match events.
    pub match_policy: MatchPolicy,
    /// Seconds between state refreshes (0 disables periodic refresh).
    pub refresh_interval_secs: u64,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_COUNT,
            match_policy: MatchPolicy::default(),
            refresh_interval_secs: 60,
        }
    }
}

/// A configured calendar and where its events come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSource {
    /// Entity identifier, e.g. `calendar.personal`.
    pub entity_id: String,
    /// Display name.
    pub name: String,
    /// JSON file holding an array of events.
    pub events_path: Option<String>,
    /// Events declared inline.
    pub events: Vec<CalendarEvent>,
}

impl CalendarSource {
    /// Inline events followed by the contents of the events file, if any.
    pub fn load_events(&self) -> Result<Vec<CalendarEvent>> {
        let mut events = self.events.clone();
        if let Some(path) = &self.events_path {
            events.extend(load_events_file(path)?);
        }
        Ok(events)
    }
}

/// Read a JSON array of events, expanding `~` in the path.
pub fn load_events_file(path: &str) -> Result<Vec<CalendarEvent>> {
    let expanded = shellexpand::tilde(path);
    let content = std::fs::read_to_string(expanded.as_ref()).map_err(|e| ConfigError::Events {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let events = serde_json::from_str(&content).map_err(|e| ConfigError::Events {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(events)
}
