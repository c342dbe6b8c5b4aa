//! Registry of calendar entities: lookup by id, directory listing, refresh.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CalendarError, Result};

use super::clock::Clock;
use super::entity::CalendarEntity;
use super::types::CalendarListing;

/// Resolves calendar entities by id.
pub trait CalendarLookup: Send + Sync {
    /// Find an entity by its id.
    fn resolve(&self, entity_id: &str) -> Option<Arc<CalendarEntity>>;

    /// All entities, in registration order.
    fn entities(&self) -> Vec<Arc<CalendarEntity>>;
}

/// In-memory calendar registry.
#[derive(Debug, Default)]
pub struct CalendarRegistry {
    entities: RwLock<Vec<Arc<CalendarEntity>>>,
}

impl CalendarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every calendar declared in `config`.
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let registry = Self::new();
        for source in &config.calendars {
            let events = source.load_events()?;
            let entity = CalendarEntity::new(&source.entity_id, &source.name, events)
                .with_clock(clock.clone())
                .with_match_policy(config.calendar.match_policy);
            registry.register(entity)?;
        }
        info!(calendars = registry.len(), "Calendar registry loaded");
        Ok(registry)
    }

    /// Register an entity and compute its initial state.
    pub fn register(&self, entity: CalendarEntity) -> Result<Arc<CalendarEntity>> {
        let mut entities = self.entities.write();
        if entities.iter().any(|e| e.entity_id() == entity.entity_id()) {
            return Err(CalendarError::DuplicateCalendar(entity.entity_id().to_string()).into());
        }

        let entity = Arc::new(entity);
        if let Err(e) = entity.refresh() {
            warn!(entity_id = %entity.entity_id(), error = %e, "Initial refresh failed");
        }
        entities.push(entity.clone());
        debug!(entity_id = %entity.entity_id(), "Registered calendar");
        Ok(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }
}

impl CalendarLookup for CalendarRegistry {
    fn resolve(&self, entity_id: &str) -> Option<Arc<CalendarEntity>> {
        self.entities
            .read()
            .iter()
            .find(|e| e.entity_id() == entity_id)
            .cloned()
    }

    fn entities(&self) -> Vec<Arc<CalendarEntity>> {
        self.entities.read().clone()
    }
}

/// Listing of every calendar, sorted by name.
///
/// The sort is case-sensitive and stable, so calendars sharing a name keep
/// their registration order.
pub fn directory(lookup: &dyn CalendarLookup) -> Vec<CalendarListing> {
    let mut listings: Vec<CalendarListing> =
        lookup.entities().iter().map(|e| e.listing()).collect();
    listings.sort_by(|a, b| a.name.cmp(&b.name));
    listings
}

/// Refresh every entity, returning how many refreshes failed.
pub fn refresh_all(lookup: &dyn CalendarLookup) -> usize {
    let mut failures = 0;
    for entity in lookup.entities() {
        if let Err(e) = entity.refresh() {
            failures += 1;
            warn!(entity_id = %entity.entity_id(), error = %e, "Calendar refresh failed");
        }
    }
    failures
}

/// Refresh every entity on a fixed interval until the task is aborted.
pub fn spawn_refresh_loop(lookup: Arc<dyn CalendarLookup>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let failures = refresh_all(lookup.as_ref());
            debug!(failures, "Refreshed calendars");
        }
    })
}
