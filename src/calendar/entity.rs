//! Calendar entity holding an event list and its derived busy/free state.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;

use super::clock::{Clock, SystemClock};
use super::status::{current_events, derive_status};
use super::types::{
    CalendarEvent, CalendarListing, CalendarState, MatchPolicy, ViewQuery, ATTR_CURRENT,
    ATTR_UPCOMING, DEFAULT_COUNT,
};
use super::window::{compute_view, schedule};

/// Shared, immutable snapshot of an entity's event list.
pub type EventList = Arc<Vec<CalendarEvent>>;

// ============================================================================
// Calendar Entity
// ============================================================================

/// A calendar exposing now/upcoming/view queries over its event list.
///
/// The event list is replaced wholesale by [`CalendarEntity::set_events`];
/// queries take a snapshot of the current list so they never observe a
/// partially replaced one. The state only changes on [`CalendarEntity::refresh`].
pub struct CalendarEntity {
    entity_id: String,
    name: String,
    events: RwLock<Option<EventList>>,
    state: RwLock<Option<CalendarState>>,
    clock: Arc<dyn Clock>,
    match_policy: MatchPolicy,
}

impl CalendarEntity {
    /// Create an entity with an initial event list and no state.
    pub fn new(
        entity_id: impl Into<String>,
        name: impl Into<String>,
        events: Vec<CalendarEvent>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            name: name.into(),
            events: RwLock::new(Some(Arc::new(events))),
            state: RwLock::new(None),
            clock: Arc::new(SystemClock),
            match_policy: MatchPolicy::default(),
        }
    }

    /// Use a specific clock as the source of "now".
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set how day/week/month views match events.
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    /// The state computed by the last refresh, if any.
    pub fn state(&self) -> Option<CalendarState> {
        *self.state.read()
    }

    /// Directory entry for this entity.
    pub fn listing(&self) -> CalendarListing {
        CalendarListing {
            name: self.name.clone(),
            entity_id: self.entity_id.clone(),
        }
    }

    /// Snapshot of the current event list.
    pub fn events(&self) -> Option<EventList> {
        self.events.read().clone()
    }

    /// Replace the event list. `None` marks the list as absent.
    pub fn set_events(&self, events: Option<Vec<CalendarEvent>>) {
        let count = events.as_ref().map(Vec::len);
        *self.events.write() = events.map(Arc::new);
        debug!(entity_id = %self.entity_id, ?count, "Replaced calendar events");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Events happening right now.
    pub fn current_events(&self) -> Result<Vec<CalendarEvent>> {
        let Some(events) = self.events() else {
            return Ok(Vec::new());
        };
        let current = current_events(&events, self.clock.now())?;
        Ok(current.into_iter().cloned().collect())
    }

    /// The first `count` events in list order.
    pub fn upcoming_events(&self, count: usize) -> Vec<CalendarEvent> {
        match self.events() {
            Some(events) => schedule(&events, count).into_iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Events matching a view query, in list order.
    pub fn view_events(&self, query: &ViewQuery) -> Result<Vec<CalendarEvent>> {
        let Some(events) = self.events() else {
            return Ok(Vec::new());
        };
        let view = compute_view(&events, query, self.clock.now(), self.match_policy)?;
        Ok(view.into_iter().cloned().collect())
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Recompute the busy/free state from the current event list.
    ///
    /// On failure the previous state is kept.
    pub fn refresh(&self) -> Result<CalendarState> {
        let events = self.events();
        let state = derive_status(events.as_ref().map(|e| e.as_slice()), self.clock.now())?;

        let previous = self.state.write().replace(state);
        if previous != Some(state) {
            debug!(entity_id = %self.entity_id, %state, "Calendar state changed");
        }
        Ok(state)
    }

    /// Attributes reported alongside the state.
    ///
    /// `current` and `upcoming` are omitted when empty.
    pub fn state_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();

        match self.current_events() {
            Ok(current) if !current.is_empty() => {
                attributes.insert(ATTR_CURRENT.to_string(), events_to_value(&current));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(entity_id = %self.entity_id, error = %e, "Failed to compute current events");
            }
        }

        let upcoming = self.upcoming_events(DEFAULT_COUNT);
        if !upcoming.is_empty() {
            attributes.insert(ATTR_UPCOMING.to_string(), events_to_value(&upcoming));
        }

        attributes
    }
}

impl std::fmt::Debug for CalendarEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarEntity")
            .field("entity_id", &self.entity_id)
            .field("name", &self.name)
            .field("state", &self.state())
            .field("match_policy", &self.match_policy)
            .finish()
    }
}

fn events_to_value(events: &[CalendarEvent]) -> Value {
    Value::Array(events.iter().map(CalendarEvent::attributes).collect())
}

// ============================================================================
// Tests
// ============================================================================
