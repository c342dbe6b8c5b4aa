//! REST API request handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::num::IntErrorKind;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::calendar::{directory, CalendarLookup, CalendarState, ViewMode, ViewQuery};

/// Application state shared across handlers.
pub struct ApiState {
    /// Calendar lookup used to resolve entity ids.
    pub calendars: Arc<dyn CalendarLookup>,
    /// Count used by schedule views when the request carries none.
    pub default_count: usize,
}

impl ApiState {
    /// Create new API state.
    pub fn new(calendars: Arc<dyn CalendarLookup>, default_count: usize) -> Self {
        Self {
            calendars,
            default_count,
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters of a calendar view request.
///
/// Both are kept as raw strings so that malformed values map to a bare 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewParams {
    /// View mode: month, week, day or schedule.
    #[serde(default)]
    pub mode: Option<String>,
    /// Number of events for schedule views.
    #[serde(default)]
    pub count: Option<String>,
}

impl ViewParams {
    /// Validate into a view query, or `None` for a bad request.
    pub fn into_query(self, default_count: usize) -> Option<ViewQuery> {
        let mode: ViewMode = self.mode?.parse().ok()?;
        let count = match self.count {
            Some(raw) => parse_count(raw.trim())?,
            None => default_count,
        };
        Some(ViewQuery::new(mode).with_count(count))
    }
}

/// Parse a schedule count.
///
/// A negative count never stops the truncation, so it means "no limit".
/// Integers outside the `i64` range saturate instead of being rejected.
fn parse_count(raw: &str) -> Option<usize> {
    match raw.parse::<i64>() {
        Ok(n) if n < 0 => Some(usize::MAX),
        Ok(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Some(usize::MAX),
            _ => None,
        },
    }
}

/// Entity state response.
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub entity_id: String,
    pub name: String,
    /// `None` until the first refresh.
    pub state: Option<CalendarState>,
    pub attributes: Map<String, Value>,
}

// ============================================================================
// Handler Functions
// ============================================================================

/// GET /api/v2/calendars - List calendars sorted by name.
pub async fn list_calendars_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(directory(state.calendars.as_ref()))
}

/// GET /api/v2/calendars/:entity_id - Events of a calendar for a view.
pub async fn calendar_events_handler(
    State(state): State<Arc<ApiState>>,
    Path(entity_id): Path<String>,
    Query(params): Query<ViewParams>,
) -> Response {
    let Some(entity) = state.calendars.resolve(&entity_id) else {
        debug!(%entity_id, "View requested for unknown calendar");
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(query) = params.into_query(state.default_count) else {
        debug!(%entity_id, "Rejected invalid view parameters");
        return StatusCode::BAD_REQUEST.into_response();
    };

    match entity.view_events(&query) {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(e) => {
            warn!(%entity_id, mode = %query.mode, error = %e, "Calendar view failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /api/v2/states/:entity_id - State and attributes of a calendar.
pub async fn calendar_state_handler(
    State(state): State<Arc<ApiState>>,
    Path(entity_id): Path<String>,
) -> Response {
    match state.calendars.resolve(&entity_id) {
        Some(entity) => (
            StatusCode::OK,
            Json(StateResponse {
                entity_id: entity.entity_id().to_string(),
                name: entity.name().to_string(),
                state: entity.state(),
                attributes: entity.state_attributes(),
            }),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /health - Liveness check.
pub async fn health_handler() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
