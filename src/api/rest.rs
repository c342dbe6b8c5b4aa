//! REST API router and configuration.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{
    calendar_events_handler, calendar_state_handler, health_handler, list_calendars_handler,
    ApiState,
};
use crate::calendar::{CalendarLookup, DEFAULT_COUNT};
use crate::config::Config;

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// Enable CORS.
    pub enable_cors: bool,
    /// API prefix (e.g., "/api/v2").
    pub prefix: String,
    /// Count used by schedule views when the request carries none.
    pub default_count: usize,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            prefix: "/api/v2".to_string(),
            default_count: DEFAULT_COUNT,
        }
    }
}

impl From<&Config> for RestApiConfig {
    fn from(config: &Config) -> Self {
        Self {
            enable_cors: config.api.enable_cors,
            prefix: config.api.prefix.clone(),
            default_count: config.calendar.default_count,
        }
    }
}

/// Create the REST API router.
///
/// Endpoints:
/// - GET /api/v2/calendars                           - Calendar directory
/// - GET /api/v2/calendars/:entity_id?mode=&count=   - Events for a view
/// - GET /api/v2/states/:entity_id                   - State and attributes
/// - GET /health                                     - Liveness check
pub fn create_rest_router(calendars: Arc<dyn CalendarLookup>, config: &RestApiConfig) -> Router {
    let state = Arc::new(ApiState::new(calendars, config.default_count));

    let api_routes = Router::new()
        .route("/calendars", get(list_calendars_handler))
        .route("/calendars/:entity_id", get(calendar_events_handler))
        .route("/states/:entity_id", get(calendar_state_handler))
        .with_state(state);

    // Nesting at the root is not allowed, so an empty prefix merges instead
    let prefix = config.prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(api_routes)
    } else {
        Router::new().nest(prefix, api_routes)
    };
    let router = router.route("/health", get(health_handler));

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}
