//! HTTP server for the calendar API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::api::{create_rest_router, RestApiConfig};
use crate::calendar::{spawn_refresh_loop, CalendarLookup};
use crate::config::Config;

/// Build the application router for `calendars`.
pub fn build_app(calendars: Arc<dyn CalendarLookup>, config: &Config) -> Router {
    let api_config = RestApiConfig::from(config);
    create_rest_router(calendars, &api_config).route("/", axum::routing::get(root_handler))
}

/// Serve the calendar API until Ctrl-C.
pub async fn run_http(calendars: Arc<dyn CalendarLookup>, config: Config) -> Result<()> {
    let refresh = match config.calendar.refresh_interval_secs {
        0 => None,
        secs => Some(spawn_refresh_loop(
            calendars.clone(),
            Duration::from_secs(secs),
        )),
    };

    let app = build_app(calendars, &config);

    let host = config.server.host.as_str();
    let port = config.server.http_port;
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {}:{}", host, port))?;

    info!("Almanac listening on http://{}", listener.local_addr()?);
    info!("Calendar API available under {}", config.api.prefix);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = refresh {
        handle.abort();
    }

    info!("Almanac shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Root handler with basic info.
async fn root_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "almanac",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Calendar entities with now/upcoming/view queries",
        "endpoints": {
            "health": "/health"
        }
    }))
}
