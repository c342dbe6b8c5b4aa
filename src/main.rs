//! Almanac server and CLI entry point

use std::sync::Arc;

use almanac::calendar::{CalendarRegistry, SystemClock};
use almanac::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Almanac: calendar entities with now/upcoming/view queries
#[derive(Parser, Debug)]
#[command(name = "almanac")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default behavior)
    Serve {
        /// Address to bind. If not specified, uses config file value.
        #[arg(long)]
        host: Option<String>,
        /// HTTP port. If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
    /// List configured calendars sorted by name
    List,
    /// Show the events of a calendar for a view
    View {
        /// Calendar entity id, e.g. calendar.work
        entity_id: String,
        /// View mode: month, week, day or schedule
        #[arg(short, long, default_value = "schedule")]
        mode: String,
        /// Number of events for schedule views
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Show the busy/free state of a calendar
    State {
        /// Calendar entity id
        entity_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // For CLI commands (non-serve), use minimal logging
    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);

    if !is_serve {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    match args.command {
        Some(Command::Serve {
            host,
            port,
            json_logs,
        }) => run_server(&args.config, host, port, json_logs).await,
        Some(Command::List) => cli::run_list(load_config(&args.config)?, args.json),
        Some(Command::View {
            entity_id,
            mode,
            count,
        }) => cli::run_view(load_config(&args.config)?, entity_id, mode, count, args.json),
        Some(Command::State { entity_id }) => {
            cli::run_state(load_config(&args.config)?, entity_id, args.json)
        }
        None => run_server(&args.config, None, None, false).await,
    }
}

fn load_config(config_path: &Option<String>) -> anyhow::Result<Config> {
    let config = if let Some(config_path) = config_path {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };
    Ok(config)
}

/// Run the HTTP server.
async fn run_server(
    config_path: &Option<String>,
    host: Option<String>,
    port: Option<u16>,
    json_logs: bool,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Almanac v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(config_path)?;

    // Override from CLI args only if explicitly provided
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.http_port = port;
    }

    tracing::info!(
        calendars = config.calendars.len(),
        match_policy = ?config.calendar.match_policy,
        refresh_interval_secs = config.calendar.refresh_interval_secs,
        "Configuration loaded"
    );

    let registry = CalendarRegistry::from_config(&config, Arc::new(SystemClock))?;
    almanac::server::run_http(Arc::new(registry), config).await
}
