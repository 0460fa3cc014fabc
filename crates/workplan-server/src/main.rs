//! Timeline service binary.
//!
//! Wires the `PostgreSQL` native event store and the prisoner-search
//! movement history into the timeline service and serves the HTTP API.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `workplan-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Create the prisoner-search client
//! 5. Serve the HTTP API until `Ctrl-C`

mod error;
mod prisoner_search;

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use workplan_api::{AppState, ServerConfig, start_server};
use workplan_core::TimelineService;
use workplan_core::config::{LogFormat, LoggingConfig, ServiceConfig};
use workplan_db::{PostgresConfig, PostgresPool};

use crate::error::ServerError;
use crate::prisoner_search::PrisonerSearchClient;

/// Default configuration file, relative to the working directory.
const CONFIG_PATH: &str = "workplan-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the server itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_tracing(&config.logging);

    info!(
        host = config.server.host,
        port = config.server.port,
        prisoner_search = config.prisoner_search.base_url,
        "workplan-server starting"
    );

    run(config).await?;

    info!("workplan-server stopped");
    Ok(())
}

async fn run(config: ServiceConfig) -> Result<(), ServerError> {
    let pool = PostgresPool::connect(&PostgresConfig::from(&config.database)).await?;
    if config.database.run_migrations {
        pool.run_migrations().await?;
    }

    let zone = config.timeline.zone();
    let movements = PrisonerSearchClient::new(&config.prisoner_search, zone)?;
    let service = TimelineService::new(pool.timeline_store(), movements).with_zone(zone);

    let state = Arc::new(AppState::new(service));
    let result = start_server(&ServerConfig::from(&config.server), state).await;

    pool.close().await;
    Ok(result?)
}

/// Load configuration from `workplan-config.yaml`, falling back to
/// defaults (plus environment overrides) when the file is absent.
fn load_config() -> Result<ServiceConfig, ServerError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(ServiceConfig::from_file(config_path)?)
    } else {
        let mut config = ServiceConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
