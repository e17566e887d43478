//! City locator entry-point: loads settings, wires adapters and serves the API.

mod server;

use actix_web::web;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use city_locator::inbound::http::health::HealthState;
use city_locator::settings::{AppSettings, BuildMode};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_process()
        .and_then(|settings| settings.validate(BuildMode::from_debug_assertions()))
        .map_err(|e| {
            error!(error = %e, "invalid configuration");
            std::io::Error::other(e.to_string())
        })?;
    let config = ServerConfig::from(settings);
    info!(bind_addr = %config.bind_addr, "starting city locator");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).inspect_err(|e| {
        error!(error = %e, "failed to start server");
    })?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
