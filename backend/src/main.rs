//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use trust_engine::inbound::http::health::HealthState;
use trust_engine::server::{ServerSettings, build_state, create_server};

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

    let settings = ServerSettings::load().map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("failed to load configuration: {err}"),
        )
    })?;

    let http_state = build_state(&settings)
        .await
        .map_err(std::io::Error::other)?;
    if settings.database_url.is_none() {
        warn!("no database configured; using in-memory stores");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, &settings)?;
    info!(bind_addr = %settings.bind_addr, "server started");
    server.await
}
