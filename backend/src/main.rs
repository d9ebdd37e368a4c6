//! Tracker entry-point: loads configuration, prepares storage and serves the
//! REST API, health probes and (in debug builds) Swagger UI.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use tracker::inbound::http::health::HealthState;
use tracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
use tracker::outbound::persistence::{DbPool, run_pending_migrations};
use tracker::settings::ServerSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())?;
    info!(
        key_source = ?session.key_source,
        cookie_secure = session.cookie_secure,
        "session settings loaded"
    );

    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_default_owner(settings.default_owner()?);

    if let Some(pool_config) = settings.pool_config() {
        run_pending_migrations(pool_config.database_url()).await?;
        let pool = DbPool::new(pool_config).await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting tracker server");
    create_server(health_state, config)?.await?;
    Ok(())
}
