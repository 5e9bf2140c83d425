//! Backend entry-point: builds configuration, wires persistence, and
//! serves the HTTP application.

use std::net::SocketAddr;

use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::{AppConfig, BuildMode};
use backend::outbound::persistence::PoolConfig;
use backend::server::{ServerConfig, build_server};

const BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

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

    let config = AppConfig::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut server_config = ServerConfig::new(
        config.session.key,
        config.session.cookie_secure,
        config.session.same_site,
        SocketAddr::from(BIND_ADDR),
    );

    if let Some(database_url) = &config.database_url {
        let pool = PoolConfig::new(database_url)
            .build()
            .await
            .map_err(std::io::Error::other)?;
        server_config = server_config.with_db_pool(pool);
    } else {
        warn!("no DATABASE_URL configured; serving from in-memory stores");
    }

    let (server, health_state) = build_server(server_config)?;
    info!(mode = ?config.mode, "listening on {}:{}", "0.0.0.0", BIND_ADDR.1);
    health_state.mark_ready();
    server.await
}
