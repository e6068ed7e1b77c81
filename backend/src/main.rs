//! Backend entry-point: loads settings, prepares storage and serves the
//! REST API.

mod server;

use std::io;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use lunchlog::inbound::http::health::HealthState;
use lunchlog::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use lunchlog::outbound::places::{NAVER_LOCAL_SEARCH_URL, NaverCredentials, NaverPlaceSearch};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let key = load_session_key(&settings)?;

    let mut config = ServerConfig::new(
        key,
        settings.cookie_secure,
        SameSite::Lax,
        settings.bind_addr()?,
    )
    .with_cache_policy(settings.cache_policy());

    if let Some(database_url) = settings.database_url.clone() {
        let pool = connect_database(database_url, settings.db_max_connections()).await?;
        config = config.with_db_pool(pool);
    }
    if let Some(search) = build_place_search(&settings)? {
        config = config.with_place_search(search);
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

/// Read the session key, or generate a temporary one in development.
fn load_session_key(settings: &ServerSettings) -> io::Result<Key> {
    let key_path = settings.session_key_file();
    let loaded = std::fs::read(&key_path).and_then(|bytes| {
        Key::try_from(bytes.as_slice()).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("session key must hold at least 64 bytes: {e}"),
            )
        })
    });
    match loaded {
        Ok(key) => Ok(key),
        Err(e) if cfg!(debug_assertions) || settings.session_allow_ephemeral => {
            warn!(path = %key_path.display(), error = %e, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(e) => Err(io::Error::other(format!(
            "failed to read session key at {}: {e}",
            key_path.display()
        ))),
    }
}

async fn connect_database(database_url: String, max_connections: u32) -> io::Result<DbPool> {
    let migration_url = database_url.clone();
    actix_web::rt::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|e| io::Error::other(format!("migration task failed: {e}")))?
        .map_err(|e| io::Error::other(e.to_string()))?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(max_connections))
        .await
        .map_err(|e| io::Error::other(format!("failed to create database pool: {e}")))?;
    info!(max_connections, "database pool ready");
    Ok(pool)
}

fn build_place_search(settings: &ServerSettings) -> io::Result<Option<NaverPlaceSearch>> {
    let Some((client_id, client_secret)) = settings.naver_credentials() else {
        return Ok(None);
    };
    let endpoint = Url::parse(NAVER_LOCAL_SEARCH_URL)
        .map_err(|e| io::Error::other(format!("invalid place search endpoint: {e}")))?;
    let credentials = NaverCredentials {
        client_id: client_id.to_owned(),
        client_secret: client_secret.to_owned(),
    };
    NaverPlaceSearch::new(endpoint, credentials, settings.place_search_timeout())
        .map(Some)
        .map_err(|e| io::Error::other(format!("failed to build place search client: {e}")))
}
