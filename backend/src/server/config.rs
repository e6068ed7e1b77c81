//! Server settings loaded via OrthoConfig and the assembled server
//! configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use lunchlog::outbound::cache::CachePolicy;
use lunchlog::outbound::persistence::DbPool;
use lunchlog::outbound::places::NaverPlaceSearch;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_PLACE_SEARCH_TIMEOUT_SECS: u64 = 5;
const DEFAULT_LISTING_STALE_SECS: u64 = 300;
const DEFAULT_LISTING_EVICT_SECS: u64 = 1800;

/// Process settings, read from `LUNCHLOG_*` environment variables,
/// configuration files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LUNCHLOG")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-memory store is used without it.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`; disable for plain-HTTP development.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    pub place_search_timeout_secs: Option<u64>,
    /// Seconds after which a cached listing is recomputed.
    pub listing_stale_secs: Option<u64>,
    /// Seconds after which a cached listing is dropped.
    pub listing_evict_secs: Option<u64>,
}

impl ServerSettings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw}: {err}"),
            )
        })
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn place_search_timeout(&self) -> Duration {
        Duration::from_secs(
            self.place_search_timeout_secs
                .unwrap_or(DEFAULT_PLACE_SEARCH_TIMEOUT_SECS),
        )
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy::from_secs(
            self.listing_stale_secs
                .unwrap_or(DEFAULT_LISTING_STALE_SECS),
            self.listing_evict_secs
                .unwrap_or(DEFAULT_LISTING_EVICT_SECS),
        )
    }

    /// Both Naver credentials, when configured and non-blank.
    pub fn naver_credentials(&self) -> Option<(&str, &str)> {
        let id = self.naver_client_id.as_deref().map(str::trim)?;
        let secret = self.naver_client_secret.as_deref().map(str::trim)?;
        (!id.is_empty() && !secret.is_empty()).then_some((id, secret))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) place_search: Option<NaverPlaceSearch>,
    pub(crate) cache_policy: CachePolicy,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            place_search: None,
            cache_policy: CachePolicy::default(),
        }
    }

    /// Persist restaurants and visits in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Enable `/api/v1/places` against the Naver local search API.
    #[must_use]
    pub fn with_place_search(mut self, search: NaverPlaceSearch) -> Self {
        self.place_search = Some(search);
        self
    }

    #[must_use]
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }
}
