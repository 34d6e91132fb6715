//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use marketplace::domain::IdempotencyConfig;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Process settings loaded from `MARKETPLACE_*` variables, CLI flags and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Seconds a client may take to send request headers.
    pub request_timeout_secs: Option<u64>,
    /// Load the demo accounts and catalog at startup.
    #[ortho_config(default = true)]
    pub seed_demo_data: bool,
    /// How long idempotency records remain replayable.
    pub idempotency_ttl_hours: Option<u64>,
    /// Seconds between idempotency cleanup sweeps.
    pub idempotency_cleanup_interval_secs: Option<u64>,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address '{raw}': {err}"),
            )
        })
    }

    pub fn idempotency(&self) -> IdempotencyConfig {
        self.idempotency_ttl_hours
            .map(IdempotencyConfig::from_hours)
            .unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(
            self.idempotency_cleanup_interval_secs
                .unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECS)
                .max(1),
        )
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    /// Header-read limit passed to `client_request_timeout`.
    pub(crate) request_timeout: Duration,
    pub(crate) seed_demo_data: bool,
    pub(crate) idempotency: IdempotencyConfig,
    pub(crate) cleanup_interval: Duration,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and a bind
    /// address. Demo seeding is on and idempotency uses its defaults.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            seed_demo_data: true,
            idempotency: IdempotencyConfig::default(),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
        }
    }

    /// Apply the process settings.
    #[must_use]
    pub fn with_settings(mut self, settings: &AppSettings) -> Self {
        self.request_timeout = settings.request_timeout();
        self.seed_demo_data = settings.seed_demo_data;
        self.idempotency = settings.idempotency();
        self.cleanup_interval = settings.cleanup_interval();
        self
    }
}
