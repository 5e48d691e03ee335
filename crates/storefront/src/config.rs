//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPFRONT_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: `http://localhost:3000`)
//! - `CATALOG_URL` - Product list endpoint (default: `https://fakestoreapi.com/products`)
//! - `CATALOG_CACHE_TTL_SECS` - Seconds a fetched catalog is reused; 0 fetches
//!   on every page load (default: 60)
//! - `STORAGE_IDLE_DAYS` - Days an idle visitor's cart is kept (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Visitor storage configuration
    pub storage: StorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// External catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint returning the product list as JSON
    pub url: Url,
    /// How long a successful fetch is reused; zero disables reuse
    pub cache_ttl: Duration,
}

/// Visitor-scoped cart storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Entries untouched for this long are evicted
    pub idle_expiry: Duration,
    /// Upper bound on stored entries across all visitors
    pub max_entries: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            idle_expiry: Duration::from_secs(30 * SECONDS_PER_DAY),
            max_entries: 100_000,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("SHOPFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("SHOPFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("SHOPFRONT_BASE_URL", "http://localhost:3000");

        let catalog = CatalogConfig::from_env()?;
        let storage = StorageConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog,
            storage,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CatalogConfig {
    /// Catalog configuration pointing at `url` with no fetch reuse.
    #[must_use]
    pub const fn uncached(url: Url) -> Self {
        Self {
            url,
            cache_ttl: Duration::ZERO,
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let url = parse_env_or_default::<Url>("CATALOG_URL", DEFAULT_CATALOG_URL)?;
        let ttl_secs = parse_env_or_default::<u64>("CATALOG_CACHE_TTL_SECS", "60")?;
        Ok(Self {
            url,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let idle_days = parse_env_or_default::<u64>("STORAGE_IDLE_DAYS", "30")?;
        Ok(Self {
            idle_expiry: Duration::from_secs(idle_days.saturating_mul(SECONDS_PER_DAY)),
            ..Self::default()
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
