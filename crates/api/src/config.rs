use std::time::Duration;

use crate::relay::DEFAULT_RELAY_TIMEOUT;

/// Default base URL of the site API.
pub const DEFAULT_SITE_API_URL: &str = "https://api.webflow.com";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long a submission waits for the executor (default: `10` seconds).
    pub relay_timeout: Duration,
    /// Grace period for in-flight requests on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub site_api: SiteApiConfig,
}

/// Credentials and endpoints for the third-party site API.
///
/// Everything except the base URL is optional; the endpoints that need a
/// missing value answer 503.
#[derive(Debug, Clone, Default)]
pub struct SiteApiConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Pre-provisioned bearer token, used until an OAuth exchange stores one.
    pub api_token: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{var} has an invalid value '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `RELAY_TIMEOUT_SECS`    | `10`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `SITE_API_URL`          | `https://api.webflow.com`  |
    /// | `SITE_CLIENT_ID`        | --                         |
    /// | `SITE_CLIENT_SECRET`    | --                         |
    /// | `SITE_REDIRECT_URI`     | --                         |
    /// | `SITE_API_TOKEN`        | --                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parsed(&lookup, "PORT", 3000u16)?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parsed(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let relay_timeout_secs =
            parsed(&lookup, "RELAY_TIMEOUT_SECS", DEFAULT_RELAY_TIMEOUT.as_secs())?;
        if relay_timeout_secs == 0 {
            return Err(ConfigError {
                var: "RELAY_TIMEOUT_SECS",
                value: "0".into(),
            });
        }
        let shutdown_timeout_secs = parsed(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30u64)?;

        let optional = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let site_api = SiteApiConfig {
            base_url: optional("SITE_API_URL").unwrap_or_else(|| DEFAULT_SITE_API_URL.into()),
            client_id: optional("SITE_CLIENT_ID"),
            client_secret: optional("SITE_CLIENT_SECRET"),
            redirect_uri: optional("SITE_REDIRECT_URI"),
            api_token: optional("SITE_API_TOKEN"),
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            relay_timeout: Duration::from_secs(relay_timeout_secs),
            shutdown_timeout_secs,
            site_api,
        })
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { var, value }),
    }
}
