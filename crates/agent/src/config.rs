use std::time::Duration;

/// Default interval between unsolicited heartbeat frames.
const DEFAULT_HEARTBEAT_SECS: u64 = 30;

/// Default delay before reconnecting after the relay connection drops.
const DEFAULT_RECONNECT_SECS: u64 = 5;

/// Default timeout for asset downloads.
const DEFAULT_ASSET_TIMEOUT_SECS: u64 = 20;

/// Executor configuration loaded from environment variables.
///
/// | Env Var                   | Required | Default |
/// |---------------------------|----------|---------|
/// | `BACKEND_WS_URL`          | yes      | --      |
/// | `HEARTBEAT_INTERVAL_SECS` | no       | `30`    |
/// | `RECONNECT_DELAY_SECS`    | no       | `5`     |
/// | `ASSET_TIMEOUT_SECS`      | no       | `20`    |
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Relay WebSocket endpoint, e.g. `ws://localhost:3000/api/v1/ws`.
    pub ws_url: String,
    pub heartbeat_interval: Duration,
    pub reconnect_delay: Duration,
    pub asset_timeout: Duration,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} must be a positive integer, got '{value}'")]
    Invalid { var: &'static str, value: String },
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let ws_url = lookup("BACKEND_WS_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BACKEND_WS_URL"))?;

        Ok(Self {
            ws_url,
            heartbeat_interval: secs(&lookup, "HEARTBEAT_INTERVAL_SECS", DEFAULT_HEARTBEAT_SECS)?,
            reconnect_delay: secs(&lookup, "RECONNECT_DELAY_SECS", DEFAULT_RECONNECT_SECS)?,
            asset_timeout: secs(&lookup, "ASSET_TIMEOUT_SECS", DEFAULT_ASSET_TIMEOUT_SECS)?,
        })
    }
}

fn secs(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match lookup(var) {
        None => Ok(Duration::from_secs(default)),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(Duration::from_secs(n)),
            _ => Err(ConfigError::Invalid { var, value }),
        },
    }
}
