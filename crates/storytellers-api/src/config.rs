//! Gateway configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use storytellers_backend_client::config::BackendEndpoints;

use crate::error::AppError;

/// Everything the gateway needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Collaborator base URLs and the per-call timeout.
    pub backends: BackendEndpoints,
    /// Idle time after which a session's workflow state is forgotten.
    pub session_ttl: Duration,
    /// OTLP collector; traces are only exported when set.
    pub otlp_endpoint: Option<String>,
}

impl GatewayConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = BackendEndpoints::default();
        let var = |key: &str, default: String| lookup(key).unwrap_or(default);

        let port = var("PORT", "5000".into())
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let timeout_ms = positive(&lookup, "BACKEND_TIMEOUT_MS", 2000)?;
        let ttl_secs = positive(&lookup, "SESSION_TTL_SECS", 3600)?;

        Ok(Self {
            host: var("HOST", "0.0.0.0".into()),
            port,
            backends: BackendEndpoints {
                users: var("USERS_SERVICE_URL", defaults.users),
                dice: var("DICE_SERVICE_URL", defaults.dice),
                stories: var("STORIES_SERVICE_URL", defaults.stories),
                reactions: var("REACTIONS_SERVICE_URL", defaults.reactions),
                timeout: Duration::from_millis(timeout_ms),
            },
            session_ttl: Duration::from_secs(ttl_secs),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.is_empty()),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if host and port do not form an address.
    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn positive<F>(lookup: &F, key: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(AppError::Config(format!("{key} must be greater than zero"))),
        Ok(value) => Ok(value),
        Err(e) => Err(AppError::Config(format!("{key} must be a whole number: {e}"))),
    }
}
