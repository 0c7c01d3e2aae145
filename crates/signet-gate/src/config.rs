//! Gate configuration.

use crate::error::AuthError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use signet_token::{SealingKey, TokenError};
use std::path::PathBuf;

/// Default lifetime for issued tokens when nothing else is configured.
pub const DEFAULT_TTL: &str = "24h";

/// Configuration for the bearer authentication gate.
///
/// Designed to embed in an application config file:
///
/// ```yaml
/// auth:
///   key_env: SIGNET_SEALING_KEY
///   key_file: /etc/signet/sealing.key
///   default_ttl: 24h
/// ```
///
/// The key itself never appears in configuration - only where to find
/// it. Resolution tries the environment variable first, then the file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GateConfig {
    /// Environment variable holding the sealing key (hex or base64).
    #[serde(default)]
    pub key_env: Option<String>,

    /// Path to a file holding the sealing key (raw, hex, or base64).
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Default lifetime for issued tokens, e.g. "24h" or "7d".
    #[serde(default)]
    pub default_ttl: Option<String>,
}

impl GateConfig {
    /// Resolve the sealing key from the configured sources.
    ///
    /// Returns `Ok(None)` when no source is configured or present;
    /// callers decide whether that is fatal.
    pub fn resolve_key(&self) -> Result<Option<SealingKey>, TokenError> {
        if let Some(env_var) = &self.key_env {
            if let Ok(value) = std::env::var(env_var) {
                let key = SealingKey::from_encoded(&value)?;
                tracing::debug!(source = %env_var, "sealing key resolved from environment");
                return Ok(Some(key));
            }
        }

        if let Some(path) = &self.key_file {
            if path.exists() {
                return Ok(Some(SealingKey::load_from_file(path)?));
            }
        }

        Ok(None)
    }

    /// Parse the configured default TTL, falling back to 24 hours.
    pub fn resolve_default_ttl(&self) -> Result<Duration, AuthError> {
        let text = self.default_ttl.as_deref().unwrap_or(DEFAULT_TTL);
        let ttl = humantime::parse_duration(text)
            .map_err(|e| AuthError::Config(format!("invalid default_ttl {text:?}: {e}")))?;
        Duration::from_std(ttl)
            .map_err(|_| AuthError::Config(format!("default_ttl {text:?} is out of range")))
    }
}
