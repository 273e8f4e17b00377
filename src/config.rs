//! Client configuration: API origin resolution and push URL derivation.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the client looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/client.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZROOM_CONFIG_PATH";
/// Environment variable that overrides the API origin regardless of the file.
const API_ORIGIN_ENV: &str = "QUIZROOM_API_ORIGIN";
/// Origin used when neither the config file nor the environment provides one.
const DEFAULT_API_ORIGIN: &str = "http://localhost:8000/";
/// Versioned base path all REST endpoints live under.
const API_BASE_PATH: &str = "api/v1/";
/// Per-request timeout applied when the configuration does not set one.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the client.
///
/// A single API origin controls both the REST base URL and the derived
/// push-channel host.
pub struct ClientConfig {
    api_origin: String,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        origin = %config.api_origin,
                        "loaded client config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Ok(origin) = env::var(API_ORIGIN_ENV)
            && !origin.is_empty()
        {
            info!(%origin, "API origin overridden from environment");
            config.api_origin = origin;
        }

        config
    }

    /// Build a configuration for a fixed origin (used by tests and tooling).
    pub fn with_origin(api_origin: impl Into<String>) -> Self {
        Self {
            api_origin: api_origin.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Base URL all REST paths are appended to, always ending in `/`.
    pub fn rest_base(&self) -> String {
        let origin = self.api_origin.trim_end_matches('/');
        format!("{origin}/{API_BASE_PATH}")
    }

    /// Timeout applied to individual REST requests.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// WebSocket URL for the given session's push channel.
    ///
    /// The scheme follows the origin's own transport security: an `https`
    /// origin yields `wss`, anything else plain `ws`.
    pub fn push_url(&self, session_id: &str) -> String {
        let secure = self.api_origin.starts_with("https://");
        let scheme = if secure { "wss" } else { "ws" };
        let host = self
            .api_origin
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        format!("{scheme}://{host}/ws/quiz/{session_id}/")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_origin(DEFAULT_API_ORIGIN)
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    api_origin: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl From<RawConfig> for ClientConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            api_origin: raw.api_origin.unwrap_or_else(|| DEFAULT_API_ORIGIN.into()),
            request_timeout: Duration::from_secs(
                raw.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_base_handles_trailing_slash() {
        let with = ClientConfig::with_origin("http://quiz.example:9000/");
        let without = ClientConfig::with_origin("http://quiz.example:9000");
        assert_eq!(with.rest_base(), "http://quiz.example:9000/api/v1/");
        assert_eq!(without.rest_base(), with.rest_base());
    }

    #[test]
    fn push_url_matches_origin_security() {
        let plain = ClientConfig::with_origin("http://quiz.example/");
        assert_eq!(
            plain.push_url("abc123"),
            "ws://quiz.example/ws/quiz/abc123/"
        );

        let secure = ClientConfig::with_origin("https://quiz.example");
        assert_eq!(
            secure.push_url("abc123"),
            "wss://quiz.example/ws/quiz/abc123/"
        );
    }

    #[test]
    fn push_url_keeps_port() {
        let config = ClientConfig::with_origin("http://localhost:8000/");
        assert_eq!(
            config.push_url("s-1"),
            "ws://localhost:8000/ws/quiz/s-1/"
        );
    }
}
