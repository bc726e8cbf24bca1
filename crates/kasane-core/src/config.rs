//! Console configuration model.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Server the login form points at when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Origin hosting the `/api/*` pass-through proxy (the web dev server).
pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:5173";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Kasane API base URL
    pub server_url: String,
    /// Base URL used for the `/api/login` and `/api/execute` fallback
    pub proxy_origin: String,
    /// Per-request timeout; `None` waits for as long as the transport does
    pub request_timeout_secs: Option<u64>,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Number of REPL lines kept in history
    pub history_size: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            proxy_origin: DEFAULT_PROXY_ORIGIN.to_string(),
            request_timeout_secs: None,
            log_level: "info".to_string(),
            history_size: 500,
        }
    }
}

impl ConsoleConfig {
    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
