//! # Client Configuration
//!
//! Settings loaded from environment variables, with defaults suitable for a
//! backend running locally. Validated once at startup to fail fast.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PANEL_API_URL` | `http://127.0.0.1:8080/api/v1` |
//! | `PANEL_WS_URL` | API URL with `ws(s)://` scheme and `/ws` appended |
//! | `PANEL_HTTP_TIMEOUT_SECS` | `10` |
//! | `PANEL_RECONNECT_INITIAL_MS` | `3000` |
//! | `PANEL_RECONNECT_MAX_MS` | `30000` |
//! | `PANEL_STATE_FILE` | `data/panel-state.json` |
//! | `PANEL_LOG_DIR` | `logs` |

use std::path::PathBuf;
use std::time::Duration;

use lib_utils::envs::{get_env, get_env_or, get_env_parse_or};
use url::Url;

use crate::core::{ClientError, Result};

/// Login entry point; forced logouts navigate here.
pub const LOGIN_ROUTE: &str = "/login";

/// Landing route after a successful login or registration.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/v1";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// REST base URL, without trailing slash
    pub api_url: String,
    /// Event-stream endpoint
    pub ws_url: String,
    pub http_timeout: Duration,
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
    /// File backing durable client-side state (session, theme)
    pub state_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: derive_ws_url(DEFAULT_API_URL),
            http_timeout: Duration::from_secs(10),
            reconnect_initial: Duration::from_millis(3_000),
            reconnect_max: Duration::from_millis(30_000),
            state_file: PathBuf::from("data/panel-state.json"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_url = get_env_or("PANEL_API_URL", DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        let ws_url = get_env("PANEL_WS_URL").unwrap_or_else(|_| derive_ws_url(&api_url));

        Ok(Self {
            ws_url,
            http_timeout: Duration::from_secs(get_env_parse_or("PANEL_HTTP_TIMEOUT_SECS", 10)?),
            reconnect_initial: Duration::from_millis(get_env_parse_or(
                "PANEL_RECONNECT_INITIAL_MS",
                3_000,
            )?),
            reconnect_max: Duration::from_millis(get_env_parse_or("PANEL_RECONNECT_MAX_MS", 30_000)?),
            state_file: PathBuf::from(get_env_or("PANEL_STATE_FILE", "data/panel-state.json")),
            log_dir: PathBuf::from(get_env_or("PANEL_LOG_DIR", "logs")),
            api_url,
        })
    }

    /// Load from the environment and validate in one step.
    pub fn load() -> Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        let api = Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("PANEL_API_URL is not a valid URL: {e}")))?;
        if !matches!(api.scheme(), "http" | "https") {
            return Err(ClientError::Config(
                "PANEL_API_URL must use http:// or https://".to_string(),
            ));
        }

        let ws = Url::parse(&self.ws_url)
            .map_err(|e| ClientError::Config(format!("PANEL_WS_URL is not a valid URL: {e}")))?;
        if !matches!(ws.scheme(), "ws" | "wss") {
            return Err(ClientError::Config(
                "PANEL_WS_URL must use ws:// or wss://".to_string(),
            ));
        }

        if self.http_timeout.is_zero() {
            return Err(ClientError::Config(
                "PANEL_HTTP_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if self.reconnect_initial.is_zero() {
            return Err(ClientError::Config(
                "PANEL_RECONNECT_INITIAL_MS must be greater than 0".to_string(),
            ));
        }

        if self.reconnect_max < self.reconnect_initial {
            return Err(ClientError::Config(
                "PANEL_RECONNECT_MAX_MS must not be below PANEL_RECONNECT_INITIAL_MS".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed event-stream endpoint.
    pub fn ws_endpoint(&self) -> Result<Url> {
        Url::parse(&self.ws_url)
            .map_err(|e| ClientError::Config(format!("PANEL_WS_URL is not a valid URL: {e}")))
    }
}

/// `http://host/api/v1` -> `ws://host/api/v1/ws` (and `https` -> `wss`).
pub fn derive_ws_url(api_url: &str) -> String {
    let base = api_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws_base}/ws")
}
