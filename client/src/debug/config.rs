//! Logging configuration from environment variables

use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "panel_client=info,warn";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// Log level filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Mirror log output to stderr
    pub log_to_stderr: bool,
    /// Write the log file as JSON lines
    pub json_file: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_to_stderr: true,
            json_file: false,
        }
    }
}

impl DebugConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_dir: std::env::var("PANEL_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs")),
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            log_to_stderr: std::env::var("PANEL_LOG_STDERR")
                .map(|v| v != "0")
                .unwrap_or(true),
            json_file: std::env::var("PANEL_LOG_JSON")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.is_trace_enabled()
    }

    /// Check if trace logging is enabled
    pub fn is_trace_enabled(&self) -> bool {
        self.log_level.contains("trace")
    }
}
