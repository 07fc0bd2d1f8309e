//! # Logging and Tracing
//!
//! File-based structured logging for the panel client.
//!
//! ## Features
//!
//! - **File logging**: `logs/panel-client.log.<date>` with daily rotation, written
//!   through a non-blocking worker so request paths never wait on disk
//! - **Console logging**: compact stderr output (on by default)
//! - **Panic capture**: panics are recorded through `tracing::error!` before the
//!   default hook runs
//!
//! ## Usage
//!
//! ```rust,no_run
//! panel_client::debug::init();
//!
//! tracing::info!(
//!     endpoint = "/projects",
//!     duration_ms = 42,
//!     "API call completed"
//! );
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (e.g., `panel_client=debug,info`)
//! - `PANEL_LOG_DIR`: Log directory (default: `logs`)
//! - `PANEL_LOG_STDERR`: Mirror logs to stderr (1=on, 0=off, default on)
//! - `PANEL_LOG_JSON`: Write the log file as JSON lines (1=on, default off)

pub mod config;
pub mod logger;

pub use config::DebugConfig;
pub use logger::init as init_logger;

/// Initialize logging.
///
/// Safe to call more than once; only the first call installs the subscriber.
/// Returns `true` when this call did the installation.
pub fn init() -> bool {
    init_logger()
}
