//! File-based logging initialization

use std::fs;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use super::config::DebugConfig;

const LOG_FILE_NAME: &str = "panel-client.log";

/// Flush guard for the non-blocking file writer, held for the process lifetime.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the logging system
///
/// Sets up:
/// - Daily-rotated log file in the configured directory
/// - Optional compact stderr output
/// - `RUST_LOG` filtering, falling back to the configured level
/// - Panic hook integration for crash logging
///
/// If the log directory cannot be created, logging continues on stderr only.
pub fn init() -> bool {
    let config = DebugConfig::from_env();

    let file_layer = match fs::create_dir_all(&config.log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // A second init keeps the first writer; this guard is dropped.
            let _ = FILE_GUARD.set(guard);

            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(config.is_debug_enabled())
                .with_line_number(config.is_debug_enabled())
                .with_ansi(false); // No ANSI codes in log files

            Some(if config.json_file {
                layer.json().boxed()
            } else {
                layer.boxed()
            })
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to create log directory {}: {}",
                config.log_dir.display(),
                e
            );
            None
        }
    };

    let stderr_layer = config.log_to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("panel_client=info,warn"));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            log_level = %config.log_level,
            stderr = config.log_to_stderr,
            json = config.json_file,
            "Logging initialized"
        );
        setup_panic_hook();
    }

    installed
}

/// Set up panic hook to log panics with their location
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        tracing::error!(
            location = %location,
            message = %message,
            "Application panic"
        );

        default_panic(panic_info);
    }));
}
