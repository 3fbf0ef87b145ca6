//! Logging system configuration and initialization
//!
//! Sets up a tracing subscriber with:
//! - Configuration-driven log level control (RUST_LOG still wins)
//! - Console output
//! - Optional file logging with daily rotation, stored next to the executable

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the process lifetime.
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Get the log directory relative to the executable location
pub fn get_log_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Initialize logging with custom configuration
///
/// RUST_LOG overrides the configured level, e.g.:
/// `RUST_LOG="debug,reqwest=warn,hyper=warn" duty_lookup 14467 Brandenburg`
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Keep dependency chatter down unless trace was explicitly requested
        let mut filter = EnvFilter::new(&config.level);
        if !config.level.to_lowercase().contains("trace") {
            filter = filter
                .add_directive("reqwest=info".parse().unwrap())
                .add_directive("hyper=warn".parse().unwrap())
                .add_directive("h2=warn".parse().unwrap())
                .add_directive("html5ever=warn".parse().unwrap())
                .add_directive("selectors=warn".parse().unwrap());
        }
        filter
    });

    let console_layer = if config.console_output {
        Some(fmt::layer().with_target(true))
    } else {
        None
    };

    let file_layer = if config.file_output {
        let log_dir = get_log_directory();
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

        let appender = tracing_appender::rolling::daily(&log_dir, "notdienst-finder.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);

        Some(fmt::layer().with_writer(writer).with_ansi(false))
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
