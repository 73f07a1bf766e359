use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Logs to `log_path` so nothing is written over the alternate screen. If the
/// file cannot be opened, logging is off.
pub fn init_file_tracing(log_path: &Path) {
    let filter = env_filter("info");
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => {
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .try_init();
            if installed.is_ok() {
                tracing::info!(path = %log_path.display(), "logging initialized");
            }
        }
        Err(_) => {
            let _ = tracing_subscriber::registry().with(filter).try_init();
        }
    }
}

/// Logs to stderr, for non-interactive commands.
pub fn init_stderr_tracing() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter("warn"))
        .try_init();
}
