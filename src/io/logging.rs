use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::io::paths::log_path;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "TD_LOG";

/// Build the filter: `TD_LOG` if set and valid, else `configured`, else `info`.
pub fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Route tracing output to `<data_dir>/td.log`.
///
/// The terminal belongs to the TUI, so nothing is written to stderr. Fails
/// quietly when the log file cannot be opened or a subscriber is already
/// installed (tests); logging is never fatal.
pub fn init_logging(data_dir: &Path, configured_level: &str) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(data_dir))
    {
        Ok(f) => f,
        Err(_) => return,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(configured_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
