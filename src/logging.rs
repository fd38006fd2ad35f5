//! File log sink. Logging problems never reach the caller: if the log file
//! cannot be opened the application simply runs without one.

use crate::config::Config;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Log files above this size are started over at startup.
pub const MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Installs the global subscriber writing to `config.log_path()`.
/// Returns whether file logging is active.
pub fn init(config: &Config) -> bool {
    let Some(file) = open_log_file(&config.log_path()) else {
        return false;
    };

    let level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(ChronoLocal::new(String::from("%Y-%m-%d %H:%M:%S")))
        .with_max_level(level)
        .try_init()
        .is_ok()
}

/// Opens the log for appending, truncating it first when it grew past [`MAX_LOG_BYTES`].
pub fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }

    let oversized = fs::metadata(path)
        .map(|meta| meta.len() > MAX_LOG_BYTES)
        .unwrap_or(false);

    let mut options = OpenOptions::new();
    options.create(true);
    if oversized {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }
    options.open(path).ok()
}
