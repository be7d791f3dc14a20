use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

const LOG_DIR_NAME: &str = "godstring";
const LOG_FILE_NAME: &str = "godstring.log";

// Conditional logging macros - only active in debug builds

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

/// Location of the log file, under the user's cache directory.
pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(LOG_DIR_NAME).join(LOG_FILE_NAME))
}

/// Install the global logger. `RUST_LOG` overrides the default filter.
///
/// With `to_file` set, records at `info` and above go to [`log_file_path`]
/// because the terminal UI owns stdout and stderr. Logging is switched off if
/// that file cannot be opened. Otherwise only warnings reach stderr. Returns
/// the file in use, if any.
pub fn init_logging(to_file: bool) -> Option<PathBuf> {
    let default_filter = if to_file { "info" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let mut file_path = None;
    if to_file {
        match open_log_file() {
            Some((path, file)) => {
                builder.target(Target::Pipe(Box::new(file)));
                file_path = Some(path);
            }
            None => {
                builder.filter_level(LevelFilter::Off);
            }
        }
    }

    if builder.try_init().is_err() {
        return None;
    }
    file_path
}

fn open_log_file() -> Option<(PathBuf, fs::File)> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    Some((path, file))
}
