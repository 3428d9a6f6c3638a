use chrono::NaiveDate;
use std::path::PathBuf;

use crate::caller::ProcessRoot;
pub use crate::console::ColorChoice;
use crate::level::Level;

/// Configuration of a [`Handler`](crate::handler::Handler).
///
/// **Fields**
/// - `debug`: accept `Debug` records; otherwise the minimum level is `Info`.
/// - `log_dir`: directory holding the dated log files.
/// - `file_prefix`: file name prefix, files are `<prefix>_YYYY-MM-DD.log`.
/// - `color`: console decoration.
/// - `root`: directory call-site paths are reported relative to.
#[derive(Clone, Debug)]
pub struct HandlerConfig {
    pub debug: bool,
    pub log_dir: PathBuf,
    pub file_prefix: String,
    pub color: ColorChoice,
    pub root: ProcessRoot,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_dir: PathBuf::from("storage/logs"),
            file_prefix: "app".to_string(),
            color: ColorChoice::Auto,
            root: ProcessRoot::capture(),
        }
    }
}

impl HandlerConfig {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            ..Self::default()
        }
    }

    pub fn min_level(&self) -> Level {
        if self.debug {
            Level::Debug
        } else {
            Level::Info
        }
    }

    /// Path of the log file for `date`.
    pub fn log_file_path(&self, date: NaiveDate) -> PathBuf {
        self.log_dir
            .join(format!("{}_{}.log", self.file_prefix, date.format("%Y-%m-%d")))
    }
}
