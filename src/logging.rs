//! File logging. The terminal belongs to the UI, so log records go to a file.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::AppConfig;

/// Create (truncating) the log file, making parent directories as needed.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Install the global logger. Logging is best effort: failures leave it off.
pub fn init(config: &AppConfig) {
    let Some(path) = config.log_file() else {
        return;
    };

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = open_log_file(&path) {
        let _ = WriteLogger::init(config.log_level(), log_config, log_file);
    }
}
