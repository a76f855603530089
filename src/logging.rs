use std::fs::OpenOptions;
use std::path::PathBuf;

use env_logger::{Env, Target};
use lazy_static::lazy_static;

use crate::config::CONFIG_PATH;
use crate::Error;

lazy_static! {
    pub static ref LOG_FILE_PATH: PathBuf = CONFIG_PATH.join("nowify.log");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to [`LOG_FILE_PATH`]; the terminal belongs to the ui
    File,
    Stderr,
}

/// Install the global logger. Filter comes from `RUST_LOG`, default `info`.
pub fn init(target: LogTarget) -> Result<(), Error> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    if target == LogTarget::File {
        if let Some(parent) = LOG_FILE_PATH.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(LOG_FILE_PATH.as_path())?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| Error::Io(e.to_string()))
}
