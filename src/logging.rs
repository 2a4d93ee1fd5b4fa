//! Optional installation of a `tracing` subscriber.
//!
//! The client itself only emits `tracing` events. Applications that already
//! configure a subscriber should leave [`LoggingConfig`] out of the builder or
//! set `inherit_logging_config`; everyone else can have one installed that
//! writes to the console, to a timestamped log file, or both.

use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{Error, Result};

/// Where and whether to write log output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write a log file.
    pub output_log: bool,
    /// Directory of the log file. Empty means the working directory.
    pub log_path: PathBuf,
    /// Prefix of the log file name.
    pub log_file_prefix: String,
    /// Write to the console.
    pub print_console: bool,
    /// Install nothing at all.
    pub suppress_logging: bool,
    /// Leave the application's own subscriber in charge.
    pub inherit_logging_config: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            output_log: true,
            log_path: PathBuf::new(),
            log_file_prefix: "meraki_api_".to_string(),
            print_console: true,
            suppress_logging: false,
            inherit_logging_config: false,
        }
    }
}

impl LoggingConfig {
    /// Console-only logging.
    pub fn console() -> Self {
        Self {
            output_log: false,
            ..Self::default()
        }
    }

    /// Returns `true` if [`init`] would install a subscriber.
    pub fn installs_subscriber(&self) -> bool {
        !self.suppress_logging
            && !self.inherit_logging_config
            && (self.output_log || self.print_console)
    }

    /// Path of a log file opened at the given local time.
    pub fn log_file_path(&self, timestamp: chrono::DateTime<chrono::Local>) -> PathBuf {
        let file_name = format!(
            "{}log__{}.log",
            self.log_file_prefix,
            timestamp.format("%Y-%m-%d_%H-%M-%S")
        );
        self.log_path.join(file_name)
    }
}

/// Installs the global subscriber described by `config`.
///
/// The filter honours `RUST_LOG`, defaulting to `info`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the log file cannot be created or a
/// global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.installs_subscriber() {
        return Ok(());
    }

    let file_layer = if config.output_log {
        let path = config.log_file_path(chrono::Local::now());
        let file = create_log_file(&path)?;
        Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
    } else {
        None
    };

    let console_layer = config.print_console.then(fmt::layer);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| Error::Configuration(format!("Failed to install logging: {e}")))
}

fn create_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::Configuration(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }
    File::create(path)
        .map_err(|e| Error::Configuration(format!("Failed to create {}: {e}", path.display())))
}
