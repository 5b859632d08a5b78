//! # Holmes
//!
//! Process-embedded leveled logging with optional time-based file rotation.
//!
//! ## Features
//!
//! - **Leveled Output**: DEBUG < INFO < WARN < ERROR < FATAL threshold filtering
//! - **File Rotation**: a new log file every minute or every hour, checked lazily on write
//! - **Console Echo**: duplicate every record to stdout alongside the file
//! - **Stack Dump**: print a backtrace into the log when the logger stops
//! - **Caller Location**: every record carries the calling function, file and line
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use holmes::options::{every_hour, info_level, log_file_path};
//!
//! let logger = holmes::start([info_level(), log_file_path("./log"), every_hour()]);
//!
//! holmes::info!("listening on {}", 8080);
//! holmes::warnln!("disk usage at ", 91, '%');
//!
//! logger.stop();
//! ```
//!
//! A handle can also be passed around explicitly instead of going through the
//! process-wide slot:
//!
//! ```rust,no_run
//! use holmes::{Logger, LoggerConfig};
//!
//! let logger = Logger::new(LoggerConfig::default());
//! holmes::error!(logger: logger, "request {} failed", 42);
//! ```

pub mod config;
pub mod format;
pub mod logger;
pub mod options;
pub mod registry;
pub mod rotation;

mod macros;

#[cfg(test)]
mod tests;

pub use config::{LogLevel, LoggerConfig, Rotation};
pub use format::{Callsite, Concat, Record};
pub use logger::{Logger, LoggerHandle};
pub use options::ConfigOption;
pub use registry::{active, start, try_start};
pub use rotation::{Clock, RotatingFileWriter, SystemClock};

/// Result type for logger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Logger-specific errors
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse logger config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("logger already started")]
    AlreadyStarted,
}
