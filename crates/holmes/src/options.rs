//! Composable configuration options consumed by [`start`](crate::start).
//!
//! Each option is a pure transformation over a [`LoggerConfig`]. Options are
//! applied left to right on top of the defaults, so later options win.

use crate::config::{LogLevel, LoggerConfig, Rotation};
use std::path::PathBuf;

/// A single configuration transformation
pub type ConfigOption = Box<dyn FnOnce(LoggerConfig) -> LoggerConfig + Send>;

/// Emit records at `level` and above
pub fn level(level: LogLevel) -> ConfigOption {
    Box::new(move |config| LoggerConfig { level, ..config })
}

pub fn debug_level() -> ConfigOption {
    level(LogLevel::Debug)
}

pub fn info_level() -> ConfigOption {
    level(LogLevel::Info)
}

pub fn warn_level() -> ConfigOption {
    level(LogLevel::Warn)
}

pub fn error_level() -> ConfigOption {
    level(LogLevel::Error)
}

pub fn fatal_level() -> ConfigOption {
    level(LogLevel::Fatal)
}

/// Write log files into `dir`, creating it if needed
pub fn log_file_path(dir: impl Into<PathBuf>) -> ConfigOption {
    let dir = dir.into();
    Box::new(move |config| LoggerConfig {
        log_dir: Some(dir),
        ..config
    })
}

pub fn every_minute() -> ConfigOption {
    Box::new(|config| LoggerConfig {
        rotation: Rotation::Minute,
        ..config
    })
}

pub fn every_hour() -> ConfigOption {
    Box::new(|config| LoggerConfig {
        rotation: Rotation::Hour,
        ..config
    })
}

/// Echo every record to stdout as well as the primary sink
pub fn also_stdout() -> ConfigOption {
    Box::new(|config| LoggerConfig {
        also_stdout: true,
        ..config
    })
}

/// Dump a backtrace into the log when the logger stops
pub fn print_stack() -> ConfigOption {
    Box::new(|config| LoggerConfig {
        print_stack: true,
        ..config
    })
}

/// Replace the whole configuration, e.g. one loaded from a file
pub fn from_config(replacement: LoggerConfig) -> ConfigOption {
    Box::new(move |_| replacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_options_apply_in_order() {
        let config = LoggerConfig::default().apply([
            error_level(),
            log_file_path("./log"),
            every_minute(),
            info_level(),
            every_hour(),
        ]);

        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.file_dir(), Some(Path::new("./log")));
        assert_eq!(config.rotation, Rotation::Hour);
        assert!(!config.also_stdout);
    }

    #[test]
    fn test_flag_options() {
        let config = LoggerConfig::default().apply([also_stdout(), print_stack()]);
        assert!(config.also_stdout);
        assert!(config.print_stack);
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn test_from_config_then_override() {
        let loaded = LoggerConfig {
            level: LogLevel::Warn,
            also_stdout: true,
            ..Default::default()
        };

        let config = LoggerConfig::default().apply([from_config(loaded), fatal_level()]);
        assert_eq!(config.level, LogLevel::Fatal);
        assert!(config.also_stdout);
    }

    #[test]
    fn test_no_options_keeps_defaults() {
        let config = LoggerConfig::default().apply(Vec::<ConfigOption>::new());
        assert_eq!(config, LoggerConfig::default());
    }
}
