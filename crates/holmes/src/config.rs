//! Logger configuration and management

use crate::{Error, Result};
use chrono::{DateTime, Duration, TimeZone, Timelike};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main logger configuration.
///
/// Fixed once the logger starts. Built either from [`ConfigOption`]s applied
/// over [`LoggerConfig::default`], or loaded from a TOML file.
///
/// [`ConfigOption`]: crate::options::ConfigOption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level a record needs to be emitted
    pub level: LogLevel,

    /// Directory for log files; `None` logs to stderr only
    pub log_dir: Option<PathBuf>,

    /// How often a new log file is started
    pub rotation: Rotation,

    /// Echo every record to stdout as well
    pub also_stdout: bool,

    /// Dump a backtrace into the log on stop
    pub print_stack: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            log_dir: None,
            rotation: Rotation::Never,
            also_stdout: false,
            print_stack: false,
        }
    }
}

/// Record severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Tag printed in each log line
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pass through so `{:>5}` pads the tag
        f.pad(self.tag())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            other => Err(Error::Config {
                message: format!("Unknown log level '{}'", other),
            }),
        }
    }
}

/// Wall-clock granularity at which a new log file is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Keep writing to the same file
    #[default]
    Never,
    /// New file at each minute boundary
    Minute,
    /// New file at each hour boundary
    Hour,
}

impl Rotation {
    /// Length of one rotation period, if rotation is enabled
    pub fn unit(&self) -> Option<Duration> {
        match self {
            Rotation::Never => None,
            Rotation::Minute => Some(Duration::minutes(1)),
            Rotation::Hour => Some(Duration::hours(1)),
        }
    }

    /// Truncate `t` down to the start of its rotation period on the local
    /// wall clock of `t`'s time zone.
    ///
    /// With rotation disabled, or when the truncated wall-clock time does not
    /// exist in that zone, the instant is returned unchanged.
    pub fn truncate<Tz: TimeZone>(&self, t: DateTime<Tz>) -> DateTime<Tz> {
        let local = t.naive_local();
        let truncated = match self {
            Rotation::Never => return t,
            Rotation::Minute => local.date().and_hms_opt(local.hour(), local.minute(), 0),
            Rotation::Hour => local.date().and_hms_opt(local.hour(), 0, 0),
        };
        // Ambiguous wall-clock times (DST fold) resolve to the earlier instant
        truncated
            .and_then(|naive| t.timezone().from_local_datetime(&naive).earliest())
            .unwrap_or(t)
    }

    /// First rotation boundary strictly after the period containing `now`
    pub fn next_deadline<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.unit().map(|unit| self.truncate(now) + unit)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rotation::Never => "never",
            Rotation::Minute => "minute",
            Rotation::Hour => "hour",
        };
        f.pad(name)
    }
}

impl FromStr for Rotation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "never" | "none" | "" => Ok(Rotation::Never),
            "minute" | "every_minute" => Ok(Rotation::Minute),
            "hour" | "every_hour" => Ok(Rotation::Hour),
            other => Err(Error::Config {
                message: format!("Unknown rotation '{}'", other),
            }),
        }
    }
}

impl LoggerConfig {
    /// Fold `options` over this configuration, left to right
    pub fn apply<I>(self, options: I) -> Self
    where
        I: IntoIterator<Item = crate::options::ConfigOption>,
    {
        options.into_iter().fold(self, |config, option| option(config))
    }

    /// Directory for log files, treating an empty path as unset
    pub fn file_dir(&self) -> Option<&Path> {
        self.log_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    /// Parse configuration from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file, or the default location when `None`.
    ///
    /// A missing file yields the defaults with environment overrides applied.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)?;
            Self::from_toml_str(&content)
        } else {
            let mut config = Self::default();
            config.load_env_overrides();
            Ok(config)
        }
    }

    /// Serialize configuration to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config {
            message: format!("Failed to serialize logger config: {}", e),
        })
    }

    /// Load environment variable overrides
    pub fn load_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("HOLMES_LOG_LEVEL") {
            self.level = level.parse().unwrap_or(self.level);
        }

        if let Ok(dir) = std::env::var("HOLMES_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }

        if let Ok(rotation) = std::env::var("HOLMES_ROTATION") {
            self.rotation = rotation.parse().unwrap_or(self.rotation);
        }

        if let Ok(enabled) = std::env::var("HOLMES_ALSO_STDOUT") {
            self.also_stdout = enabled.parse().unwrap_or(self.also_stdout);
        }

        if let Ok(enabled) = std::env::var("HOLMES_PRINT_STACK") {
            self.print_stack = enabled.parse().unwrap_or(self.print_stack);
        }
    }

    /// Get default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let project_dirs =
            ProjectDirs::from("com", "holmes", "holmes").ok_or_else(|| Error::Config {
                message: "Could not determine config directory".to_string(),
            })?;

        Ok(project_dirs.config_dir().join("holmes.toml"))
    }
}
