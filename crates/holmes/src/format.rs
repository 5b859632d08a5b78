//! Log line rendering

use crate::config::LogLevel;
use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};

/// Timestamp layout at the start of every line
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Source location of a logging call, captured by the logging macros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Callsite {
    /// Full path of the enclosing function, e.g. `my_app::server::run`
    pub function: &'static str,
    /// Source file as given by `file!()`
    pub file: &'static str,
    pub line: u32,
}

impl Callsite {
    pub const fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function,
            file,
            line,
        }
    }

    /// Last segment of the function path, skipping closure segments
    pub fn function_name(&self) -> &'static str {
        self.function
            .rsplit("::")
            .find(|segment| !segment.is_empty() && *segment != "{{closure}}")
            .unwrap_or("???")
    }

    /// Final component of the source file path
    pub fn file_name(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("???")
    }
}

/// A single log record, rendered once and then discarded
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub callsite: Callsite,
    pub message: fmt::Arguments<'a>,
}

impl<'a> Record<'a> {
    pub fn new(level: LogLevel, callsite: Callsite, message: fmt::Arguments<'a>) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            callsite,
            message,
        }
    }

    /// `<timestamp> <LEVEL> [<function>] (<file>:<line>) - <message>` plus a newline
    pub fn render(&self) -> String {
        let mut line = String::with_capacity(128);
        // Writing into a String cannot fail
        let _ = writeln!(line, "{}", self);
        line
    }
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} [{}] ({}:{}) - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.callsite.function_name(),
            self.callsite.file_name(),
            self.callsite.line,
            self.message
        )
    }
}

/// Operands written back to back, for the `*ln!` logging macros
pub struct Concat<'a>(pub &'a [&'a dyn fmt::Display]);

impl fmt::Display for Concat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|part| write!(f, "{}", part))
    }
}
