//! Logger instances and their lifecycle

use crate::{
    config::{LogLevel, LoggerConfig},
    format::{Callsite, Concat, Record, TIMESTAMP_FORMAT},
    registry,
    rotation::RotatingFileWriter,
};
use chrono::Local;
use std::backtrace::Backtrace;
use std::fmt;
use std::io::{self, Write};
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Primary destination of rendered records
enum Output {
    File(RotatingFileWriter),
    Stderr,
}

/// A configured logger: level filter, output and optional stdout echo.
///
/// Usually created through [`start`](crate::start), which also registers it as
/// the target of the logging macros. [`Logger::new`] creates an unregistered
/// instance for code that passes its logger around explicitly.
pub struct Logger {
    config: LoggerConfig,
    output: Output,
    stopped: AtomicBool,
}

impl Logger {
    /// Create a logger, opening its log file if a directory is configured.
    ///
    /// If the directory or file cannot be created the error is printed to
    /// stderr and the logger writes to stderr instead.
    pub fn new(config: LoggerConfig) -> Self {
        let output = match config.file_dir() {
            Some(dir) => match RotatingFileWriter::new(config.rotation, dir) {
                Ok(writer) => Output::File(writer),
                Err(e) => {
                    eprintln!("{}", e);
                    tracing::warn!(
                        holmes.event = "file_output_unavailable",
                        log_dir = %dir.display(),
                        error = %e,
                        "Falling back to stderr"
                    );
                    Output::Stderr
                }
            },
            None => Output::Stderr,
        };

        Self::with_output(config, output)
    }

    /// Create a logger around an existing rotating writer
    pub fn with_writer(config: LoggerConfig, writer: RotatingFileWriter) -> Self {
        Self::with_output(config, Output::File(writer))
    }

    fn with_output(config: LoggerConfig, output: Output) -> Self {
        tracing::debug!(
            holmes.event = "logger_started",
            level = %config.level.tag(),
            rotation = %config.rotation,
            file_output = matches!(output, Output::File(_)),
            also_stdout = config.also_stdout,
            "Logger started"
        );

        Self {
            config,
            output,
            stopped: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Minimum level that gets emitted
    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// The rotating file writer, unless logging to stderr
    pub fn writer(&self) -> Option<&RotatingFileWriter> {
        match &self.output {
            Output::File(writer) => Some(writer),
            Output::Stderr => None,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Whether a record at `level` would be emitted
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.config.level && !self.is_stopped()
    }

    /// Emit a record for `message` if `level` passes the filter.
    ///
    /// A FATAL record exits the process with status 1 once written.
    pub fn log(&self, level: LogLevel, callsite: Callsite, message: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let line = Record::new(level, callsite, message).render();
        self.emit(line.as_bytes());

        if level == LogLevel::Fatal {
            self.flush();
            std::process::exit(1);
        }
    }

    /// Emit the operands concatenated
    pub fn log_concat(&self, level: LogLevel, callsite: Callsite, parts: &[&dyn fmt::Display]) {
        self.log(level, callsite, format_args!("{}", Concat(parts)));
    }

    /// Stop the logger: dump the stack if configured, close the log file and
    /// release the process-wide slot. Only the first call has any effect.
    pub fn stop(&self) {
        if self
            .stopped
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        if self.config.print_stack {
            self.emit(stack_dump().as_bytes());
        }

        self.flush();
        if let Output::File(writer) = &self.output {
            writer.close();
        }

        registry::release(self);

        tracing::debug!(holmes.event = "logger_stopped", "Logger stopped");
    }

    fn emit(&self, bytes: &[u8]) {
        // Write failures are not surfaced to logging callers
        let _ = match &self.output {
            Output::File(writer) => writer.write_record(bytes).map(drop),
            Output::Stderr => io::stderr().lock().write_all(bytes),
        };

        if self.config.also_stdout {
            let _ = io::stdout().lock().write_all(bytes);
        }
    }

    fn flush(&self) {
        if let Output::File(writer) = &self.output {
            let _ = writer.clone().flush();
        }
        if self.config.also_stdout {
            let _ = io::stdout().flush();
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Backtrace of the calling thread with a timestamped header
fn stack_dump() -> String {
    let current = std::thread::current();
    format!(
        "{} thread '{}' ({:?}) stack backtrace:\n{}\n",
        Local::now().format(TIMESTAMP_FORMAT),
        current.name().unwrap_or("<unnamed>"),
        current.id(),
        Backtrace::force_capture()
    )
}

/// Guard returned by [`start`](crate::start).
///
/// Dereferences to the [`Logger`] and stops it when dropped, so the logger
/// lives as long as the handle unless [`LoggerHandle::stop`] is called first.
pub struct LoggerHandle {
    logger: Arc<Logger>,
}

impl LoggerHandle {
    pub(crate) fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Stop the logger. Calling this more than once is a no-op.
    pub fn stop(&self) {
        self.logger.stop();
    }

    /// Shared reference to the underlying logger
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        &self.logger
    }
}

impl Drop for LoggerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
