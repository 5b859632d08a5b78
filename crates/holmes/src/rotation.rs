//! Time-based log file rotation

use crate::config::Rotation;
use crate::Result;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// Source of wall-clock time for rotation decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Where bytes currently go
enum Sink {
    File { file: File, path: PathBuf },
    /// Fallback after a failed rotation
    Stderr,
    Closed,
}

impl Sink {
    fn path(&self) -> Option<&Path> {
        match self {
            Sink::File { path, .. } => Some(path),
            _ => None,
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::File { file, .. } => file.write_all(buf),
            Sink::Stderr => io::stderr().lock().write_all(buf),
            Sink::Closed => Err(io::Error::new(
                io::ErrorKind::Other,
                "log writer is closed",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::File { file, .. } => file.flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::Closed => Ok(()),
        }
    }
}

struct Segment {
    sink: Sink,
    /// Next rotation instant; `None` once rotation is off or has failed
    deadline: Option<DateTime<Local>>,
}

/// Result of a rotation attempt, reported once the segment lock is released
enum RotationOutcome {
    Rotated { old_file: Option<PathBuf>, new_file: PathBuf },
    Failed { error: io::Error },
}

impl RotationOutcome {
    fn report(self) {
        match self {
            RotationOutcome::Rotated { old_file, new_file } => {
                tracing::info!(
                    holmes.event = "log_rotated",
                    old_file = ?old_file,
                    new_file = %new_file.display(),
                    "Log file rotated"
                );
            }
            RotationOutcome::Failed { error } => {
                tracing::warn!(
                    holmes.event = "rotation_failed",
                    error = %error,
                    "Log rotation failed, writing to stderr"
                );
            }
        }
    }
}

/// A writer that starts a new log file at every minute or hour boundary.
///
/// The rotation check happens lazily on the write path, under the same lock as
/// the write itself, so every `write` lands whole in exactly one file. Clones
/// share the open file.
pub struct RotatingFileWriter {
    rotation: Rotation,
    log_dir: PathBuf,
    clock: Arc<dyn Clock>,
    segment: Arc<Mutex<Segment>>,
}

impl RotatingFileWriter {
    /// Create the log directory if needed and open the first log file
    pub fn new(rotation: Rotation, log_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_clock(rotation, log_dir, Arc::new(SystemClock))
    }

    /// Like [`RotatingFileWriter::new`] but reading time from `clock`
    pub fn with_clock(
        rotation: Rotation,
        log_dir: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let log_dir = log_dir.into();
        std::fs::create_dir_all(&log_dir)?;

        let now = clock.now();
        let (file, path) = open_log_file(&log_dir, now)?;

        tracing::debug!(
            holmes.event = "log_file_opened",
            file_path = %path.display(),
            rotation = %rotation,
            "Log file opened"
        );

        Ok(Self {
            rotation,
            log_dir,
            clock,
            segment: Arc::new(Mutex::new(Segment {
                sink: Sink::File { file, path },
                deadline: rotation.next_deadline(now),
            })),
        })
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the file currently written to, if any
    pub fn current_path(&self) -> Option<PathBuf> {
        self.lock().sink.path().map(Path::to_path_buf)
    }

    /// Whether writes still go to a log file rather than stderr
    pub fn is_file_backed(&self) -> bool {
        matches!(self.lock().sink, Sink::File { .. })
    }

    /// Instant of the next scheduled rotation
    pub fn next_rotation(&self) -> Option<DateTime<Local>> {
        self.lock().deadline
    }

    /// Write `buf` in full, rotating first if the deadline has passed
    pub fn write_record(&self, buf: &[u8]) -> io::Result<usize> {
        let (outcome, result) = {
            let mut segment = self.lock();
            let outcome = self.rotate_if_due(&mut segment);
            (outcome, segment.sink.write_all(buf))
        };

        if let Some(outcome) = outcome {
            outcome.report();
        }

        result.map(|()| buf.len())
    }

    /// Close the current file. Later writes fail.
    pub fn close(&self) {
        let closed = {
            let mut segment = self.lock();
            segment.deadline = None;
            std::mem::replace(&mut segment.sink, Sink::Closed)
        };

        if let Some(path) = closed.path() {
            tracing::debug!(
                holmes.event = "log_file_closed",
                file_path = %path.display(),
                "Log file closed"
            );
        }
    }

    fn rotate_if_due(&self, segment: &mut Segment) -> Option<RotationOutcome> {
        let deadline = segment.deadline?;
        if !matches!(segment.sink, Sink::File { .. }) {
            return None;
        }

        let now = self.clock.now();
        if now < deadline {
            return None;
        }

        // The old handle is dropped before the next one is opened
        let previous = std::mem::replace(&mut segment.sink, Sink::Closed);
        let old_file = previous.path().map(Path::to_path_buf);
        drop(previous);

        match open_log_file(&self.log_dir, now) {
            Ok((file, path)) => {
                segment.sink = Sink::File {
                    file,
                    path: path.clone(),
                };
                segment.deadline = self.rotation.next_deadline(now);
                Some(RotationOutcome::Rotated {
                    old_file,
                    new_file: path,
                })
            }
            Err(error) => {
                eprintln!("Log rotation failed: {}", error);
                segment.sink = Sink::Stderr;
                segment.deadline = None;
                Some(RotationOutcome::Failed { error })
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Segment> {
        self.segment.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().sink.flush()
    }
}

// Implement Clone for use with tracing-subscriber
impl Clone for RotatingFileWriter {
    fn clone(&self) -> Self {
        Self {
            rotation: self.rotation,
            log_dir: self.log_dir.clone(),
            clock: Arc::clone(&self.clock),
            segment: Arc::clone(&self.segment),
        }
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// `<program>.<YYYY>-<MM>-<DD>-<HH>-<mm>.<pid>.log` for a file created at `created`
pub fn log_file_name(created: DateTime<Local>) -> String {
    format!(
        "{}.{}.{}.log",
        program_name(),
        created.format("%Y-%m-%d-%H-%M"),
        std::process::id()
    )
}

/// Base name of the running executable
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "holmes".to_string())
}

fn open_log_file(log_dir: &Path, created: DateTime<Local>) -> io::Result<(File, PathBuf)> {
    let path = log_dir.join(log_file_name(created));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}
