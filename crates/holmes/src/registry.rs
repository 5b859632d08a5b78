//! The process-wide logger slot.
//!
//! At most one logger is active at a time. `STARTED` moves
//! inactive → active → inactive via compare-and-swap, so two racing starts
//! cannot both succeed.

use crate::{
    config::{LogLevel, LoggerConfig},
    format::Callsite,
    logger::{Logger, LoggerHandle},
    options::ConfigOption,
    Error, Result,
};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

static STARTED: AtomicBool = AtomicBool::new(false);
static ACTIVE: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

/// Start the process-wide logger.
///
/// # Panics
///
/// Panics if a logger is already active. Starting twice is a programming
/// error; use [`try_start`] to handle it instead.
pub fn start<I>(options: I) -> LoggerHandle
where
    I: IntoIterator<Item = ConfigOption>,
{
    match try_start(options) {
        Ok(handle) => handle,
        Err(e) => panic!("{}", e),
    }
}

/// Start the process-wide logger, failing with [`Error::AlreadyStarted`] if
/// one is already active.
pub fn try_start<I>(options: I) -> Result<LoggerHandle>
where
    I: IntoIterator<Item = ConfigOption>,
{
    if STARTED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(Error::AlreadyStarted);
    }

    let config = LoggerConfig::default().apply(options);
    let logger = Arc::new(Logger::new(config));
    *write_slot() = Some(Arc::clone(&logger));

    Ok(LoggerHandle::new(logger))
}

/// The active logger, if any
pub fn active() -> Option<Arc<Logger>> {
    read_slot().clone()
}

/// Dispatch target of the logging macros; a no-op when no logger is active
pub fn log(level: LogLevel, callsite: Callsite, message: fmt::Arguments<'_>) {
    if let Some(logger) = active() {
        logger.log(level, callsite, message);
    }
}

/// Clear the slot if `logger` is the one occupying it
pub(crate) fn release(logger: &Logger) {
    let mut slot = write_slot();
    let is_active = slot
        .as_deref()
        .map_or(false, |active| std::ptr::eq(active, logger));

    if is_active {
        let released = slot.take();
        STARTED.store(false, Ordering::Release);
        drop(slot);
        drop(released);
    }
}

fn read_slot() -> RwLockReadGuard<'static, Option<Arc<Logger>>> {
    ACTIVE.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_slot() -> RwLockWriteGuard<'static, Option<Arc<Logger>>> {
    ACTIVE.write().unwrap_or_else(PoisonError::into_inner)
}
