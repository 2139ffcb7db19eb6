//! Durable session event logger for lap-timer devices.
//!
//! `laplog` records discrete timed events — lap crossings and reaction-time
//! captures — onto removable block storage without ever blocking the
//! time-critical measurement loop that produces them.
//!
//! # Design
//!
//! - **Non-blocking capture**: `log_lap` / `log_rt` only format a row and
//!   push it into a bounded in-memory queue. All storage I/O happens in
//!   `tick`, driven from a loop that can tolerate blocking.
//! - **Bounded, observable loss**: when the queue is full, new rows are
//!   dropped (never old ones) and counted. The drop counter is surfaced via
//!   [`SessionLogger::dropped_lines`] and the session summary.
//! - **Crash-safe numbering**: session ids are derived from the storage
//!   volume's directory listing, never from a persisted counter, so abrupt
//!   power loss and naive restart cannot corrupt or reuse them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use laplog::{FsVolume, LoggerConfig, SessionLogger, SystemClock};
//!
//! # fn main() -> laplog::Result<()> {
//! let mut logger = SessionLogger::new(
//!     FsVolume::new("/media/sdcard"),
//!     SystemClock::new(),
//!     LoggerConfig::default(),
//! )?;
//! logger.init()?;
//! let session = logger.start_new_session()?;
//! println!("recording session S{}", session);
//!
//! // On the measurement path (never blocks on storage):
//! logger.log_lap(1, 1, 45_230, 45_230, 5);
//!
//! // From the housekeeping loop:
//! logger.tick(400);
//! # Ok(())
//! # }
//! ```

// Core types and error handling
mod buffer;
mod clock;
mod config;
mod error;
mod stats;
#[cfg(test)]
mod test_utils;

// Session lifecycle and storage
mod logger;
mod session;
mod storage;
mod summary;

// Core exports
pub use buffer::{Category, LogEntry, LogLine, WriteBuffer};
pub use clock::{Clock, SystemClock, NO_DATETIME};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use stats::{AggregateTracker, DriverStats};

// Session and storage exports
pub use logger::SessionLogger;
pub use session::Session;
pub use storage::{AppendFile, FsAppendFile, FsVolume, StorageVolume};
