//! Session logger facade.
//!
//! [`SessionLogger`] ties the pieces together: a [`StorageVolume`] capability
//! for durable writes, a [`Clock`] for row stamps, a bounded [`WriteBuffer`]
//! between the two, and per-driver aggregates feeding the session summary.
//!
//! The split matters for timing: `log_lap` / `log_rt` run on the
//! time-critical measurement path and only format a row and enqueue it —
//! no storage I/O, no unbounded allocation. `tick` runs from a loop that can
//! tolerate blocking; it drains the queue to the category CSV files and
//! rewrites the summary artifact on its cadence.
//!
//! There is no internal threading or locking. Producers and `tick` must run
//! on one logical execution context, or the caller serializes access.
//!
//! ```rust,no_run
//! use laplog::{FsVolume, LoggerConfig, SessionLogger, SystemClock};
//!
//! # fn main() -> laplog::Result<()> {
//! let volume = FsVolume::new("/media/sdcard");
//! let mut logger = SessionLogger::new(volume, SystemClock::new(), LoggerConfig::default())?;
//! logger.init()?;
//! logger.start_new_session()?;
//!
//! logger.log_lap(1, 1, 45_230, 45_230, 5);
//! logger.tick(400);
//! # Ok(())
//! # }
//! ```

use tracing::{debug, info, warn};

use crate::buffer::{Category, WriteBuffer};
use crate::clock::{self, Clock};
use crate::config::LoggerConfig;
use crate::session::Session;
use crate::stats::{AggregateTracker, DriverStats};
use crate::storage::{AppendFile, StorageVolume};
use crate::summary;
use crate::{LoggerError, Result};


/// Durable session event logger over a storage volume.
///
/// One instance owns all logger state; there are no globals. See the module
/// docs for the producer/drain split.
pub struct SessionLogger<V: StorageVolume, C: Clock> {
    volume: V,
    clock: C,
    config: LoggerConfig,
    ready: bool,
    session: Option<Session>,
    buffer: WriteBuffer,
    stats: AggregateTracker,
    last_flush_ms: u64,
    last_summary_ms: u64,
}

impl<V: StorageVolume, C: Clock> SessionLogger<V, C> {
    /// Build a logger from its capabilities and configuration.
    ///
    /// Validates the configuration; storage is not touched until [`init`].
    ///
    /// [`init`]: SessionLogger::init
    pub fn new(volume: V, clock: C, config: LoggerConfig) -> Result<Self> {
        config.validate()?;
        let buffer = WriteBuffer::new(config.buffer_lines, config.line_max);
        let stats = AggregateTracker::new(config.max_drivers);
        Ok(Self {
            volume,
            clock,
            config,
            ready: false,
            session: None,
            buffer,
            stats,
            last_flush_ms: 0,
            last_summary_ms: 0,
        })
    }

    /// Mount the volume and create the base directory structure.
    ///
    /// Idempotent: re-init after success is a cheap no-op. On failure the
    /// logger stays not-ready and every `log_*` / `tick` call is a no-op
    /// until a later init succeeds.
    pub fn init(&mut self) -> Result<()> {
        if self.ready {
            return Ok(());
        }
        let result = self.init_storage();
        match &result {
            Ok(()) => {
                self.ready = true;
                info!(base_dir = %self.config.base_dir, "Storage initialized");
            }
            Err(e) => {
                self.ready = false;
                warn!("Storage init failed: {}", e);
            }
        }
        result
    }

    fn init_storage(&mut self) -> Result<()> {
        self.volume.mount()?;
        let base = std::path::PathBuf::from(&self.config.base_dir);
        self.volume.ensure_dir(&base)?;
        self.volume.ensure_dir(&base.join("sessions"))?;
        Ok(())
    }

    /// Whether storage is mounted and the base directories exist.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Start a new recording session, superseding any current one.
    ///
    /// Derives the next session id from the sessions directory, creates the
    /// session directory and category files, resets the write buffer, drop
    /// counter, and aggregates, and writes an initial summary. Returns the
    /// new session id.
    pub fn start_new_session(&mut self) -> Result<u32> {
        if !self.ready {
            return Err(LoggerError::unavailable("storage not initialized"));
        }

        let session = Session::start(&mut self.volume, &self.clock, &self.config)?;
        let id = session.id;
        let start_ms = session.start_uptime_ms;

        self.buffer.reset();
        self.stats.reset();
        self.last_flush_ms = start_ms;
        self.last_summary_ms = start_ms;
        self.session = Some(session);

        if let Err(e) = self.rewrite_summary(start_ms) {
            // The directory and headers exist, so the session is valid; the
            // next summary cadence will retry.
            warn!(session_id = id, "Initial summary write failed: {}", e);
        }
        Ok(id)
    }

    /// Id of the active session, or 0 when none has been started.
    pub fn session_id(&self) -> u32 {
        self.session.as_ref().map(|s| s.id).unwrap_or(0)
    }

    /// Record a completed lap.
    ///
    /// Enqueues one row for `laps.csv` and one for `all_events.csv`, and
    /// updates the driver's aggregates immediately — aggregate correctness
    /// never depends on when (or whether) the drain succeeds. A no-op until
    /// a session is active.
    pub fn log_lap(
        &mut self,
        driver: u8,
        lap_index: u16,
        lap_ms: u32,
        best_lap_ms: u32,
        target_laps: u16,
    ) {
        let Some(session) = &self.session else { return };
        if !self.ready {
            return;
        }
        let sid = session.id;
        let uptime = self.clock.uptime_ms();
        let datetime = clock::datetime_or_placeholder(&self.clock);

        let lap_row = format!(
            "{},{},{},{},{},{},{},{},LAP",
            sid, uptime, datetime, driver, lap_index, lap_ms, best_lap_ms, target_laps
        );
        self.buffer.enqueue(Category::Lap, &lap_row);

        let all_row = format!(
            "{},{},{},LAP,{},{},lap_index={};best_lap_ms={};target_laps={}",
            sid, uptime, datetime, driver, lap_ms, lap_index, best_lap_ms, target_laps
        );
        self.buffer.enqueue(Category::All, &all_row);

        self.stats.record_lap(driver, lap_index, lap_ms);
    }

    /// Record a reaction-time capture.
    ///
    /// Enqueues one row for `reaction.csv` and one for `all_events.csv`, and
    /// updates the driver's aggregates immediately. A no-op until a session
    /// is active.
    pub fn log_rt(&mut self, driver: u8, reaction_ms: u32, best_rt_ms: u32) {
        let Some(session) = &self.session else { return };
        if !self.ready {
            return;
        }
        let sid = session.id;
        let uptime = self.clock.uptime_ms();
        let datetime = clock::datetime_or_placeholder(&self.clock);

        let rt_row = format!(
            "{},{},{},{},{},{},RT",
            sid, uptime, datetime, driver, reaction_ms, best_rt_ms
        );
        self.buffer.enqueue(Category::Reaction, &rt_row);

        let all_row = format!(
            "{},{},{},RT,{},{},best_rt_ms={}",
            sid, uptime, datetime, driver, reaction_ms, best_rt_ms
        );
        self.buffer.enqueue(Category::All, &all_row);

        self.stats.record_reaction(driver, reaction_ms);
    }

    /// Drive draining and summary rewrites. Call from a non-time-critical
    /// loop; this is the only entry point that performs storage I/O after
    /// session start.
    ///
    /// A drain pass runs when the queue has reached the flush threshold, or
    /// when it is non-empty and the flush interval has elapsed. The summary
    /// is rewritten on its own interval, and shortly after a drain that
    /// wrote rows (debounced), so it stays fresh after logging bursts
    /// without being rewritten on every event.
    pub fn tick(&mut self, now_ms: u64) {
        if !self.ready || self.session.is_none() {
            return;
        }

        let should_flush = self.buffer.len() >= self.config.flush_threshold
            || (!self.buffer.is_empty()
                && now_ms.saturating_sub(self.last_flush_ms) >= self.config.flush_interval_ms);

        let mut flushed = false;
        if should_flush {
            flushed = self.drain();
            if flushed {
                self.last_flush_ms = now_ms;
            }
        }

        let since_summary = now_ms.saturating_sub(self.last_summary_ms);
        let summary_due = since_summary >= self.config.summary_interval_ms;
        let summary_after_flush = flushed && since_summary >= self.config.summary_debounce_ms;
        if summary_due || summary_after_flush {
            if let Err(e) = self.rewrite_summary(now_ms) {
                warn!("Summary rewrite failed: {}", e);
            }
            self.last_summary_ms = now_ms;
        }
    }

    /// Rows rejected because the write buffer was full, this session.
    pub fn dropped_lines(&self) -> u32 {
        self.buffer.dropped()
    }

    /// Aggregates for one driver slot, or `None` if out of range.
    pub fn driver_stats(&self, driver: u8) -> Option<&DriverStats> {
        self.stats.get(driver)
    }

    /// The injected clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The underlying storage volume.
    pub fn volume(&self) -> &V {
        &self.volume
    }

    /// One drain pass: pop rows front-to-back and append each to its
    /// category file. Returns whether anything was written.
    ///
    /// Per-category handles open lazily on first use within the pass and
    /// close when the pass ends, so open/close cost is amortized over the
    /// batch. The first open or write failure aborts the pass: the failing
    /// row and everything behind it stay queued for a later attempt, rows
    /// already appended are gone from the queue. No duplication, no
    /// reordering.
    fn drain(&mut self) -> bool {
        let Some(session) = &self.session else { return false };
        let mut handles: [Option<V::File>; 3] = [None, None, None];
        let mut written = 0usize;

        while let Some(entry) = self.buffer.peek_front() {
            let category = entry.category;
            let slot = &mut handles[category.index()];
            let handle = match slot {
                Some(handle) => handle,
                None => match self.volume.open_append(session.category_path(category)) {
                    Ok(handle) => slot.insert(handle),
                    Err(e) => {
                        warn!(?category, written, "Drain pass aborted: {}", e);
                        return written > 0;
                    }
                },
            };
            if let Err(e) = handle.append_line(entry.line.as_str()) {
                warn!(?category, written, "Drain pass aborted: {}", e);
                return written > 0;
            }
            self.buffer.pop_front();
            written += 1;
        }

        if written > 0 {
            debug!(rows = written, "Drain pass complete");
        }
        written > 0
    }

    fn rewrite_summary(&mut self, now_ms: u64) -> Result<()> {
        let Some(session) = &self.session else { return Err(LoggerError::NoSession) };
        let datetime = clock::datetime_or_placeholder(&self.clock);
        summary::write_summary(
            &mut self.volume,
            session,
            &self.stats,
            self.buffer.dropped(),
            now_ms,
            &datetime,
        )
    }
}
