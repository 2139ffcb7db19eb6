//! Session summary artifact.
//!
//! The summary is a derived view of the session metadata, per-driver
//! aggregates, and the drop counter. It is never patched in place: each
//! update removes the old artifact and writes a fresh one, so a torn write
//! leaves either the previous complete artifact or a truncated new one,
//! never a mix of old and new fields.

use std::fmt::Write as _;

use tracing::debug;

use crate::clock::NO_DATETIME;
use crate::session::Session;
use crate::stats::AggregateTracker;
use crate::storage::{AppendFile, StorageVolume};
use crate::Result;

const SEPARATOR: &str = "----------------------------------------";

/// Render the full summary body.
pub(crate) fn render_summary(
    session: &Session,
    stats: &AggregateTracker,
    dropped: u32,
    now_ms: u64,
    now_datetime: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LapLog Session Summary");
    let _ = writeln!(out, "Session ID: {}", session.id);
    let _ = writeln!(out, "Start uptime_ms: {}", session.start_uptime_ms);
    let _ = writeln!(out, "Start datetime: {}", session.start_datetime);
    let _ = writeln!(out, "{}", SEPARATOR);

    for (driver, driver_stats) in stats.iter() {
        let _ = writeln!(out, "Driver {}:", driver);
        let _ = writeln!(out, "  Laps recorded: {}", driver_stats.lap_count);
        if driver_stats.best_lap_ms > 0 {
            if driver_stats.best_lap_index > 0 {
                let _ = writeln!(
                    out,
                    "  Best lap: {} ms (lap {})",
                    driver_stats.best_lap_ms, driver_stats.best_lap_index
                );
            } else {
                let _ = writeln!(out, "  Best lap: {} ms", driver_stats.best_lap_ms);
            }
        } else {
            let _ = writeln!(out, "  Best lap: {}", NO_DATETIME);
        }
        if driver_stats.best_rt_ms > 0 {
            let _ = writeln!(out, "  Best RT: {} ms", driver_stats.best_rt_ms);
        } else {
            let _ = writeln!(out, "  Best RT: {}", NO_DATETIME);
        }
    }

    let _ = writeln!(out, "{}", SEPARATOR);
    let _ = writeln!(out, "Dropped log lines: {}", dropped);
    let _ = writeln!(out, "Last updated uptime_ms: {}", now_ms);
    let _ = writeln!(out, "Last updated datetime: {}", now_datetime);
    out
}

/// Replace the on-disk summary artifact with a freshly rendered one.
pub(crate) fn write_summary<V: StorageVolume>(
    volume: &mut V,
    session: &Session,
    stats: &AggregateTracker,
    dropped: u32,
    now_ms: u64,
    now_datetime: &str,
) -> Result<()> {
    let body = render_summary(session, stats, dropped, now_ms, now_datetime);
    volume.remove_file(&session.summary_path)?;
    let mut file = volume.open_append(&session.summary_path)?;
    for line in body.lines() {
        file.append_line(line)?;
    }
    debug!(session_id = session.id, "Summary rewritten");
    Ok(())
}
