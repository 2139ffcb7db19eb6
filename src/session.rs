//! Session creation and on-disk layout.
//!
//! A session is one timed recording period, materialized as a numbered
//! directory of category CSV files plus a summary artifact:
//!
//! ```text
//! <base>/sessions/S<id>/laps.csv
//! <base>/sessions/S<id>/reaction.csv
//! <base>/sessions/S<id>/all_events.csv
//! <base>/sessions/S<id>/summary.txt
//! ```
//!
//! The session id is never persisted on its own. It is derived by scanning
//! the sessions directory for the highest `S<digits>` suffix and adding one,
//! which makes numbering survive abrupt power loss and naive restart without
//! a counter file or transaction log. Deleting `S2` out of `S1..S3` does not
//! recycle 2: the next session is `S4`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::buffer::Category;
use crate::clock::{self, Clock};
use crate::config::LoggerConfig;
use crate::storage::{AppendFile, StorageVolume};
use crate::Result;

pub(crate) const LAPS_HEADER: &str =
    "session_id,uptime_ms,datetime,driver,lap_index,lap_time_ms,best_lap_time_ms,target_laps,mode";
pub(crate) const REACTION_HEADER: &str =
    "session_id,uptime_ms,datetime,driver,reaction_time_ms,best_reaction_time_ms,mode";
pub(crate) const ALL_EVENTS_HEADER: &str =
    "session_id,uptime_ms,datetime,event_type,driver,value_ms,extra";

const CATEGORY_FILES: [(&str, &str); 3] = [
    ("laps.csv", LAPS_HEADER),
    ("reaction.csv", REACTION_HEADER),
    ("all_events.csv", ALL_EVENTS_HEADER),
];

/// Metadata for the active session. Lives until the next session start.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: u32,
    pub start_uptime_ms: u64,
    pub start_datetime: String,
    pub directory: PathBuf,
    category_paths: [PathBuf; 3],
    pub summary_path: PathBuf,
}

impl Session {
    /// Create the next session on `volume`.
    ///
    /// Ensures the base and sessions directories, derives the id, creates the
    /// session directory, and writes each category header if (and only if)
    /// that file is currently empty. Any creation failure aborts the whole
    /// session start; no partial id is considered valid until the directory
    /// is confirmed created.
    pub fn start<V: StorageVolume, C: Clock>(
        volume: &mut V,
        clock: &C,
        config: &LoggerConfig,
    ) -> Result<Self> {
        let base = PathBuf::from(&config.base_dir);
        let sessions_dir = base.join("sessions");
        volume.ensure_dir(&base)?;
        volume.ensure_dir(&sessions_dir)?;

        let id = next_session_id(volume, &sessions_dir);
        let directory = sessions_dir.join(format!("S{}", id));
        volume.ensure_dir(&directory)?;

        let mut category_paths: [PathBuf; 3] = Default::default();
        for (i, (file_name, header)) in CATEGORY_FILES.into_iter().enumerate() {
            let path = directory.join(file_name);
            ensure_header(volume, &path, header)?;
            category_paths[i] = path;
        }

        let session = Session {
            id,
            start_uptime_ms: clock.uptime_ms(),
            start_datetime: clock::datetime_or_placeholder(clock),
            summary_path: directory.join("summary.txt"),
            directory,
            category_paths,
        };
        info!(session_id = session.id, path = %session.directory.display(), "Session started");
        Ok(session)
    }

    /// Backing-file path for a category within this session.
    pub fn category_path(&self, category: Category) -> &Path {
        &self.category_paths[category.index()]
    }
}

/// Derive the next session id from the sessions directory contents.
///
/// Entries named `S<digits>` contribute their parsed value; everything else
/// is ignored. An unreadable or empty directory yields 1.
pub(crate) fn next_session_id<V: StorageVolume>(volume: &V, sessions_dir: &Path) -> u32 {
    let Ok(entries) = volume.list_dir(sessions_dir) else {
        return 1;
    };
    let max_id = entries
        .iter()
        .filter_map(|name| name.strip_prefix('S'))
        .filter_map(|digits| digits.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    max_id.saturating_add(1)
}

/// Open-or-create `path` and write `header` only if the file is empty.
///
/// Idempotent across repeated opens, so a process restart mid-session never
/// appends a second header line.
fn ensure_header<V: StorageVolume>(volume: &mut V, path: &Path, header: &str) -> Result<()> {
    let size = volume.file_size(path)?.unwrap_or(0);
    let mut file = volume.open_append(path)?;
    if size == 0 {
        file.append_line(header)?;
        debug!(path = %path.display(), "Wrote CSV header");
    }
    Ok(())
}
