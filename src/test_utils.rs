//! Test doubles for the storage and clock capabilities.
//!
//! [`MemoryVolume`] models a removable card as an in-memory tree with
//! injectable open/mkdir failures, which lets tests exercise drain-pass
//! aborts and session-start failures without touching a real filesystem.
//! [`ManualClock`] is a hand-advanced clock for deterministic flush and
//! summary scheduling.

#![cfg(test)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::clock::Clock;
use crate::storage::{AppendFile, StorageVolume};
use crate::{LoggerError, Result};

#[derive(Debug, Default)]
struct VolumeState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<String>>,
    fail_open: BTreeSet<PathBuf>,
    fail_write: BTreeSet<PathBuf>,
    fail_dir_create: BTreeSet<PathBuf>,
    fail_mount: bool,
}

/// In-memory [`StorageVolume`] with failure injection.
///
/// Clones share the same underlying tree, so a test can keep a handle for
/// inspection and failure injection after moving a clone into the logger.
#[derive(Debug, Default, Clone)]
pub struct MemoryVolume {
    state: Rc<RefCell<VolumeState>>,
}

impl MemoryVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines ever appended to `path`, headers included.
    pub fn lines(&self, path: &Path) -> Vec<String> {
        self.state.borrow().files.get(path).cloned().unwrap_or_default()
    }

    pub fn file_exists(&self, path: &Path) -> bool {
        self.state.borrow().files.contains_key(path)
    }

    pub fn dir_exists(&self, path: &Path) -> bool {
        self.state.borrow().dirs.contains(path)
    }

    pub fn add_dir(&mut self, path: &Path) {
        self.state.borrow_mut().dirs.insert(path.to_path_buf());
    }

    /// Remove a directory and everything under it.
    pub fn remove_dir(&mut self, path: &Path) {
        let mut state = self.state.borrow_mut();
        state.dirs.retain(|d| !d.starts_with(path));
        state.files.retain(|f, _| !f.starts_with(path));
    }

    /// Make every future mount attempt fail.
    pub fn fail_mount(&mut self) {
        self.state.borrow_mut().fail_mount = true;
    }

    /// Make future opens of `path` fail.
    pub fn fail_open(&mut self, path: &Path) {
        self.state.borrow_mut().fail_open.insert(path.to_path_buf());
    }

    /// Stop failing opens of `path`.
    pub fn heal_open(&mut self, path: &Path) {
        self.state.borrow_mut().fail_open.remove(path);
    }

    /// Make future appends to `path` fail. Opens still succeed, modelling a
    /// card that mounts but errors on the actual write.
    pub fn fail_write(&mut self, path: &Path) {
        self.state.borrow_mut().fail_write.insert(path.to_path_buf());
    }

    /// Stop failing appends to `path`.
    pub fn heal_write(&mut self, path: &Path) {
        self.state.borrow_mut().fail_write.remove(path);
    }

    /// Make creation of directory `path` fail.
    pub fn fail_dir_create(&mut self, path: &Path) {
        self.state.borrow_mut().fail_dir_create.insert(path.to_path_buf());
    }
}

/// Append handle into a [`MemoryVolume`] file.
#[derive(Debug)]
pub struct MemoryAppendFile {
    state: Rc<RefCell<VolumeState>>,
    path: PathBuf,
}

impl AppendFile for MemoryAppendFile {
    fn append_line(&mut self, line: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_write.contains(&self.path) {
            return Err(LoggerError::file_write(&self.path, std::io::Error::other("injected")));
        }
        state.files.entry(self.path.clone()).or_default().push(line.to_string());
        Ok(())
    }
}

impl StorageVolume for MemoryVolume {
    type File = MemoryAppendFile;

    fn mount(&mut self) -> Result<()> {
        if self.state.borrow().fail_mount {
            return Err(LoggerError::unavailable("injected mount failure"));
        }
        Ok(())
    }

    fn ensure_dir(&mut self, path: &Path) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_dir_create.contains(path) {
            return Err(LoggerError::dir_create(path, std::io::Error::other("injected")));
        }
        state.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn open_append(&mut self, path: &Path) -> Result<Self::File> {
        let mut state = self.state.borrow_mut();
        if state.fail_open.contains(path) {
            return Err(LoggerError::file_open(path, std::io::Error::other("injected")));
        }
        state.files.entry(path.to_path_buf()).or_default();
        Ok(MemoryAppendFile { state: Rc::clone(&self.state), path: path.to_path_buf() })
    }

    fn file_size(&self, path: &Path) -> Result<Option<u64>> {
        let state = self.state.borrow();
        Ok(state
            .files
            .get(path)
            .map(|lines| lines.iter().map(|l| l.len() as u64 + 1).sum()))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let state = self.state.borrow();
        if !state.dirs.contains(path) {
            return Err(LoggerError::file_open(path, std::io::Error::other("no such dir")));
        }
        let mut names: Vec<String> = state
            .dirs
            .iter()
            .chain(state.files.keys())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        self.state.borrow_mut().files.remove(path);
        Ok(())
    }
}

/// Hand-advanced [`Clock`] with an optional fixed datetime string.
#[derive(Debug)]
pub struct ManualClock {
    uptime_ms: Cell<u64>,
    datetime: Option<String>,
}

impl ManualClock {
    pub fn new(uptime_ms: u64) -> Self {
        Self { uptime_ms: Cell::new(uptime_ms), datetime: None }
    }

    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    pub fn advance(&self, delta_ms: u64) {
        self.uptime_ms.set(self.uptime_ms.get() + delta_ms);
    }

    pub fn set(&self, uptime_ms: u64) {
        self.uptime_ms.set(uptime_ms);
    }
}

impl Clock for ManualClock {
    fn uptime_ms(&self) -> u64 {
        self.uptime_ms.get()
    }

    fn datetime(&self) -> Option<String> {
        self.datetime.clone()
    }
}
