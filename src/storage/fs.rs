//! `std::fs`-backed storage volume.
//!
//! Maps volume-relative paths onto a host directory. This is the volume used
//! on hosts with a mounted card reader and by the end-to-end tests; on-device
//! builds provide their own [`StorageVolume`] over the SD driver.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{AppendFile, StorageVolume};
use crate::{LoggerError, Result};

/// Storage volume rooted at a host filesystem directory.
#[derive(Debug)]
pub struct FsVolume {
    root: PathBuf,
}

impl FsVolume {
    /// Create a volume rooted at `root`. The directory is created on
    /// [`StorageVolume::mount`], not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The host directory backing this volume.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Append handle over a [`File`] opened in append mode.
pub struct FsAppendFile {
    path: PathBuf,
    file: File,
}

impl AppendFile for FsAppendFile {
    fn append_line(&mut self, line: &str) -> Result<()> {
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.write_all(b"\n"))
            .map_err(|e| LoggerError::file_write(&self.path, e))
    }
}

impl StorageVolume for FsVolume {
    type File = FsAppendFile;

    fn mount(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            LoggerError::unavailable_with_source(
                format!("cannot create volume root {}", self.root.display()),
                e,
            )
        })?;
        debug!("Mounted fs volume at {}", self.root.display());
        Ok(())
    }

    fn ensure_dir(&mut self, path: &Path) -> Result<()> {
        let full = self.resolve(path);
        if full.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(&full).map_err(|e| LoggerError::dir_create(full.clone(), e))
    }

    fn open_append(&mut self, path: &Path) -> Result<Self::File> {
        let full = self.resolve(path);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .map_err(|e| LoggerError::file_open(full.clone(), e))?;
        Ok(FsAppendFile { path: full, file })
    }

    fn file_size(&self, path: &Path) -> Result<Option<u64>> {
        let full = self.resolve(path);
        match std::fs::metadata(&full) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoggerError::file_open(full, e)),
        }
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let full = self.resolve(path);
        let entries = std::fs::read_dir(&full).map_err(|e| LoggerError::file_open(full.clone(), e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoggerError::file_open(full.clone(), e))?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        let full = self.resolve(path);
        match std::fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LoggerError::file_remove(full, e)),
        }
    }
}
