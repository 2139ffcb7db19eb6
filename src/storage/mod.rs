//! Storage volume capability traits.
//!
//! The logger consumes block storage through a narrow capability: ensure a
//! directory exists, open a file for append, ask a file's size, list a
//! directory, remove a file. The block-level driver behind those primitives
//! (SD over SPI on device, `std::fs` on a host) is out of scope and assumed
//! correct.
//!
//! All paths handed to a volume are relative to the volume root.

use std::path::Path;

use crate::Result;

mod fs;

pub use fs::{FsAppendFile, FsVolume};

/// An open append handle to one backing file.
///
/// Handles are opened lazily by a drain pass and dropped at pass end; the
/// drop closes the underlying file.
pub trait AppendFile {
    /// Append one line plus a trailing newline.
    fn append_line(&mut self, line: &str) -> Result<()>;
}

/// A mounted (or mountable) storage volume.
pub trait StorageVolume {
    type File: AppendFile;

    /// Mount or initialize the volume. Idempotent.
    fn mount(&mut self) -> Result<()>;

    /// Create a directory if it does not already exist. Idempotent.
    fn ensure_dir(&mut self, path: &Path) -> Result<()>;

    /// Open a file for append, creating it if missing.
    fn open_append(&mut self, path: &Path) -> Result<Self::File>;

    /// Size of a file in bytes, or `None` if it does not exist.
    fn file_size(&self, path: &Path) -> Result<Option<u64>>;

    /// Names of the entries directly under a directory.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Remove a file. Removing a missing file is not an error.
    fn remove_file(&mut self, path: &Path) -> Result<()>;
}
