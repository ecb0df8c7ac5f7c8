//! Offset Index
//!
//! Reserve-then-finalize lifecycle over a mapped file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::encoding;
use crate::error::{LogError, Result};

use super::region::MappedRegion;
use super::{ENTRY_WIDTH, OFFSET_WIDTH, POSITION_WIDTH};

/// Memory-mapped offset index
///
/// ## Lifecycle:
/// - `open`: record the file length as `size`, extend the file to
///   `max_index_bytes`, map it (reserve)
/// - `close`: sync the map, sync the file, truncate to `size` (finalize)
///
/// While open, the file on disk is larger than its content. Logical size is
/// always `size`, never the file length.
///
/// ## Concurrency:
/// No internal lock. `write` and `close` need `&mut self`/`self`, so sharing an
/// index across threads means the owning segment wraps it in its own lock.
pub struct Index {
    /// Backing file, kept open for sync and truncate at close
    file: File,

    /// Path of the backing file
    path: PathBuf,

    /// The reserved mapping; `None` once finalized
    region: Option<MappedRegion>,

    /// Bytes holding valid entries (multiple of ENTRY_WIDTH)
    size: u64,
}

impl Index {
    /// Open or create an index file and reserve `config.max_index_bytes` for it
    ///
    /// An existing file must be an orderly-closed index: its length is taken as
    /// the logical size, so it must be a whole number of entries and fit the
    /// configured maximum.
    pub fn open(path: &Path, config: &Config) -> Result<Self> {
        config.validate()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        let size = file.metadata()?.len();
        if size % ENTRY_WIDTH != 0 {
            return Err(LogError::IndexCorruption(format!(
                "{}: length {} is not a multiple of the {}-byte entry width",
                path.display(),
                size,
                ENTRY_WIDTH
            )));
        }
        if size > config.max_index_bytes {
            return Err(LogError::Config(format!(
                "{}: existing {} bytes exceed max_index_bytes {}",
                path.display(),
                size,
                config.max_index_bytes
            )));
        }

        let region = Self::reserve(&file, size, config.max_index_bytes, MappedRegion::map)?;
        debug!(
            path = %path.display(),
            entries = size / ENTRY_WIDTH,
            max_bytes = config.max_index_bytes,
            "opened index"
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            region: Some(region),
            size,
        })
    }

    /// Append an entry
    ///
    /// Fails with `IndexFull` when another entry would not fit the reserved
    /// mapping; the owner rotates to a new segment on that signal.
    pub fn write(&mut self, offset: u32, position: u64) -> Result<()> {
        let start = self.size;
        let region = self.region_mut()?;

        let max_bytes = region.len();
        if start + ENTRY_WIDTH > max_bytes {
            return Err(LogError::IndexFull { max_bytes });
        }

        encoding::put_u32(region.slice_mut(start, OFFSET_WIDTH)?, offset);
        encoding::put_u64(
            region.slice_mut(start + OFFSET_WIDTH, POSITION_WIDTH)?,
            position,
        );

        self.size += ENTRY_WIDTH;
        trace!(offset, position, "wrote index entry");
        Ok(())
    }

    /// Read an entry: `-1` for the last one written, otherwise entry `input`
    ///
    /// Returns `(offset, position)`. Fails with `EntryNotFound` when the index
    /// is empty or the entry has not been written.
    pub fn read(&self, input: i64) -> Result<(u32, u64)> {
        let entries = self.len();
        let not_found = LogError::EntryNotFound { entry: input, entries };

        let entry = match input {
            _ if entries == 0 => return Err(not_found),
            -1 => entries - 1,
            n if n < 0 => return Err(not_found),
            n => n as u64,
        };
        if entry >= entries {
            return Err(not_found);
        }

        let region = self.region()?;
        let start = entry * ENTRY_WIDTH;
        let offset = encoding::get_u32(region.slice(start, OFFSET_WIDTH)?);
        let position = encoding::get_u64(region.slice(start + OFFSET_WIDTH, POSITION_WIDTH)?);

        Ok((offset, position))
    }

    /// Path of the backing file
    pub fn name(&self) -> &Path {
        &self.path
    }

    /// Number of entries written
    pub fn len(&self) -> u64 {
        self.size / ENTRY_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Bytes holding valid entries
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Bytes reserved for the mapping
    pub fn capacity(&self) -> u64 {
        self.region.as_ref().map_or(self.size, MappedRegion::len)
    }

    /// True when the next `write` would fail with `IndexFull`
    pub fn is_full(&self) -> bool {
        self.size + ENTRY_WIDTH > self.capacity()
    }

    /// Sync and shrink the file to its content, then close it
    pub fn close(mut self) -> Result<()> {
        self.finalize()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Extend the file to `max_bytes` and map all of it
    ///
    /// If mapping fails the file is shrunk back to `size`; a zero-padded file
    /// left behind would reopen as a full index of `(0, 0)` entries.
    fn reserve<M>(file: &File, size: u64, max_bytes: u64, map: M) -> Result<MappedRegion>
    where
        M: FnOnce(&File) -> Result<MappedRegion>,
    {
        file.set_len(max_bytes)?;
        match map(file) {
            Ok(region) => Ok(region),
            Err(e) => {
                warn!(error = %e, "failed to map index, restoring length");
                file.set_len(size)?;
                Err(e)
            }
        }
    }

    /// Map sync, file sync, truncate to `size`. Runs at most once.
    ///
    /// The mapping is dropped before the truncate; shrinking a file underneath a
    /// live mapping is not portable.
    fn finalize(&mut self) -> Result<()> {
        let Some(region) = self.region.take() else {
            return Ok(());
        };

        region.sync()?;
        drop(region);

        self.file.sync_all()?;
        self.file.set_len(self.size)?;

        debug!(path = %self.path.display(), size = self.size, "closed index");
        Ok(())
    }

    fn region(&self) -> Result<&MappedRegion> {
        self.region.as_ref().ok_or_else(closed_error)
    }

    fn region_mut(&mut self) -> Result<&mut MappedRegion> {
        self.region.as_mut().ok_or_else(closed_error)
    }
}

impl Drop for Index {
    fn drop(&mut self) {
        if self.region.is_none() {
            return;
        }
        warn!(path = %self.path.display(), "index dropped without close, finalizing");
        if let Err(e) = self.finalize() {
            warn!(path = %self.path.display(), error = %e, "failed to finalize index on drop");
        }
    }
}

fn closed_error() -> LogError {
    LogError::Io(std::io::Error::other("index already closed"))
}
