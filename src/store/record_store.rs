//! Record Store
//!
//! Buffered appends, positional reads, one lock around both.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::encoding;
use crate::error::{LogError, Result};

use super::LEN_WIDTH;

/// Append-only record store
///
/// ## Concurrency:
/// - `inner`: one Mutex over the writer and `size`
/// - `append`, `read`, `read_at` and `size` all take the lock; there is no
///   reader/writer split because every read flushes the writer first
pub struct Store {
    /// Path of the backing file
    path: PathBuf,

    /// Writer and size, kept consistent under one lock
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    /// Buffered writer over a file opened in append mode
    writer: BufWriter<File>,

    /// Next append position: bytes committed or buffered so far
    size: u64,
}

impl Store {
    /// Open or create a store file
    ///
    /// The file is opened in append mode, so seeking for reads never moves the
    /// write position. `size` starts at the current file length.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let size = file.metadata()?.len();
        debug!(path = %path.display(), size, "opened store");

        Ok(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(StoreInner {
                writer: BufWriter::new(file),
                size,
            }),
        })
    }

    /// Append a record
    ///
    /// Returns `(bytes_written, position)` where `bytes_written` includes the
    /// length prefix and `position` is where the record's prefix begins.
    ///
    /// If either write fails the error is returned and `size` stays put. Part of
    /// the record may still have reached the buffer or the file: a prefix that
    /// was buffered before the content write failed stays in the `BufWriter`,
    /// so later appends report positions short of where their bytes land. The
    /// owning layer compares [`Store::size`] with [`Store::physical_len`] after
    /// a failed append and reconciles the two.
    pub fn append(&self, content: &[u8]) -> Result<(u64, u64)> {
        let mut inner = self.inner.lock();
        let position = inner.size;

        let mut prefix = [0u8; LEN_WIDTH as usize];
        encoding::put_u64(&mut prefix, content.len() as u64);

        let written = inner
            .writer
            .write_all(&prefix)
            .and_then(|()| inner.writer.write_all(content));
        if let Err(e) = written {
            warn!(path = %self.path.display(), position, error = %e, "store append failed");
            return Err(e.into());
        }

        let bytes_written = LEN_WIDTH + content.len() as u64;
        inner.size += bytes_written;
        trace!(position, bytes_written, "appended record");

        Ok((bytes_written, position))
    }

    /// Read the record whose length prefix starts at `position`
    pub fn read(&self, position: u64) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;
        let size = inner.size;

        let prefix_end = position.checked_add(LEN_WIDTH);
        if prefix_end.map_or(true, |end| end > size) {
            return Err(LogError::OutOfRange { position, size });
        }

        let mut file = inner.writer.get_ref();
        file.seek(SeekFrom::Start(position))?;

        let mut prefix = [0u8; LEN_WIDTH as usize];
        read_exact_or_eof(&mut file, &mut prefix, position, size)?;
        let len = encoding::get_u64(&prefix);

        // A prefix that runs past the end means `position` was not a record start
        let record_end = (position + LEN_WIDTH).checked_add(len);
        if record_end.map_or(true, |end| end > size) {
            return Err(LogError::OutOfRange { position, size });
        }

        let mut content = vec![0u8; len as usize];
        read_exact_or_eof(&mut file, &mut content, position, size)?;

        Ok(content)
    }

    /// Raw positional read into `buf`, for byte-range access above the record level
    ///
    /// Returns the number of bytes read, which is short only when the end of the
    /// store is reached. Fails with `OutOfRange` if `offset` lies past the end.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;

        if offset > inner.size {
            return Err(LogError::OutOfRange {
                position: offset,
                size: inner.size,
            });
        }

        let mut file = inner.writer.get_ref();
        file.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(filled)
    }

    /// Logical size: bytes committed or buffered
    pub fn size(&self) -> u64 {
        self.inner.lock().size
    }

    /// Flush, then report the length of the file on disk
    ///
    /// After a failed append this can exceed [`Store::size`]; the owning layer
    /// decides how to reconcile the two.
    pub fn physical_len(&self) -> Result<u64> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;
        Ok(inner.writer.get_ref().metadata()?.len())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered writes, sync and close the file
    ///
    /// The first failure is returned. Unflushed bytes are discarded on failure
    /// rather than retried when the writer drops.
    pub fn close(self) -> Result<()> {
        let StoreInner { mut writer, size } = self.inner.into_inner();
        let flushed = writer.flush();
        let (file, _unflushed) = writer.into_parts();
        flushed?;
        file.sync_all()?;

        debug!(path = %self.path.display(), size, "closed store");
        Ok(())
    }
}

/// `read_exact` that reports a short read as an out-of-range position
fn read_exact_or_eof(file: &mut &File, buf: &mut [u8], position: u64, size: u64) -> Result<()> {
    file.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => LogError::OutOfRange { position, size },
        _ => LogError::Io(e),
    })
}
