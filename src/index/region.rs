//! Mapped Region
//!
//! Bounds-checked byte access to a shared, writable file mapping. Every accessor
//! validates `offset + len` against the mapped length, so the index never
//! touches the mapping through raw pointers.

use std::fs::File;

use memmap2::MmapMut;

use crate::error::{LogError, Result};

pub(crate) struct MappedRegion {
    mmap: MmapMut,
}

impl MappedRegion {
    /// Map the whole file read/write, shared with the backing file
    pub(crate) fn map(file: &File) -> Result<Self> {
        // SAFETY: MmapMut::map_mut is unsafe because the file may be modified
        // or truncated by someone else while mapped. This is safe because:
        // 1. The segment's files are owned by a single writer process
        // 2. The file is only truncated after the region has been dropped
        // 3. All access goes through slice()/slice_mut(), which bounds-check
        let mmap = unsafe { MmapMut::map_mut(file)? };
        Ok(Self { mmap })
    }

    /// Mapped length in bytes
    pub(crate) fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    pub(crate) fn slice(&self, offset: u64, len: u64) -> Result<&[u8]> {
        let range = self.range(offset, len)?;
        Ok(&self.mmap[range])
    }

    pub(crate) fn slice_mut(&mut self, offset: u64, len: u64) -> Result<&mut [u8]> {
        let range = self.range(offset, len)?;
        Ok(&mut self.mmap[range])
    }

    /// Flush dirty pages to the backing file (msync)
    pub(crate) fn sync(&self) -> Result<()> {
        self.mmap.flush()?;
        Ok(())
    }

    fn range(&self, offset: u64, len: u64) -> Result<std::ops::Range<usize>> {
        let mapped = self.len();
        match offset.checked_add(len) {
            Some(end) if end <= mapped => Ok(offset as usize..end as usize),
            _ => Err(LogError::MapOutOfBounds {
                offset,
                len,
                mapped,
            }),
        }
    }
}
