//! Abstraction over how the postings file's bytes are fetched.
//!
//! Cursors never touch a `File` directly; they go through an [`IndexSource`]
//! so a caller can choose seek+read I/O or a memory-mapped view without the
//! decompression/skip logic caring which. The spec calls these out as
//! equivalent: an `mmap`-backed source must return byte-identical slices to
//! the seek+read one for the same offset/length.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;

/// Read-only access to a fixed underlying byte blob at arbitrary offsets.
pub trait IndexSource: Send + Sync {
    /// Reads exactly `len` bytes starting at `offset`.
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>>;

    /// Total length of the underlying blob, in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Seek+read access to the postings file. Simple and portable; pays a
/// syscall per block fetched.
pub struct FileIndexSource {
    file: parking_lot::Mutex<File>,
    len: u64,
}

impl FileIndexSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            file: parking_lot::Mutex::new(file),
            len,
        })
    }
}

impl IndexSource for FileIndexSource {
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn len(&self) -> u64 {
        self.len
    }
}

/// Memory-mapped access to the postings file. Avoids a syscall per block at
/// the cost of page faults on first touch; the OS page cache then serves
/// repeat queries over the same blocks without copying through the kernel.
pub struct MmapIndexSource {
    mmap: memmap2::Mmap,
}

impl MmapIndexSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Ok(Self { mmap })
    }
}

impl IndexSource for MmapIndexSource {
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let start = offset as usize;
        let end = start + len;
        if end > self.mmap.len() {
            return Err(crate::error::SearchError::Format(format!(
                "read past end of postings file: offset {start} len {len} file_len {}",
                self.mmap.len()
            )));
        }
        Ok(self.mmap[start..end].to_vec())
    }

    fn len(&self) -> u64 {
        self.mmap.len() as u64
    }
}
