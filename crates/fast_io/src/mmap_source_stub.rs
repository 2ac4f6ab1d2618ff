//! Fallback for platforms without memmap2 support: opening always fails so
//! callers pick [`StreamSource`](crate::StreamSource) instead.

use std::path::Path;

use crate::error::SourceError;
use crate::traits::ByteSource;
use crate::window::Window;

/// Placeholder memory-mapped source; cannot be constructed on this platform.
#[derive(Debug)]
pub struct MmapSource {
    _private: (),
}

impl MmapSource {
    /// Always returns [`SourceError::Unsupported`].
    pub fn open(_path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Err(SourceError::Unsupported { kind: "mmap" })
    }
}

impl ByteSource for MmapSource {
    fn read(&mut self, offset: u64, _len: usize) -> Result<Window, SourceError> {
        Ok(Window::empty(offset))
    }

    fn total_size(&self) -> u64 {
        0
    }

    fn at_end(&self) -> bool {
        true
    }
}
