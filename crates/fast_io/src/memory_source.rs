//! crates/fast_io/src/memory_source.rs
//!
//! In-memory byte source.

use std::sync::Arc;

use crate::error::SourceError;
use crate::traits::{ByteSource, SourceFactory, clip};
use crate::window::Window;

/// Byte source over a shared in-memory buffer.
///
/// Each read copies the window, mirroring a stream source without touching
/// the filesystem. Also acts as a [`SourceFactory`] whose products share the
/// same bytes.
#[derive(Clone, Debug)]
pub struct MemorySource {
    data: Arc<[u8]>,
    cursor: u64,
}

impl MemorySource {
    /// Creates a source over `data`.
    #[must_use]
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            data: data.into(),
            cursor: 0,
        }
    }
}

impl ByteSource for MemorySource {
    fn read(&mut self, offset: u64, len: usize) -> Result<Window, SourceError> {
        let total = self.total_size();
        let len = clip(offset, len, total);
        if len == 0 {
            self.cursor = total;
            return Ok(Window::empty(offset));
        }
        // clip() guarantees offset + len <= data.len(), so offset fits usize.
        let start = offset as usize;
        self.cursor = offset + len as u64;
        Ok(Window::from_vec(offset, self.data[start..start + len].to_vec()))
    }

    fn total_size(&self) -> u64 {
        self.data.len() as u64
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.total_size()
    }
}

impl SourceFactory for MemorySource {
    fn create(&self) -> Result<Box<dyn ByteSource>, SourceError> {
        Ok(Box::new(Self::new(Arc::clone(&self.data))))
    }
}
