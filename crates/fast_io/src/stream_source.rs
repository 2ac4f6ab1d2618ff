//! crates/fast_io/src/stream_source.rs
//!
//! Positioned stream reads into pooled buffers.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::buffer_pool::BufferPool;
use crate::error::SourceError;
use crate::traits::{ByteSource, clip};
use crate::window::Window;

/// Byte source that seeks and copies each window into a recycled buffer.
///
/// Works on every platform. A handle is not shared between threads; use a
/// [`FileSourceFactory`](crate::FileSourceFactory) for per-worker handles.
#[derive(Debug)]
pub struct StreamSource {
    path: PathBuf,
    file: File,
    total_size: u64,
    cursor: u64,
    pool: Arc<BufferPool>,
}

impl StreamSource {
    /// Opens `path` for positioned reads.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;
        let total_size = file
            .metadata()
            .map_err(|source| SourceError::Metadata {
                path: path.clone(),
                source,
            })?
            .len();

        logging::trace_source!(debug, path = %path.display(), total_size, "opened stream source");

        Ok(Self {
            path,
            file,
            total_size,
            cursor: 0,
            pool: Arc::new(BufferPool::default()),
        })
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pool that backs this source's windows.
    #[must_use]
    pub fn buffer_pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    fn read_error(&self, offset: u64, len: usize, source: std::io::Error) -> SourceError {
        SourceError::Read {
            path: self.path.clone(),
            offset,
            len,
            source,
        }
    }
}

impl ByteSource for StreamSource {
    fn read(&mut self, offset: u64, len: usize) -> Result<Window, SourceError> {
        let len = clip(offset, len, self.total_size);
        if len == 0 {
            self.cursor = self.total_size;
            return Ok(Window::empty(offset));
        }

        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|source| self.read_error(offset, len, source))?;

        let mut buffer = BufferPool::acquire(Arc::clone(&self.pool), len);
        self.file
            .read_exact(buffer.as_mut_slice())
            .map_err(|source| self.read_error(offset, len, source))?;

        self.cursor = offset + len as u64;
        logging::trace_source!(trace, offset, len, "read window");
        Ok(Window::from_pooled(offset, buffer))
    }

    fn total_size(&self) -> u64 {
        self.total_size
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.total_size
    }
}
