//! Thread-safe pool of round buffers with RAII guards.
//!
//! Stream sources read each round's window into a buffer taken from this pool.
//! The buffer travels inside the round's [`Window`](crate::Window) and comes
//! back to the pool when the last view of that round is dropped, so steady
//! state rounds reuse the same allocation.

use std::ops::Deref;
use std::sync::{Arc, Mutex};

/// Default number of buffers retained by a pool.
pub const DEFAULT_RETAINED_BUFFERS: usize = 2;

/// A thread-safe pool of reusable byte buffers.
///
/// Uses a stack-based approach so the most recently released (and therefore
/// cache-warm) buffer is handed out first.
///
/// # Example
///
/// ```
/// use fast_io::BufferPool;
/// use std::sync::Arc;
///
/// let pool = Arc::new(BufferPool::new(2));
/// let buffer = BufferPool::acquire(Arc::clone(&pool), 1024);
/// assert_eq!(buffer.len(), 1024);
/// drop(buffer);
/// assert_eq!(pool.available(), 1);
/// ```
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    max_buffers: usize,
}

impl BufferPool {
    /// Creates a pool that retains at most `max_buffers` released buffers.
    #[must_use]
    pub fn new(max_buffers: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_buffers)),
            max_buffers,
        }
    }

    /// Acquires a zero-filled buffer of exactly `len` bytes.
    ///
    /// A retained buffer is reused when available; its capacity is kept so
    /// equal-sized rounds do not reallocate.
    #[must_use]
    pub fn acquire(pool: Arc<Self>, len: usize) -> PooledBuffer {
        let recycled = {
            let mut buffers = pool.buffers.lock().expect("buffer pool mutex poisoned");
            buffers.pop()
        };

        let mut buffer = recycled.unwrap_or_default();
        buffer.clear();
        buffer.resize(len, 0);

        PooledBuffer {
            buffer: Some(buffer),
            pool,
        }
    }

    fn return_buffer(&self, buffer: Vec<u8>) {
        let mut buffers = self.buffers.lock().expect("buffer pool mutex poisoned");
        if buffers.len() < self.max_buffers {
            buffers.push(buffer);
        }
    }

    /// Returns the number of buffers currently available in the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        self.buffers.lock().expect("buffer pool mutex poisoned").len()
    }

    /// Returns the maximum number of buffers the pool will retain.
    #[must_use]
    pub fn max_buffers(&self) -> usize {
        self.max_buffers
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_RETAINED_BUFFERS)
    }
}

/// RAII guard that returns its buffer to the pool on drop.
#[derive(Debug)]
pub struct PooledBuffer {
    buffer: Option<Vec<u8>>,
    pool: Arc<BufferPool>,
}

impl PooledBuffer {
    /// Returns the buffer contents mutably, for filling from a reader.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.buffer.as_deref_mut().unwrap_or_default()
    }

    /// Shrinks the logical length, keeping capacity for reuse.
    pub fn truncate(&mut self, len: usize) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.truncate(len);
        }
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.buffer.as_deref().unwrap_or_default()
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.return_buffer(buffer);
        }
    }
}
