//! crates/fast_io/src/window.rs
//!
//! Read-only round windows and the bounds-checked block views handed to
//! worker threads.

use std::fmt;
use std::ops::{Deref, Range};
use std::sync::Arc;

use crate::buffer_pool::PooledBuffer;

/// Storage behind a window. Dropping it unmaps or recycles the bytes.
enum WindowBytes {
    Empty,
    Owned(Vec<u8>),
    Pooled(PooledBuffer),
    #[cfg(unix)]
    Mapped(memmap2::Mmap),
}

impl WindowBytes {
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Owned(bytes) => bytes,
            Self::Pooled(buffer) => buffer,
            #[cfg(unix)]
            Self::Mapped(map) => map,
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Owned(_) => "owned",
            Self::Pooled(_) => "pooled",
            #[cfg(unix)]
            Self::Mapped(_) => "mapped",
        }
    }
}

/// Contiguous, read-only range of a source produced by one read.
///
/// Cloning a window is cheap and shares the same bytes. The underlying
/// mapping or buffer is released when the last clone (including every
/// [`BlockView`] taken from it) is dropped.
#[derive(Clone)]
pub struct Window {
    offset: u64,
    bytes: Arc<WindowBytes>,
}

impl Window {
    /// Creates a zero-length window positioned at `offset`.
    #[must_use]
    pub fn empty(offset: u64) -> Self {
        Self {
            offset,
            bytes: Arc::new(WindowBytes::Empty),
        }
    }

    /// Wraps owned bytes that start at `offset` in the source.
    #[must_use]
    pub fn from_vec(offset: u64, bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Self::empty(offset);
        }
        Self {
            offset,
            bytes: Arc::new(WindowBytes::Owned(bytes)),
        }
    }

    pub(crate) fn from_pooled(offset: u64, buffer: PooledBuffer) -> Self {
        Self {
            offset,
            bytes: Arc::new(WindowBytes::Pooled(buffer)),
        }
    }

    #[cfg(unix)]
    pub(crate) fn from_mmap(offset: u64, map: memmap2::Mmap) -> Self {
        Self {
            offset,
            bytes: Arc::new(WindowBytes::Mapped(map)),
        }
    }

    /// Offset of the first window byte within the source.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of bytes in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.as_slice().len()
    }

    /// Reports whether the window holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the window contents.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Number of live handles (this window, its clones and its block views).
    #[must_use]
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.bytes)
    }

    /// Returns a view of `len` bytes starting `start` bytes into the window.
    ///
    /// Returns `None` when the range does not fit inside the window.
    #[must_use]
    pub fn block(&self, start: usize, len: usize) -> Option<BlockView> {
        let end = start.checked_add(len)?;
        if end > self.len() {
            return None;
        }
        Some(BlockView {
            window: self.clone(),
            range: start..end,
        })
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("offset", &self.offset)
            .field("len", &self.len())
            .field("storage", &self.bytes.kind())
            .finish()
    }
}

/// Read-only view of one block inside a [`Window`].
///
/// The view keeps its window alive, so a worker can never observe a released
/// mapping. Dereferences to the block's bytes.
#[derive(Clone)]
pub struct BlockView {
    window: Window,
    range: Range<usize>,
}

impl BlockView {
    /// Returns the block's bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.window.as_slice()[self.range.clone()]
    }

    /// Absolute offset of the block within the source.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.window.offset() + self.range.start as u64
    }
}

impl Deref for BlockView {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl fmt::Debug for BlockView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockView")
            .field("offset", &self.offset())
            .field("len", &self.range.len())
            .finish()
    }
}
