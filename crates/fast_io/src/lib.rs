//! Windowed byte sources for the parallel block-signature engine.
//!
//! A signature run reads the input one *round* at a time: a single contiguous
//! window covering every block the worker pool hashes concurrently. This crate
//! provides the sources that produce those windows and the read-only views
//! workers hash from.
//!
//! # Features
//!
//! - **Memory-mapped windows** via [`MmapSource`] (unix), one mapping per round
//! - **Positioned stream reads** via [`StreamSource`] into pooled buffers that
//!   are recycled round over round
//! - **Per-worker handles** via [`FileSourceFactory`] when a source must not be
//!   shared between threads
//! - **In-memory sources** via [`MemorySource`] for tests and embedding
//!
//! # Design Principles
//!
//! 1. **Zero-copy views** - [`BlockView`] borrows a range of a shared
//!    [`Window`] instead of copying block bytes
//! 2. **Lifetime-scoped release** - a window's mapping or buffer is released
//!    only when its last view is dropped
//! 3. **Graceful fallback** - platforms without mmap use [`StreamSource`]

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

pub mod buffer_pool;
mod error;
mod factory;
mod memory_source;
mod stream_source;
pub mod traits;
mod window;

// mmap_source depends on memmap2 (Unix-only dependency), so needs a stub
#[cfg(unix)]
mod mmap_source;
#[cfg(not(unix))]
#[path = "mmap_source_stub.rs"]
mod mmap_source;

pub use buffer_pool::{BufferPool, PooledBuffer};
pub use error::SourceError;
pub use factory::{FileSourceFactory, SourceKind, open_source};
pub use memory_source::MemorySource;
pub use mmap_source::MmapSource;
pub use stream_source::StreamSource;
pub use traits::{ByteSource, SourceFactory};
pub use window::{BlockView, Window};
