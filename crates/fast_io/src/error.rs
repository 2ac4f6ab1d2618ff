//! crates/fast_io/src/error.rs
//!
//! Errors raised while opening or reading a byte source.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to open a source or to produce a window from it.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file's size could not be determined.
    #[error("cannot stat {}: {source}", .path.display())]
    Metadata {
        /// Path whose metadata was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A window could not be memory mapped.
    #[error("cannot map {len} bytes at offset {offset} of {}: {source}", .path.display())]
    Map {
        /// Mapped file.
        path: PathBuf,
        /// Window start.
        offset: u64,
        /// Window length.
        len: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A window could not be read.
    #[error("cannot read {len} bytes at offset {offset} of {}: {source}", .path.display())]
    Read {
        /// Source file.
        path: PathBuf,
        /// Window start.
        offset: u64,
        /// Window length.
        len: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The requested source kind is not available on this platform.
    #[error("{kind} sources are not supported on this platform")]
    Unsupported {
        /// Name of the source kind.
        kind: &'static str,
    },
}

impl SourceError {
    /// Returns the underlying I/O error kind, when there is one.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Open { source, .. }
            | Self::Metadata { source, .. }
            | Self::Map { source, .. }
            | Self::Read { source, .. } => Some(source.kind()),
            Self::Unsupported { .. } => None,
        }
    }
}
