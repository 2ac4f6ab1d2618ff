//! crates/fast_io/src/factory.rs
//!
//! Source selection and per-worker source factories.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::SourceError;
use crate::mmap_source::MmapSource;
use crate::stream_source::StreamSource;
use crate::traits::{ByteSource, SourceFactory};

/// How a file is turned into windows.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SourceKind {
    /// One memory mapping per window.
    Mmap,
    /// Positioned reads into pooled buffers.
    Stream,
}

impl SourceKind {
    /// Preferred kind for the current platform.
    #[must_use]
    pub const fn platform_default() -> Self {
        if cfg!(unix) { Self::Mmap } else { Self::Stream }
    }

    /// Parses a kind name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mmap" => Some(Self::Mmap),
            "stream" => Some(Self::Stream),
            _ => None,
        }
    }

    /// Canonical name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mmap => "mmap",
            Self::Stream => "stream",
        }
    }
}

impl Default for SourceKind {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown source kind '{s}'"))
    }
}

/// Opens `path` as a boxed source of the requested kind.
pub fn open_source(
    path: impl AsRef<Path>,
    kind: SourceKind,
) -> Result<Box<dyn ByteSource>, SourceError> {
    match kind {
        SourceKind::Mmap => Ok(Box::new(MmapSource::open(path)?)),
        SourceKind::Stream => Ok(Box::new(StreamSource::open(path)?)),
    }
}

/// Factory that opens a fresh handle on the same file for every caller.
#[derive(Clone, Debug)]
pub struct FileSourceFactory {
    path: PathBuf,
    kind: SourceKind,
}

impl FileSourceFactory {
    /// Creates a factory for `path` producing sources of `kind`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: SourceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// File every produced source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Kind of source produced.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }
}

impl SourceFactory for FileSourceFactory {
    fn create(&self) -> Result<Box<dyn ByteSource>, SourceError> {
        open_source(&self.path, self.kind)
    }
}
