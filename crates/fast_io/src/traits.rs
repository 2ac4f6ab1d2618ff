//! crates/fast_io/src/traits.rs
//!
//! Collaborator contracts consumed by the signature engine.

use crate::error::SourceError;
use crate::window::Window;

/// Random-access, read-only source of windows over a file.
pub trait ByteSource: Send {
    /// Returns up to `len` bytes starting at `offset`.
    ///
    /// The window is shorter than `len` only when it reaches the end of the
    /// source. A request at or beyond the end returns an empty window; that is
    /// how callers detect exhaustion, not an error.
    fn read(&mut self, offset: u64, len: usize) -> Result<Window, SourceError>;

    /// Total number of bytes in the source.
    fn total_size(&self) -> u64;

    /// Reports whether the most recent read reached the end of the source.
    fn at_end(&self) -> bool;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, offset: u64, len: usize) -> Result<Window, SourceError> {
        (**self).read(offset, len)
    }

    fn total_size(&self) -> u64 {
        (**self).total_size()
    }

    fn at_end(&self) -> bool {
        (**self).at_end()
    }
}

/// Produces independent [`ByteSource`]s over the same underlying data.
///
/// Used when sources cannot be shared between threads, for example positioned
/// stream handles: every worker gets its own source.
pub trait SourceFactory: Send + Sync {
    /// Opens a new independent source.
    fn create(&self) -> Result<Box<dyn ByteSource>, SourceError>;
}

impl<F> SourceFactory for F
where
    F: Fn() -> Result<Box<dyn ByteSource>, SourceError> + Send + Sync,
{
    fn create(&self) -> Result<Box<dyn ByteSource>, SourceError> {
        self()
    }
}

/// Clips a `len`-byte request at `offset` to a source of `total` bytes.
pub(crate) fn clip(offset: u64, len: usize, total: u64) -> usize {
    let remaining = total.saturating_sub(offset);
    usize::try_from(remaining).map_or(len, |remaining| remaining.min(len))
}
