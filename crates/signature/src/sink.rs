//! crates/signature/src/sink.rs
//!
//! Digest sinks. The engine calls [`DigestSink::save`] once per block, in
//! block order, from the orchestrating thread only.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Receives digests in ascending block order.
pub trait DigestSink: Send {
    /// Persists one digest. An error aborts the run.
    fn save(&mut self, digest: &str) -> io::Result<()>;
}

impl<F> DigestSink for F
where
    F: FnMut(&str) -> io::Result<()> + Send,
{
    fn save(&mut self, digest: &str) -> io::Result<()> {
        self(digest)
    }
}

/// How consecutive digests are separated in the output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SinkFormat {
    /// Digests written back to back with no separator.
    #[default]
    Concatenated,
    /// Each digest followed by `\n`.
    LineDelimited,
}

/// Sink writing digests to any [`Write`] implementation, flushing after each
/// digest.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    format: SinkFormat,
}

/// Sink writing to a file created by [`FileSink::create`].
pub type FileSink = WriterSink<BufWriter<File>>;

impl<W: Write + Send> WriterSink<W> {
    /// Wraps `writer`.
    pub const fn new(writer: W, format: SinkFormat) -> Self {
        Self { writer, format }
    }

    /// Output format.
    pub const fn format(&self) -> SinkFormat {
        self.format
    }

    /// Returns a reference to the wrapped writer.
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwraps the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<BufWriter<File>> {
    /// Creates (or truncates) `path` and writes digests to it.
    pub fn create(path: impl AsRef<Path>, format: SinkFormat) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), format))
    }
}

impl<W: Write + Send> DigestSink for WriterSink<W> {
    fn save(&mut self, digest: &str) -> io::Result<()> {
        self.writer.write_all(digest.as_bytes())?;
        if self.format == SinkFormat::LineDelimited {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()
    }
}
