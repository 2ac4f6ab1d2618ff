//! crates/fast_io/src/mmap_source.rs
//!
//! Memory-mapped windows: every read maps exactly the requested range and the
//! mapping is unmapped when the round's [`Window`] is dropped.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::MmapOptions;

use crate::error::SourceError;
use crate::traits::{ByteSource, clip};
use crate::window::Window;

/// Byte source that maps one window of a file per read.
///
/// Only the current round is mapped, so address-space use is bounded by the
/// round size rather than the file size.
#[derive(Debug)]
pub struct MmapSource {
    path: PathBuf,
    file: File,
    total_size: u64,
    cursor: u64,
}

impl MmapSource {
    /// Opens `path` for mapping.
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

        logging::trace_source!(debug, path = %path.display(), total_size, "opened mmap source");

        Ok(Self {
            path,
            file,
            total_size,
            cursor: 0,
        })
    }

    /// Path of the mapped file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for MmapSource {
    fn read(&mut self, offset: u64, len: usize) -> Result<Window, SourceError> {
        let len = clip(offset, len, self.total_size);
        if len == 0 {
            self.cursor = self.total_size;
            return Ok(Window::empty(offset));
        }

        // SAFETY: read-only mapping of a file we opened read-only. Concurrent
        // truncation by another process can fault on access; that is the
        // documented mmap hazard and not something this process can prevent.
        #[allow(unsafe_code)]
        let map = unsafe { MmapOptions::new().offset(offset).len(len).map(&self.file) }.map_err(
            |source| SourceError::Map {
                path: self.path.clone(),
                offset,
                len,
                source,
            },
        )?;

        self.cursor = offset + len as u64;
        logging::trace_source!(trace, offset, len, "mapped window");
        Ok(Window::from_mmap(offset, map))
    }

    fn total_size(&self) -> u64 {
        self.total_size
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.total_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents).expect("write fixture");
        file.flush().expect("flush fixture");
        file
    }

    #[test]
    fn maps_unaligned_windows() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let file = fixture(&data);
        let mut source = MmapSource::open(file.path()).expect("open");
        assert_eq!(source.total_size(), 10_000);

        let window = source.read(4_097, 100).expect("read");
        assert_eq!(window.offset(), 4_097);
        assert_eq!(window.as_slice(), &data[4_097..4_197]);
        assert!(!source.at_end());
    }

    #[test]
    fn short_window_at_end_of_file() {
        let file = fixture(b"0123456789");
        let mut source = MmapSource::open(file.path()).expect("open");
        let window = source.read(8, 16).expect("read");
        assert_eq!(window.as_slice(), b"89");
        assert!(source.at_end());
    }

    #[test]
    fn read_past_end_is_empty() {
        let file = fixture(b"abc");
        let mut source = MmapSource::open(file.path()).expect("open");
        assert!(source.read(3, 8).expect("read").is_empty());
        assert!(source.read(100, 8).expect("read").is_empty());
        assert!(source.at_end());
    }

    #[test]
    fn empty_file_never_maps() {
        let file = fixture(b"");
        let mut source = MmapSource::open(file.path()).expect("open");
        assert!(source.at_end());
        assert!(source.read(0, 4096).expect("read").is_empty());
    }

    #[test]
    fn missing_file_reports_open_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = MmapSource::open(dir.path().join("absent")).unwrap_err();
        assert!(matches!(error, SourceError::Open { .. }));
    }
}
