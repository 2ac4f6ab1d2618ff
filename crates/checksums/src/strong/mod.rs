//! crates/checksums/src/strong/mod.rs
//!
//! Streaming hash state machines backing the block digests.
//!
//! Each implementation exposes the same `new`/`update`/`finalize` shape so the
//! block-level adapters in [`crate::BlockDigest`] can treat them uniformly.

mod crc32;
mod md5;

pub use crc32::Crc32;
pub use md5::Md5;

/// Streaming digest with a fixed-width output.
pub trait StrongDigest: Sized {
    /// Fixed-size digest output.
    type Digest: AsRef<[u8]> + Copy;

    /// Width of [`Self::Digest`] in bytes.
    const DIGEST_LEN: usize;

    /// Short lowercase algorithm name used in diagnostics.
    const NAME: &'static str;

    /// Creates a hasher with an empty state.
    fn new() -> Self;

    /// Feeds additional bytes into the digest state.
    fn update(&mut self, data: &[u8]);

    /// Consumes the hasher and returns the digest.
    fn finalize(self) -> Self::Digest;

    /// Computes the digest of `data` in one shot.
    fn digest(data: &[u8]) -> Self::Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}
