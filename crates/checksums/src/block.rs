//! crates/checksums/src/block.rs
//!
//! Object-safe block digest interface consumed by the signature engine.

use std::fmt;

use crate::error::DigestError;
use crate::hex::encode_hex;
use crate::strong::{Crc32, Md5, StrongDigest};

/// Pure function from a block of bytes to its digest string.
///
/// Implementations must be reentrant and hold no mutable shared state: the
/// signature engine calls a single instance concurrently from every worker
/// thread.
pub trait BlockDigest: Send + Sync + fmt::Debug {
    /// Short lowercase name of the algorithm.
    fn name(&self) -> &'static str;

    /// Number of characters in every digest string this implementation returns.
    fn hex_len(&self) -> usize;

    /// Hashes `data` and returns its digest string.
    fn hash(&self, data: &[u8]) -> Result<String, DigestError>;
}

/// MD5 block digest rendered as 32 lowercase hexadecimal characters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Md5Digest;

/// CRC-32 block digest rendered as 8 lowercase hexadecimal characters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Crc32Digest;

fn hash_hex<D: StrongDigest>(data: &[u8]) -> String {
    encode_hex(D::digest(data).as_ref())
}

impl BlockDigest for Md5Digest {
    fn name(&self) -> &'static str {
        Md5::NAME
    }

    fn hex_len(&self) -> usize {
        Md5::DIGEST_LEN * 2
    }

    fn hash(&self, data: &[u8]) -> Result<String, DigestError> {
        Ok(hash_hex::<Md5>(data))
    }
}

impl BlockDigest for Crc32Digest {
    fn name(&self) -> &'static str {
        Crc32::NAME
    }

    fn hex_len(&self) -> usize {
        Crc32::DIGEST_LEN * 2
    }

    fn hash(&self, data: &[u8]) -> Result<String, DigestError> {
        Ok(hash_hex::<Crc32>(data))
    }
}
