//! crates/checksums/src/algorithm.rs
//!
//! Selection of the block digest used for a signature run.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::block::{BlockDigest, Crc32Digest, Md5Digest};

/// Block digest algorithms available to the signature engine.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DigestAlgorithm {
    /// MD5, 32 hexadecimal characters per block.
    #[default]
    Md5,
    /// IEEE CRC-32, 8 hexadecimal characters per block.
    Crc32,
}

/// Returned when an algorithm name is not recognised.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown digest algorithm '{0}' (expected md5 or crc)")]
pub struct UnknownAlgorithm(pub String);

impl DigestAlgorithm {
    /// Parses `md5`, `crc` or `crc32`, ignoring ASCII case.
    pub fn parse(name: &str) -> Result<Self, UnknownAlgorithm> {
        match name.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "crc" | "crc32" => Ok(Self::Crc32),
            _ => Err(UnknownAlgorithm(name.to_owned())),
        }
    }

    /// Returns the canonical command-line spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Crc32 => "crc",
        }
    }

    /// Width of one digest string in characters.
    #[must_use]
    pub const fn digest_hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Crc32 => 8,
        }
    }

    /// Returns a shareable digest instance for this algorithm.
    #[must_use]
    pub fn into_digest(self) -> Arc<dyn BlockDigest> {
        match self {
            Self::Md5 => Arc::new(Md5Digest),
            Self::Crc32 => Arc::new(Crc32Digest),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
