//! crates/checksums/src/error.rs
//!
//! Failure type surfaced by digest collaborators.

use thiserror::Error;

/// Error raised when a [`BlockDigest`](crate::BlockDigest) cannot hash a block.
///
/// The built-in digests never fail; the variant exists so custom digests can
/// reject malformed input without panicking inside a worker thread.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{algorithm} digest failed: {reason}")]
pub struct DigestError {
    algorithm: &'static str,
    reason: String,
}

impl DigestError {
    /// Creates an error attributed to `algorithm`.
    #[must_use]
    pub fn new(algorithm: &'static str, reason: impl Into<String>) -> Self {
        Self {
            algorithm,
            reason: reason.into(),
        }
    }

    /// Returns the name of the digest that failed.
    #[must_use]
    pub const fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    /// Returns the human readable failure reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
