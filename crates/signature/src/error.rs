//! crates/signature/src/error.rs
//!
//! Error taxonomy of a signature run.

use std::io;

use checksums::DigestError;
use fast_io::SourceError;
use thiserror::Error;

/// Failure raised while building or running a [`SignatureEngine`](crate::SignatureEngine).
///
/// Every variant is fatal to the run. Digests already delivered to the sink
/// are not rolled back.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Rejected constructor arguments: zero block size, missing collaborator,
    /// zero parallelism, or a block size the address-space cap cannot hold.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The source could not be opened, or a window could not be read or mapped.
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
    /// A digest collaborator failed on a block.
    #[error("hashing block {block} failed: {source}")]
    HashFailure {
        /// Index of the failed block.
        block: u64,
        /// Error reported by the digest.
        #[source]
        source: DigestError,
    },
    /// The sink rejected a digest.
    #[error("saving digest of block {block} failed: {source}")]
    SinkFailure {
        /// Index of the block whose digest was rejected.
        block: u64,
        /// Error reported by the sink.
        #[source]
        source: io::Error,
    },
    /// A source produced fewer bytes for a block than its size implies.
    #[error("block {block} expected {expected} bytes but the source provided {actual}")]
    ShortBlock {
        /// Index of the block.
        block: u64,
        /// Length implied by the block layout.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },
    /// A worker thread could not be spawned.
    #[error("failed to spawn worker {slot}: {source}")]
    WorkerSpawn {
        /// Slot index.
        slot: usize,
        /// Error reported by the OS.
        #[source]
        source: io::Error,
    },
    /// A worker thread exited mid-run, for example after a panic in a digest.
    #[error("worker {slot} terminated unexpectedly")]
    WorkerTerminated {
        /// Slot index.
        slot: usize,
    },
    /// The engine already ran; engines are single use.
    #[error("signature run already finished")]
    AlreadyFinished,
}

impl SignatureError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
