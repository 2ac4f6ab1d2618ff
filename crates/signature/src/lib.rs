#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Parallel block-signature engine.
//!
//! A file is split into fixed-size blocks, each block is hashed on a bounded
//! pool of persistent worker threads, and the digests are delivered to a sink
//! in strict block order. The input is read one round at a time: a single
//! window of `workers * block_size` bytes is read or mapped, fanned out across
//! the pool, collected in order and released before the next round starts.
//!
//! # Collaborators
//!
//! - a [`BlockDigest`](checksums::BlockDigest) shared by every worker
//! - a [`ByteSource`](fast_io::ByteSource) read by the orchestrator, or a
//!   [`SourceFactory`](fast_io::SourceFactory) giving every worker its own source
//! - a [`DigestSink`] receiving digests in ascending block order
//!
//! # Sizing
//!
//! See [`worker_count`] for the pool sizing policy, including the address-space
//! cap applied on 32-bit targets.

mod config;
mod engine;
mod error;
mod sink;
mod sizing;
mod worker;

pub use config::{DEFAULT_BLOCK_SIZE, EngineConfig};
pub use engine::{EngineState, RunSummary, SignatureEngine, SignatureEngineBuilder};
pub use error::SignatureError;
pub use sink::{DigestSink, FileSink, SinkFormat, WriterSink};
pub use sizing::{
    ADDRESS_SPACE_CAP_32BIT, default_address_space_cap, hardware_concurrency, worker_count,
};
