//! crates/signature/src/config.rs
//!
//! Engine configuration.

use crate::error::SignatureError;
use crate::sizing::{default_address_space_cap, hardware_concurrency, worker_count};

/// Block size used when none is configured (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1 << 20;

/// Tunables for a [`SignatureEngine`](crate::SignatureEngine).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// Bytes per block. Every block but the last is exactly this long.
    block_size: usize,
    /// Overrides detected hardware parallelism when set.
    parallelism: Option<usize>,
    /// Upper bound (exclusive) on the bytes of one round window.
    address_space_cap: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            parallelism: None,
            address_space_cap: default_address_space_cap(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with the given block size and platform defaults.
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        Self::default().with_block_size(block_size)
    }

    /// Sets the block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Uses `threads` instead of the detected hardware parallelism.
    #[must_use]
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Sets or clears the address-space cap. `Some(ADDRESS_SPACE_CAP_32BIT)`
    /// reproduces 32-bit sizing on any target.
    #[must_use]
    pub fn with_address_space_cap(mut self, cap: Option<u64>) -> Self {
        self.address_space_cap = cap;
        self
    }

    /// Configured block size.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Parallelism override, if any.
    #[must_use]
    pub const fn parallelism(&self) -> Option<usize> {
        self.parallelism
    }

    /// Address-space cap, if any.
    #[must_use]
    pub const fn address_space_cap(&self) -> Option<u64> {
        self.address_space_cap
    }

    /// Resolves the worker count for a source of `total_size` bytes.
    pub fn worker_count(&self, total_size: u64) -> Result<usize, SignatureError> {
        let hardware = match self.parallelism {
            Some(0) => {
                return Err(SignatureError::invalid_config(
                    "parallelism must be at least 1",
                ));
            }
            Some(threads) => threads,
            None => hardware_concurrency(),
        };
        worker_count(
            total_size,
            self.block_size,
            hardware,
            self.address_space_cap,
        )
    }
}
