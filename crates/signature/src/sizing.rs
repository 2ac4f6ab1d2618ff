//! crates/signature/src/sizing.rs
//!
//! Worker-count policy.
//!
//! One round maps `workers * block_size` bytes as a single contiguous window,
//! so the pool is sized against three limits: the hardware, the number of
//! whole blocks in the file, and (on 32-bit targets) the address space.

use std::num::NonZeroUsize;
use std::thread;

use crate::error::SignatureError;

/// Address space available to one contiguous window on a 32-bit target.
pub const ADDRESS_SPACE_CAP_32BIT: u64 = 1 << 32;

/// Cap applied by default on this target: 4 GiB on 32-bit, none otherwise.
#[must_use]
pub const fn default_address_space_cap() -> Option<u64> {
    if cfg!(target_pointer_width = "32") {
        Some(ADDRESS_SPACE_CAP_32BIT)
    } else {
        None
    }
}

/// Hardware parallelism reported by the platform, at least 1.
#[must_use]
pub fn hardware_concurrency() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Computes the number of persistent workers for a run.
///
/// - starts from `hardware_concurrency` (0 counts as 1)
/// - shrinks to `total_size / block_size` when the file holds fewer whole
///   blocks than workers
/// - with an `address_space_cap`, shrinks until `workers * block_size` stays
///   strictly below the cap
///
/// The result is always at least 1.
///
/// # Errors
///
/// [`SignatureError::InvalidConfig`] when `block_size` is zero or when a single
/// block already reaches the address-space cap.
pub fn worker_count(
    total_size: u64,
    block_size: usize,
    hardware_concurrency: usize,
    address_space_cap: Option<u64>,
) -> Result<usize, SignatureError> {
    if block_size == 0 {
        return Err(SignatureError::invalid_config("block size must be at least 1"));
    }
    let block = block_size as u64;
    let mut workers = hardware_concurrency.max(1) as u64;

    if total_size / workers < block {
        workers = total_size / block;
    }

    if let Some(cap) = address_space_cap {
        if block >= cap {
            return Err(SignatureError::invalid_config(format!(
                "block size {block_size} does not fit the {cap}-byte address space"
            )));
        }
        // Largest count whose window stays below the cap; at least 1 here.
        workers = workers.min((cap - 1) / block);
    }

    Ok(usize::try_from(workers.max(1)).unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GIB: u64 = 1 << 30;

    #[test]
    fn uses_hardware_concurrency_for_large_files() {
        assert_eq!(worker_count(1 << 40, 1 << 20, 8, None).unwrap(), 8);
    }

    #[test]
    fn clamps_to_whole_blocks() {
        assert_eq!(worker_count(10, 4, 8, None).unwrap(), 2);
        assert_eq!(worker_count(16, 4, 8, None).unwrap(), 4);
    }

    #[test]
    fn never_below_one() {
        assert_eq!(worker_count(0, 4, 8, None).unwrap(), 1);
        assert_eq!(worker_count(3, 4, 8, None).unwrap(), 1);
        assert_eq!(worker_count(1 << 20, 1, 0, None).unwrap(), 1);
    }

    #[test]
    fn zero_block_size_is_invalid() {
        assert!(matches!(
            worker_count(100, 0, 4, None),
            Err(SignatureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn address_cap_limits_window() {
        let cap = Some(ADDRESS_SPACE_CAP_32BIT);
        // 4 x 1 GiB reaches the cap exactly, so one worker is dropped.
        assert_eq!(worker_count(1 << 40, GIB as usize, 8, cap).unwrap(), 3);
        assert_eq!(worker_count(1 << 40, (3 * GIB) as usize, 8, cap).unwrap(), 1);
        assert!(matches!(
            worker_count(1 << 40, (4 * GIB) as usize, 8, cap),
            Err(SignatureError::InvalidConfig(_))
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn no_default_cap_on_64_bit() {
        assert_eq!(default_address_space_cap(), None);
    }

    proptest! {
        #[test]
        fn count_respects_every_bound(
            total in 0u64..(1 << 36),
            block in 1usize..(1 << 24),
            hardware in 0usize..64,
            capped in any::<bool>(),
        ) {
            let cap = capped.then_some(ADDRESS_SPACE_CAP_32BIT);
            let workers = worker_count(total, block, hardware, cap).unwrap();
            let whole_blocks = usize::try_from(total / block as u64).unwrap_or(usize::MAX);

            prop_assert!(workers >= 1);
            prop_assert!(workers <= hardware.max(1));
            prop_assert!(workers <= whole_blocks.max(1));
            if let Some(cap) = cap {
                prop_assert!((workers as u64) * (block as u64) < cap);
            }
        }
    }
}
