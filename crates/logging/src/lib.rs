#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` owns the diagnostics plumbing shared by the blocksig workspace.
//! Library crates emit events through the `tracing` facade using the
//! subsystem-scoped macros exported here ([`trace_engine!`], [`trace_round!`],
//! [`trace_worker!`], [`trace_source!`]); the binary decides what is shown by
//! building a [`VerbosityConfig`] from `-v`/`--debug` and calling
//! [`init_tracing`].
//!
//! # Invariants
//!
//! - Every event carries a `blocksig::<subsystem>` target so filters can be
//!   expressed per [`Subsystem`].
//! - Diagnostics are written to stderr only; stdout stays reserved for
//!   user-requested output such as help and version text.
//! - [`init_tracing`] is idempotent. The first successful call wins and later
//!   calls report [`InitOutcome::AlreadyInstalled`].
//!
//! # Examples
//!
//! ```
//! use logging::{Subsystem, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! config.apply_debug_flag("round2").unwrap();
//! assert_eq!(config.level_for(Subsystem::Round), logging::Level::Trace);
//! assert!(config.to_directive().contains("blocksig::round=trace"));
//! ```

mod config;
mod tracing_bridge;
mod tracing_macros;

pub use config::{Level, Subsystem, VerbosityConfig};
pub use tracing_bridge::{InitOutcome, LOG_ENV_VAR, init_tracing, init_tracing_with_writer};
