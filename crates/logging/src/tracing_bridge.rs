//! crates/logging/src/tracing_bridge.rs
//! Installation of the global tracing subscriber.
//!
//! The subscriber combines an [`EnvFilter`] built from the
//! [`VerbosityConfig`] (or from the [`LOG_ENV_VAR`] environment variable when
//! present) with a formatting layer that writes to stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use super::config::VerbosityConfig;

/// Environment variable whose value, when set, replaces the verbosity-derived
/// filter directive.
pub const LOG_ENV_VAR: &str = "BLOCKSIG_LOG";

/// Result of a subscriber installation attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InitOutcome {
    /// This call installed the global subscriber.
    Installed,
    /// A global subscriber was already present; nothing changed.
    AlreadyInstalled,
}

/// Initialize tracing with blocksig verbosity, writing to stderr.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing};
///
/// init_tracing(&VerbosityConfig::from_verbose_level(2));
/// logging::trace_engine!(info, "engine ready");
/// ```
pub fn init_tracing(config: &VerbosityConfig) -> InitOutcome {
    init_tracing_with_writer(config, std::io::stderr)
}

/// Initialize tracing with blocksig verbosity and a custom writer factory.
pub fn init_tracing_with_writer<W>(config: &VerbosityConfig, make_writer: W) -> InitOutcome
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(config.to_directive()));

    let layer = fmt::layer()
        .with_writer(make_writer)
        .with_target(true)
        .with_thread_names(true)
        .with_ansi(false);

    match tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
    {
        Ok(()) => InitOutcome::Installed,
        Err(_) => InitOutcome::AlreadyInstalled,
    }
}
