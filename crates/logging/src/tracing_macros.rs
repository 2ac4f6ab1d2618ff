//! crates/logging/src/tracing_macros.rs
//! Convenience macros that pin tracing events to blocksig subsystem targets.
//!
//! The first argument names the `tracing` level macro (`error`, `warn`,
//! `info`, `debug` or `trace`); the remaining tokens are forwarded unchanged,
//! so structured fields work as usual.

/// Emit an engine lifecycle event.
///
/// # Example
/// ```ignore
/// trace_engine!(info, workers = 4, "engine started");
/// ```
#[macro_export]
macro_rules! trace_engine {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "blocksig::engine", $($arg)*)
    };
}

/// Emit a round dispatch event.
///
/// # Example
/// ```ignore
/// trace_round!(debug, round = 3, blocks = 8, "dispatching round");
/// ```
#[macro_export]
macro_rules! trace_round {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "blocksig::round", $($arg)*)
    };
}

/// Emit a worker thread event.
///
/// # Example
/// ```ignore
/// trace_worker!(trace, slot = 1, block = 42, "hashed block");
/// ```
#[macro_export]
macro_rules! trace_worker {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "blocksig::worker", $($arg)*)
    };
}

/// Emit a byte source event.
///
/// # Example
/// ```ignore
/// trace_source!(trace, offset = 0, len = 4096, "mapped window");
/// ```
#[macro_export]
macro_rules! trace_source {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "blocksig::source", $($arg)*)
    };
}

/// Emit a command-line front end event.
///
/// # Example
/// ```ignore
/// trace_cli!(debug, block_size = 1024, "parsed arguments");
/// ```
#[macro_export]
macro_rules! trace_cli {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "blocksig::cli", $($arg)*)
    };
}
