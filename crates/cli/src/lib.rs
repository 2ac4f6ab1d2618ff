#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front end of `blocksig`: it parses the
//! options naming the input file, output file, block size and digest
//! algorithm, validates them, wires the chosen byte source, digest and file
//! sink into a [`signature::SignatureEngine`] and maps the outcome onto a
//! process exit code.
//!
//! # Design
//!
//! [`run`] accepts an iterator of arguments together with handles for standard
//! output and error, so the binary and the tests drive the exact same code.
//! Help and version text go to standard output; diagnostics go to standard
//! error, and tracing output (enabled with `-v` or `--debug`) goes to the
//! process's standard error.
//!
//! # Errors
//!
//! Missing or malformed parameters are reported together on one
//! `Invalid parameters:` line and exit with code `1`. Failures during the run
//! are reported as `blocksig: <error>` and also exit with code `1`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["blocksig", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("blocksig "));
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::Write;

mod arguments;
mod execution;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Name used as the diagnostic prefix.
const PROGRAM_NAME: &str = "blocksig";

/// Deterministic help text describing the supported options.
const HELP_TEXT: &str = concat!(
    "Usage: blocksig -i INPUT -o OUTPUT [OPTIONS]\n",
    "\n",
    "Splits INPUT into fixed-size blocks, hashes the blocks in parallel and\n",
    "writes one digest per block to OUTPUT in block order.\n",
    "\n",
    "Options:\n",
    "  -i, --input_file PATH    File to sign (required).\n",
    "  -o, --output_file PATH   File receiving the signature (required).\n",
    "  -b, --block_size SIZE    Block size in bytes; K, M and G suffixes are\n",
    "                           binary multiples (default: 1048576).\n",
    "  -a, --algorithm NAME     Block digest: md5 or crc (default: md5).\n",
    "  -s, --source KIND        Input reader: mmap, stream or per-worker\n",
    "                           (default: mmap where available, else stream).\n",
    "  -j, --threads N          Worker threads (default: hardware parallelism).\n",
    "      --newline            Terminate each digest with a newline instead of\n",
    "                           writing digests back to back.\n",
    "  -v, --verbose            Increase log verbosity (repeatable).\n",
    "      --debug FLAGS        Per-subsystem logging: engine, round, worker,\n",
    "                           source, cli or all, with an optional level digit.\n",
    "  -h, --help               Show this help message and exit.\n",
    "  -V, --version            Output version information and exit.\n",
    "\n",
    "The BLOCKSIG_LOG environment variable overrides the log filter.\n",
);

/// Renders the help text.
fn render_help() -> String {
    HELP_TEXT.to_string()
}

fn version_line() -> String {
    format!("{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION"))
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// The first argument is the program name. Returns the process exit code:
/// `0` on success, `1` on invalid parameters or a failed run.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match arguments::parse_args(arguments) {
        Ok(parsed) => execution::execute(&parsed, stdout, stderr),
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {}", error.to_string().trim_end());
            1
        }
    }
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

/// Parser entry points exposed for integration tests.
#[doc(hidden)]
pub mod test_utils {
    pub use crate::arguments::{ParsedArgs, parse_args};
}
