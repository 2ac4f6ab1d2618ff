use std::ffi::OsString;

/// Raw command-line arguments, before validation.
///
/// Values are kept as given so validation can report every invalid parameter
/// at once instead of stopping at the first.
///
/// **Warning**: This type is exposed via `cli::test_utils` for integration
/// tests only. It is not part of the stable public API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Program name from `argv[0]`, used in usage hints.
    pub program_name: String,
    /// `-h`/`--help`.
    pub show_help: bool,
    /// `-V`/`--version`.
    pub show_version: bool,
    /// `-i`/`--input_file`.
    pub input_file: Option<OsString>,
    /// `-o`/`--output_file`.
    pub output_file: Option<OsString>,
    /// `-b`/`--block_size`, unparsed.
    pub block_size: Option<String>,
    /// `-a`/`--algorithm`.
    pub algorithm: Option<String>,
    /// `-s`/`--source`.
    pub source: Option<String>,
    /// `-j`/`--threads`, unparsed.
    pub threads: Option<String>,
    /// `--newline`.
    pub newline: bool,
    /// Number of `-v` occurrences.
    pub verbose: u8,
    /// `--debug` flag lists, in order of appearance.
    pub debug: Vec<String>,
}
