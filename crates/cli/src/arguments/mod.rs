//! Command-line argument parsing.

mod parsed_args;
mod parser;
mod size;

pub use parsed_args::ParsedArgs;
pub use parser::parse_args;
pub(crate) use size::parse_block_size;
