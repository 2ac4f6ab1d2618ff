use std::ffi::OsString;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};

use super::ParsedArgs;

/// Program name used when `argv[0]` is missing.
pub(crate) const DEFAULT_PROGRAM_NAME: &str = "blocksig";

/// Builds the `clap` command used for parsing. Help and version output are
/// rendered by the caller, so clap's own flags are disabled.
fn clap_command() -> Command {
    Command::new(DEFAULT_PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("input_file")
                .long("input_file")
                .short('i')
                .alias("input-file")
                .value_name("PATH")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("output_file")
                .long("output_file")
                .short('o')
                .alias("output-file")
                .value_name("PATH")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("block_size")
                .long("block_size")
                .short('b')
                .alias("block-size")
                .value_name("SIZE"),
        )
        .arg(
            Arg::new("algorithm")
                .long("algorithm")
                .short('a')
                .value_name("NAME"),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .value_name("KIND"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('j')
                .value_name("N"),
        )
        .arg(
            Arg::new("newline")
                .long("newline")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .action(ArgAction::Append),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
///
/// The first argument is the program name.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(DEFAULT_PROGRAM_NAME));
    }
    let program_name = args[0].to_string_lossy().into_owned();

    let mut matches = clap_command().try_get_matches_from(args)?;

    Ok(ParsedArgs {
        program_name,
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        input_file: matches.remove_one::<OsString>("input_file"),
        output_file: matches.remove_one::<OsString>("output_file"),
        block_size: matches.remove_one::<String>("block_size"),
        algorithm: matches.remove_one::<String>("algorithm"),
        source: matches.remove_one::<String>("source"),
        threads: matches.remove_one::<String>("threads"),
        newline: matches.get_flag("newline"),
        verbose: matches.get_count("verbose"),
        debug: matches
            .remove_many::<String>("debug")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}
