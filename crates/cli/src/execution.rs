//! Validation of parsed arguments and the signature run itself.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use checksums::DigestAlgorithm;
use fast_io::{FileSourceFactory, SourceKind, open_source};
use logging::VerbosityConfig;
use signature::{
    DEFAULT_BLOCK_SIZE, EngineConfig, FileSink, RunSummary, SignatureEngine, SignatureError,
    SinkFormat, WriterSink,
};
use thiserror::Error;

use crate::arguments::{ParsedArgs, parse_block_size};

/// How the input file is read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SourceMode {
    /// One source shared through round windows.
    Shared(SourceKind),
    /// Every worker opens its own positioned-read handle.
    PerWorker,
}

impl SourceMode {
    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "per-worker" | "per_worker" => Some(Self::PerWorker),
            other => SourceKind::parse(other).map(Self::Shared),
        }
    }
}

/// Validated run parameters.
#[derive(Clone, Debug)]
pub(crate) struct RunOptions {
    pub(crate) input: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) block_size: usize,
    pub(crate) algorithm: DigestAlgorithm,
    pub(crate) source: SourceMode,
    pub(crate) threads: Option<usize>,
    pub(crate) format: SinkFormat,
    pub(crate) verbosity: VerbosityConfig,
}

/// Names of the parameters that failed validation, in option order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct InvalidParameters(Vec<&'static str>);

impl InvalidParameters {
    fn push(&mut self, key: &'static str) {
        self.0.push(key);
    }

    pub(crate) fn render(&self, program: &str) -> String {
        format!(
            "Invalid parameters: {}\nCall {program} --help for information.",
            self.0.join(", ")
        )
    }
}

impl RunOptions {
    /// Validates every parameter, reporting all failures together.
    pub(crate) fn from_parsed(parsed: &ParsedArgs) -> Result<Self, InvalidParameters> {
        let mut invalid = InvalidParameters::default();

        let input = non_empty_path(parsed.input_file.as_ref());
        if input.is_none() {
            invalid.push("input_file");
        }
        let output = non_empty_path(parsed.output_file.as_ref());
        if output.is_none() {
            invalid.push("output_file");
        }
        let block_size = match parsed.block_size.as_deref() {
            None => Some(DEFAULT_BLOCK_SIZE),
            Some(text) => parse_block_size(text),
        };
        if block_size.is_none() {
            invalid.push("block_size");
        }
        let algorithm = match parsed.algorithm.as_deref() {
            None => Some(DigestAlgorithm::default()),
            Some(name) => DigestAlgorithm::parse(name).ok(),
        };
        if algorithm.is_none() {
            invalid.push("algorithm");
        }
        let source = match parsed.source.as_deref() {
            None => Some(SourceMode::Shared(SourceKind::platform_default())),
            Some(name) => SourceMode::parse(name),
        };
        if source.is_none() {
            invalid.push("source");
        }
        let threads = match parsed.threads.as_deref() {
            None => Some(None),
            Some(text) => text
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&threads| threads > 0)
                .map(Some),
        };
        if threads.is_none() {
            invalid.push("threads");
        }
        let mut verbosity = VerbosityConfig::from_verbose_level(parsed.verbose);
        if parsed
            .debug
            .iter()
            .any(|flags| verbosity.apply_debug_flags(flags).is_err())
        {
            invalid.push("debug");
        }

        match (input, output, block_size, algorithm, source, threads) {
            (
                Some(input),
                Some(output),
                Some(block_size),
                Some(algorithm),
                Some(source),
                Some(threads),
            ) if invalid.0.is_empty() => Ok(Self {
                input,
                output,
                block_size,
                algorithm,
                source,
                threads,
                format: if parsed.newline {
                    SinkFormat::LineDelimited
                } else {
                    SinkFormat::Concatenated
                },
                verbosity,
            }),
            _ => Err(invalid),
        }
    }

    fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::new(self.block_size);
        match self.threads {
            Some(threads) => config.with_parallelism(threads),
            None => config,
        }
    }
}

fn non_empty_path(value: Option<&std::ffi::OsString>) -> Option<PathBuf> {
    value.filter(|path| !path.is_empty()).map(PathBuf::from)
}

/// Failure of a validated run.
#[derive(Debug, Error)]
pub(crate) enum RunError {
    /// The output file could not be created.
    #[error("cannot create {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The engine failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Output file opened without discarding what it already holds.
///
/// The existing contents survive until [`commit`](Self::commit), so a run
/// rejected while the engine is being built leaves the file as it was.
#[derive(Debug)]
struct PendingOutput {
    path: PathBuf,
    file: File,
}

impl PendingOutput {
    /// Opens `path` and returns the sink that will write the signature.
    fn open(path: &Path, format: SinkFormat) -> Result<(FileSink, Self), RunError> {
        let output_error = |source: io::Error| RunError::Output {
            path: path.to_path_buf(),
            source,
        };
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(output_error)?;
        let handle = file.try_clone().map_err(output_error)?;
        let pending = Self {
            path: path.to_path_buf(),
            file: handle,
        };
        Ok((WriterSink::new(BufWriter::new(file), format), pending))
    }

    /// Discards the previous contents. The sink writes from offset zero.
    fn commit(self) -> Result<(), RunError> {
        self.file.set_len(0).map_err(|source| RunError::Output {
            path: self.path,
            source,
        })
    }
}

/// Hashes the input file and writes its signature to the output file.
///
/// The output is truncated only once the input is open and the engine is
/// built, so a missing input or a rejected configuration never clobbers an
/// existing output file.
pub(crate) fn sign(options: &RunOptions) -> Result<RunSummary, RunError> {
    let builder = SignatureEngine::builder(options.engine_config())
        .digest(options.algorithm.into_digest());
    let builder = match options.source {
        SourceMode::Shared(kind) => builder.source(open_source(&options.input, kind)?),
        // The engine opens the per-worker handles while it is built.
        SourceMode::PerWorker => builder.source_factory(FileSourceFactory::new(
            &options.input,
            SourceKind::Stream,
        )),
    };

    let (sink, output) = PendingOutput::open(&options.output, options.format)?;
    let mut engine = builder.sink(sink).build()?;
    output.commit()?;

    logging::trace_cli!(
        info,
        input = %options.input.display(),
        output = %options.output.display(),
        algorithm = options.algorithm.as_str(),
        block_size = options.block_size,
        workers = engine.worker_count(),
        "signing file"
    );
    Ok(engine.run()?)
}

impl From<fast_io::SourceError> for RunError {
    fn from(error: fast_io::SourceError) -> Self {
        Self::Signature(SignatureError::from(error))
    }
}

/// Validates `parsed`, runs the signature and reports the outcome.
pub(crate) fn execute<Out, Err>(parsed: &ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return match stdout.write_all(crate::render_help().as_bytes()) {
            Ok(()) => 0,
            Err(_) => 1,
        };
    }
    if parsed.show_version {
        return match writeln!(stdout, "{}", crate::version_line()) {
            Ok(()) => 0,
            Err(_) => 1,
        };
    }

    let options = match RunOptions::from_parsed(parsed) {
        Ok(options) => options,
        Err(invalid) => {
            let _ = writeln!(stderr, "{}", invalid.render(&parsed.program_name));
            return 1;
        }
    };

    logging::init_tracing(&options.verbosity);

    match sign(&options) {
        Ok(summary) => {
            logging::trace_cli!(
                info,
                blocks = summary.blocks,
                bytes = summary.bytes,
                rounds = summary.rounds,
                "signature written"
            );
            0
        }
        Err(error) => {
            let _ = writeln!(stderr, "{}: {error}", crate::PROGRAM_NAME);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: Option<&str>, output: Option<&str>) -> ParsedArgs {
        ParsedArgs {
            program_name: "blocksig".to_owned(),
            input_file: input.map(Into::into),
            output_file: output.map(Into::into),
            ..ParsedArgs::default()
        }
    }

    #[test]
    fn defaults_when_only_paths_given() {
        let options = RunOptions::from_parsed(&parsed(Some("in"), Some("out"))).unwrap();
        assert_eq!(options.block_size, 1_048_576);
        assert_eq!(options.algorithm, DigestAlgorithm::Md5);
        assert_eq!(options.format, SinkFormat::Concatenated);
        assert_eq!(
            options.source,
            SourceMode::Shared(SourceKind::platform_default())
        );
        assert_eq!(options.threads, None);
    }

    #[test]
    fn reports_every_invalid_parameter() {
        let mut args = parsed(None, Some(""));
        args.block_size = Some("0".to_owned());
        args.algorithm = Some("sha1".to_owned());
        let invalid = RunOptions::from_parsed(&args).unwrap_err();
        assert_eq!(
            invalid.render("blocksig"),
            "Invalid parameters: input_file, output_file, block_size, algorithm\n\
             Call blocksig --help for information."
        );
    }

    #[test]
    fn rejects_zero_threads_and_bad_debug_flags() {
        let mut args = parsed(Some("in"), Some("out"));
        args.threads = Some("0".to_owned());
        args.debug = vec!["bogus".to_owned()];
        let invalid = RunOptions::from_parsed(&args).unwrap_err();
        assert_eq!(invalid.0, ["threads", "debug"]);
    }

    fn options(dir: &Path, source: SourceMode, threads: Option<usize>) -> RunOptions {
        RunOptions {
            input: dir.join("input"),
            output: dir.join("output"),
            block_size: 3,
            algorithm: DigestAlgorithm::Crc32,
            source,
            threads,
            format: SinkFormat::Concatenated,
            verbosity: VerbosityConfig::default(),
        }
    }

    #[test]
    fn rejected_engine_keeps_existing_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("input"), b"crc").expect("write input");
        std::fs::write(dir.path().join("output"), "previous signature").expect("write output");

        for source in [SourceMode::Shared(SourceKind::Stream), SourceMode::PerWorker] {
            let error = sign(&options(dir.path(), source, Some(0))).unwrap_err();
            assert!(matches!(
                error,
                RunError::Signature(SignatureError::InvalidConfig(_))
            ));
            assert_eq!(
                std::fs::read_to_string(dir.path().join("output")).expect("read output"),
                "previous signature"
            );
        }
    }

    #[test]
    fn successful_run_replaces_longer_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("input"), b"crc").expect("write input");
        std::fs::write(dir.path().join("output"), "a much longer previous signature")
            .expect("write output");

        let summary = sign(&options(
            dir.path(),
            SourceMode::Shared(SourceKind::Stream),
            Some(1),
        ))
        .expect("sign");
        assert_eq!(summary.blocks, 1);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("output")).expect("read output"),
            "7c6287fd"
        );
    }

    #[test]
    fn parses_source_modes() {
        assert_eq!(SourceMode::parse("per-worker"), Some(SourceMode::PerWorker));
        assert_eq!(
            SourceMode::parse("Stream"),
            Some(SourceMode::Shared(SourceKind::Stream))
        );
        assert_eq!(SourceMode::parse("pipe"), None);
    }
}
