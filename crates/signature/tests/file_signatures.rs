//! End-to-end runs over on-disk files with every source kind.

use std::io::Write;
use std::path::Path;

use checksums::{BlockDigest, Crc32Digest, DigestAlgorithm};
use fast_io::{FileSourceFactory, SourceKind, StreamSource, open_source};
use signature::{
    ADDRESS_SPACE_CAP_32BIT, EngineConfig, FileSink, SignatureEngine, SignatureError, SinkFormat,
};
use tempfile::{NamedTempFile, TempDir};

fn fixture(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

fn sign_to_file(
    input: &Path,
    output: &Path,
    config: EngineConfig,
    algorithm: DigestAlgorithm,
    kind: Option<SourceKind>,
) -> Result<u64, SignatureError> {
    let sink = FileSink::create(output, SinkFormat::LineDelimited).expect("create sink");
    let builder = SignatureEngine::builder(config)
        .digest(algorithm.into_digest())
        .sink(sink);
    let builder = match kind {
        Some(kind) => builder.source(open_source(input, kind)?),
        None => builder.source_factory(FileSourceFactory::new(input, SourceKind::Stream)),
    };
    let mut engine = builder.build()?;
    Ok(engine.run()?.blocks)
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read output")
        .lines()
        .map(str::to_owned)
        .collect()
}

fn kinds() -> Vec<Option<SourceKind>> {
    let mut kinds = vec![Some(SourceKind::Stream), None];
    if cfg!(unix) {
        kinds.push(Some(SourceKind::Mmap));
    }
    kinds
}

#[test]
fn one_byte_file_yields_one_digest() {
    let input = fixture(b"a");
    let dir = TempDir::new().expect("tempdir");
    for kind in kinds() {
        let output = dir.path().join("out");
        let config = EngineConfig::new(1 << 20).with_parallelism(4);
        let blocks = sign_to_file(input.path(), &output, config, DigestAlgorithm::Md5, kind)
            .expect("sign");
        assert_eq!(blocks, 1);
        assert_eq!(read_lines(&output), ["0cc175b9c0f1b6a831c399e269772661"]);
    }
}

#[test]
fn empty_file_yields_empty_output() {
    let input = fixture(b"");
    let dir = TempDir::new().expect("tempdir");
    for kind in kinds() {
        let output = dir.path().join("out");
        let blocks = sign_to_file(
            input.path(),
            &output,
            EngineConfig::new(16),
            DigestAlgorithm::Crc32,
            kind,
        )
        .expect("sign");
        assert_eq!(blocks, 0);
        assert!(read_lines(&output).is_empty());
    }
}

#[test]
fn all_source_kinds_agree_on_partial_tail() {
    let contents: Vec<u8> = (0..100_003u32).map(|i| (i % 253) as u8).collect();
    let input = fixture(&contents);
    let dir = TempDir::new().expect("tempdir");

    let expected: Vec<String> = contents
        .chunks(4096)
        .map(|chunk| Crc32Digest.hash(chunk).expect("crc32"))
        .collect();
    assert_eq!(expected.len(), 25);

    for kind in kinds() {
        let output = dir.path().join("out");
        let config = EngineConfig::new(4096).with_parallelism(3);
        sign_to_file(input.path(), &output, config, DigestAlgorithm::Crc32, kind)
            .expect("sign");
        assert_eq!(read_lines(&output), expected, "source {kind:?}");
    }
}

#[test]
fn simulated_32_bit_cap_limits_workers() {
    // The cap only depends on the advertised size, so a sparse file suffices.
    let input = NamedTempFile::new().expect("temp file");
    input.as_file().set_len(8 << 30).expect("sparse file");

    let engine = SignatureEngine::builder(
        EngineConfig::new(1 << 30)
            .with_parallelism(8)
            .with_address_space_cap(Some(ADDRESS_SPACE_CAP_32BIT)),
    )
    .digest(DigestAlgorithm::Crc32.into_digest())
    .source(StreamSource::open(input.path()).expect("open"))
    .sink(|_: &str| Ok(()))
    .build()
    .expect("build engine");

    assert_eq!(engine.worker_count(), 3);
    assert!((engine.worker_count() as u64) * (1 << 30) < ADDRESS_SPACE_CAP_32BIT);
}

#[test]
fn missing_input_is_source_unavailable() {
    let dir = TempDir::new().expect("tempdir");
    let result = SignatureEngine::builder(EngineConfig::default())
        .digest(DigestAlgorithm::Md5.into_digest())
        .source_factory(FileSourceFactory::new(
            dir.path().join("absent"),
            SourceKind::Stream,
        ))
        .sink(|_: &str| Ok(()))
        .build();
    assert!(matches!(result, Err(SignatureError::SourceUnavailable(_))));
}
