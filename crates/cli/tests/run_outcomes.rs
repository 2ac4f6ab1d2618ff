//! Exit codes, diagnostics and output files produced by `cli::run`.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

fn run(args: &[&str]) -> (i32, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = cli::run(args.iter().copied(), &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8(stdout).expect("stdout is UTF-8"),
        String::from_utf8(stderr).expect("stderr is UTF-8"),
    )
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("UTF-8 temp path")
}

#[test]
fn help_goes_to_stdout() {
    let (code, stdout, stderr) = run(&["blocksig", "--help"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Usage: blocksig"));
    assert!(stdout.contains("--block_size"));
    assert!(stderr.is_empty());
}

#[test]
fn missing_paths_list_invalid_parameters() {
    let (code, stdout, stderr) = run(&["./blocksig"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(
        stderr,
        "Invalid parameters: input_file, output_file\nCall ./blocksig --help for information.\n"
    );
}

#[test]
fn zero_block_size_is_invalid() {
    let (code, _, stderr) = run(&["blocksig", "-i", "a", "-o", "b", "-b", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("Invalid parameters: block_size\n"));
}

#[test]
fn md5_signature_is_concatenated_by_default() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    fs::write(&input, b"md5md5m").expect("write input");

    let (code, _, stderr) = run(&[
        "blocksig",
        "-i",
        path_str(&input),
        "-o",
        path_str(&output),
        "-b",
        "3",
    ]);
    assert_eq!(code, 0, "{stderr}");
    assert_eq!(
        fs::read_to_string(&output).expect("read output"),
        concat!(
            "1bc29b36f623ba82aaf6724fd3b16718",
            "1bc29b36f623ba82aaf6724fd3b16718",
            "6f8f57715090da2632453988d9a1501b",
        )
    );
}

#[test]
fn every_source_mode_writes_the_same_crc_signature() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input");
    let contents: Vec<u8> = (0..50_000u32).map(|i| (i % 241) as u8).collect();
    fs::write(&input, &contents).expect("write input");

    let mut modes = vec!["stream", "per-worker"];
    if cfg!(unix) {
        modes.push("mmap");
    }

    let mut signatures = Vec::new();
    for mode in modes {
        let output = dir.path().join(format!("out-{mode}"));
        let (code, _, stderr) = run(&[
            "blocksig",
            "--input_file",
            path_str(&input),
            "--output_file",
            path_str(&output),
            "--block_size",
            "1K",
            "--algorithm",
            "crc",
            "--source",
            mode,
            "--threads",
            "4",
            "--newline",
        ]);
        assert_eq!(code, 0, "{mode}: {stderr}");
        signatures.push(fs::read_to_string(&output).expect("read output"));
    }

    let first = &signatures[0];
    assert_eq!(first.lines().count(), 49);
    assert!(first.lines().all(|line| line.len() == 8));
    assert!(signatures.iter().all(|signature| signature == first));
}

#[test]
fn missing_input_is_reported_and_output_untouched() {
    for mode in ["stream", "per-worker"] {
        let dir = TempDir::new().expect("tempdir");
        let output = dir.path().join("output");
        fs::write(&output, "keep").expect("write output");

        let (code, _, stderr) = run(&[
            "blocksig",
            "-i",
            path_str(&dir.path().join("absent")),
            "-o",
            path_str(&output),
            "-s",
            mode,
        ]);
        assert_eq!(code, 1, "{mode}");
        assert!(stderr.starts_with("blocksig: source unavailable: cannot open"), "{mode}");
        assert_eq!(fs::read_to_string(&output).expect("read output"), "keep");
    }
}

#[test]
fn empty_input_produces_empty_output() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    fs::write(&input, b"").expect("write input");

    let (code, _, _) = run(&["blocksig", "-i", path_str(&input), "-o", path_str(&output)]);
    assert_eq!(code, 0);
    assert!(fs::read(&output).expect("read output").is_empty());
}
