// e2e/cli_integration.rs — black-box tests of the `brbench` binary.
//
// Covers argument parsing, run-mode dispatch, output naming, exit codes and
// the compare, monitor and segregate subcommands.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn brbench() -> Command {
    Command::new(env!("CARGO_BIN_EXE_brbench"))
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    brbench()
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn brbench")
}

fn make_input(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "Hello, Brotli!\n".repeat(400)).unwrap();
    path
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

// ── 1. Argument handling ──────────────────────────────────────────────────────

#[test]
fn no_arguments_is_a_usage_error() {
    let out = brbench().output().unwrap();
    assert!(!out.status.success());
    assert!(!out.stderr.is_empty());
}

#[test]
fn version_and_help_succeed() {
    let out = brbench().arg("--version").output().unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).contains("brbench"));

    let out = brbench().args(["run", "--help"]).output().unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).contains("--window-bits"));
}

#[test]
fn unknown_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    make_input(dir.path(), "a.txt");
    let out = run_in(dir.path(), &["run", "-f", "a.txt", "-m", "sideways"]);
    assert!(!out.status.success());
}

// ── 2. Single-file runs ───────────────────────────────────────────────────────

#[test]
fn both_mode_round_trips_and_prints_metrics() {
    let dir = TempDir::new().unwrap();
    let input = make_input(dir.path(), "a.txt");
    let out = run_in(dir.path(), &["run", "-f", "a.txt", "-m", "both", "--verify"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    assert!(text.contains("Compression: a.txt"));
    assert!(text.contains("Decompression: a.txt.br"));
    assert!(text.contains("Compression ratio:"));
    assert!(text.contains("Verification: OK"));
    assert_eq!(
        fs::read(dir.path().join("d-a.txt")).unwrap(),
        fs::read(&input).unwrap()
    );
}

#[test]
fn mode_is_inferred_from_extension() {
    let dir = TempDir::new().unwrap();
    let input = make_input(dir.path(), "b.log");

    let out = run_in(dir.path(), &["-q", "run", "-f", "b.log"]);
    assert!(out.status.success());
    assert!(dir.path().join("b.log.br").is_file());
    assert!(!dir.path().join("d-b.log").exists());

    let out = run_in(dir.path(), &["-q", "run", "-f", "b.log.br"]);
    assert!(out.status.success());
    assert_eq!(
        fs::read(dir.path().join("d-b.log")).unwrap(),
        fs::read(&input).unwrap()
    );
}

#[test]
fn decompressing_a_plain_file_fails() {
    let dir = TempDir::new().unwrap();
    make_input(dir.path(), "plain.txt");
    let out = run_in(dir.path(), &["run", "-f", "plain.txt", "-m", "decompress"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains(".br"));
}

#[test]
fn out_of_range_quality_fails() {
    let dir = TempDir::new().unwrap();
    make_input(dir.path(), "a.txt");
    let out = run_in(dir.path(), &["run", "-f", "a.txt", "-c", "12"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("quality 12"));
    assert!(!dir.path().join("a.txt.br").exists());
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let out = run_in(dir.path(), &["run", "-f", "nope.txt"]);
    assert_eq!(out.status.code(), Some(1));
}

// ── 3. compare ────────────────────────────────────────────────────────────────

const HEADER: &str = "Original File Name,Original File Size(B),Compression Quality,Window Bits,\
Time Taken by Brotli(s),Time Taken by Compression(s),Compressed File Size(B),Compression Ratio,\
CPU Usage by Process(%),Maximum Resident Size(KB)";

#[test]
fn compare_writes_named_report() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("old.csv"),
        format!("{}\nx.txt,1000,5,16,0.5,1.0,100,10.0,50.0,900\n", HEADER),
    )
    .unwrap();
    fs::write(
        dir.path().join("new.csv"),
        format!("{}\nx.txt,1000,9,20,0.5,1.0,150,6.6,50.0,900\n", HEADER),
    )
    .unwrap();

    let out = run_in(dir.path(), &["compare", "old.csv", "new.csv", "--tag", "rc1"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let report = dir.path().join("_comparison_report_c_5_9_w_16_20_rc1.csv");
    let text = fs::read_to_string(report).unwrap();
    assert!(text.contains("x.txt,1000,50,0,0,0"));
    assert!(text.contains("Note:"));
}

#[test]
fn compare_with_empty_report_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("old.csv"), format!("{}\n", HEADER)).unwrap();
    fs::write(
        dir.path().join("new.csv"),
        format!("{}\nx.txt,1000,9,20,0.5,1.0,150,6.6,50.0,900\n", HEADER),
    )
    .unwrap();
    let out = run_in(dir.path(), &["compare", "old.csv", "new.csv"]);
    assert_eq!(out.status.code(), Some(1));
}

// ── 4. monitor / segregate ────────────────────────────────────────────────────

#[test]
fn monitoring_a_missing_process_fails() {
    let out = brbench()
        .args(["monitor", "--pid", "4294000000", "--period-ms", "5"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn segregate_copies_into_buckets() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("incoming");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("small.bin"), vec![1u8; 1000]).unwrap();
    fs::write(src.join("medium.bin"), vec![2u8; 100 * 1024]).unwrap();

    let out = run_in(dir.path(), &["segregate", "incoming"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("64/small.bin").is_file());
    assert!(dir.path().join("64-128/medium.bin").is_file());
    assert!(src.join("small.bin").is_file());
}
