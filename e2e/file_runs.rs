// e2e/file_runs.rs — batch runs and dictionaries through the binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn brbench(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_brbench"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn brbench")
}

fn populate(dir: &Path) {
    fs::create_dir_all(dir.join("corpus/sub")).unwrap();
    fs::write(dir.join("corpus/a.txt"), "alpha beta gamma ".repeat(500)).unwrap();
    fs::write(dir.join("corpus/sub/b.txt"), "0123456789abcdef".repeat(300)).unwrap();
}

#[test]
fn batch_writes_tree_and_report() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());

    let out = brbench(dir.path(), &["batch", "-d", "corpus", "-c", "4", "-w", "18", "-i", "2"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let out_dir = dir.path().join("corpus_compressed_c4_w18");
    assert!(out_dir.join("a.txt.br").is_file());
    assert!(out_dir.join("sub/b.txt.br").is_file());

    let report = fs::read_to_string(out_dir.join("_report_c4_w18.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Original File Name,"));
    assert!(lines[1].starts_with("a.txt,8500,4,18,"));
    assert!(lines[3].starts_with("sub/b.txt,4800,4,18,"));
}

#[test]
fn two_batches_compare() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());

    for q in ["1", "9"] {
        let out = brbench(dir.path(), &["-q", "batch", "-d", "corpus", "-c", q, "-j", "2"]);
        assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    }
    let out = brbench(
        dir.path(),
        &[
            "compare",
            "corpus_compressed_c1_w16/_report_c1_w16.csv",
            "corpus_compressed_c9_w16/_report_c9_w16.csv",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = fs::read_to_string(dir.path().join("_comparison_report_c_1_9_w_16_16.csv")).unwrap();
    assert!(text.lines().nth(1).unwrap().starts_with("a.txt,8500,"));
    assert!(text.lines().nth(2).unwrap().starts_with("sub/b.txt,4800,"));
}

#[test]
fn batch_on_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let out = brbench(dir.path(), &["batch", "-d", "absent"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn dictionary_run_round_trips() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());
    fs::write(dir.path().join("dict"), "alpha beta gamma delta").unwrap();

    let out = brbench(
        dir.path(),
        &["run", "-f", "corpus/a.txt", "-m", "both", "-D", "dict", "--verify", "--chunk-size", "333"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read(dir.path().join("corpus/d-a.txt")).unwrap(),
        fs::read(dir.path().join("corpus/a.txt")).unwrap()
    );
}

#[test]
fn empty_dictionary_is_rejected() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());
    fs::write(dir.path().join("dict"), "").unwrap();
    let out = brbench(dir.path(), &["run", "-f", "corpus/a.txt", "-D", "dict"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("dictionary is empty"));
}
