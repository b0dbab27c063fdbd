// Single-file runs on disk with real Brotli.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use brbench::bench::{load_dictionary, run_file, Instrumenter};
use brbench::cli::op_mode::Mode;
use brbench::codec::{CodecError, EncoderParams};

use crate::oracle::Frozen;

fn corpus_file(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let body: Vec<u8> = (0..20_000u32)
        .map(|i| b"lorem ipsum dolor sit amet "[(i % 27) as usize] ^ (i / 997) as u8)
        .collect();
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn both_writes_siblings_and_verifies() {
    let tmp = TempDir::new().unwrap();
    let src = corpus_file(tmp.path(), "page.html");
    let inst = Instrumenter::new(Frozen);

    let outcome = run_file(&inst, &src, Mode::Both, &EncoderParams::new(7, 20), None, true).unwrap();
    let packed = tmp.path().join("page.html.br");
    let unpacked = tmp.path().join("d-page.html");
    assert_eq!(outcome.compressed_path.as_deref(), Some(packed.as_path()));
    assert_eq!(outcome.decompressed_path.as_deref(), Some(unpacked.as_path()));
    assert_eq!(outcome.verified, Some(true));
    assert_eq!(fs::read(&unpacked).unwrap(), fs::read(&src).unwrap());

    let c = outcome.compress.unwrap();
    let d = outcome.decompress.unwrap();
    assert_eq!(c.identity, "page.html");
    assert_eq!(d.identity, "page.html.br");
    assert_eq!(c.original_size, 20_000);
    assert_eq!(c.compressed_size, fs::metadata(&packed).unwrap().len());
    assert_eq!(d.original_size, c.original_size);
    assert_eq!(d.compressed_size, c.compressed_size);
}

#[test]
fn compress_only_verifies_by_decoding_in_memory() {
    let tmp = TempDir::new().unwrap();
    let src = corpus_file(tmp.path(), "log.txt");
    let inst = Instrumenter::new(Frozen);

    let outcome =
        run_file(&inst, &src, Mode::Compress, &EncoderParams::default(), None, true).unwrap();
    assert!(outcome.decompress.is_none());
    assert!(!tmp.path().join("d-log.txt").exists());
    assert_eq!(outcome.verified, Some(true));
}

#[test]
fn decompress_only_is_not_verifiable() {
    let tmp = TempDir::new().unwrap();
    let src = corpus_file(tmp.path(), "log.txt");
    let inst = Instrumenter::new(Frozen);
    run_file(&inst, &src, Mode::Compress, &EncoderParams::default(), None, false).unwrap();

    let packed = tmp.path().join("log.txt.br");
    let outcome =
        run_file(&inst, &packed, Mode::Decompress, &EncoderParams::default(), None, true).unwrap();
    assert!(outcome.compress.is_none());
    assert_eq!(outcome.verified, None);
    assert_eq!(
        fs::read(tmp.path().join("d-log.txt")).unwrap(),
        fs::read(&src).unwrap()
    );
}

#[test]
fn decompress_requires_brotli_suffix() {
    let tmp = TempDir::new().unwrap();
    let src = corpus_file(tmp.path(), "plain.txt");
    let inst = Instrumenter::new(Frozen);

    assert!(run_file(&inst, &src, Mode::Decompress, &EncoderParams::default(), None, false).is_err());
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[test]
fn rejected_parameters_leave_no_output() {
    let tmp = TempDir::new().unwrap();
    let src = corpus_file(tmp.path(), "a.txt");
    let inst = Instrumenter::new(Frozen);

    let err = run_file(&inst, &src, Mode::Both, &EncoderParams::new(6, 30), None, false).unwrap_err();
    assert!(matches!(err.as_codec(), Some(CodecError::ParameterRejected { .. })));
    assert!(!tmp.path().join("a.txt.br").exists());
}

#[test]
fn corrupt_input_fails_decompression() {
    let tmp = TempDir::new().unwrap();
    let bogus = tmp.path().join("bogus.br");
    let mut junk = vec![0x11u8];
    junk.extend([0xABu8; 63]);
    fs::write(&bogus, junk).unwrap();
    let inst = Instrumenter::new(Frozen);

    let err = run_file(&inst, &bogus, Mode::Decompress, &EncoderParams::default(), None, false)
        .unwrap_err();
    assert!(err.as_codec().is_some() || err.is_truncated(), "{}", err);
}

#[test]
fn dictionary_runs_round_trip() {
    let tmp = TempDir::new().unwrap();
    let src = corpus_file(tmp.path(), "doc.txt");
    let dict_path = tmp.path().join("dict");
    fs::write(&dict_path, &fs::read(&src).unwrap()[..4096]).unwrap();
    let dict = load_dictionary(&dict_path).unwrap();
    let inst = Instrumenter::new(Frozen);

    let outcome =
        run_file(&inst, &src, Mode::Both, &EncoderParams::new(9, 22), Some(&dict), true).unwrap();
    assert_eq!(outcome.verified, Some(true));
}
