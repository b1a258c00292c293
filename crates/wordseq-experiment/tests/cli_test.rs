//! Tests for the `wordseq-experiment` binary.
//!
//! Covers what the library tests cannot see:
//! - Exit status when the artifact already exists
//! - Preview output on stdout matching the library rendering byte for byte

use std::path::Path;
use std::process::{Command, Output};

use wordseq_experiment::{preview, ExperimentConfig};

fn wordseq(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wordseq-experiment"))
        .args(args)
        .output()
        .unwrap()
}

fn write_args(dir: &Path) -> Vec<String> {
    [
        "write",
        "--output-dir",
        dir.to_str().unwrap(),
        "--name",
        "TestSeqOnline",
        "--participants",
        "2",
        "--seed",
        "1",
    ]
    .map(String::from)
    .to_vec()
}

#[test]
fn test_write_succeeds_on_fresh_directory() {
    let dir = tempfile::tempdir().unwrap();
    let args = write_args(dir.path());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let output = wordseq(&args);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = std::fs::read_to_string(dir.path().join("TestSeqOnline.txt")).unwrap();
    assert!(text.starts_with("\t\tif(participantID === 1){\n"));
    assert_eq!(text.matches("if(participantID === ").count(), 2);
}

#[test]
fn test_write_fails_when_artifact_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("TestSeqOnline.txt");
    std::fs::write(&path, "\t\tprevious run\n").unwrap();
    let args = write_args(dir.path());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let output = wordseq(&args);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(std::fs::read(&path).unwrap(), b"\t\tprevious run\n");
}

#[test]
fn test_preview_prints_artifact_verbatim() {
    let output = wordseq(&["preview", "--participants", "2", "--seed", "3"]);
    assert!(output.status.success());

    let config = ExperimentConfig {
        participants: 2,
        seed: Some(3),
        ..Default::default()
    };
    let (expected, _) = preview(&config).unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with("\t\t}\n\t\telse "));
    assert_eq!(stdout, expected);
}
