//! Integration tests for full runs.
//!
//! Tests the full flow of:
//! - Config -> artifact on disk
//! - Refusing to touch an existing artifact
//! - Reading the artifact back and checking the adjacency rule end to end

use std::path::Path;

use shuffle_kernel::{violations, KernelError, Pattern};
use wordseq_experiment::{
    preview, run, ChainTerminator, ExperimentConfig, ExperimentError, PatternEncoder, WordConfig,
};

fn config_in(dir: &Path, participants: usize, seed: u64) -> ExperimentConfig {
    ExperimentConfig {
        output_dir: dir.to_path_buf(),
        output_name: "TestSeqOnline".to_string(),
        participants,
        seed: Some(seed),
        ..Default::default()
    }
}

/// Split an artifact into per-participant lists of decoded sequences.
fn parse_artifact(text: &str, encoder: &PatternEncoder) -> Vec<(usize, Vec<Vec<Pattern>>)> {
    let mut participants = Vec::new();

    for line in text.lines() {
        if let Some(rest) = line.split("if(participantID === ").nth(1) {
            let id: usize = rest.trim_end_matches("){").parse().unwrap();
            participants.push((id, Vec::new()));
        } else if line.trim_start().starts_with("wordSeq") {
            let start = line.find('[').unwrap() + 1;
            let end = line.rfind(']').unwrap();
            let codes: Vec<&str> = line[start..end].split(',').collect();
            let patterns = encoder.decode_all(&codes).unwrap();
            participants.last_mut().unwrap().1.push(patterns);
        }
    }

    participants
}

#[test]
fn test_run_writes_every_participant() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 12, 2020);

    let report = run(&config).unwrap();
    let path = config.output_path();
    assert_eq!(report.artifact.as_deref(), Some(path.as_path()));
    assert_eq!(report.participants.len(), 12);
    assert_eq!(report.seed, 2020);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("\t\tif(participantID === 1){\n"));
    assert!(text.ends_with("\t\t}\n\t\telse "));

    let encoder = config.encoder().unwrap();
    let parsed = parse_artifact(&text, &encoder);
    assert_eq!(parsed.len(), 12);

    for (i, (id, sequences)) in parsed.iter().enumerate() {
        assert_eq!(*id, i + 1);
        assert_eq!(sequences.len(), 4);
        for sequence in sequences {
            assert_eq!(sequence.len(), 60);
            for pattern in encoder.catalog().patterns() {
                assert_eq!(sequence.iter().filter(|p| *p == pattern).count(), 10);
            }
        }

        let whole: Vec<Pattern> = sequences.concat();
        assert!(
            violations(&whole, None).is_empty(),
            "participant {} breaks the adjacency rule",
            id
        );
    }
}

#[test]
fn test_existing_artifact_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 3, 1);
    let path = config.output_path();
    std::fs::write(&path, "\t\tprevious run\n").unwrap();

    let err = run(&config).unwrap_err();
    assert!(matches!(err, ExperimentError::PreexistingOutput { path: p } if p == path));

    assert_eq!(std::fs::read(&path).unwrap(), b"\t\tprevious run\n");
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1, "no other files should be created");
}

#[test]
fn test_same_seed_same_artifact() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    run(&config_in(first.path(), 5, 42)).unwrap();
    run(&config_in(second.path(), 5, 42)).unwrap();

    let a = std::fs::read(first.path().join("TestSeqOnline.txt")).unwrap();
    let b = std::fs::read(second.path().join("TestSeqOnline.txt")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_preview_matches_written_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 4, 9);

    let (text, report) = preview(&config).unwrap();
    assert!(report.artifact.is_none());
    assert!(!config.output_path().exists());

    run(&config).unwrap();
    assert_eq!(std::fs::read_to_string(config.output_path()).unwrap(), text);
}

#[test]
fn test_closed_chain() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExperimentConfig {
        chain: ChainTerminator::Closed,
        ..config_in(dir.path(), 3, 5)
    };

    run(&config).unwrap();
    let text = std::fs::read_to_string(config.output_path()).unwrap();
    assert!(text.ends_with("\t\t}\n"));
    assert_eq!(text.matches("else ").count(), 2);
}

#[test]
fn test_invalid_config_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExperimentConfig {
        blocks: vec![vec![0]],
        ..config_in(dir.path(), 3, 5)
    };

    assert!(matches!(run(&config), Err(ExperimentError::InvalidConfig(_))));
    assert!(!config.output_path().exists());
}

#[test]
fn test_unsatisfiable_words_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let words = [([3, 3, 3, 3], "h"), ([1, 1, 1, 2], "a"), ([2, 2, 2, 1], "b")]
        .into_iter()
        .map(|(keys, code)| WordConfig {
            pattern: Pattern::new(keys),
            code: code.to_string(),
        })
        .collect();
    let config = ExperimentConfig {
        words,
        blocks: vec![vec![2]],
        ..config_in(dir.path(), 1, 5)
    };

    assert!(matches!(
        run(&config),
        Err(ExperimentError::Kernel(KernelError::Infeasible { length: 2, after: None }))
    ));
    assert!(!config.output_path().exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_custom_plan_and_codes() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ExperimentConfig {
        blocks: vec![vec![1], vec![2, 2]],
        ..config_in(dir.path(), 2, 3)
    };
    for (word, code) in config.words.iter_mut().zip(["a", "b", "c", "d", "e", "f"]) {
        word.code = code.to_string();
    }

    run(&config).unwrap();
    let text = std::fs::read_to_string(config.output_path()).unwrap();
    let parsed = parse_artifact(&text, &config.encoder().unwrap());

    assert_eq!(parsed.len(), 2);
    for (_, sequences) in &parsed {
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].len(), 6);
        assert_eq!(sequences[1].len(), 24);
    }
    assert!(!text.contains("wordSeq3"));
}
