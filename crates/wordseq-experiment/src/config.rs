//! Run configuration.
//!
//! Loaded from TOML; every field has a default, so an empty file (or no file)
//! reproduces the standard 80-participant run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shuffle_kernel::{Pattern, PatternCatalog, PATTERN_LEN};

use crate::assembler::default_block_plan;
use crate::encoder::PatternEncoder;
use crate::error::ExperimentError;
use crate::output::ChainTerminator;

/// A catalog entry and the code it is written as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordConfig {
    pub pattern: Pattern,
    pub code: String,
}

impl WordConfig {
    fn new(keys: [u8; PATTERN_LEN], code: &str) -> Self {
        Self {
            pattern: Pattern::new(keys),
            code: code.to_string(),
        }
    }
}

fn default_words() -> Vec<WordConfig> {
    vec![
        WordConfig::new([4, 1, 2, 4], "0"),
        WordConfig::new([1, 2, 4, 2], "1"),
        WordConfig::new([3, 4, 2, 4], "2"),
        WordConfig::new([2, 4, 2, 3], "3"),
        WordConfig::new([2, 3, 4, 1], "4"),
        WordConfig::new([3, 4, 1, 2], "5"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Directory the artifact is written to.
    pub output_dir: PathBuf,
    /// Artifact file name without the `.txt` extension.
    pub output_name: String,
    /// Number of participants; ids run from 1 to this value.
    pub participants: usize,
    /// RNG seed. A random seed is drawn (and logged) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// One entry per public sequence; each lists the block lengths
    /// concatenated into it.
    pub blocks: Vec<Vec<usize>>,
    /// How the last record of the artifact ends.
    pub chain: ChainTerminator,
    /// The pattern catalog, in encoding order.
    pub words: Vec<WordConfig>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("TestSeqs"),
            output_name: "TestSeqOnline".to_string(),
            participants: 80,
            seed: None,
            blocks: default_block_plan(),
            chain: ChainTerminator::Dangling,
            words: default_words(),
        }
    }
}

impl ExperimentConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ExperimentError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExperimentError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Full path of the artifact.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.txt", self.output_name))
    }

    pub fn catalog(&self) -> Result<PatternCatalog, ExperimentError> {
        Ok(PatternCatalog::new(
            self.words.iter().map(|w| w.pattern).collect(),
        )?)
    }

    pub fn encoder(&self) -> Result<PatternEncoder, ExperimentError> {
        PatternEncoder::new(
            self.catalog()?,
            self.words.iter().map(|w| w.code.clone()).collect(),
        )
    }

    /// Check everything a run depends on before any file is touched.
    ///
    /// This includes an exact search confirming every block of the plan has
    /// a valid ordering whatever tail it inherits, since generation retries
    /// without limit.
    pub fn validate(&self) -> Result<(), ExperimentError> {
        let invalid = |msg: &str| -> Result<(), ExperimentError> {
            Err(ExperimentError::InvalidConfig(msg.to_string()))
        };

        if self.participants == 0 {
            return invalid("participants must be at least 1");
        }
        if self.output_name.is_empty() {
            return invalid("output_name must not be empty");
        }
        if self.blocks.is_empty() {
            return invalid("blocks must list at least one sequence");
        }
        if self.blocks.iter().any(|lengths| lengths.is_empty()) {
            return invalid("every sequence needs at least one block");
        }
        if self.blocks.iter().flatten().any(|&length| length == 0) {
            return invalid("block lengths must be at least 1");
        }

        let encoder = self.encoder()?;
        shuffle_kernel::check_plan(encoder.catalog(), self.blocks.iter().flatten().copied())?;
        Ok(())
    }
}
