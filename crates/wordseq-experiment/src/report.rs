//! Run summaries.
//!
//! Captures what is needed to reproduce or audit an artifact:
//! - The seed
//! - Where the artifact went
//! - How hard each participant's blocks were to construct

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assembler::ParticipantRecord;
use crate::output::ChainTerminator;

/// Construction statistics for one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantStats {
    pub participant_id: usize,
    pub attempts: usize,
    pub dead_ends: usize,
}

/// Results from a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Seed the run used, whether configured or drawn
    pub seed: u64,
    /// Block plan the sequences were built from
    pub blocks: Vec<Vec<usize>>,
    pub chain: ChainTerminator,
    /// Artifact path (None for previews)
    pub artifact: Option<PathBuf>,
    pub participants: Vec<ParticipantStats>,
    pub total_attempts: usize,
    pub total_dead_ends: usize,
}

impl RunReport {
    pub fn new(seed: u64, blocks: Vec<Vec<usize>>, chain: ChainTerminator) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            ended_at: now,
            seed,
            blocks,
            chain,
            artifact: None,
            participants: Vec::new(),
            total_attempts: 0,
            total_dead_ends: 0,
        }
    }

    pub fn record(&mut self, record: &ParticipantRecord) {
        self.total_attempts += record.attempts;
        self.total_dead_ends += record.dead_ends;
        self.participants.push(ParticipantStats {
            participant_id: record.participant_id,
            attempts: record.attempts,
            dead_ends: record.dead_ends,
        });
    }

    pub fn finish(&mut self, artifact: Option<PathBuf>) {
        self.artifact = artifact;
        self.ended_at = Utc::now();
    }

    /// Mean construction attempts per block.
    pub fn attempts_per_block(&self) -> f64 {
        let per_participant: usize = self.blocks.iter().map(Vec::len).sum();
        let blocks = per_participant * self.participants.len();
        if blocks == 0 {
            0.0
        } else {
            self.total_attempts as f64 / blocks as f64
        }
    }

    /// Save the report to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let report = serde_json::from_str(&json)?;
        Ok(report)
    }
}
