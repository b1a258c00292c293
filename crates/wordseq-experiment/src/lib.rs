//! Word Sequence Experiment: per-participant stimulus sequences for the
//! online sequence-learning task.
//!
//! For every participant this crate builds four sequences of words (via
//! [`shuffle_kernel`]) that respect the adjacency rule across every block
//! join, encodes them as digits, and writes them as a chain of conditionals
//! that the browser front-end selects from by participant id.

pub mod assembler;
pub mod config;
pub mod encoder;
pub mod error;
pub mod output;
pub mod report;

use rand::Rng;
use tracing::info;

pub use assembler::{default_block_plan, ParticipantRecord, SequenceAssembler};
pub use config::{ExperimentConfig, WordConfig};
pub use encoder::PatternEncoder;
pub use error::ExperimentError;
pub use output::{render_records, ArtifactWriter, ChainTerminator};
pub use report::RunReport;

/// The configured seed, or a fresh one.
pub fn resolve_seed(config: &ExperimentConfig) -> u64 {
    config.seed.unwrap_or_else(|| rand::rng().random())
}

/// Generate every participant and write the artifact.
///
/// Fails with [`ExperimentError::PreexistingOutput`] before generating
/// anything if the artifact already exists.
pub fn run(config: &ExperimentConfig) -> Result<RunReport, ExperimentError> {
    config.validate()?;
    let path = config.output_path();
    let mut writer = ArtifactWriter::create(&path, config.chain)?;

    let seed = resolve_seed(config);
    info!(
        seed,
        participants = config.participants,
        path = %path.display(),
        "Starting sequence generation"
    );

    let mut assembler = SequenceAssembler::seeded(config.encoder()?, config.blocks.clone(), seed);
    let mut report = RunReport::new(seed, config.blocks.clone(), config.chain);

    for participant_id in 1..=config.participants {
        info!(participant_id, "Writing participant sequences");
        let record = assembler.assemble(participant_id)?;
        writer.write_record(&record, participant_id == config.participants)?;
        report.record(&record);
    }

    let artifact = writer.finish()?;
    report.finish(Some(artifact));
    Ok(report)
}

/// Generate every participant and render the artifact text without touching
/// the filesystem.
pub fn preview(config: &ExperimentConfig) -> Result<(String, RunReport), ExperimentError> {
    config.validate()?;
    let seed = resolve_seed(config);
    let mut assembler = SequenceAssembler::seeded(config.encoder()?, config.blocks.clone(), seed);
    let mut report = RunReport::new(seed, config.blocks.clone(), config.chain);

    let mut records = Vec::with_capacity(config.participants);
    for participant_id in 1..=config.participants {
        let record = assembler.assemble(participant_id)?;
        report.record(&record);
        records.push(record);
    }
    report.finish(None);

    Ok((render_records(&records, config.chain), report))
}
