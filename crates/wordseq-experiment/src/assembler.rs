//! Builds each participant's word sequences from a plan of blocks.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use shuffle_kernel::{AttemptCounter, ConstrainedShuffler, Pattern};
use tracing::debug;

use crate::encoder::PatternEncoder;
use crate::error::ExperimentError;

/// The standard plan: a one-repetition warm-up block merged with nine more
/// repetitions, then three blocks of ten.
pub fn default_block_plan() -> Vec<Vec<usize>> {
    vec![vec![1, 9], vec![10], vec![10], vec![10]]
}

/// Everything generated for one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// 1-based participant number, as matched by the front-end.
    pub participant_id: usize,
    /// Encoded sequences, one per entry of the block plan.
    pub sequences: Vec<Vec<String>>,
    /// The same sequences as patterns.
    #[serde(skip)]
    pub patterns: Vec<Vec<Pattern>>,
    /// Construction attempts over all blocks.
    pub attempts: usize,
    /// Attempts abandoned at a dead end.
    pub dead_ends: usize,
}

/// Runs the block plan for one participant at a time.
///
/// The tail of every block, including the last block of one public sequence,
/// is carried into the next block so the adjacency rule holds across joins.
pub struct SequenceAssembler<R = ChaCha8Rng> {
    shuffler: ConstrainedShuffler<R>,
    encoder: PatternEncoder,
    plan: Vec<Vec<usize>>,
}

impl SequenceAssembler<ChaCha8Rng> {
    pub fn seeded(encoder: PatternEncoder, plan: Vec<Vec<usize>>, seed: u64) -> Self {
        let shuffler = ConstrainedShuffler::seeded(encoder.catalog().clone(), seed);
        Self::from_shuffler(shuffler, encoder, plan)
    }
}

impl<R: Rng> SequenceAssembler<R> {
    pub fn from_shuffler(
        shuffler: ConstrainedShuffler<R>,
        encoder: PatternEncoder,
        plan: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            shuffler,
            encoder,
            plan,
        }
    }

    pub fn plan(&self) -> &[Vec<usize>] {
        &self.plan
    }

    pub fn encoder(&self) -> &PatternEncoder {
        &self.encoder
    }

    pub fn assemble(
        &mut self,
        participant_id: usize,
    ) -> Result<ParticipantRecord, ExperimentError> {
        let mut counter = AttemptCounter::default();
        let mut tail = None;
        let mut patterns = Vec::with_capacity(self.plan.len());
        let mut sequences = Vec::with_capacity(self.plan.len());

        for lengths in &self.plan {
            let mut sequence: Vec<Pattern> = Vec::new();
            for &length in lengths {
                let block = self
                    .shuffler
                    .generate_observed(length, tail, &mut counter)?;
                let (ordering, block_tail) = block.into_parts();
                sequence.extend(ordering);
                tail = Some(block_tail);
            }
            sequences.push(self.encoder.encode_all(&sequence)?);
            patterns.push(sequence);
        }

        debug!(
            participant_id,
            attempts = counter.attempts,
            dead_ends = counter.dead_ends,
            "Assembled participant"
        );

        Ok(ParticipantRecord {
            participant_id,
            sequences,
            patterns,
            attempts: counter.attempts,
            dead_ends: counter.dead_ends,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuffle_kernel::{violations, PatternCatalog};

    fn assembler(plan: Vec<Vec<usize>>, seed: u64) -> SequenceAssembler {
        SequenceAssembler::seeded(PatternEncoder::default(), plan, seed)
    }

    #[test]
    fn test_default_plan_shape() {
        let mut assembler = assembler(default_block_plan(), 42);
        let record = assembler.assemble(1).unwrap();

        assert_eq!(record.participant_id, 1);
        assert_eq!(record.sequences.len(), 4);
        for sequence in &record.sequences {
            assert_eq!(sequence.len(), 60);
            for code in ["0", "1", "2", "3", "4", "5"] {
                assert_eq!(sequence.iter().filter(|c| *c == code).count(), 10);
            }
        }
        assert!(record.attempts >= 5);
        assert_eq!(record.dead_ends, record.attempts - 5);
    }

    #[test]
    fn test_rule_holds_across_block_joins() {
        let mut assembler = assembler(default_block_plan(), 8);

        for participant in 1..=20 {
            let record = assembler.assemble(participant).unwrap();
            let whole: Vec<Pattern> = record.patterns.concat();
            assert_eq!(whole.len(), 240);
            assert!(violations(&whole, None).is_empty(), "participant {}", participant);
        }
    }

    #[test]
    fn test_warm_up_block_is_a_permutation() {
        let catalog = PatternCatalog::default();
        let mut assembler = assembler(default_block_plan(), 17);
        let record = assembler.assemble(1).unwrap();

        let mut warm_up = record.patterns[0][..6].to_vec();
        warm_up.sort_by_key(|p| catalog.index_of(p));
        assert_eq!(warm_up, catalog.patterns());
    }

    #[test]
    fn test_sequences_decode_to_patterns() {
        let mut assembler = assembler(vec![vec![2], vec![3]], 5);
        let record = assembler.assemble(7).unwrap();

        for (codes, patterns) in record.sequences.iter().zip(&record.patterns) {
            assert_eq!(&assembler.encoder().decode_all(codes).unwrap(), patterns);
        }
    }

    #[test]
    fn test_zero_length_in_plan_fails() {
        let mut assembler = assembler(vec![vec![1, 0]], 1);
        assert!(matches!(
            assembler.assemble(1),
            Err(ExperimentError::Kernel(shuffle_kernel::KernelError::ZeroLength))
        ));
    }
}
