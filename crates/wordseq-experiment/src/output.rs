//! Rendering participant records as front-end code and writing the artifact.
//!
//! The artifact is a chain of `if(participantID === N){ ... }` blocks that the
//! front-end pastes into its trial setup. Each record assigns the encoded
//! sequences to `wordSeq1`, `wordSeq2`, ...

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assembler::ParticipantRecord;
use crate::error::ExperimentError;

/// Written once at the start of the artifact.
pub const PREAMBLE: &str = "\t\t";

/// How the last record of the chain ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChainTerminator {
    /// Every record, including the last, ends with `else `. Matches the
    /// artifacts the front-end has been consuming so far.
    #[default]
    Dangling,
    /// The last record ends after its closing brace.
    Closed,
}

/// Render one record. `is_last` only matters for [`ChainTerminator::Closed`].
pub fn render_record(record: &ParticipantRecord, is_last: bool, chain: ChainTerminator) -> String {
    let mut out = format!("if(participantID === {}){{\n", record.participant_id);
    for (i, sequence) in record.sequences.iter().enumerate() {
        out.push_str(&format!("\t\t\twordSeq{} = [{}];\n", i + 1, sequence.join(",")));
    }
    out.push_str("\t\t}");

    if is_last && chain == ChainTerminator::Closed {
        out.push('\n');
    } else {
        out.push_str("\n\t\telse ");
    }
    out
}

/// Render a whole artifact in memory.
pub fn render_records(records: &[ParticipantRecord], chain: ChainTerminator) -> String {
    let mut out = String::from(PREAMBLE);
    for (i, record) in records.iter().enumerate() {
        out.push_str(&render_record(record, i + 1 == records.len(), chain));
    }
    out
}

/// Streams records into a new artifact file.
///
/// The file is created with create-new semantics, so an existing artifact is
/// never truncated. Dropping the writer without [`finish`](Self::finish)
/// still closes the file; `finish` additionally surfaces flush errors.
pub struct ArtifactWriter {
    path: PathBuf,
    out: BufWriter<File>,
    chain: ChainTerminator,
    records: usize,
}

impl ArtifactWriter {
    pub fn create(path: impl AsRef<Path>, chain: ChainTerminator) -> Result<Self, ExperimentError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(ExperimentError::PreexistingOutput { path });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(ExperimentError::PreexistingOutput { path });
            }
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), "Created artifact");

        let mut out = BufWriter::new(file);
        out.write_all(PREAMBLE.as_bytes())?;

        Ok(Self {
            path,
            out,
            chain,
            records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_record(
        &mut self,
        record: &ParticipantRecord,
        is_last: bool,
    ) -> Result<(), ExperimentError> {
        self.out
            .write_all(render_record(record, is_last, self.chain).as_bytes())?;
        self.records += 1;
        Ok(())
    }

    /// Flush and close the artifact, returning its path.
    pub fn finish(mut self) -> Result<PathBuf, ExperimentError> {
        self.out.flush()?;
        info!(path = %self.path.display(), records = self.records, "Artifact written");
        Ok(self.path)
    }
}
