//! Error types for the experiment layer.

use std::path::PathBuf;

use shuffle_kernel::{KernelError, Pattern};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    /// The artifact is never overwritten; nothing was written.
    #[error("output file already exists: {}", path.display())]
    PreexistingOutput { path: PathBuf },

    /// The shuffler produced a pattern the encoder does not know. This is a
    /// catalog consistency bug, not a user error.
    #[error("pattern {0} is not in the catalog")]
    UnknownPattern(Pattern),

    #[error("code {0:?} does not belong to any word")]
    UnknownCode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
