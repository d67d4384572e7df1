use crate::experiment::Phase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("Cannot open word list {path}: {source}")]
    ResourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("There are no words to sample with length in [{min_len}, {max_len}]")]
    SamplingExhausted { min_len: usize, max_len: usize },

    #[error("Entropy source failed: {0}")]
    EntropyUnavailable(#[from] rand::Error),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid phase: expected {expected:?}, got {actual:?}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("Experiment worker '{label}' panicked")]
    WorkerPanicked { label: &'static str },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExperimentError {
    /// Missing input is reported with its own process exit status.
    pub fn is_resource_unavailable(&self) -> bool {
        matches!(self, Self::ResourceUnavailable { .. })
    }
}

pub type ExperimentResult<T> = Result<T, ExperimentError>;
