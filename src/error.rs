use std::path::PathBuf;

use thiserror::Error;

/// Failures from injected oracles. Stages catch these locally and fall
/// back to a simpler strategy; they never abort the pipeline.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle could not be reached or initialized at all
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    /// A single call failed; other calls may still succeed
    #[error("oracle call failed: {0}")]
    Call(String),
}

pub type OracleResult<T> = Result<T, OracleError>;

/// Fatal pipeline errors surfaced to the CLI
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read input file {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}
