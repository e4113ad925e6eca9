use std::path::PathBuf;

use thiserror::Error;

use crate::scheduler::Algorithm;

/// Reasons a workload document is refused before any simulation starts.
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("failed to read workload {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed workload document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("workload must contain at least one process")]
    Empty,

    #[error("process {id} has a zero burst")]
    ZeroBurst { id: String },

    #[error("{0} requires a positive quantum")]
    MissingQuantum(Algorithm),

    #[error("process id {0} appears more than once")]
    DuplicateId(String),
}
