//! Error types for the query layer.

use fsinfo_wire::Status;
use thiserror::Error;

/// Why a single query failed. Local to that query; never affects the
/// channel or other callers.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The path does not resolve to a reachable filesystem object.
    #[error("cannot resolve {path}: {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The mount was found but its statistics could not be read.
    #[error("cannot read filesystem statistics for {path}: {source}")]
    StatisticsUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl QueryError {
    /// The status this failure is reported with on the channel.
    pub fn status(&self) -> Status {
        match self {
            QueryError::NotFound { .. } => Status::NotFound,
            QueryError::StatisticsUnavailable { .. } => Status::StatisticsUnavailable,
        }
    }
}
