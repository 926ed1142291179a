use std::io;
use std::path::PathBuf;

use fsinfo_wire::{Status, WireError};
use thiserror::Error;

/// Errors seen by a control channel client.
///
/// Failed statuses map back one-to-one; the messages read like the
/// corresponding `strerror` text.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No such file or directory")]
    NotFound,

    #[error("Input/output error")]
    StatisticsUnavailable,

    #[error("Bad address")]
    BoundaryFault,

    #[error("Invalid argument")]
    UnsupportedOperation,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed response: {0}")]
    Wire(#[from] WireError),
}

impl ClientError {
    /// The error a failed status stands for; `None` for [`Status::Ok`].
    pub fn from_status(status: Status) -> Option<Self> {
        match status {
            Status::Ok => None,
            Status::NotFound => Some(ClientError::NotFound),
            Status::StatisticsUnavailable => Some(ClientError::StatisticsUnavailable),
            Status::BoundaryFault => Some(ClientError::BoundaryFault),
            Status::UnsupportedOperation => Some(ClientError::UnsupportedOperation),
        }
    }
}
