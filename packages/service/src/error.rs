//! Error types for the control channel and its lifecycle.

use fsinfo_core::QueryError;
use fsinfo_wire::{Status, WireError};
use thiserror::Error;

use crate::lifecycle::Step;

/// Why one channel call failed. Every variant is local to that call.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The command selector is not one the channel knows.
    #[error("unsupported command selector {selector:#x}")]
    UnsupportedOperation { selector: u32 },

    /// Caller memory could not be read (before the query) or written (after).
    #[error("boundary fault: {0}")]
    BoundaryFault(#[source] WireError),

    /// The query itself failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl ChannelError {
    pub fn status(&self) -> Status {
        match self {
            ChannelError::UnsupportedOperation { .. } => Status::UnsupportedOperation,
            ChannelError::BoundaryFault(_) => Status::BoundaryFault,
            ChannelError::Query(e) => e.status(),
        }
    }
}

/// A registration or teardown step failed.
#[derive(Debug, Error)]
#[error("lifecycle step {step} failed: {source}")]
pub struct LifecycleError {
    /// The step that failed.
    pub step: Step,
    #[source]
    pub source: std::io::Error,
}

/// Result type alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;
