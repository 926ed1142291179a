//! Error types for the wire layer.
//!
//! Errors at this level are about bytes and memory only. Query semantics
//! (missing paths, unreadable statistics) belong in higher layers.

use thiserror::Error;

/// Errors at the wire layer.
#[derive(Debug, Error)]
pub enum WireError {
    /// The caller's memory could not be read or written.
    #[error("caller memory not accessible: {reason}")]
    Fault { reason: &'static str },

    /// The caller's buffer is smaller than one record.
    #[error("caller buffer holds {actual} bytes, a record needs {expected}")]
    ShortBuffer { expected: usize, actual: usize },

    /// Generic I/O failure moving a frame.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A response frame carried a status code this side does not know.
    #[error("unknown status code {0}")]
    UnknownStatus(i32),
}
