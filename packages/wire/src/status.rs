//! Per-call status codes carried back to the caller.

use crate::WireError;

const ENOENT: i32 = 2;
const EIO: i32 = 5;
const EFAULT: i32 = 14;
const EINVAL: i32 = 22;

/// Outcome of one channel call, as it appears on the wire.
///
/// Failures are encoded with the errno a driver would return for them, so
/// a status of `0` always means a complete response follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
    StatisticsUnavailable,
    BoundaryFault,
    UnsupportedOperation,
}

impl Status {
    pub const fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::NotFound => ENOENT,
            Status::StatisticsUnavailable => EIO,
            Status::BoundaryFault => EFAULT,
            Status::UnsupportedOperation => EINVAL,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, WireError> {
        match code {
            0 => Ok(Status::Ok),
            ENOENT => Ok(Status::NotFound),
            EIO => Ok(Status::StatisticsUnavailable),
            EFAULT => Ok(Status::BoundaryFault),
            EINVAL => Ok(Status::UnsupportedOperation),
            other => Err(WireError::UnknownStatus(other)),
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}
