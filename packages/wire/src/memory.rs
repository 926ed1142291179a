//! Caller-owned memory on the far side of the trust boundary.

use crate::{WireError, RECORD_SIZE};

/// Memory the channel must copy a request out of and a response into.
///
/// Implementations decide what "accessible" means (a mapped slice, a socket
/// frame, a test double that faults on demand). Both operations are
/// all-or-nothing: a failing `copy_out` must leave the caller's bytes as they
/// were.
pub trait CallerMemory {
    /// Copy one record from the caller into trusted memory.
    fn copy_in(&mut self, dst: &mut [u8; RECORD_SIZE]) -> Result<(), WireError>;

    /// Copy one record from trusted memory back to the caller.
    fn copy_out(&mut self, src: &[u8; RECORD_SIZE]) -> Result<(), WireError>;
}

/// A caller buffer described by its access rights.
///
/// Only the first [`RECORD_SIZE`] bytes are ever touched; a larger buffer is
/// fine, a smaller one faults before any byte moves.
#[derive(Debug)]
pub enum UserBuffer<'a> {
    Writable(&'a mut [u8]),
    ReadOnly(&'a [u8]),
    Unmapped,
}

impl UserBuffer<'_> {
    fn check_len(len: usize) -> Result<(), WireError> {
        if len < RECORD_SIZE {
            return Err(WireError::ShortBuffer {
                expected: RECORD_SIZE,
                actual: len,
            });
        }
        Ok(())
    }
}

impl CallerMemory for UserBuffer<'_> {
    fn copy_in(&mut self, dst: &mut [u8; RECORD_SIZE]) -> Result<(), WireError> {
        let src: &[u8] = match self {
            UserBuffer::Writable(buf) => &buf[..],
            UserBuffer::ReadOnly(buf) => &buf[..],
            UserBuffer::Unmapped => {
                return Err(WireError::Fault {
                    reason: "request buffer is unmapped",
                })
            }
        };
        Self::check_len(src.len())?;
        dst.copy_from_slice(&src[..RECORD_SIZE]);
        Ok(())
    }

    fn copy_out(&mut self, src: &[u8; RECORD_SIZE]) -> Result<(), WireError> {
        match self {
            UserBuffer::Writable(buf) => {
                Self::check_len(buf.len())?;
                buf[..RECORD_SIZE].copy_from_slice(src);
                Ok(())
            }
            UserBuffer::ReadOnly(_) => Err(WireError::Fault {
                reason: "response buffer is read-only",
            }),
            UserBuffer::Unmapped => Err(WireError::Fault {
                reason: "response buffer is unmapped",
            }),
        }
    }
}
