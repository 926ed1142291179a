//! Command selectors.
//!
//! Selectors use the Linux `_IOR` encoding so the numeric value is the same
//! one an ioctl-based client of the `fs_info` device would pass.

use crate::RECORD_SIZE;

/// Magic number shared by every fsinfo command.
pub const FS_INFO_MAGIC: u8 = b'f';

const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = 8;
const IOC_SIZESHIFT: u32 = 16;
const IOC_DIRSHIFT: u32 = 30;
const IOC_SIZEMASK: u32 = (1 << 14) - 1;
const IOC_READ: u32 = 2;

/// Encode a read-direction selector, as `_IOR(ty, nr, size)` does.
pub const fn ior(ty: u8, nr: u8, size: usize) -> u32 {
    (IOC_READ << IOC_DIRSHIFT)
        | (((size as u32) & IOC_SIZEMASK) << IOC_SIZESHIFT)
        | ((ty as u32) << IOC_TYPESHIFT)
        | ((nr as u32) << IOC_NRSHIFT)
}

/// Raw selector for "get filesystem info".
pub const GET_FS_INFO: u32 = ior(FS_INFO_MAGIC, 1, RECORD_SIZE);

/// The closed set of commands the channel understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetFsInfo,
}

impl Command {
    /// Map a raw selector to a command. `None` for anything unrecognized.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            GET_FS_INFO => Some(Command::GetFsInfo),
            _ => None,
        }
    }

    pub const fn raw(self) -> u32 {
        match self {
            Command::GetFsInfo => GET_FS_INFO,
        }
    }
}
