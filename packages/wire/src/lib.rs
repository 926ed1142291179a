//! fsinfo-wire: the fixed-size record layer
//!
//! This is the narrow waist of the fsinfo stack. Everything at this level is
//! fixed-size bytes - no path resolution, no statistics, no formatting.
//!
//! Use this layer for:
//! - Copying requests in from (and responses out to) caller-owned memory
//! - Framing records on the control channel socket
//! - Decoding responses in the client
//!
//! The record layout matches the classic `struct fs_info` used with the
//! `fs_info` character device:
//!
//! ```text
//! offset  size       field
//! 0       32         fs_name   (output, NUL padded)
//! 32      8          total     (output, native endian)
//! 40      8          free      (output, native endian)
//! 48      8          used      (output, native endian)
//! 56      PATH_MAX   path      (input, not trusted to be terminated)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fsinfo_wire::{FsInfoRecord, RECORD_SIZE};
//!
//! let request = FsInfoRecord::request(b"/var/lib");
//! let raw: [u8; RECORD_SIZE] = request.encode();
//!
//! let decoded = FsInfoRecord::decode(&raw);
//! assert_eq!(decoded.path.as_bytes(), b"/var/lib");
//! ```

pub use bytes::Bytes;

mod bounded;
mod command;
pub mod endpoint;
mod error;
mod frame;
mod memory;
mod record;
mod status;

pub use bounded::BoundedStr;
pub use command::{ior, Command, FS_INFO_MAGIC, GET_FS_INFO};
pub use error::WireError;
pub use frame::{RequestFrame, ResponseFrame, REQUEST_FRAME_SIZE, RESPONSE_FRAME_SIZE};
pub use memory::{CallerMemory, UserBuffer};
pub use record::{
    FsInfoRecord, FsName, RequestPath, FS_NAME_CAPACITY, PATH_CAPACITY, RECORD_SIZE,
};
pub use status::Status;
