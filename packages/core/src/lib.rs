//! fsinfo-core: the query layer
//!
//! This layer gives meaning to the fixed-size records of `fsinfo-wire`:
//! - [`PathResolver`]: maps a caller's path to a live mount
//! - [`StatisticsSource`]: raw block counts for a mount
//! - [`classify`]: numeric filesystem type to a short label
//! - [`QueryHandler`]: ties the three together into one all-or-nothing query
//!
//! Resolution and statistics are traits so the handler can run against the
//! real host (see `fsinfo-sys`) or against in-memory doubles in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use fsinfo_core::QueryHandler;
//! use fsinfo_sys::{CanonicalResolver, StatfsSource};
//!
//! let handler = QueryHandler::new(CanonicalResolver, StatfsSource);
//! let info = handler.query_bytes(b"/")?;
//! assert_eq!(info.used, info.total - info.free);
//! ```

mod classify;
mod error;
mod query;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod fake;

pub use classify::{classify, FsKind, EXT4_SUPER_MAGIC, NFS_SUPER_MAGIC, TMPFS_MAGIC};
pub use error::QueryError;
pub use query::{FsInfo, QueryHandler};
pub use traits::{Mount, PathResolver, RawStatistics, StatisticsSource};

// Re-export the record types callers marshal with.
pub use fsinfo_wire::{BoundedStr, FsInfoRecord, FsName, RequestPath};
