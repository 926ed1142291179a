//! # fsinfo-sys
//!
//! The host's own filesystem, exposed through the `fsinfo-core` traits.
//!
//! - [`CanonicalResolver`] resolves paths with `realpath(3)` semantics
//!   (symlinks followed, missing components are an error).
//! - [`StatfsSource`] reads `statfs(2)` for the resolved path.
//!
//! ## Example
//!
//! ```rust,no_run
//! let handler = fsinfo_sys::host_handler();
//! let info = handler.query_bytes(b"/").unwrap();
//! println!("{} {} bytes free", info.fs_name, info.free);
//! ```

mod resolve;
mod statfs;

pub use resolve::CanonicalResolver;
pub use statfs::StatfsSource;

use fsinfo_core::QueryHandler;

/// A query handler wired to the running host.
pub type HostHandler = QueryHandler<CanonicalResolver, StatfsSource>;

pub fn host_handler() -> HostHandler {
    QueryHandler::new(CanonicalResolver, StatfsSource)
}
