//! Path resolution against the real filesystem.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use fsinfo_core::{Mount, PathResolver};

/// Resolves paths with `std::fs::canonicalize`.
///
/// Relative paths resolve against the working directory of the process
/// running the handler, not the caller's.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalResolver;

impl PathResolver for CanonicalResolver {
    fn resolve(&self, path: &[u8]) -> io::Result<Mount> {
        if path.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "empty path"));
        }
        let path = Path::new(OsStr::from_bytes(path));
        std::fs::canonicalize(path).map(Mount::new)
    }
}
