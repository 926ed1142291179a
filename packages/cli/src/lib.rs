//! # fsinfo-cli
//!
//! Client side of the fsinfo control channel: a blocking [`Client`] and the
//! fixed-width row format printed by the `fsinfo` binary.

mod client;
mod error;
pub mod format;

pub use client::Client;
pub use error::ClientError;
pub use format::Units;

use std::io::{self, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Query every path in turn and print a row for each.
///
/// The header goes to `out` first. A path that fails gets a diagnostic on
/// `err` and the rest are still queried. Relative paths are made absolute
/// here, since the service resolves them against its own working
/// directory. Returns how many paths failed.
pub fn report<T, P>(
    client: &mut Client<T>,
    paths: &[P],
    units: Units,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<usize>
where
    T: Read + Write,
    P: AsRef<Path>,
{
    writeln!(out, "{}", format::header())?;

    let mut failures = 0;
    for path in paths {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        match client.get_fs_info(absolute.as_os_str().as_bytes()) {
            Ok(record) => {
                let line = format::row(&path.to_string_lossy(), &record, units);
                writeln!(out, "{}", line)?;
            }
            Err(e) => {
                failures += 1;
                writeln!(
                    err,
                    "Failed to get filesystem info for {}: {}",
                    path.display(),
                    e
                )?;
            }
        }
    }
    Ok(failures)
}
