//! Filesystem statistics via `statfs(2)`.

use std::io;

use fsinfo_core::{Mount, RawStatistics, StatisticsSource};

/// Reads block counts and the filesystem magic with `statfs(2)`.
///
/// Only Linux reports `f_type`; elsewhere every call is `Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatfsSource;

#[cfg(target_os = "linux")]
impl StatisticsSource for StatfsSource {
    #[allow(clippy::unnecessary_cast)]
    fn statistics(&self, mount: &Mount) -> io::Result<RawStatistics> {
        let stat = nix::sys::statfs::statfs(mount.path.as_path()).map_err(io::Error::from)?;
        Ok(RawStatistics {
            fs_type: stat.filesystem_type().0 as u64,
            block_size: stat.block_size() as u64,
            total_blocks: stat.blocks() as u64,
            free_blocks: stat.blocks_free() as u64,
        })
    }
}

#[cfg(not(target_os = "linux"))]
impl StatisticsSource for StatfsSource {
    fn statistics(&self, mount: &Mount) -> io::Result<RawStatistics> {
        log::debug!("statfs unsupported on this target: {}", mount.path.display());
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}
