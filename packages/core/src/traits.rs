//! Collaborator traits: path resolution and filesystem statistics.

use std::path::PathBuf;
use std::sync::Arc;

/// A live filesystem object reached by resolving a caller's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    /// The fully resolved path, symlinks followed.
    pub path: PathBuf,
}

impl Mount {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Raw numbers as the statistics primitive reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawStatistics {
    /// Filesystem type magic (`f_type`).
    pub fs_type: u64,
    /// Block size in bytes (`f_bsize`).
    pub block_size: u64,
    /// Total data blocks (`f_blocks`).
    pub total_blocks: u64,
    /// Free blocks (`f_bfree`).
    pub free_blocks: u64,
}

/// Map a caller-supplied path to a live mount, following symbolic links.
///
/// Implementations may block. They are called concurrently from many
/// threads and must not rely on per-call mutable state.
pub trait PathResolver: Send + Sync {
    /// `path` is the terminated copy's content: no NUL, at most the channel
    /// capacity minus one bytes.
    fn resolve(&self, path: &[u8]) -> std::io::Result<Mount>;
}

/// Read block counts for a resolved mount.
pub trait StatisticsSource: Send + Sync {
    fn statistics(&self, mount: &Mount) -> std::io::Result<RawStatistics>;
}

// Blanket implementations for references and shared pointers

impl<T: PathResolver + ?Sized> PathResolver for &T {
    fn resolve(&self, path: &[u8]) -> std::io::Result<Mount> {
        (**self).resolve(path)
    }
}

impl<T: PathResolver + ?Sized> PathResolver for Box<T> {
    fn resolve(&self, path: &[u8]) -> std::io::Result<Mount> {
        self.as_ref().resolve(path)
    }
}

impl<T: PathResolver + ?Sized> PathResolver for Arc<T> {
    fn resolve(&self, path: &[u8]) -> std::io::Result<Mount> {
        self.as_ref().resolve(path)
    }
}

impl<T: StatisticsSource + ?Sized> StatisticsSource for &T {
    fn statistics(&self, mount: &Mount) -> std::io::Result<RawStatistics> {
        (**self).statistics(mount)
    }
}

impl<T: StatisticsSource + ?Sized> StatisticsSource for Box<T> {
    fn statistics(&self, mount: &Mount) -> std::io::Result<RawStatistics> {
        self.as_ref().statistics(mount)
    }
}

impl<T: StatisticsSource + ?Sized> StatisticsSource for Arc<T> {
    fn statistics(&self, mount: &Mount) -> std::io::Result<RawStatistics> {
        self.as_ref().statistics(mount)
    }
}
