//! In-memory host for tests.
//!
//! [`FakeHost`] acts as both the path resolver and the statistics source
//! over a small table of mounts and symlinks, and remembers every path it
//! was asked to resolve.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::sync::Mutex;

use crate::{Mount, PathResolver, RawStatistics, StatisticsSource};

const MAX_LINK_HOPS: usize = 40;

#[derive(Default)]
pub struct FakeHost {
    mounts: BTreeMap<Vec<u8>, RawStatistics>,
    unreadable: BTreeSet<Vec<u8>>,
    links: BTreeMap<Vec<u8>, Vec<u8>>,
    resolved: Mutex<Vec<Vec<u8>>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mount(mut self, path: &str, stats: RawStatistics) -> Self {
        self.mounts.insert(path.as_bytes().to_vec(), stats);
        self
    }

    /// A path that resolves but whose statistics cannot be read.
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(path.as_bytes().to_vec());
        self
    }

    pub fn with_link(mut self, from: &str, to: &str) -> Self {
        self.links
            .insert(from.as_bytes().to_vec(), to.as_bytes().to_vec());
        self
    }

    /// Every path passed to `resolve`, in call order.
    pub fn resolved(&self) -> Vec<Vec<u8>> {
        self.resolved
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl PathResolver for FakeHost {
    fn resolve(&self, path: &[u8]) -> io::Result<Mount> {
        if let Ok(mut seen) = self.resolved.lock() {
            seen.push(path.to_vec());
        }

        let mut current = path.to_vec();
        for _ in 0..MAX_LINK_HOPS {
            match self.links.get(&current) {
                Some(target) => current = target.clone(),
                None => {
                    if self.mounts.contains_key(&current) || self.unreadable.contains(&current) {
                        let os = std::ffi::OsStr::from_bytes(&current);
                        return Ok(Mount::new(os));
                    }
                    return Err(io::Error::from(io::ErrorKind::NotFound));
                }
            }
        }
        Err(io::Error::other("too many levels of symbolic links"))
    }
}

impl StatisticsSource for FakeHost {
    fn statistics(&self, mount: &Mount) -> io::Result<RawStatistics> {
        let key = mount.path.as_os_str().as_bytes();
        if self.unreadable.contains(key) {
            return Err(io::Error::other("statfs failed"));
        }
        self.mounts
            .get(key)
            .copied()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_loops_fail() {
        let host = FakeHost::new().with_link("/a", "/b").with_link("/b", "/a");
        assert!(host.resolve(b"/a").is_err());
    }

    #[test]
    fn resolve_records_calls() {
        let host = FakeHost::new();
        let _ = host.resolve(b"/x");
        let _ = host.resolve(b"/y");
        assert_eq!(host.resolved(), vec![b"/x".to_vec(), b"/y".to_vec()]);
    }
}
