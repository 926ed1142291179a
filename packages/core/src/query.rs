//! The query handler.

use fsinfo_wire::{BoundedStr, FsInfoRecord, FsName, RequestPath};

use crate::{classify, PathResolver, QueryError, RawStatistics, StatisticsSource};

/// Capacity figures for one filesystem, in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsInfo {
    pub fs_name: FsName,
    pub total: u64,
    pub free: u64,
    pub used: u64,
}

impl FsInfo {
    /// Turn block counts into byte counts and classify the type.
    ///
    /// `used` is always derived as `total - free`. `free <= total` is taken
    /// on trust from the statistics source; products saturate at `u64::MAX`
    /// rather than wrapping.
    ///
    /// `used + free == total` holds only when the source reports
    /// `free <= total`. Otherwise `used` clamps to zero and `free` is passed
    /// through as reported.
    pub fn from_statistics(raw: &RawStatistics) -> Self {
        let total = raw.total_blocks.saturating_mul(raw.block_size);
        let free = raw.free_blocks.saturating_mul(raw.block_size);
        Self {
            fs_name: classify(raw.fs_type).fs_name(),
            total,
            free,
            used: total.saturating_sub(free),
        }
    }

    /// The response record for a request on `path`.
    pub fn to_record(&self, path: &RequestPath) -> FsInfoRecord {
        FsInfoRecord {
            fs_name: self.fs_name,
            total: self.total,
            free: self.free,
            used: self.used,
            path: *path,
        }
    }

    pub fn from_record(record: &FsInfoRecord) -> Self {
        Self {
            fs_name: record.fs_name,
            total: record.total,
            free: record.free,
            used: record.used,
        }
    }
}

/// Resolves a path, reads its statistics and builds the response.
///
/// Holds no per-call state: one handler serves any number of concurrent
/// queries through `&self`.
pub struct QueryHandler<R, S> {
    resolver: R,
    source: S,
}

impl<R: PathResolver, S: StatisticsSource> QueryHandler<R, S> {
    pub fn new(resolver: R, source: S) -> Self {
        Self { resolver, source }
    }

    /// Query a path already held in a terminated, fixed-capacity buffer.
    pub fn query<const N: usize>(&self, path: &BoundedStr<N>) -> Result<FsInfo, QueryError> {
        let shown = path.to_string_lossy();

        let mount = self.resolver.resolve(path.as_bytes()).map_err(|source| {
            log::error!("failed to resolve path {}: {}", shown, source);
            QueryError::NotFound {
                path: shown.to_string(),
                source,
            }
        })?;

        let raw = self.source.statistics(&mount).map_err(|source| {
            log::error!("failed to get filesystem stats for {}: {}", shown, source);
            QueryError::StatisticsUnavailable {
                path: shown.to_string(),
                source,
            }
        })?;

        let info = FsInfo::from_statistics(&raw);
        log::debug!(
            "{} -> {} total={} free={}",
            shown,
            info.fs_name,
            info.total,
            info.free
        );
        Ok(info)
    }

    /// Query raw caller bytes, truncating them to the request capacity first.
    pub fn query_bytes(&self, path: &[u8]) -> Result<FsInfo, QueryError> {
        self.query(&RequestPath::truncating(path))
    }
}
