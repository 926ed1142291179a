//! Fixed-width capacity rows.

use fsinfo_wire::FsInfoRecord;

const GIB: f64 = (1u64 << 30) as f64;

/// How sizes are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// GiB (2^30 bytes) with two decimals.
    #[default]
    Gibibytes,
    Bytes,
}

pub fn header() -> String {
    format!(
        "{:<30} {:<15} {:<15} {:<15} {:<15} {:<15} {:<15}",
        "Path", "Filesystem", "Total", "Used", "Free", "Use%", "1K-Blocks"
    )
}

/// Share of the filesystem in use, in percent. An empty filesystem is 0%.
pub fn use_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

/// One row for `record`, labelled with `path` as the user typed it.
pub fn row(path: &str, record: &FsInfoRecord, units: Units) -> String {
    let percent = use_percent(record.used, record.total);
    match units {
        Units::Gibibytes => format!(
            "{:<30} {:<15} {:<15.2} {:<15.2} {:<15.2} {:<15.2} {:<15.2}",
            path,
            record.fs_name,
            record.total as f64 / GIB,
            record.used as f64 / GIB,
            record.free as f64 / GIB,
            percent,
            record.total as f64 / 1024.0,
        ),
        Units::Bytes => format!(
            "{:<30} {:<15} {:<15} {:<15} {:<15} {:<15.2} {:<15}",
            path,
            record.fs_name,
            record.total,
            record.used,
            record.free,
            percent,
            record.total / 1024,
        ),
    }
}
