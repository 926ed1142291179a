//! Filesystem type classification.

use fsinfo_wire::FsName;

pub const EXT4_SUPER_MAGIC: u64 = 0xEF53;
pub const TMPFS_MAGIC: u64 = 0x0102_1994;
pub const NFS_SUPER_MAGIC: u64 = 0x6969;

/// The closed set of filesystem kinds the service names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsKind {
    Ext4,
    Tmpfs,
    Nfs,
    Unknown,
}

const KNOWN: &[(u64, FsKind)] = &[
    (EXT4_SUPER_MAGIC, FsKind::Ext4),
    (TMPFS_MAGIC, FsKind::Tmpfs),
    (NFS_SUPER_MAGIC, FsKind::Nfs),
];

impl FsKind {
    pub const fn label(self) -> &'static str {
        match self {
            FsKind::Ext4 => "ext4",
            FsKind::Tmpfs => "tmpfs",
            FsKind::Nfs => "nfs",
            FsKind::Unknown => "unknown",
        }
    }

    /// The label in its fixed-capacity wire form.
    pub fn fs_name(self) -> FsName {
        FsName::from(self.label())
    }
}

/// Map a raw `f_type` to its kind. Never fails; unmapped types are `Unknown`.
///
/// ```rust
/// use fsinfo_core::{classify, FsKind, TMPFS_MAGIC};
///
/// assert_eq!(classify(TMPFS_MAGIC), FsKind::Tmpfs);
/// assert_eq!(classify(0xdead_beef), FsKind::Unknown);
/// ```
pub fn classify(fs_type: u64) -> FsKind {
    KNOWN
        .iter()
        .find(|(magic, _)| *magic == fs_type)
        .map(|(_, kind)| *kind)
        .unwrap_or(FsKind::Unknown)
}
