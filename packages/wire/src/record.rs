//! The fixed-size request/response record.

use bytes::{Buf, BufMut};

use crate::BoundedStr;

/// Capacity of the filesystem label field.
pub const FS_NAME_CAPACITY: usize = 32;

/// Capacity of the path field (`PATH_MAX` on Linux).
pub const PATH_CAPACITY: usize = 4096;

/// Size of one encoded record.
pub const RECORD_SIZE: usize = FS_NAME_CAPACITY + 3 * std::mem::size_of::<u64>() + PATH_CAPACITY;

pub type FsName = BoundedStr<FS_NAME_CAPACITY>;
pub type RequestPath = BoundedStr<PATH_CAPACITY>;

/// One record as it crosses the channel.
///
/// The same layout serves as request and response. On the way in only
/// `path` is meaningful; on the way out every field is filled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FsInfoRecord {
    pub fs_name: FsName,
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub path: RequestPath,
}

impl FsInfoRecord {
    /// A request for `path`. Output fields are zeroed.
    pub fn request(path: &[u8]) -> Self {
        Self {
            path: RequestPath::truncating(path),
            ..Self::default()
        }
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut raw = [0u8; RECORD_SIZE];
        self.encode_into(&mut raw);
        raw
    }

    pub fn encode_into(&self, raw: &mut [u8; RECORD_SIZE]) {
        let mut out = &mut raw[..];
        out.put_slice(self.fs_name.as_raw());
        out.put_u64_ne(self.total);
        out.put_u64_ne(self.free);
        out.put_u64_ne(self.used);
        out.put_slice(self.path.as_raw());
    }

    /// Decode a raw buffer. Total: any bit pattern decodes, and both string
    /// fields come out terminated.
    pub fn decode(raw: &[u8; RECORD_SIZE]) -> Self {
        let mut input = &raw[..];

        let mut fs_name = [0u8; FS_NAME_CAPACITY];
        input.copy_to_slice(&mut fs_name);
        let total = input.get_u64_ne();
        let free = input.get_u64_ne();
        let used = input.get_u64_ne();
        let mut path = [0u8; PATH_CAPACITY];
        input.copy_to_slice(&mut path);

        Self {
            fs_name: FsName::from_raw(&fs_name),
            total,
            free,
            used,
            path: RequestPath::from_raw(&path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_size_matches_c_layout() {
        assert_eq!(RECORD_SIZE, 4152);
    }

    #[test]
    fn fields_land_at_fixed_offsets() {
        let record = FsInfoRecord {
            fs_name: FsName::from("ext4"),
            total: 10,
            free: 4,
            used: 6,
            path: RequestPath::from("/home"),
        };
        let raw = record.encode();

        assert_eq!(&raw[..4], b"ext4");
        assert_eq!(raw[4], 0);
        assert_eq!(raw[32..40], 10u64.to_ne_bytes());
        assert_eq!(raw[40..48], 4u64.to_ne_bytes());
        assert_eq!(raw[48..56], 6u64.to_ne_bytes());
        assert_eq!(&raw[56..61], b"/home");
        assert_eq!(FsInfoRecord::decode(&raw), record);
    }

    #[test]
    fn decode_of_garbage_is_terminated() {
        let raw = [0xffu8; RECORD_SIZE];
        let record = FsInfoRecord::decode(&raw);
        assert_eq!(record.fs_name.len(), FS_NAME_CAPACITY - 1);
        assert_eq!(record.path.len(), PATH_CAPACITY - 1);
        assert_eq!(record.total, u64::MAX);
    }

    #[test]
    fn request_zeroes_outputs() {
        let record = FsInfoRecord::request(b"/tmp");
        assert!(record.fs_name.is_empty());
        assert_eq!((record.total, record.free, record.used), (0, 0, 0));
        assert_eq!(record.path.as_bytes(), b"/tmp");
    }
}
