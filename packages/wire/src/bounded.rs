//! Fixed-capacity, always-terminated byte strings.

use std::borrow::Cow;
use std::fmt;

/// A byte string stored in exactly `N` bytes.
///
/// The last byte of the buffer is always NUL, so at most `N - 1` bytes of
/// content are kept. Construction never fails: longer input is cut at the
/// capacity, and input containing a NUL ends at that NUL, the same way a C
/// reader of the buffer would see it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundedStr<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> BoundedStr<N> {
    /// Total size of the buffer, terminator included.
    pub const CAPACITY: usize = N;

    /// An all-zero buffer.
    pub const fn empty() -> Self {
        Self { buf: [0; N] }
    }

    /// Copy `src` in, truncating at `N - 1` bytes or at the first NUL.
    ///
    /// ```rust
    /// use fsinfo_wire::BoundedStr;
    ///
    /// let s = BoundedStr::<4>::truncating(b"abcdef");
    /// assert_eq!(s.as_bytes(), b"abc");
    ///
    /// let s = BoundedStr::<16>::truncating(b"ab\0cd");
    /// assert_eq!(s.as_bytes(), b"ab");
    /// ```
    pub fn truncating(src: &[u8]) -> Self {
        let mut buf = [0u8; N];
        let limit = src.len().min(N.saturating_sub(1));
        let len = src[..limit]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(limit);
        buf[..len].copy_from_slice(&src[..len]);
        Self { buf }
    }

    /// Take a raw caller buffer, forcing termination.
    ///
    /// Bytes after the first NUL are discarded so two buffers that read the
    /// same compare equal.
    pub fn from_raw(raw: &[u8; N]) -> Self {
        Self::truncating(raw)
    }

    /// Content bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.buf.iter().position(|&b| b == 0).unwrap_or(N);
        &self.buf[..len]
    }

    /// The full backing buffer, terminator and padding included.
    pub fn as_raw(&self) -> &[u8; N] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl<const N: usize> Default for BoundedStr<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> fmt::Debug for BoundedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedStr<{}>({:?})", N, self.to_string_lossy())
    }
}

impl<const N: usize> fmt::Display for BoundedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_string_lossy())
    }
}

impl<const N: usize> From<&str> for BoundedStr<N> {
    fn from(s: &str) -> Self {
        Self::truncating(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_kept_whole() {
        let s = BoundedStr::<32>::from("tmpfs");
        assert_eq!(s.as_bytes(), b"tmpfs");
        assert_eq!(s.len(), 5);
        assert_eq!(s.as_raw()[5..], [0u8; 27]);
    }

    #[test]
    fn overlong_path_truncates_to_capacity_minus_one() {
        let long = "a".repeat(300);
        let s = BoundedStr::<256>::truncating(long.as_bytes());
        assert_eq!(s.len(), 255);
        assert_eq!(s.as_raw()[255], 0);
    }

    #[test]
    fn unterminated_raw_buffer_gets_terminated() {
        let raw = [b'x'; 8];
        let s = BoundedStr::<8>::from_raw(&raw);
        assert_eq!(s.as_bytes(), b"xxxxxxx");
        assert_eq!(s.as_raw()[7], 0);
    }

    #[test]
    fn garbage_after_terminator_is_dropped() {
        let mut raw = [0u8; 8];
        raw[..2].copy_from_slice(b"/a");
        raw[3..].copy_from_slice(b"junk\0");
        let s = BoundedStr::<8>::from_raw(&raw);
        assert_eq!(s, BoundedStr::<8>::from("/a"));
    }

    #[test]
    fn zero_capacity_is_always_empty() {
        let s = BoundedStr::<0>::truncating(b"anything");
        assert!(s.is_empty());
        assert_eq!(s.as_raw().len(), 0);
    }

    #[test]
    fn debug_shows_content() {
        let s = BoundedStr::<16>::from("nfs");
        assert_eq!(format!("{:?}", s), "BoundedStr<16>(\"nfs\")");
        assert_eq!(s.to_string(), "nfs");
    }

    mod proptests {
        use crate::BoundedStr;
        use proptest::prelude::*;

        proptest! {
            /// Whatever the caller sends, the copy is terminated and within capacity.
            #[test]
            fn prop_always_terminated(src in proptest::collection::vec(any::<u8>(), 0..600)) {
                let s = BoundedStr::<256>::truncating(&src);
                prop_assert!(s.len() <= 255);
                prop_assert_eq!(s.as_raw()[255], 0);
                prop_assert!(!s.as_bytes().contains(&0));
                prop_assert!(src.starts_with(s.as_bytes()));
            }

            /// Truncation is deterministic.
            #[test]
            fn prop_truncation_is_deterministic(src in proptest::collection::vec(any::<u8>(), 0..600)) {
                prop_assert_eq!(BoundedStr::<64>::truncating(&src), BoundedStr::<64>::truncating(&src));
            }
        }
    }
}
