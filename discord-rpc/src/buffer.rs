//! Encoded-string buffers handed to the native library by address.
//!
//! Every non-empty string in a presence record is copied into its own
//! NUL-terminated UTF-8 heap buffer owned by a [`BufferSet`]. The native side
//! only ever sees the raw address; the set keeps the bytes alive until
//! [`BufferSet::release_all`] (or drop) frees them.

use std::ffi::{CString, c_char};
use std::ptr;

use crate::error::Result;
use crate::ffi::to_c_string;

/// Lifetime allocation counters for a [`BufferSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferStats {
    /// Buffers allocated over the life of the set.
    pub allocated: u64,
    /// Buffers released over the life of the set.
    pub released: u64,
}

impl BufferStats {
    /// Buffers currently alive (`allocated - released`).
    #[must_use]
    pub const fn live(self) -> u64 {
        self.allocated - self.released
    }
}

/// The group of encoded-string allocations backing one native record.
///
/// Buffers are freed exactly once: either by [`release_all`](Self::release_all)
/// or when the set is dropped.
#[derive(Debug, Default)]
pub struct BufferSet {
    buffers: Vec<CString>,
    stats: BufferStats,
}

impl BufferSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `text` into a new NUL-terminated buffer owned by this set.
    ///
    /// Returns a null pointer for `None` or an empty string, which the native
    /// library reads as "field omitted". The returned address stays valid
    /// until the next [`release_all`](Self::release_all) or drop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `text` contains an interior NUL byte.
    pub fn allocate(&mut self, text: Option<&str>) -> Result<*const c_char> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(ptr::null());
        };
        let buf = to_c_string(text)?;
        // The heap bytes do not move when the `CString` itself is moved.
        let addr = buf.as_ptr();
        self.buffers.push(buf);
        self.stats.allocated += 1;
        Ok(addr)
    }

    /// Free every buffer in the set. A no-op on an empty set.
    pub fn release_all(&mut self) {
        if self.buffers.is_empty() {
            return;
        }
        let n = self.buffers.len();
        self.buffers.clear();
        self.stats.released += n as u64;
        tracing::trace!(released = n, "released presence buffers");
    }

    /// Number of live buffers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the set holds no live buffers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Lifetime allocation counters.
    #[must_use]
    pub const fn stats(&self) -> BufferStats {
        self.stats
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use std::ffi::CStr;

    use proptest::prelude::*;

    use super::*;

    /// Bytes at `addr` up to and including the terminator.
    fn raw_bytes(addr: *const c_char, len: usize) -> Vec<u8> {
        unsafe { std::slice::from_raw_parts(addr.cast::<u8>(), len + 1) }.to_vec()
    }

    #[test]
    fn absent_and_empty_yield_null() {
        let mut set = BufferSet::new();
        assert!(set.allocate(None).unwrap().is_null());
        assert!(set.allocate(Some("")).unwrap().is_null());
        assert!(set.is_empty());
        assert_eq!(set.stats().allocated, 0);
    }

    #[test]
    fn multibyte_text_is_utf8_encoded() {
        let mut set = BufferSet::new();
        let text = "Ünïcødé ✓";
        let addr = set.allocate(Some(text)).unwrap();
        let bytes = raw_bytes(addr, text.len());
        assert_eq!(&bytes[..text.len()], text.as_bytes());
        assert_eq!(bytes[text.len()], 0);
        assert_eq!(unsafe { CStr::from_ptr(addr) }.to_str().unwrap(), text);
    }

    #[test]
    fn interior_nul_is_rejected_without_allocating() {
        let mut set = BufferSet::new();
        assert!(set.allocate(Some("in\0side")).is_err());
        assert!(set.is_empty());
        assert_eq!(set.stats(), BufferStats::default());
    }

    #[test]
    fn release_is_idempotent() {
        let mut set = BufferSet::new();
        set.allocate(Some("a")).unwrap();
        set.allocate(Some("b")).unwrap();
        set.release_all();
        set.release_all();
        assert!(set.is_empty());
        assert_eq!(
            set.stats(),
            BufferStats {
                allocated: 2,
                released: 2
            }
        );
    }

    #[test]
    fn addresses_survive_growth() {
        let mut set = BufferSet::new();
        let first = set.allocate(Some("first")).unwrap();
        for i in 0..64 {
            set.allocate(Some(&format!("filler-{i}"))).unwrap();
        }
        assert_eq!(unsafe { CStr::from_ptr(first) }.to_bytes(), b"first");
    }

    proptest! {
        #[test]
        fn encoded_bytes_are_utf8_plus_terminator(s in "[^\\x00]{1,200}") {
            let mut set = BufferSet::new();
            let addr = set.allocate(Some(&s)).unwrap();
            prop_assert!(!addr.is_null());
            let bytes = raw_bytes(addr, s.len());
            prop_assert_eq!(&bytes[..s.len()], s.as_bytes());
            prop_assert_eq!(bytes[s.len()], 0);
        }
    }
}
