//! CacheLine: 64-byte aligned POD. One Unit lives in exactly one line.
//!
//! ```text
//! +00      c-meta      len:3 | ext:3 | lock:1 | rsvd:1
//! +01..07  r-meta[0..6] order:3 | ext:3 | dirty:1 | rsvd:1
//! +08..63  record[0..6] u64, little-endian
//! ```
//!
//! The codec (`meta`), record store (`record`) and order engine (`systolic`)
//! are all `impl CacheLine` blocks; none of them check ranges in release
//! builds. A `CacheLine` reached through a `Container` is trusted.

pub mod meta;
pub mod record;
pub mod systolic;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

pub use meta::{
    C_EXT, C_LEN, C_LOCK, IDENTITY_ORDER, META_BYTES, ORDER_FIELDS, R_DIRTY, R_EXT, R_IDX,
};
pub use systolic::{Rotation, Shift, PROMOTE_LAST, SHIFT_DOWN, SHIFT_UP};

/// Bytes per line. Also the required alignment of every `Container`.
pub const LINE_SIZE: usize = 64;

/// Data records per Unit.
pub const UNIT_RECORDS: usize = 7;

/// Largest legal pivot for the order engine.
pub const MAX_PIVOT: u8 = 7;

/// One cache line. Fits in L1.
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C, align(64))]
pub struct CacheLine {
    bytes: [u8; LINE_SIZE],
}

const _: () = {
    assert!(core::mem::size_of::<CacheLine>() == LINE_SIZE);
    assert!(core::mem::align_of::<CacheLine>() == LINE_SIZE);
    assert!(META_BYTES + UNIT_RECORDS * 8 == LINE_SIZE);
};

impl CacheLine {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; LINE_SIZE],
        }
    }

    #[inline(always)]
    pub const fn from_bytes(bytes: [u8; LINE_SIZE]) -> Self {
        Self { bytes }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; LINE_SIZE] {
        &self.bytes
    }

    #[inline(always)]
    pub fn as_bytes_mut(&mut self) -> &mut [u8; LINE_SIZE] {
        &mut self.bytes
    }

    #[inline(always)]
    pub fn zero(&mut self) {
        self.bytes = [0u8; LINE_SIZE];
    }
}

impl Default for CacheLine {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for CacheLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CacheLine")
            .field("len", &self.length())
            .field("meta", &format_args!("{:#018x}", self.meta_word()))
            .finish_non_exhaustive()
    }
}

/// `N` contiguous, 64-byte aligned lines. A ready-made backing store for a `Container`.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub struct AlignedLines<const N: usize> {
    lines: [CacheLine; N],
}

impl<const N: usize> AlignedLines<N> {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            lines: [CacheLine::new(); N],
        }
    }

    /// Every byte set to `fill`. Handy for proving that `init` really clears.
    #[inline]
    pub const fn filled(fill: u8) -> Self {
        Self {
            lines: [CacheLine::from_bytes([fill; LINE_SIZE]); N],
        }
    }

    #[inline(always)]
    pub fn bytes(&self) -> &[u8] {
        self.lines.as_bytes()
    }

    #[inline(always)]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.lines.as_mut_bytes()
    }
}

impl<const N: usize> Default for AlignedLines<N> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::FromBytes;

    #[test]
    fn test_line_size_and_alignment() {
        assert_eq!(core::mem::size_of::<CacheLine>(), 64);
        assert_eq!(core::mem::align_of::<CacheLine>(), 64);
        assert_eq!(core::mem::size_of::<AlignedLines<4>>(), 256);
        assert_eq!(core::mem::align_of::<AlignedLines<4>>(), 64);
    }

    #[test]
    fn test_aligned_lines_base_is_aligned() {
        let buf = AlignedLines::<3>::new();
        assert_eq!(buf.bytes().as_ptr() as usize % LINE_SIZE, 0);
        assert_eq!(buf.bytes().len(), 3 * LINE_SIZE);
    }

    #[test]
    fn test_filled_and_zero() {
        let mut buf = AlignedLines::<1>::filled(0xA);
        assert!(buf.bytes().iter().all(|&b| b == 0xA));

        let line = CacheLine::mut_from_bytes(buf.bytes_mut()).unwrap();
        line.zero();
        assert_eq!(line.as_bytes(), &[0u8; LINE_SIZE]);
    }
}
