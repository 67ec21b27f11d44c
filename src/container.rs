//! Container: a verified, 64-byte aligned view over whole cache lines.
//!
//! `Container::validate` is the only admission point for raw bytes. Everything
//! downstream (`Unit`, the codec, the order engine) trusts the handle and does
//! no further checking.

use tracing::debug;
use zerocopy::{FromBytes, IntoBytes};

use crate::error::{ClcError, Result};
use crate::line::{CacheLine, LINE_SIZE};
use crate::unit::Unit;

/// Exclusive, non-owning view over `len / 64` cache lines.
#[derive(Debug)]
pub struct Container<'a> {
    lines: &'a mut [CacheLine],
}

impl<'a> Container<'a> {
    /// Verify `buffer` and reinterpret it as lines. No copy.
    ///
    /// Fails with `TooSmall` below one line, `Misaligned` when the base is not
    /// on a 64-byte boundary, and `RaggedLength` when the length is not a
    /// whole number of lines.
    pub fn validate(buffer: &'a mut [u8]) -> Result<Self> {
        let len = buffer.len();
        let base = buffer.as_ptr() as usize;

        if len < LINE_SIZE {
            debug!(len, base, "rejected buffer: too small");
            return Err(ClcError::TooSmall);
        }
        if base % LINE_SIZE != 0 {
            debug!(len, base, "rejected buffer: misaligned");
            return Err(ClcError::Misaligned);
        }
        if len % LINE_SIZE != 0 {
            debug!(len, base, "rejected buffer: ragged length");
            return Err(ClcError::RaggedLength);
        }

        let lines = <[CacheLine]>::mut_from_bytes(buffer).map_err(|_| ClcError::Misaligned)?;
        Ok(Self { lines })
    }

    /// As `validate`, with an absent buffer reported as `NullBuffer`.
    pub fn validate_opt(buffer: Option<&'a mut [u8]>) -> Result<Self> {
        match buffer {
            Some(buffer) => Self::validate(buffer),
            None => {
                debug!("rejected buffer: null");
                Err(ClcError::NullBuffer)
            }
        }
    }

    /// As `validate`, for memory handed over as a pointer (mmap, FFI, shared memory).
    ///
    /// # Safety
    ///
    /// When `ptr` is non-null it must be valid for reads and writes of `len`
    /// bytes for `'a`, and nothing else may access that memory while the
    /// returned `Container` is alive.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Result<Self> {
        if ptr.is_null() {
            debug!(len, "rejected buffer: null");
            return Err(ClcError::NullBuffer);
        }
        // SAFETY: non-null, and the caller guarantees validity and exclusivity.
        let buffer = unsafe { core::slice::from_raw_parts_mut(ptr, len) };
        Self::validate(buffer)
    }

    /// Lines are aligned by type; only emptiness can fail.
    pub fn from_lines(lines: &'a mut [CacheLine]) -> Result<Self> {
        if lines.is_empty() {
            return Err(ClcError::TooSmall);
        }
        Ok(Self { lines })
    }

    /// Number of Units (one per line).
    #[inline(always)]
    pub fn units(&self) -> usize {
        self.lines.len()
    }

    /// The Unit at span `[n * 64, n * 64 + 64)`.
    #[inline]
    pub fn unit(&mut self, n: usize) -> Option<Unit<'_>> {
        self.lines.get_mut(n).map(Unit::new)
    }

    #[inline]
    pub fn units_mut(&mut self) -> impl Iterator<Item = Unit<'_>> {
        self.lines.iter_mut().map(Unit::new)
    }

    /// Read-only access to a line, e.g. for dumping.
    #[inline]
    pub fn line(&self, n: usize) -> Option<&CacheLine> {
        self.lines.get(n)
    }

    #[inline(always)]
    pub fn base_addr(&self) -> usize {
        self.lines.as_ptr() as usize
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        self.lines.as_bytes()
    }

    /// `init` every Unit.
    pub fn init_all(&mut self) {
        for line in self.lines.iter_mut() {
            line.init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::AlignedLines;

    #[test]
    fn test_validate_accepts_whole_lines() {
        let mut buf = AlignedLines::<4>::new();
        let c = Container::validate(buf.bytes_mut()).unwrap();
        assert_eq!(c.units(), 4);
        assert_eq!(c.base_addr() % LINE_SIZE, 0);
        assert_eq!(c.as_bytes().len(), 256);
    }

    #[test]
    fn test_validate_accepts_aligned_subslice() {
        let mut buf = AlignedLines::<4>::new();
        let c = Container::validate(&mut buf.bytes_mut()[64..192]).unwrap();
        assert_eq!(c.units(), 2);
    }

    #[test]
    fn test_validate_rejects_short() {
        let mut buf = AlignedLines::<1>::new();
        assert_eq!(
            Container::validate(&mut buf.bytes_mut()[..63]).unwrap_err(),
            ClcError::TooSmall
        );
        assert_eq!(
            Container::validate(&mut buf.bytes_mut()[..0]).unwrap_err(),
            ClcError::TooSmall
        );
    }

    #[test]
    fn test_validate_rejects_misaligned() {
        let mut buf = AlignedLines::<2>::new();
        assert_eq!(
            Container::validate(&mut buf.bytes_mut()[8..72]).unwrap_err(),
            ClcError::Misaligned
        );
    }

    #[test]
    fn test_validate_rejects_ragged() {
        let mut buf = AlignedLines::<2>::new();
        assert_eq!(
            Container::validate(&mut buf.bytes_mut()[..100]).unwrap_err(),
            ClcError::RaggedLength
        );
    }

    #[test]
    fn test_validate_null() {
        assert_eq!(
            Container::validate_opt(None).unwrap_err(),
            ClcError::NullBuffer
        );
        let res = unsafe { Container::from_raw_parts(core::ptr::null_mut(), 64) };
        assert_eq!(res.unwrap_err(), ClcError::NullBuffer);

        let mut buf = AlignedLines::<1>::new();
        let bytes = buf.bytes_mut();
        let res = unsafe { Container::from_raw_parts(bytes.as_mut_ptr(), bytes.len()) };
        assert_eq!(res.unwrap().units(), 1);
    }

    #[test]
    fn test_from_lines() {
        let mut lines = [CacheLine::new(); 3];
        assert_eq!(Container::from_lines(&mut lines).unwrap().units(), 3);
        assert_eq!(
            Container::from_lines(&mut []).unwrap_err(),
            ClcError::TooSmall
        );
    }

    #[test]
    fn test_unit_addressing() {
        let mut buf = AlignedLines::<4>::filled(0xAA);
        let mut c = Container::validate(buf.bytes_mut()).unwrap();
        assert!(c.unit(4).is_none());

        let mut u = c.unit(2).unwrap();
        u.init();
        u.put(0xABCD).unwrap();

        let bytes = c.as_bytes();
        assert!(bytes[..128].iter().all(|&b| b == 0xAA));
        assert_eq!(bytes[128], 1);
        assert_eq!(&bytes[136..144], &0xABCDu64.to_le_bytes());
        assert!(bytes[192..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_init_all() {
        let mut buf = AlignedLines::<3>::filled(0x11);
        let mut c = Container::validate(buf.bytes_mut()).unwrap();
        c.init_all();
        for mut u in c.units_mut() {
            assert_eq!(u.len(), 0);
            assert!(u.put(1).is_ok());
        }
        assert_eq!(c.line(1).unwrap().length(), 1);
    }
}
