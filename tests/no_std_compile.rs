//! Compile-time test to ensure core functionality works without std.
//!
//! This test file is compiled with `--no-default-features` to verify
//! that the crate's core paths don't accidentally pull in std dependencies.

#![cfg(not(feature = "std"))]

use clc::line::{PROMOTE_LAST, SHIFT_UP};
use clc::{AlignedLines, CacheLine, ClcError, Container, Status, Unit};

#[test]
fn test_no_std_validate_and_put() {
    let mut buf = AlignedLines::<2>::new();
    let mut c = Container::validate(buf.bytes_mut()).unwrap();
    let mut u = c.unit(0).unwrap();
    u.init();
    assert!(u.put(7).is_ok());
    assert_eq!(u.len(), 1);
}

#[test]
fn test_no_std_order_engine() {
    let mut line = CacheLine::new();
    let mut u = Unit::new(&mut line);
    u.init();
    u.shift_up(6);
    u.promote_last(2);
    assert!(u.line().is_permutation());
    assert_eq!(SHIFT_UP[7].apply(u.line().meta_word()), u.line().meta_word());
    assert_eq!(PROMOTE_LAST[6].apply(u.line().meta_word()), u.line().meta_word());
}

#[test]
fn test_no_std_status() {
    assert_eq!(Status::from(ClcError::Misaligned), Status::ErrAlignment);
    assert!(Status::ErrNotImpl.is_error());
}

#[test]
fn test_no_std_dump_into_fixed_buffer() {
    struct Fixed {
        buf: [u8; 256],
        len: usize,
    }

    impl core::fmt::Write for Fixed {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let end = self.len + s.len();
            if end > self.buf.len() {
                return Err(core::fmt::Error);
            }
            self.buf[self.len..end].copy_from_slice(s.as_bytes());
            self.len = end;
            Ok(())
        }
    }

    let mut line = CacheLine::new();
    line.init();
    let mut out = Fixed { buf: [0u8; 256], len: 0 };
    line.dump_to(&mut out).unwrap();

    // 8 rows of "+OO | " (6) + 16 hex digits + newline.
    assert_eq!(out.len, 8 * 23);
    assert_eq!(&out.buf[..22], b"+00 | 0605040302010000");
}
