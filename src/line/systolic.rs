//! Systolic shift: O(1) reordering of the seven order indices.
//!
//! The meta word is rewritten with one masked read-modify-write. Records never
//! move. Each table row (indexed by pivot 0..=7) holds:
//!
//! - `keep`: bytes left where they are. Always includes c-meta (byte 0).
//! - `run`:  contiguous r-meta bytes that move one byte.
//! - `wrap`: the single r-meta byte that moves `dist` bits the other way.
//!
//! Only the order sub-fields (bits 0..3 of each r-meta byte) travel. Dirty and
//! extension bits belong to the physical slot and stay put.

use super::meta::ORDER_FIELDS;
use super::{CacheLine, MAX_PIVOT};

/// Which way `run` travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// `run` moves toward the tail (higher slots); `wrap` lands below it.
    Up,
    /// `run` moves toward the head (lower slots); `wrap` lands above it.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub keep: u64,
    pub run: u64,
    pub wrap: u64,
    pub dist: u32,
    pub rotation: Rotation,
}

impl Shift {
    pub const IDENTITY: Shift = Shift::up(u64::MAX, 0, 0, 0);

    const fn up(keep: u64, run: u64, wrap: u64, dist: u32) -> Self {
        Self {
            keep,
            run,
            wrap,
            dist,
            rotation: Rotation::Up,
        }
    }

    const fn down(keep: u64, run: u64, wrap: u64, dist: u32) -> Self {
        Self {
            keep,
            run,
            wrap,
            dist,
            rotation: Rotation::Down,
        }
    }

    #[inline(always)]
    pub const fn apply(&self, word: u64) -> u64 {
        let moved = match self.rotation {
            Rotation::Up => ((word & self.run) << 8) | ((word & self.wrap) >> self.dist),
            Rotation::Down => ((word & self.run) >> 8) | ((word & self.wrap) << self.dist),
        };
        (word & (self.keep | !ORDER_FIELDS)) | (moved & ORDER_FIELDS)
    }
}

/// Slots `0..pivot` move one toward the tail; slot `pivot` wraps to slot 0.
/// Pivots 0 and 7 are identities.
pub static SHIFT_UP: [Shift; 8] = [
    Shift::up(0xffff_ffff_ffff_00ff, 0x0000_0000_0000_0000, 0x0000_0000_0000_ff00, 0),
    Shift::up(0xffff_ffff_ff00_00ff, 0x0000_0000_0000_ff00, 0x0000_0000_00ff_0000, 8),
    Shift::up(0xffff_ffff_0000_00ff, 0x0000_0000_00ff_ff00, 0x0000_0000_ff00_0000, 16),
    Shift::up(0xffff_ff00_0000_00ff, 0x0000_0000_ffff_ff00, 0x0000_00ff_0000_0000, 24),
    Shift::up(0xffff_0000_0000_00ff, 0x0000_00ff_ffff_ff00, 0x0000_ff00_0000_0000, 32),
    Shift::up(0xff00_0000_0000_00ff, 0x0000_ffff_ffff_ff00, 0x00ff_0000_0000_0000, 40),
    Shift::up(0x0000_0000_0000_00ff, 0x00ff_ffff_ffff_ff00, 0xff00_0000_0000_0000, 48),
    Shift::IDENTITY,
];

/// Slots `pivot+1..=6` move one toward the head; slot `pivot` wraps to slot 6.
/// Pivots 6 and 7 are identities.
pub static SHIFT_DOWN: [Shift; 8] = [
    Shift::down(0x0000_0000_0000_00ff, 0xffff_ffff_ffff_0000, 0x0000_0000_0000_ff00, 48),
    Shift::down(0x0000_0000_0000_ffff, 0xffff_ffff_ff00_0000, 0x0000_0000_00ff_0000, 40),
    Shift::down(0x0000_0000_00ff_ffff, 0xffff_ffff_0000_0000, 0x0000_0000_ff00_0000, 32),
    Shift::down(0x0000_0000_ffff_ffff, 0xffff_ff00_0000_0000, 0x0000_00ff_0000_0000, 24),
    Shift::down(0x0000_00ff_ffff_ffff, 0xffff_0000_0000_0000, 0x0000_ff00_0000_0000, 16),
    Shift::down(0x0000_ffff_ffff_ffff, 0xff00_0000_0000_0000, 0x00ff_0000_0000_0000, 8),
    Shift::down(0x00ff_ffff_ffff_ffff, 0x0000_0000_0000_0000, 0xff00_0000_0000_0000, 0),
    Shift::IDENTITY,
];

/// Slot 6 moves into slot `pivot`; slots `pivot..=5` move one toward the tail.
/// Pivots 6 and 7 are identities.
pub static PROMOTE_LAST: [Shift; 8] = [
    Shift::up(0x0000_0000_0000_00ff, 0x00ff_ffff_ffff_ff00, 0xff00_0000_0000_0000, 48),
    Shift::up(0x0000_0000_0000_ffff, 0x00ff_ffff_ffff_0000, 0xff00_0000_0000_0000, 40),
    Shift::up(0x0000_0000_00ff_ffff, 0x00ff_ffff_ff00_0000, 0xff00_0000_0000_0000, 32),
    Shift::up(0x0000_0000_ffff_ffff, 0x00ff_ffff_0000_0000, 0xff00_0000_0000_0000, 24),
    Shift::up(0x0000_00ff_ffff_ffff, 0x00ff_ff00_0000_0000, 0xff00_0000_0000_0000, 16),
    Shift::up(0x0000_ffff_ffff_ffff, 0x00ff_0000_0000_0000, 0xff00_0000_0000_0000, 8),
    Shift::up(0x00ff_ffff_ffff_ffff, 0x0000_0000_0000_0000, 0xff00_0000_0000_0000, 0),
    Shift::IDENTITY,
];

impl CacheLine {
    #[inline(always)]
    pub fn shift_up(&mut self, pivot: u8) {
        self.systolic(&SHIFT_UP, pivot);
    }

    #[inline(always)]
    pub fn shift_down(&mut self, pivot: u8) {
        self.systolic(&SHIFT_DOWN, pivot);
    }

    #[inline(always)]
    pub fn promote_last(&mut self, pivot: u8) {
        self.systolic(&PROMOTE_LAST, pivot);
    }

    #[inline(always)]
    fn systolic(&mut self, table: &[Shift; 8], pivot: u8) {
        debug_assert!(pivot <= MAX_PIVOT, "pivot {pivot} out of range");
        let row = &table[(pivot & MAX_PIVOT) as usize];
        self.set_meta_word(row.apply(self.meta_word()));
    }
}
