//! Record store. Seven u64 payload words at fixed offsets `(slot + 1) * 8`.

use super::meta::META_BYTES;
use super::{CacheLine, LINE_SIZE, UNIT_RECORDS};

/// Byte offset of record `slot` from the line base.
#[inline(always)]
pub const fn record_offset(slot: u8) -> usize {
    (slot as usize + 1) << 3
}

impl CacheLine {
    /// The 64-bit word at byte offset `xof` (0, 8, .., 56). Offset 0 is the meta word.
    #[inline(always)]
    pub fn word_at(&self, xof: usize) -> u64 {
        debug_assert!(xof % 8 == 0 && xof < LINE_SIZE, "bad word offset {xof}");
        let xof = xof & (LINE_SIZE - 8);
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.bytes[xof..xof + 8]);
        u64::from_le_bytes(word)
    }

    #[inline(always)]
    pub fn record(&self, slot: u8) -> u64 {
        debug_assert!((slot as usize) < UNIT_RECORDS, "slot {slot} out of range");
        self.word_at(record_offset(slot))
    }

    #[inline(always)]
    pub fn set_record(&mut self, slot: u8, value: u64) {
        debug_assert!((slot as usize) < UNIT_RECORDS, "slot {slot} out of range");
        let xof = record_offset(slot) & (LINE_SIZE - 8);
        self.bytes[xof..xof + 8].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn clear_records(&mut self) {
        self.bytes[META_BYTES..].fill(0);
    }
}
