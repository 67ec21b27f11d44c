//! Metadata codec. Bit-fields over bytes 0..8 of a line; no hidden state.

use super::{CacheLine, UNIT_RECORDS};

/// Meta bytes at the head of a line: one c-meta plus seven r-meta.
pub const META_BYTES: usize = 8;

// r-meta masks.
pub const R_IDX: u8 = 0x07;
pub const R_EXT: u8 = 0x38;
pub const R_DIRTY: u8 = 0x40;

// c-meta masks.
pub const C_LEN: u8 = 0x07;
pub const C_EXT: u8 = 0x38;
pub const C_LOCK: u8 = 0x40;

const R_EXT_SHIFT: u32 = 3;
const C_EXT_SHIFT: u32 = 3;

/// Order-index bits of r-meta[0..6] within the little-endian meta word.
pub const ORDER_FIELDS: u64 = 0x0707_0707_0707_0700;

/// Meta word of a freshly reset line with zero length: slot `i` holds order `i`.
pub const IDENTITY_ORDER: u64 = 0x0605_0403_0201_0000;

const _: () = {
    assert!(IDENTITY_ORDER & !ORDER_FIELDS == 0);
    assert!(R_IDX & R_EXT == 0 && R_EXT & R_DIRTY == 0);
    assert!(C_LEN & C_EXT == 0 && C_EXT & C_LOCK == 0);
};

#[inline(always)]
const fn rmeta(slot: u8) -> usize {
    debug_assert!((slot as usize) < UNIT_RECORDS, "slot out of range");
    ((slot & 0x07) as usize + 1) & (META_BYTES - 1)
}

impl CacheLine {
    // -- c-meta --

    /// Occupied length, 0..=7.
    #[inline(always)]
    pub fn length(&self) -> u8 {
        self.bytes[0] & C_LEN
    }

    /// Replaces the length bits and returns the new length. Other c-meta bits are kept.
    #[inline(always)]
    pub fn set_length(&mut self, n: u8) -> u8 {
        debug_assert!(n as usize <= UNIT_RECORDS, "length {n} out of range");
        self.bytes[0] = (self.bytes[0] & !C_LEN) | (n & C_LEN);
        self.length()
    }

    #[inline(always)]
    pub fn ext(&self) -> u8 {
        (self.bytes[0] & C_EXT) >> C_EXT_SHIFT
    }

    #[inline(always)]
    pub fn set_ext(&mut self, ext: u8) {
        self.bytes[0] = (self.bytes[0] & !C_EXT) | ((ext << C_EXT_SHIFT) & C_EXT);
    }

    #[inline(always)]
    pub fn is_locked(&self) -> bool {
        self.bytes[0] & C_LOCK != 0
    }

    #[inline(always)]
    pub fn set_locked(&mut self, on: bool) {
        if on {
            self.bytes[0] |= C_LOCK;
        } else {
            self.bytes[0] &= !C_LOCK;
        }
    }

    // -- r-meta --

    /// Position of `slot` in the intrinsic order, 0..=6.
    #[inline(always)]
    pub fn order_index(&self, slot: u8) -> u8 {
        self.bytes[rmeta(slot)] & R_IDX
    }

    #[inline(always)]
    pub fn set_order_index(&mut self, slot: u8, idx: u8) {
        debug_assert!((idx as usize) < UNIT_RECORDS, "order index {idx} out of range");
        let b = &mut self.bytes[rmeta(slot)];
        *b = (*b & !R_IDX) | (idx & R_IDX);
    }

    #[inline(always)]
    pub fn slot_ext(&self, slot: u8) -> u8 {
        (self.bytes[rmeta(slot)] & R_EXT) >> R_EXT_SHIFT
    }

    #[inline(always)]
    pub fn set_slot_ext(&mut self, slot: u8, ext: u8) {
        let b = &mut self.bytes[rmeta(slot)];
        *b = (*b & !R_EXT) | ((ext << R_EXT_SHIFT) & R_EXT);
    }

    #[inline(always)]
    pub fn is_dirty(&self, slot: u8) -> bool {
        self.bytes[rmeta(slot)] & R_DIRTY != 0
    }

    #[inline(always)]
    pub fn set_dirty(&mut self, slot: u8, on: bool) {
        let b = &mut self.bytes[rmeta(slot)];
        if on {
            *b |= R_DIRTY;
        } else {
            *b &= !R_DIRTY;
        }
    }

    /// Slot currently holding order `position`, if any.
    #[inline]
    pub fn slot_at(&self, position: u8) -> Option<u8> {
        (0..UNIT_RECORDS as u8).find(|&slot| self.order_index(slot) == position)
    }

    /// True when the seven order indices are exactly {0..6}.
    pub fn is_permutation(&self) -> bool {
        let mut seen = 0u8;
        for slot in 0..UNIT_RECORDS as u8 {
            let idx = self.order_index(slot);
            if idx as usize >= UNIT_RECORDS {
                return false;
            }
            seen |= 1 << idx;
        }
        seen == 0x7F
    }

    // -- whole-word access --

    /// The 8 meta bytes as one little-endian word. c-meta is the low byte.
    #[inline(always)]
    pub fn meta_word(&self) -> u64 {
        let mut word = [0u8; META_BYTES];
        word.copy_from_slice(&self.bytes[..META_BYTES]);
        u64::from_le_bytes(word)
    }

    #[inline(always)]
    pub fn set_meta_word(&mut self, word: u64) {
        self.bytes[..META_BYTES].copy_from_slice(&word.to_le_bytes());
    }

    /// Identity order. Leaves c-meta, the non-order r-meta bits and the records alone.
    #[inline]
    pub fn reset_order(&mut self) {
        let word = self.meta_word();
        self.set_meta_word((word & !ORDER_FIELDS) | IDENTITY_ORDER);
    }

    /// Identity order, zero length, zero records, every flag cleared except the c-meta lock.
    #[inline]
    pub fn init(&mut self) {
        let lock = (self.bytes[0] & C_LOCK) as u64;
        self.set_meta_word(IDENTITY_ORDER | lock);
        self.clear_records();
    }
}
