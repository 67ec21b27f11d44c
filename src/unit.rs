//! Unit: the public face of one cache line.
//!
//! Every mutation except `init` touches only the 8-byte meta word, plus at
//! most one record for `put`. Ranges (slot, pivot, length) are checked with
//! `debug_assert!`; release builds assume valid arguments and mask them so
//! no access ever leaves the line.

use arrayvec::ArrayVec;
use tracing::trace;

use crate::error::{ClcError, Result};
use crate::line::{CacheLine, LINE_SIZE, UNIT_RECORDS};

/// Exclusive handle to one validated line.
#[derive(Debug)]
pub struct Unit<'a> {
    pub(crate) line: &'a mut CacheLine,
}

impl<'a> Unit<'a> {
    #[inline(always)]
    pub fn new(line: &'a mut CacheLine) -> Self {
        Self { line }
    }

    /// Zero records, zero length, identity order.
    #[inline(always)]
    pub fn init(&mut self) {
        self.line.init();
    }

    /// Identity order only. Length and records survive.
    #[inline(always)]
    pub fn reset(&mut self) {
        self.line.reset_order();
    }

    #[inline(always)]
    pub fn len(&self) -> u8 {
        self.line.length()
    }

    #[inline(always)]
    pub fn set_len(&mut self, n: u8) -> u8 {
        self.line.set_length(n)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len() as usize == UNIT_RECORDS
    }

    /// Non-exclusive append. `value` goes to the slot holding the next order
    /// position; whatever that slot held is overwritten.
    ///
    /// Fails with `Full` at length 7. Nothing is written on failure.
    #[inline]
    pub fn put(&mut self, value: u64) -> Result<()> {
        let len = self.len();
        if len as usize == UNIT_RECORDS {
            trace!(len, "put rejected: unit full");
            return Err(ClcError::Full);
        }

        let slot = self.line.slot_at(len).ok_or(ClcError::CorruptOrder)?;

        self.line.set_record(slot, value);
        self.line.set_length(len + 1);
        Ok(())
    }

    // -- order engine --

    #[inline(always)]
    pub fn shift_up(&mut self, pivot: u8) {
        self.line.shift_up(pivot);
    }

    #[inline(always)]
    pub fn shift_down(&mut self, pivot: u8) {
        self.line.shift_down(pivot);
    }

    #[inline(always)]
    pub fn promote_last(&mut self, pivot: u8) {
        self.line.promote_last(pivot);
    }

    // -- reads --

    /// Record at an occupied order position.
    #[inline]
    pub fn get(&self, position: u8) -> Option<u64> {
        if position >= self.len() {
            return None;
        }
        self.line.slot_at(position).map(|slot| self.line.record(slot))
    }

    /// Occupied records in intrinsic order.
    pub fn records(&self) -> ArrayVec<u64, UNIT_RECORDS> {
        (0..self.len()).filter_map(|pos| self.get(pos)).collect()
    }

    #[inline(always)]
    pub fn order_index(&self, slot: u8) -> u8 {
        self.line.order_index(slot)
    }

    #[inline(always)]
    pub fn slot_at(&self, position: u8) -> Option<u8> {
        self.line.slot_at(position)
    }

    /// Raw record by physical slot, ignoring length.
    #[inline(always)]
    pub fn record(&self, slot: u8) -> u64 {
        self.line.record(slot)
    }

    /// Raw write by physical slot. Length and order are not touched.
    #[inline(always)]
    pub fn set_record(&mut self, slot: u8, value: u64) {
        self.line.set_record(slot, value);
    }

    #[inline(always)]
    pub fn is_dirty(&self, slot: u8) -> bool {
        self.line.is_dirty(slot)
    }

    #[inline(always)]
    pub fn set_dirty(&mut self, slot: u8, on: bool) {
        self.line.set_dirty(slot, on);
    }

    #[inline(always)]
    pub fn line(&self) -> &CacheLine {
        self.line
    }

    #[inline(always)]
    pub fn line_mut(&mut self) -> &mut CacheLine {
        self.line
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; LINE_SIZE] {
        self.line.as_bytes()
    }
}

impl<'a> From<&'a mut CacheLine> for Unit<'a> {
    #[inline(always)]
    fn from(line: &'a mut CacheLine) -> Self {
        Self::new(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> CacheLine {
        let mut line = CacheLine::from_bytes([0xA; 64]);
        line.init();
        line
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut line = CacheLine::from_bytes([0x3C; 64]);
        let mut u = Unit::new(&mut line);
        u.init();
        let once = *u.as_bytes();
        u.init();
        assert_eq!(u.as_bytes(), &once);
    }

    #[test]
    fn test_len_and_set_len() {
        let mut line = fresh();
        let mut u = Unit::new(&mut line);
        assert_eq!(u.len(), 0);
        assert!(u.is_empty());
        assert_eq!(u.set_len(3), 3);
        assert_eq!(u.len(), 3);

        u.reset();
        assert_eq!(u.len(), 3);

        u.init();
        assert_eq!(u.len(), 0);
    }

    #[test]
    fn test_put_until_full() {
        let mut line = fresh();
        let mut u = Unit::new(&mut line);

        for i in 0..7u64 {
            assert!(u.put(0x100 + i).is_ok());
            assert_eq!(u.len() as u64, i + 1);
        }
        assert!(u.is_full());

        let before = *u.as_bytes();
        assert_eq!(u.put(0xDEAD), Err(ClcError::Full));
        assert_eq!(u.as_bytes(), &before);

        // Identity order: position i lives in slot i.
        for slot in 0..7u8 {
            assert_eq!(u.record(slot), 0x100 + slot as u64);
        }
        assert_eq!(
            u.records().as_slice(),
            &[0x100, 0x101, 0x102, 0x103, 0x104, 0x105, 0x106]
        );
    }

    #[test]
    fn test_put_follows_order() {
        let mut line = fresh();
        let mut u = Unit::new(&mut line);

        // Slot 6's order entry moves into slot 0; the rest slide one slot toward the tail.
        u.promote_last(0);
        assert_eq!(u.slot_at(0), Some(1));
        assert_eq!(u.order_index(0), 6);

        u.put(7).unwrap();
        u.put(8).unwrap();
        assert_eq!(u.record(1), 7);
        assert_eq!(u.record(2), 8);
        assert_eq!(u.get(0), Some(7));
        assert_eq!(u.get(1), Some(8));
        assert_eq!(u.get(2), None);
    }

    #[test]
    fn test_put_overwrites_silently() {
        let mut line = fresh();
        let mut u = Unit::new(&mut line);
        u.set_record(0, 0xFFFF);
        u.put(1).unwrap();
        assert_eq!(u.record(0), 1);
    }

    #[test]
    fn test_put_reports_corrupt_order() {
        let mut line = fresh();
        line.set_order_index(0, 1);
        let mut u = Unit::new(&mut line);
        let before = *u.as_bytes();
        assert_eq!(u.put(1), Err(ClcError::CorruptOrder));
        assert_eq!(u.as_bytes(), &before);
    }

    #[test]
    fn test_order_ops_keep_len() {
        let mut line = fresh();
        let mut u = Unit::new(&mut line);
        u.put(1).unwrap();
        u.put(2).unwrap();
        for p in 0..8 {
            u.shift_up(p);
            u.shift_down(p);
            u.promote_last(p);
            assert_eq!(u.len(), 2);
        }
        u.reset();
        assert_eq!(u.len(), 2);
        assert_eq!(u.records().as_slice(), &[1, 2]);
    }

    #[test]
    fn test_records_empty() {
        let mut line = fresh();
        let u = Unit::new(&mut line);
        assert!(u.records().is_empty());
        assert_eq!(u.get(0), None);
    }
}
