//! Scoped acquisition of the c-meta lock bit.
//!
//! `&mut Unit` already rules out a second writer inside this process, so the
//! bit is advisory between non-overlapping borrows. It is still taken with an
//! atomic compare-and-exchange on byte 0 and released with an atomic `fetch_and`,
//! and it is cleared on every exit path. `UnitGuard` clears it in `Drop`.

use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicU8, Ordering};

use tracing::trace;

use crate::error::{ClcError, Result};
use crate::line::{CacheLine, C_LOCK};
use crate::unit::Unit;

impl CacheLine {
    #[inline(always)]
    fn cmeta_atomic(&mut self) -> &AtomicU8 {
        let ptr: *mut u8 = &mut self.as_bytes_mut()[0];
        // SAFETY: `ptr` is a valid, exclusively borrowed `u8`. `AtomicU8` has
        // the size and alignment of `u8`, and the returned reference holds the
        // `&mut self` borrow, so no non-atomic access overlaps it.
        unsafe { AtomicU8::from_ptr(ptr) }
    }

    /// Atomic test-and-set of the lock bit. `false`, with nothing written,
    /// when the bit is already held.
    #[inline]
    pub fn try_acquire(&mut self) -> bool {
        let cmeta = self.cmeta_atomic();
        loop {
            let current = cmeta.load(Ordering::Acquire);
            if current & C_LOCK != 0 {
                return false;
            }
            match cmeta.compare_exchange_weak(
                current,
                current | C_LOCK,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(_) => continue,
            }
        }
    }

    /// Clear the lock bit. Length and ext bits are untouched.
    #[inline]
    pub fn release(&mut self) {
        self.cmeta_atomic().fetch_and(!C_LOCK, Ordering::Release);
    }
}

/// Holds the lock bit of one Unit. Derefs to the Unit.
#[derive(Debug)]
pub struct UnitGuard<'g, 'a> {
    unit: &'g mut Unit<'a>,
}

impl<'a> Unit<'a> {
    #[inline(always)]
    pub fn is_locked(&self) -> bool {
        self.line.is_locked()
    }

    /// Test-and-set the lock bit. Fails with `Locked`, mutating nothing, if it is already set.
    #[inline]
    pub fn lock(&mut self) -> Result<UnitGuard<'_, 'a>> {
        if !self.line.try_acquire() {
            trace!(len = self.len(), "lock contended");
            return Err(ClcError::Locked);
        }
        Ok(UnitGuard { unit: self })
    }

    /// Run `f` under the lock.
    #[inline]
    pub fn with_lock<R>(&mut self, f: impl FnOnce(&mut Unit<'a>) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut *guard))
    }
}

impl<'a> Deref for UnitGuard<'_, 'a> {
    type Target = Unit<'a>;

    #[inline(always)]
    fn deref(&self) -> &Unit<'a> {
        self.unit
    }
}

impl<'a> DerefMut for UnitGuard<'_, 'a> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Unit<'a> {
        self.unit
    }
}

impl Drop for UnitGuard<'_, '_> {
    #[inline(always)]
    fn drop(&mut self) {
        self.unit.line.release();
    }
}
