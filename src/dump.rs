//! Hex dump of one line: eight `+OO | word` rows. Read-only.

use core::fmt;

use crate::line::{CacheLine, LINE_SIZE};
use crate::unit::Unit;

impl CacheLine {
    pub fn dump_to<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        for xof in (0..LINE_SIZE).step_by(8) {
            writeln!(w, "+{:02} | {:016x}", xof, self.word_at(xof))?;
        }
        Ok(())
    }

    #[cfg(feature = "std")]
    pub fn dump_io<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        for xof in (0..LINE_SIZE).step_by(8) {
            writeln!(w, "+{:02} | {:016x}", xof, self.word_at(xof))?;
        }
        Ok(())
    }

    /// Dump to stderr.
    #[cfg(feature = "std")]
    pub fn dump(&self) -> std::io::Result<()> {
        self.dump_io(&mut std::io::stderr().lock())
    }
}

impl Unit<'_> {
    #[inline]
    pub fn dump_to<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        self.line().dump_to(w)
    }

    #[cfg(feature = "std")]
    #[inline]
    pub fn dump_io<W: std::io::Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.line().dump_io(w)
    }

    #[cfg(feature = "std")]
    #[inline]
    pub fn dump(&self) -> std::io::Result<()> {
        self.line().dump()
    }
}

/// `{}` renders the same eight rows as `dump_to`.
impl fmt::Display for CacheLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump_to(f)
    }
}
