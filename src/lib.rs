#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

//! Cache-line containers: seven ordered u64 records in one 64-byte line.
//!
//! Raw bytes enter through [`Container::validate`]; each 64-byte span is a
//! [`Unit`]. Reordering rewrites only the 8-byte meta word (see
//! [`line::systolic`]), so records never move once written.

pub mod container;
mod dump;
pub mod error;
pub mod line;
pub mod lock;
pub mod unit;

/// Prelude for convenient imports of primary API types.
pub mod prelude {
    pub use crate::container::Container;
    pub use crate::error::{ClcError, Result, Status};
    pub use crate::line::{AlignedLines, CacheLine, LINE_SIZE, MAX_PIVOT, UNIT_RECORDS};
    pub use crate::lock::UnitGuard;
    pub use crate::unit::Unit;
}

pub use container::Container;
pub use error::{ClcError, Result, Status};
pub use line::{AlignedLines, CacheLine, LINE_SIZE, MAX_PIVOT, UNIT_RECORDS};
pub use lock::UnitGuard;
pub use unit::Unit;
