//! Errors and status codes. Boundary errors only; precondition violations are debug asserts.

use core::fmt;

/// Why an operation said no.
///
/// Verifier errors (`NullBuffer`, `TooSmall`, `RaggedLength`, `Misaligned`)
/// are raised before any `Container` exists, so they never leave state behind.
/// Unit errors (`Full`, `Locked`, `CorruptOrder`) are raised before any byte
/// is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
#[repr(u8)]
pub enum ClcError {
    /// No buffer was supplied.
    #[error("buffer is null")]
    NullBuffer = 1,
    /// Fewer than 64 bytes.
    #[error("buffer is smaller than one cache line")]
    TooSmall = 2,
    /// Length is not a whole number of cache lines.
    #[error("buffer length is not a multiple of 64")]
    RaggedLength = 3,
    /// Base address is not on a cache-line boundary.
    #[error("buffer base is not 64-byte aligned")]
    Misaligned = 4,
    /// All seven slots are occupied.
    #[error("unit is full")]
    Full = 5,
    /// The c-meta lock bit is already held.
    #[error("unit is locked")]
    Locked = 6,
    /// No slot holds the next order position; the permutation is broken.
    #[error("unit order permutation is corrupt")]
    CorruptOrder = 7,
    /// Operation not provided by this build.
    #[error("not implemented")]
    NotImplemented = 8,
}

pub type Result<T> = core::result::Result<T, ClcError>;

/// Numeric status codes. Non-negative codes are outcomes, negative codes are errors.
///
/// The values are part of the external contract and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum Status {
    Ok = 0,
    Full = 1,
    Empty = 2,
    Removed = 3,
    NotFound = 4,
    Duplicate = 5,

    ErrState = -1,
    ErrAlignment = -2,
    ErrPointer = -3,
    ErrArg = -4,
    ErrSelector = -5,
    ErrIndex = -6,
    ErrRecord = -7,
    ErrNotImpl = -255,
}

impl Status {
    #[inline(always)]
    pub const fn code(self) -> i16 {
        self as i16
    }

    #[inline(always)]
    pub const fn is_error(self) -> bool {
        self.code() < 0
    }

    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::Full),
            2 => Some(Self::Empty),
            3 => Some(Self::Removed),
            4 => Some(Self::NotFound),
            5 => Some(Self::Duplicate),
            -1 => Some(Self::ErrState),
            -2 => Some(Self::ErrAlignment),
            -3 => Some(Self::ErrPointer),
            -4 => Some(Self::ErrArg),
            -5 => Some(Self::ErrSelector),
            -6 => Some(Self::ErrIndex),
            -7 => Some(Self::ErrRecord),
            -255 => Some(Self::ErrNotImpl),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::Full => "Full",
            Self::Empty => "Empty",
            Self::Removed => "Removed",
            Self::NotFound => "NotFound",
            Self::Duplicate => "Duplicate",
            Self::ErrState => "ErrState",
            Self::ErrAlignment => "ErrAlignment",
            Self::ErrPointer => "ErrPointer",
            Self::ErrArg => "ErrArg",
            Self::ErrSelector => "ErrSelector",
            Self::ErrIndex => "ErrIndex",
            Self::ErrRecord => "ErrRecord",
            Self::ErrNotImpl => "ErrNotImpl",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ClcError> for Status {
    fn from(err: ClcError) -> Self {
        match err {
            ClcError::NullBuffer => Status::ErrPointer,
            ClcError::TooSmall | ClcError::RaggedLength => Status::ErrArg,
            ClcError::Misaligned => Status::ErrAlignment,
            ClcError::Full => Status::Full,
            ClcError::Locked => Status::ErrState,
            ClcError::CorruptOrder => Status::ErrIndex,
            ClcError::NotImplemented => Status::ErrNotImpl,
        }
    }
}

impl<T> From<Result<T>> for Status {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.into(),
        }
    }
}
