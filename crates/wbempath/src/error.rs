use alloc::collections::TryReserveError;

use thiserror::Error;

/// Failures surfaced by path objects.
///
/// The parser is lenient, so malformed text never produces an error. Only
/// missing arguments, allocation failure, unsupported operations and
/// unsupported interfaces do.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathError {
    /// A required argument was missing or a flag value was not recognised.
    #[error("invalid parameter")]
    InvalidParameter,
    /// An allocation was refused while parsing or rendering.
    #[error("out of memory")]
    OutOfMemory,
    /// The operation is part of the capability set but has no implementation.
    #[error("not implemented")]
    NotImplemented,
    /// The requested interface is not supported by this object.
    #[error("no such interface")]
    NoSuchInterface,
}

impl PathError {
    /// The COM status code reported for this error at an `IWbemPath`
    /// boundary.
    #[must_use]
    pub const fn hresult(self) -> u32 {
        match self {
            Self::InvalidParameter => 0x8004_1008,
            Self::OutOfMemory => 0x8007_000E,
            Self::NotImplemented => 0x8000_4001,
            Self::NoSuchInterface => 0x8000_4002,
        }
    }
}

impl From<TryReserveError> for PathError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}
