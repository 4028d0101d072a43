//! Provides error definitions.
use alloc::borrow::Cow;

use thiserror::Error;

/// Enumerates the failures reported by vector and matrix operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Element access past the end of a vector, view or matrix.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// A `start..end` range that is reversed or runs past the end.
    #[error("invalid range {start}..{end} for length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Operands of a dot, copy, axpy, assign or product disagree in size.
    #[error("size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// Operands whose storage layout cannot be combined.
    #[error("storage mismatch: {0}")]
    StorageMismatch(Cow<'static, str>),
}

/// Returns `err` unless `cond` holds. Compiled to nothing under `unchecked`.
#[inline(always)]
pub(crate) fn ensure(cond: bool, err: impl FnOnce() -> Error) -> Result<(), Error> {
    if cfg!(feature = "unchecked") || cond {
        Ok(())
    } else {
        Err(err())
    }
}

#[inline(always)]
pub(crate) fn ensure_index(index: usize, len: usize) -> Result<(), Error> {
    ensure(index < len, || Error::OutOfBounds { index, len })
}

#[inline(always)]
pub(crate) fn ensure_range(start: usize, end: usize, len: usize) -> Result<(), Error> {
    ensure(start <= end && end <= len, || Error::InvalidRange { start, end, len })
}

/// Returns [`Error::SizeMismatch`] unless the sizes agree. Compiled to
/// nothing under `unchecked`, like every other check in this crate.
#[inline(always)]
pub fn ensure_size(expected: usize, found: usize) -> Result<(), Error> {
    ensure(expected == found, || Error::SizeMismatch { expected, found })
}
