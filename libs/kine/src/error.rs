//! Provides error definitions.
use std::borrow::Cow;

use thiserror::Error;

use crate::FrameId;

/// Enumerates the failures reported by the kinematics layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Propagated from the vector and matrix kernel.
    #[error("array error: {0}")]
    Array(#[from] kine_array::Error),

    /// Quantities or transforms tagged with different frames were combined.
    #[error("frame mismatch: expected {expected}, found {found}")]
    FrameMismatch { expected: FrameId, found: FrameId },

    /// An operation ran before its prerequisites were set up, such as a joint
    /// without axes or without attached links.
    #[error("configuration error: {0}")]
    Config(Cow<'static, str>),

    /// The operation exists but has no implementation.
    #[error("unsupported operation: {0}")]
    Unsupported(Cow<'static, str>),
}
