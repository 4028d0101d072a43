//! Dense vectors and matrices over shared, reference-counted storage.
//!
//! Views cut from a vector or matrix ([`VectorSlice`], [`MatrixBlock`] and
//! their read-only counterparts) alias the owner's buffer, so a write through
//! a view is visible through the owner and through every other view of the
//! same region. The buffers are `Rc<[Cell<T>]>`, which keeps all of these
//! types on one thread.
//!
//! # Features
//!
//! * `unchecked` removes every bounds and size check. Violations that would
//!   otherwise return an [`Error`] become undefined behaviour, so only enable
//!   it for code that is already known to be correct.
extern crate alloc;

pub mod backend;
mod buffer;
mod error;
mod matrix;
mod parse;
mod real;
mod vector;

pub use error::*;
pub use matrix::*;
pub use parse::*;
pub use real::*;
pub use vector::*;
