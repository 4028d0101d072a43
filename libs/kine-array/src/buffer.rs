//! Reference-counted element storage shared by vectors, matrices and views.
use alloc::rc::Rc;
use core::cell::Cell;
use core::iter;

use crate::Real;

/// Fixed-size shared storage. Its length is the capacity of whatever owns it.
///
/// Elements live in [`Cell`]s so every holder can write without exclusive
/// access. That is what makes a write through a segment visible through the
/// vector it was cut from. `Rc` keeps the type off other threads.
pub type Buffer<T> = Rc<[Cell<T>]>;

/// Allocates `len` zeroed elements.
pub fn zeroed<T: Real>(len: usize) -> Buffer<T> {
    iter::repeat_with(|| Cell::new(T::zero())).take(len).collect()
}

/// Allocates a buffer holding a copy of `values`.
pub fn from_values<T: Real>(values: impl IntoIterator<Item = T>) -> Buffer<T> {
    values.into_iter().map(Cell::new).collect()
}
