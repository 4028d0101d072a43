//! Strided level-1 primitives shared by owning vectors and views.
//!
//! Every routine takes [`Strided`] descriptors, the buffer plus an offset, a
//! length and an increment, so the same code serves a contiguous vector, a
//! segment of one, and a column of a row-major matrix. Callers validate sizes;
//! the routines only walk what they are given.
use core::cell::Cell;

use crate::{Error, Real, error::ensure_index};

/// A `(buffer, offset, len, inc)` descriptor over shared cells.
#[derive(Clone, Copy)]
pub struct Strided<'a, T> {
    cells: &'a [Cell<T>],
    offset: usize,
    len: usize,
    inc: usize,
}

impl<'a, T: Copy> Strided<'a, T> {
    /// Builds a descriptor. `inc` must be non-zero and, for a non-empty
    /// descriptor, `offset + (len - 1) * inc` must index into `cells`.
    pub fn new(cells: &'a [Cell<T>], offset: usize, len: usize, inc: usize) -> Self {
        debug_assert!(inc > 0);
        debug_assert!(len == 0 || offset + (len - 1) * inc < cells.len());
        Strided {
            cells,
            offset,
            len,
            inc,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn inc(&self) -> usize {
        self.inc
    }

    /// Returns the cell holding element `index`.
    pub fn cell(self, index: usize) -> Result<&'a Cell<T>, Error> {
        ensure_index(index, self.len)?;
        let at = self.offset + index * self.inc;
        #[cfg(feature = "unchecked")]
        // SAFETY: with checks disabled the caller guarantees `index < len`, and
        // the constructor invariant keeps every in-range index inside `cells`.
        let cell = unsafe { self.cells.get_unchecked(at) };
        #[cfg(not(feature = "unchecked"))]
        let cell = self
            .cells
            .get(at)
            .ok_or(Error::OutOfBounds { index, len: self.len })?;
        Ok(cell)
    }

    /// True when both descriptors address the same buffer.
    pub fn shares_buffer(&self, other: &Strided<'_, T>) -> bool {
        core::ptr::eq(self.cells.as_ptr(), other.cells.as_ptr())
    }

    /// Iterates over the addressed cells in order.
    pub fn cells(self) -> impl Iterator<Item = &'a Cell<T>> {
        let tail = self.cells.get(self.offset..).unwrap_or(&[]);
        tail.iter().step_by(self.inc).take(self.len)
    }

    /// Iterates over the addressed values in order.
    pub fn iter(self) -> impl Iterator<Item = T> {
        self.cells().map(Cell::get)
    }
}

/// `x · y`
pub fn dot<T: Real>(x: Strided<'_, T>, y: Strided<'_, T>) -> T {
    x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (a, b)| acc + a * b)
}

/// `y <- x`. Overlapping descriptors behave like `memmove`.
pub fn copy<T: Real>(x: Strided<'_, T>, y: Strided<'_, T>) {
    if x.shares_buffer(&y) {
        let staged: Vec<T> = x.iter().collect();
        for (v, dst) in staged.into_iter().zip(y.cells()) {
            dst.set(v);
        }
        return;
    }
    for (src, dst) in x.cells().zip(y.cells()) {
        dst.set(src.get());
    }
}

/// `y <- alpha * x + y`. `x` is read in full before `y` is written when the
/// two share a buffer.
pub fn axpy<T: Real>(alpha: T, x: Strided<'_, T>, y: Strided<'_, T>) {
    if x.shares_buffer(&y) {
        let staged: Vec<T> = x.iter().collect();
        for (v, dst) in staged.into_iter().zip(y.cells()) {
            dst.set(alpha * v + dst.get());
        }
        return;
    }
    for (src, dst) in x.cells().zip(y.cells()) {
        dst.set(alpha * src.get() + dst.get());
    }
}

/// `x <- alpha * x`
pub fn scal<T: Real>(alpha: T, x: Strided<'_, T>) {
    for cell in x.cells() {
        cell.set(alpha * cell.get());
    }
}

/// Euclidean norm, scaled to avoid overflow of the intermediate sum.
pub fn nrm2<T: Real>(x: Strided<'_, T>) -> T {
    if x.iter().any(|v| v.is_nan()) {
        return T::nan();
    }
    let scale = amax(x);
    if scale == T::zero() || !scale.is_finite() {
        return scale;
    }
    let sum = x.iter().fold(T::zero(), |acc, v| {
        let v = v / scale;
        acc + v * v
    });
    scale * sum.sqrt()
}

/// Sum of absolute values (l1 norm).
pub fn asum<T: Real>(x: Strided<'_, T>) -> T {
    x.iter().fold(T::zero(), |acc, v| acc + v.abs())
}

/// Largest absolute value (infinity norm). NaN entries are skipped.
pub fn amax<T: Real>(x: Strided<'_, T>) -> T {
    x.iter().fold(T::zero(), |acc, v| acc.max(v.abs()))
}

/// False as soon as a NaN or infinite entry is found.
pub fn is_finite<T: Real>(x: Strided<'_, T>) -> bool {
    x.iter().all(|v| v.is_finite())
}
