//! Owning vectors and the strided views cut from them.
use alloc::vec::Vec;
use core::cell::Cell;
use core::cmp::Ordering;
use core::fmt;

use approx::{AbsDiffEq, RelativeEq};

use crate::backend::{self, Strided};
use crate::buffer::{self, Buffer};
use crate::error::{ensure, ensure_range, ensure_size};
use crate::{Error, Real};

/// Anything the backend can walk as a `(buffer, offset, len, inc)` sequence.
pub trait AsStrided<T> {
    fn as_strided(&self) -> Strided<'_, T>;
}

impl<T: Copy> AsStrided<T> for Strided<'_, T> {
    fn as_strided(&self) -> Strided<'_, T> {
        *self
    }
}

/// A dense vector over shared, reference-counted storage.
///
/// The buffer only grows when a resize exceeds its capacity; shrinking keeps
/// it so that growing back is free. Segments cut with [`DynVector::segment`]
/// or [`DynVector::segment_mut`] alias the buffer: a write through either side
/// is visible through the other. A reallocation installs a fresh buffer, so
/// segments taken before it keep observing the old one.
pub struct DynVector<T> {
    data: Buffer<T>,
    len: usize,
}

/// A mutable strided view into a vector or matrix buffer.
pub struct VectorSlice<T> {
    data: Buffer<T>,
    start: usize,
    len: usize,
    inc: usize,
}

/// A read-only strided view into a vector or matrix buffer.
#[derive(Clone)]
pub struct VectorSliceRef<T> {
    data: Buffer<T>,
    start: usize,
    len: usize,
    inc: usize,
}

macro_rules! impl_vector_read {
    ($ty:ident) => {
        impl<T: Real> AsStrided<T> for $ty<T> {
            fn as_strided(&self) -> Strided<'_, T> {
                let (start, len, inc) = self.layout();
                Strided::new(&self.data, start, len, inc)
            }
        }

        impl<T: Real> $ty<T> {
            /// Number of elements.
            pub fn len(&self) -> usize {
                self.layout().1
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Returns element `index`.
            pub fn get(&self, index: usize) -> Result<T, Error> {
                self.as_strided().cell(index).map(Cell::get)
            }

            pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
                self.as_strided().iter()
            }

            pub fn to_vec(&self) -> Vec<T> {
                self.iter().collect()
            }

            /// Copies the elements into a new, tightly allocated vector.
            pub fn to_owned(&self) -> DynVector<T> {
                self.iter().collect()
            }

            /// A read-only view of `[start, end)` sharing this storage.
            pub fn segment(&self, start: usize, end: usize) -> Result<VectorSliceRef<T>, Error> {
                let (offset, len, inc) = self.layout();
                ensure_range(start, end, len)?;
                Ok(VectorSliceRef {
                    data: self.data.clone(),
                    start: offset + start * inc,
                    len: end - start,
                    inc,
                })
            }

            /// An owned copy of `[start, end)`.
            pub fn sub_vector(&self, start: usize, end: usize) -> Result<DynVector<T>, Error> {
                Ok(self.segment(start, end)?.to_owned())
            }

            pub fn dot(&self, other: &impl AsStrided<T>) -> Result<T, Error> {
                let (x, y) = (self.as_strided(), other.as_strided());
                ensure_size(x.len(), y.len())?;
                Ok(backend::dot(x, y))
            }

            /// Euclidean norm.
            pub fn norm(&self) -> T {
                backend::nrm2(self.as_strided())
            }

            pub fn norm_squared(&self) -> T {
                let x = self.as_strided();
                backend::dot(x, x)
            }

            /// Sum of absolute values.
            pub fn norm1(&self) -> T {
                backend::asum(self.as_strided())
            }

            /// Largest absolute value.
            pub fn norm_inf(&self) -> T {
                backend::amax(self.as_strided())
            }

            /// False if any element is NaN or infinite.
            pub fn is_finite(&self) -> bool {
                backend::is_finite(self.as_strided())
            }

            /// Same length and every pair of elements equal within [`Real::EPS`].
            pub fn rel_eq(&self, other: &impl AsStrided<T>) -> bool {
                let (x, y) = (self.as_strided(), other.as_strided());
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| T::rel_equal(a, b))
            }

            /// Lexicographic order where elements equal within [`Real::EPS`]
            /// tie. On a common prefix the shorter operand sorts first.
            pub fn rel_cmp(&self, other: &impl AsStrided<T>) -> Ordering {
                let (x, y) = (self.as_strided(), other.as_strided());
                for (a, b) in x.iter().zip(y.iter()) {
                    if T::rel_equal(a, b) {
                        continue;
                    }
                    return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                }
                x.len().cmp(&y.len())
            }
        }

        impl<T: Real> fmt::Display for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for (i, v) in self.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                Ok(())
            }
        }

        impl<T: Real> fmt::Debug for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($ty)).field(&self.to_vec()).finish()
            }
        }
    };
}

macro_rules! impl_vector_write {
    ($ty:ident) => {
        impl<T: Real> $ty<T> {
            /// Overwrites element `index`.
            pub fn set(&mut self, index: usize, value: T) -> Result<(), Error> {
                self.as_strided().cell(index)?.set(value);
                Ok(())
            }

            pub fn fill(&mut self, value: T) {
                for cell in self.as_strided().cells() {
                    cell.set(value);
                }
            }

            /// `self <- alpha * self`
            pub fn scale(&mut self, alpha: T) -> &mut Self {
                backend::scal(alpha, self.as_strided());
                self
            }

            /// `self <- alpha * x + self`
            pub fn axpy(&mut self, alpha: T, x: &impl AsStrided<T>) -> Result<(), Error> {
                let (x, y) = (x.as_strided(), self.as_strided());
                ensure_size(y.len(), x.len())?;
                backend::axpy(alpha, x, y);
                Ok(())
            }

            /// Overwrites every element with the matching element of `src`.
            pub fn copy_from(&mut self, src: &impl AsStrided<T>) -> Result<(), Error> {
                let (x, y) = (src.as_strided(), self.as_strided());
                ensure_size(y.len(), x.len())?;
                backend::copy(x, y);
                Ok(())
            }

            /// A mutable view of `[start, end)` sharing this storage.
            pub fn segment_mut(&mut self, start: usize, end: usize) -> Result<VectorSlice<T>, Error> {
                let (offset, len, inc) = self.layout();
                ensure_range(start, end, len)?;
                Ok(VectorSlice {
                    data: self.data.clone(),
                    start: offset + start * inc,
                    len: end - start,
                    inc,
                })
            }

            /// Copies `src` into `[start, start + src.len())`.
            pub fn set_segment(&mut self, start: usize, src: &impl AsStrided<T>) -> Result<(), Error> {
                let end = start + src.as_strided().len();
                self.segment_mut(start, end)?.copy_from(src)
            }
        }
    };
}

impl_vector_read!(DynVector);
impl_vector_read!(VectorSlice);
impl_vector_read!(VectorSliceRef);
impl_vector_write!(DynVector);
impl_vector_write!(VectorSlice);

impl<T: Real> DynVector<T> {
    fn layout(&self) -> (usize, usize, usize) {
        (0, self.len, 1)
    }

    /// An empty vector with no storage.
    pub fn new() -> Self {
        DynVector::zeros(0)
    }

    pub fn zeros(len: usize) -> Self {
        DynVector {
            data: buffer::zeroed(len),
            len,
        }
    }

    pub fn from_elem(len: usize, value: T) -> Self {
        let mut v = DynVector::zeros(len);
        v.fill(value);
        v
    }

    pub fn ones(len: usize) -> Self {
        DynVector::from_elem(len, T::one())
    }

    pub fn from_slice(values: &[T]) -> Self {
        values.iter().copied().collect()
    }

    /// Builds a vector from a fixed-size array literal.
    pub fn from_array<const N: usize>(values: [T; N]) -> Self {
        values.into_iter().collect()
    }

    /// Concatenates `a` and `b` into a new vector.
    pub fn concat(a: &impl AsStrided<T>, b: &impl AsStrided<T>) -> Self {
        a.as_strided().iter().chain(b.as_strided().iter()).collect()
    }

    /// Number of elements the current buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Changes the length to `len`.
    ///
    /// Within capacity only the length changes and the existing contents stay
    /// in place, whatever `preserve` says. Past capacity a new buffer of exactly
    /// `len` elements is allocated; the old elements are copied over only when
    /// `preserve` is set.
    pub fn resize(&mut self, len: usize, preserve: bool) -> &mut Self {
        if len <= self.capacity() {
            self.len = len;
            return self;
        }
        tracing::trace!(
            from = self.capacity(),
            to = len,
            preserve,
            "reallocating vector storage"
        );
        let data = buffer::zeroed(len);
        if preserve {
            backend::copy(self.as_strided(), Strided::new(&data, 0, self.len, 1));
        }
        self.data = data;
        self.len = len;
        self
    }

    /// Shrinks the capacity down to the length, keeping the contents.
    pub fn compress(&mut self) {
        if self.len == self.capacity() {
            return;
        }
        tracing::trace!(from = self.capacity(), to = self.len, "compressing vector storage");
        let data = buffer::from_values(self.iter());
        self.data = data;
    }

    /// A mutable view of the whole vector.
    pub fn as_slice_mut(&mut self) -> VectorSlice<T> {
        VectorSlice {
            data: self.data.clone(),
            start: 0,
            len: self.len,
            inc: 1,
        }
    }

    /// Resizes to `src.len()` and copies `src` in.
    pub fn assign(&mut self, src: &impl AsStrided<T>) -> &mut Self {
        let len = src.as_strided().len();
        self.resize(len, false);
        backend::copy(src.as_strided(), self.as_strided());
        self
    }

    /// Gathers the elements whose mask entry is set.
    ///
    /// The mask may be shorter than the vector; trailing elements are dropped.
    pub fn select(&self, mask: &[bool]) -> Result<DynVector<T>, Error> {
        ensure(mask.len() <= self.len, || Error::SizeMismatch {
            expected: self.len,
            found: mask.len(),
        })?;
        Ok(mask
            .iter()
            .zip(self.iter())
            .filter_map(|(keep, v)| keep.then_some(v))
            .collect())
    }

    /// Gathers the elements at `indices`, in that order.
    pub fn select_indices(&self, indices: &[usize]) -> Result<DynVector<T>, Error> {
        indices.iter().map(|&i| self.get(i)).collect()
    }
}

impl<T: Real> VectorSlice<T> {
    fn layout(&self) -> (usize, usize, usize) {
        (self.start, self.len, self.inc)
    }

    /// Distance between consecutive elements in the underlying buffer.
    pub fn stride(&self) -> usize {
        self.inc
    }

    /// A read-only handle on the same elements.
    pub fn view(&self) -> VectorSliceRef<T> {
        VectorSliceRef {
            data: self.data.clone(),
            start: self.start,
            len: self.len,
            inc: self.inc,
        }
    }
}

impl<T: Real> VectorSliceRef<T> {
    fn layout(&self) -> (usize, usize, usize) {
        (self.start, self.len, self.inc)
    }

    /// Distance between consecutive elements in the underlying buffer.
    pub fn stride(&self) -> usize {
        self.inc
    }
}

impl<T: Real> VectorSlice<T> {
    pub(crate) fn from_raw(data: Buffer<T>, start: usize, len: usize, inc: usize) -> Self {
        VectorSlice {
            data,
            start,
            len,
            inc,
        }
    }
}

impl<T: Real> VectorSliceRef<T> {
    pub(crate) fn from_raw(data: Buffer<T>, start: usize, len: usize, inc: usize) -> Self {
        VectorSliceRef {
            data,
            start,
            len,
            inc,
        }
    }
}

impl<T: Real> From<VectorSlice<T>> for VectorSliceRef<T> {
    fn from(slice: VectorSlice<T>) -> Self {
        VectorSliceRef {
            data: slice.data,
            start: slice.start,
            len: slice.len,
            inc: slice.inc,
        }
    }
}

impl<T: Real> Default for DynVector<T> {
    fn default() -> Self {
        DynVector::new()
    }
}

impl<T: Real> Clone for DynVector<T> {
    /// Deep copy: the clone gets its own buffer.
    fn clone(&self) -> Self {
        self.to_owned()
    }
}

impl<T: Real> FromIterator<T> for DynVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let data = buffer::from_values(iter);
        let len = data.len();
        DynVector { data, len }
    }
}

impl<T: Real> From<Vec<T>> for DynVector<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Real, const N: usize> From<[T; N]> for DynVector<T> {
    fn from(values: [T; N]) -> Self {
        DynVector::from_array(values)
    }
}

impl<T: Real> PartialEq for DynVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Real + AbsDiffEq<Epsilon = T>> AbsDiffEq for DynVector<T> {
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.len == other.len
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.abs_diff_eq(&b, epsilon))
    }
}

impl<T: Real + RelativeEq<Epsilon = T>> RelativeEq for DynVector<T> {
    fn default_max_relative() -> T {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
        self.len == other.len
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.relative_eq(&b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_segment_aliases_buffer() {
        let mut v = DynVector::from_array([0.0, 1.0, 2.0, 3.0, 4.0]);
        let mut seg = v.segment_mut(1, 4).unwrap();
        assert_eq!(seg.len(), 3);
        assert_eq!(seg.get(0), Ok(1.0));
        seg.set(2, 30.0).unwrap();
        assert_eq!(v.get(3), Ok(30.0));
        v.set(1, 10.0).unwrap();
        assert_eq!(seg.get(0), Ok(10.0));
    }

    #[test]
    fn test_segment_of_segment() {
        let mut v: DynVector<f64> = (0..10).map(|i| i as f64).collect();
        let seg = v.segment_mut(2, 9).unwrap();
        let inner = seg.segment(1, 4).unwrap();
        assert_eq!(inner.to_vec(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    #[cfg(not(feature = "unchecked"))]
    fn test_segment_bounds() {
        let v = DynVector::<f64>::zeros(4);
        assert_eq!(
            v.segment(3, 2).unwrap_err(),
            Error::InvalidRange {
                start: 3,
                end: 2,
                len: 4
            }
        );
        assert!(v.segment(0, 5).is_err());
        assert!(v.segment(4, 4).unwrap().is_empty());
        assert_eq!(
            v.get(4).unwrap_err(),
            Error::OutOfBounds { index: 4, len: 4 }
        );
    }

    #[test]
    fn test_resize_keeps_capacity_when_shrinking() {
        let mut v = DynVector::from_array([1.0, 2.0, 3.0, 4.0]);
        v.resize(2, false);
        assert_eq!(v.len(), 2);
        assert_eq!(v.capacity(), 4);
        v.resize(4, false);
        assert_eq!(v.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_resize_grow_preserve() {
        let mut v = DynVector::from_array([1.0, 2.0]);
        v.resize(5, true);
        assert_eq!(v.capacity(), 5);
        assert_eq!(v.sub_vector(0, 2).unwrap().to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_old_segment_survives_reallocation() {
        let mut v = DynVector::from_array([1.0, 2.0]);
        let seg = v.segment(0, 2).unwrap();
        v.resize(8, true);
        v.set(0, 100.0).unwrap();
        assert_eq!(seg.get(0), Ok(1.0));
    }

    #[test]
    fn test_compress() {
        let mut v = DynVector::from_array([1.0, 2.0, 3.0]);
        v.resize(1, false);
        v.compress();
        assert_eq!(v.capacity(), 1);
        assert_eq!(v.to_vec(), vec![1.0]);
    }

    #[test]
    fn test_dot_views_and_vectors() {
        let v = DynVector::from_array([1.0, 2.0, 3.0, 4.0]);
        let w = DynVector::from_array([2.0, 2.0]);
        let seg = v.segment(2, 4).unwrap();
        assert_eq!(seg.dot(&w), Ok(14.0));
        assert_eq!(w.dot(&seg), Ok(14.0));
        assert!(v.dot(&w).is_err());
    }

    #[test]
    fn test_axpy_and_scale() {
        let mut y = DynVector::from_array([1.0, 1.0, 1.0]);
        let x = DynVector::from_array([1.0, 2.0, 3.0]);
        y.axpy(2.0, &x).unwrap();
        y.scale(0.5);
        assert_relative_eq!(y, DynVector::from_array([1.5, 2.5, 3.5]));
    }

    #[test]
    fn test_set_segment_and_assign() {
        let mut v = DynVector::<f64>::zeros(5);
        v.set_segment(1, &DynVector::from_array([7.0, 8.0])).unwrap();
        assert_eq!(v.to_vec(), vec![0.0, 7.0, 8.0, 0.0, 0.0]);
        assert!(v.set_segment(4, &DynVector::from_array([1.0, 2.0])).is_err());

        let src = v.segment(1, 3).unwrap();
        v.assign(&src);
        assert_eq!(v.to_vec(), vec![7.0, 8.0]);
    }

    #[test]
    fn test_select() {
        let v = DynVector::from_array([1.0, 2.0, 3.0, 4.0]);
        let picked = v.select(&[true, false, true]).unwrap();
        assert_eq!(picked.to_vec(), vec![1.0, 3.0]);
        assert!(v.select(&[true; 5]).is_err());
        let picked = v.select_indices(&[3, 0]).unwrap();
        assert_eq!(picked.to_vec(), vec![4.0, 1.0]);
    }

    #[test]
    fn test_norms() {
        let v = DynVector::from_array([3.0, -4.0]);
        assert_eq!(v.norm(), 5.0);
        assert_eq!(v.norm_squared(), 25.0);
        assert_eq!(v.norm1(), 7.0);
        assert_eq!(v.norm_inf(), 4.0);
    }

    #[test]
    fn test_rel_cmp() {
        let a = DynVector::from_array([1.0, 2.0]);
        let b = DynVector::from_array([1.0 + 1e-12, 3.0]);
        let c = DynVector::from_array([1.0, 2.0, 0.0]);
        assert_eq!(a.rel_cmp(&b), Ordering::Less);
        assert_eq!(a.rel_cmp(&c), Ordering::Less);
        assert_eq!(a.rel_cmp(&a.clone()), Ordering::Equal);
        assert!(a.rel_eq(&DynVector::from_array([1.0, 2.0 + 1e-12])));
    }

    #[test]
    fn test_clone_is_deep() {
        let v = DynVector::from_array([1.0, 2.0]);
        let mut w = v.clone();
        w.set(0, 5.0).unwrap();
        assert_eq!(v.get(0), Ok(1.0));
    }

    #[test]
    fn test_display() {
        let v = DynVector::from_array([1.0, -0.5, f64::INFINITY]);
        assert_eq!(v.to_string(), "1, -0.5, inf");
    }
}
