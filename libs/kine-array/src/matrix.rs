//! Row-major dense matrices and rectangular block views.
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use crate::backend::{self, Strided};
use crate::buffer::{self, Buffer};
use crate::error::{ensure_index, ensure_range, ensure_size};
use crate::vector::{AsStrided, DynVector, VectorSlice, VectorSliceRef};
use crate::{Error, Real};

/// Anything that can hand out a read-only block over its elements.
pub trait AsMatrix<T> {
    fn as_block(&self) -> MatrixBlockRef<T>;
}

/// A dense row-major matrix over shared storage.
///
/// Rows are contiguous, so row views have stride 1 and column views have a
/// stride equal to the number of columns.
pub struct DynMatrix<T> {
    data: Buffer<T>,
    rows: usize,
    cols: usize,
}

/// A mutable rectangular view into a matrix buffer.
pub struct MatrixBlock<T> {
    data: Buffer<T>,
    start: usize,
    rows: usize,
    cols: usize,
    ld: usize,
}

/// A read-only rectangular view into a matrix buffer.
#[derive(Clone)]
pub struct MatrixBlockRef<T> {
    data: Buffer<T>,
    start: usize,
    rows: usize,
    cols: usize,
    ld: usize,
}

macro_rules! impl_matrix_read {
    ($ty:ident) => {
        impl<T: Real> AsMatrix<T> for $ty<T> {
            fn as_block(&self) -> MatrixBlockRef<T> {
                let (start, rows, cols, ld) = self.layout();
                MatrixBlockRef {
                    data: self.data.clone(),
                    start,
                    rows,
                    cols,
                    ld,
                }
            }
        }

        impl<T: Real> $ty<T> {
            pub fn rows(&self) -> usize {
                self.layout().1
            }

            pub fn cols(&self) -> usize {
                self.layout().2
            }

            /// `(rows, cols)`
            pub fn shape(&self) -> (usize, usize) {
                let (_, rows, cols, _) = self.layout();
                (rows, cols)
            }

            pub fn is_empty(&self) -> bool {
                self.rows() == 0 || self.cols() == 0
            }

            fn row_strided(&self, row: usize) -> Strided<'_, T> {
                let (start, _, cols, ld) = self.layout();
                Strided::new(&self.data, start + row * ld, cols, 1)
            }

            fn rows_strided(&self) -> impl Iterator<Item = Strided<'_, T>> {
                (0..self.rows()).map(|row| self.row_strided(row))
            }

            /// Returns the element at `(row, col)`.
            pub fn get(&self, row: usize, col: usize) -> Result<T, Error> {
                ensure_index(row, self.rows())?;
                self.row_strided(row).cell(col).map(Cell::get)
            }

            /// A read-only view of row `row`.
            pub fn row(&self, row: usize) -> Result<VectorSliceRef<T>, Error> {
                let (start, rows, cols, ld) = self.layout();
                ensure_index(row, rows)?;
                Ok(VectorSliceRef::from_raw(self.data.clone(), start + row * ld, cols, 1))
            }

            /// A read-only view of column `col`.
            pub fn column(&self, col: usize) -> Result<VectorSliceRef<T>, Error> {
                let (start, rows, cols, ld) = self.layout();
                ensure_index(col, cols)?;
                Ok(VectorSliceRef::from_raw(self.data.clone(), start + col, rows, ld))
            }

            /// A read-only view of the `rows x cols` block whose top-left
            /// corner is `(row, col)`.
            pub fn block(
                &self,
                row: usize,
                col: usize,
                rows: usize,
                cols: usize,
            ) -> Result<MatrixBlockRef<T>, Error> {
                let (start, nrows, ncols, ld) = self.layout();
                ensure_range(row, row + rows, nrows)?;
                ensure_range(col, col + cols, ncols)?;
                Ok(MatrixBlockRef {
                    data: self.data.clone(),
                    start: start + row * ld + col,
                    rows,
                    cols,
                    ld,
                })
            }

            /// Elements in row-major order.
            pub fn to_vec(&self) -> Vec<T> {
                self.rows_strided().flat_map(Strided::iter).collect()
            }

            /// Copies the elements into a new, tightly allocated matrix.
            pub fn to_owned(&self) -> DynMatrix<T> {
                DynMatrix {
                    data: buffer::from_values(self.to_vec()),
                    rows: self.rows(),
                    cols: self.cols(),
                }
            }

            pub fn transpose(&self) -> DynMatrix<T> {
                let (rows, cols) = self.shape();
                let out = DynMatrix::zeros(cols, rows);
                for (i, row) in self.rows_strided().enumerate() {
                    backend::copy(row, Strided::new(&out.data, i, cols, rows));
                }
                out
            }

            /// Dense product `self * rhs`.
            pub fn mul(&self, rhs: &impl AsMatrix<T>) -> Result<DynMatrix<T>, Error> {
                let rhs = rhs.as_block();
                let (m, k) = self.shape();
                let (rk, n) = rhs.shape();
                ensure_size(k, rk)?;
                if m == 0 || n == 0 || k == 0 {
                    return Ok(DynMatrix::zeros(m, n));
                }
                let mut out = vec![T::zero(); m * n];
                T::matmul(&mut out, &self.to_vec(), &rhs.to_vec(), m, k, n);
                Ok(DynMatrix {
                    data: buffer::from_values(out),
                    rows: m,
                    cols: n,
                })
            }

            /// Matrix-vector product `self * x`.
            pub fn mul_vector(&self, x: &impl AsStrided<T>) -> Result<DynVector<T>, Error> {
                let x = x.as_strided();
                ensure_size(self.cols(), x.len())?;
                Ok(self.rows_strided().map(|row| backend::dot(row, x)).collect())
            }

            /// False if any element is NaN or infinite.
            pub fn is_finite(&self) -> bool {
                self.rows_strided().all(backend::is_finite)
            }

            /// Induced infinity norm, the largest absolute row sum.
            pub fn norm_inf(&self) -> T {
                self.rows_strided()
                    .map(backend::asum)
                    .fold(T::zero(), |acc, sum| if sum > acc || sum.is_nan() { sum } else { acc })
            }
        }

        impl<T: Real> fmt::Display for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for (i, row) in self.rows_strided().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    for (j, v) in row.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", v)?;
                    }
                }
                Ok(())
            }
        }

        impl<T: Real> fmt::Debug for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut list = f.debug_list();
                for row in self.rows_strided() {
                    list.entry(&row.iter().collect::<Vec<_>>());
                }
                list.finish()
            }
        }
    };
}

macro_rules! impl_matrix_write {
    ($ty:ident) => {
        impl<T: Real> $ty<T> {
            /// Overwrites the element at `(row, col)`.
            pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), Error> {
                ensure_index(row, self.rows())?;
                self.row_strided(row).cell(col)?.set(value);
                Ok(())
            }

            pub fn fill(&mut self, value: T) {
                for row in self.rows_strided() {
                    row.cells().for_each(|cell| cell.set(value));
                }
            }

            /// `self <- alpha * self`
            pub fn scale(&mut self, alpha: T) -> &mut Self {
                for row in self.rows_strided() {
                    backend::scal(alpha, row);
                }
                self
            }

            /// Overwrites every element with the matching element of `src`.
            pub fn copy_from(&mut self, src: &impl AsMatrix<T>) -> Result<(), Error> {
                let src = src.as_block();
                ensure_size(self.rows(), src.rows())?;
                ensure_size(self.cols(), src.cols())?;
                let staged = src.to_vec();
                let cols = self.cols();
                for (row, values) in self.rows_strided().zip(staged.chunks(cols.max(1))) {
                    row.cells().zip(values).for_each(|(cell, v)| cell.set(*v));
                }
                Ok(())
            }

            /// A mutable view of row `row`.
            pub fn row_mut(&mut self, row: usize) -> Result<VectorSlice<T>, Error> {
                let (start, rows, cols, ld) = self.layout();
                ensure_index(row, rows)?;
                Ok(VectorSlice::from_raw(self.data.clone(), start + row * ld, cols, 1))
            }

            /// A mutable view of column `col`.
            pub fn column_mut(&mut self, col: usize) -> Result<VectorSlice<T>, Error> {
                let (start, rows, cols, ld) = self.layout();
                ensure_index(col, cols)?;
                Ok(VectorSlice::from_raw(self.data.clone(), start + col, rows, ld))
            }

            /// A mutable view of the `rows x cols` block whose top-left corner
            /// is `(row, col)`.
            pub fn block_mut(
                &mut self,
                row: usize,
                col: usize,
                rows: usize,
                cols: usize,
            ) -> Result<MatrixBlock<T>, Error> {
                let (start, nrows, ncols, ld) = self.layout();
                ensure_range(row, row + rows, nrows)?;
                ensure_range(col, col + cols, ncols)?;
                Ok(MatrixBlock {
                    data: self.data.clone(),
                    start: start + row * ld + col,
                    rows,
                    cols,
                    ld,
                })
            }
        }
    };
}

impl_matrix_read!(DynMatrix);
impl_matrix_read!(MatrixBlock);
impl_matrix_read!(MatrixBlockRef);
impl_matrix_write!(DynMatrix);
impl_matrix_write!(MatrixBlock);

impl<T: Real> DynMatrix<T> {
    fn layout(&self) -> (usize, usize, usize, usize) {
        (0, self.rows, self.cols, self.cols)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        DynMatrix {
            data: buffer::zeroed(rows * cols),
            rows,
            cols,
        }
    }

    pub fn identity(n: usize) -> Self {
        let out = DynMatrix::zeros(n, n);
        Strided::new(&out.data, 0, n, n + 1)
            .cells()
            .for_each(|cell| cell.set(T::one()));
        out
    }

    /// Builds a `rows x cols` matrix from elements listed row by row.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[T]) -> Result<Self, Error> {
        ensure_size(rows * cols, values.len())?;
        Ok(DynMatrix {
            data: buffer::from_values(values.iter().copied()),
            rows,
            cols,
        })
    }

    /// A single-column matrix holding `x`.
    pub fn from_column(x: &impl AsStrided<T>) -> Self {
        let x = x.as_strided();
        DynMatrix {
            data: buffer::from_values(x.iter()),
            rows: x.len(),
            cols: 1,
        }
    }

    /// Number of elements the current buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Changes the shape to `rows x cols`.
    ///
    /// The buffer is only replaced when `rows * cols` exceeds the capacity.
    /// With `preserve` set the overlapping top-left block keeps its values and
    /// the rest is zeroed; otherwise the contents are unspecified.
    pub fn resize(&mut self, rows: usize, cols: usize, preserve: bool) -> &mut Self {
        if rows == self.rows && cols == self.cols {
            return self;
        }
        let kept = preserve.then(|| self.to_owned());
        let len = rows * cols;
        if len > self.capacity() {
            tracing::trace!(
                from = self.capacity(),
                to = len,
                preserve,
                "reallocating matrix storage"
            );
            self.data = buffer::zeroed(len);
        }
        self.rows = rows;
        self.cols = cols;
        if let Some(old) = kept {
            self.fill(T::zero());
            let keep_cols = cols.min(old.cols);
            for row in 0..rows.min(old.rows) {
                backend::copy(
                    Strided::new(&old.data, row * old.cols, keep_cols, 1),
                    Strided::new(&self.data, row * cols, keep_cols, 1),
                );
            }
        }
        self
    }

    /// Shrinks the capacity down to `rows * cols`, keeping the contents.
    pub fn compress(&mut self) {
        if self.rows * self.cols == self.capacity() {
            return;
        }
        tracing::trace!(
            from = self.capacity(),
            to = self.rows * self.cols,
            "compressing matrix storage"
        );
        let data = buffer::from_values(self.to_vec());
        self.data = data;
    }
}

impl<T: Real> MatrixBlock<T> {
    fn layout(&self) -> (usize, usize, usize, usize) {
        (self.start, self.rows, self.cols, self.ld)
    }
}

impl<T: Real> MatrixBlockRef<T> {
    fn layout(&self) -> (usize, usize, usize, usize) {
        (self.start, self.rows, self.cols, self.ld)
    }
}

impl<T: Real> Clone for DynMatrix<T> {
    /// Deep copy: the clone gets its own buffer.
    fn clone(&self) -> Self {
        self.to_owned()
    }
}

impl<T: Real> PartialEq for DynMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_vec() == other.to_vec()
    }
}

impl<T: Real> TryFrom<&DynMatrix<T>> for DynVector<T> {
    type Error = Error;

    /// Row and column matrices flatten into a vector; any other shape is
    /// rejected.
    fn try_from(m: &DynMatrix<T>) -> Result<Self, Error> {
        if m.rows != 1 && m.cols != 1 {
            return Err(Error::StorageMismatch(
                format!("cannot view a {}x{} matrix as a vector", m.rows, m.cols).into(),
            ));
        }
        Ok(m.to_vec().into())
    }
}
