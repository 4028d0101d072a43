//! Scalar element types supported by the array kernel.
use core::fmt;
use core::str::FromStr;

use faer::Parallelism;
use num_traits::Float;

/// A real floating point element type.
///
/// Implemented for `f32` and `f64`. Everything generic in this crate and in the
/// kinematics crate is written against this trait.
pub trait Real: Float + Default + fmt::Debug + fmt::Display + FromStr + 'static {
    /// Relative tolerance used by the `rel_*` comparisons, the square root of
    /// machine epsilon.
    const EPS: Self;

    /// Parses one token of a vector literal.
    ///
    /// `inf`, `+inf`, `infinity` and their negations map to the infinities
    /// regardless of case. Tokens that are not numbers parse as zero rather than
    /// failing.
    fn parse_token(token: &str) -> Self {
        let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
        if unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity") {
            return if token.starts_with('-') {
                Self::neg_infinity()
            } else {
                Self::infinity()
            };
        }
        token.parse().unwrap_or_else(|_| Self::zero())
    }

    /// `out = lhs * rhs` for contiguous row-major operands of shape
    /// `(m, k) * (k, n)`.
    fn matmul(out: &mut [Self], lhs: &[Self], rhs: &[Self], m: usize, k: usize, n: usize);

    /// Relative equality: `|x - y| <= EPS * max(|x|, |y|, 1)`.
    fn rel_equal(x: Self, y: Self) -> bool {
        Self::rel_equal_tol(x, y, Self::EPS)
    }

    fn rel_equal_tol(x: Self, y: Self, tol: Self) -> bool {
        if x == y {
            return true;
        }
        (x - y).abs() <= tol * x.abs().max(y.abs()).max(Self::one())
    }
}

macro_rules! impl_real {
    ($t:ty, $eps:expr) => {
        impl Real for $t {
            const EPS: Self = $eps;

            fn matmul(out: &mut [Self], lhs: &[Self], rhs: &[Self], m: usize, k: usize, n: usize) {
                let lhs = faer::mat::from_row_major_slice(lhs, m, k);
                let rhs = faer::mat::from_row_major_slice(rhs, k, n);
                let out = faer::mat::from_row_major_slice_mut(out, m, n);
                faer::linalg::matmul::matmul(out, lhs, rhs, None, 1.0 as $t, Parallelism::None);
            }
        }
    };
}

impl_real!(f32, 3.452_669_8e-4);
impl_real!(f64, 1.490_116_119_384_765_6e-8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        assert_eq!(f64::parse_token("1.5"), 1.5);
        assert_eq!(f64::parse_token("-2e3"), -2000.0);
        assert_eq!(f64::parse_token("INF"), f64::INFINITY);
        assert_eq!(f64::parse_token("-Inf"), f64::NEG_INFINITY);
        assert_eq!(f32::parse_token("+infinity"), f32::INFINITY);
        assert_eq!(f64::parse_token("abc"), 0.0);
        assert_eq!(f64::parse_token("1.2.3"), 0.0);
    }

    #[test]
    fn test_rel_equal() {
        assert!(f64::rel_equal(1.0, 1.0 + 1e-10));
        assert!(!f64::rel_equal(1.0, 1.0 + 1e-6));
        assert!(f64::rel_equal(1e9, 1e9 + 1.0));
        assert!(f64::rel_equal(f64::INFINITY, f64::INFINITY));
    }

    #[test]
    fn test_matmul() {
        let lhs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let rhs = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let mut out = [0.0f64; 4];
        f64::matmul(&mut out, &lhs, &rhs, 2, 3, 2);
        assert_eq!(out, [4.0, 5.0, 10.0, 11.0]);
    }
}
