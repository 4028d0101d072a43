//! Rotation helpers shared by the transform layer and the joints.
use nalgebra::{Rotation3, Unit, Vector3};
use num_traits::Float;

use crate::Scalar;

/// Rotation by `angle` radians about `axis`, which is normalized first.
pub fn axis_angle<T: Scalar>(axis: &Vector3<T>, angle: T) -> Rotation3<T> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle)
}

/// Completes the unit vector `a` to a right-handed orthonormal triad
/// `(a, b, c)`.
///
/// `e` is the coordinate axis along which `a` has the smallest absolute
/// component, the first one on ties. Then `b = normalize(a × e)` and
/// `c = a × b`.
pub fn complete_basis<T: Scalar>(a: &Vector3<T>) -> (Vector3<T>, Vector3<T>) {
    let mut k = 0;
    for i in 1..3 {
        if Float::abs(a[i]) < Float::abs(a[k]) {
            k = i;
        }
    }
    let e = Vector3::ith(k, T::one());
    let b = a.cross(&e).normalize();
    let c = a.cross(&b);
    (b, c)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::vector;

    use super::*;

    #[test]
    fn test_complete_basis_z() {
        let (b, c) = complete_basis(&vector![0.0, 0.0, 1.0]);
        assert_relative_eq!(b, vector![0.0, 1.0, 0.0]);
        assert_relative_eq!(c, vector![-1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_complete_basis_oblique() {
        let a = vector![1.0, 2.0, -0.5f64].normalize();
        let (b, c) = complete_basis(&a);
        assert_relative_eq!(a.dot(&b), 0.0, epsilon = 1e-12);
        assert_relative_eq!(a.dot(&c), 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.dot(&c), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(a.dot(&b.cross(&c)), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_angle() {
        let r = axis_angle(&vector![0.0, 0.0, 1.0], std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(r * vector![1.0, 0.0, 0.0], vector![0.0, 1.0, 0.0], epsilon = 1e-12);
    }

    #[test]
    fn test_axis_angle_normalizes_axis() {
        let r = axis_angle(&vector![0.0, 0.0, 3.0], std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(r, axis_angle(&vector![0.0, 0.0, 1.0], std::f64::consts::FRAC_PI_2), epsilon = 1e-12);
        assert_relative_eq!(r.matrix().determinant(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.matrix() * r.matrix().transpose(), nalgebra::Matrix3::identity(), epsilon = 1e-12);
    }
}
