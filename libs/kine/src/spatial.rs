//! Spatial vectors in Featherstone's notation.
//!
//! A spatial quantity is a pair of 3-vectors, the upper and the lower half,
//! expressed in a frame. Motion quantities ([`SpatialMotion`]) are laid out as
//! `[angular; linear]` and force quantities ([`SpatialForce`]) as
//! `[force; torque]`. The two are kept apart: the scalar product is only
//! defined between one of each, and pairs the halves crosswise,
//! `upper_m · lower_f + lower_m · upper_f`, which is the power
//! `ω · torque + v · force`.
use std::fmt;
use std::ops::{Mul, Neg};

use kine_array::DynVector;
use nalgebra::Vector3;

use crate::frame::ensure_frame;
use crate::{Error, FrameId, Scalar};

/// A 6D motion vector `[angular; linear]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "T: nalgebra::Scalar + serde::Serialize",
        deserialize = "T: nalgebra::Scalar + serde::Deserialize<'de>"
    ))
)]
pub struct SpatialMotion<T> {
    upper: Vector3<T>,
    lower: Vector3<T>,
    frame: FrameId,
}

/// A 6D force vector `[force; torque]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "T: nalgebra::Scalar + serde::Serialize",
        deserialize = "T: nalgebra::Scalar + serde::Deserialize<'de>"
    ))
)]
pub struct SpatialForce<T> {
    upper: Vector3<T>,
    lower: Vector3<T>,
    frame: FrameId,
}

pub type SpatialVelocity<T> = SpatialMotion<T>;
pub type SpatialAcceleration<T> = SpatialMotion<T>;
pub type SpatialMomentum<T> = SpatialForce<T>;

macro_rules! impl_spatial {
    ($ty:ident) => {
        impl<T: Scalar> $ty<T> {
            fn from_halves(frame: FrameId, upper: Vector3<T>, lower: Vector3<T>) -> Self {
                $ty {
                    upper,
                    lower,
                    frame,
                }
            }

            pub fn zero(frame: FrameId) -> Self {
                $ty::from_halves(frame, Vector3::zeros(), Vector3::zeros())
            }

            /// Reads the six components, upper half first.
            pub fn from_slice(frame: FrameId, values: &[T]) -> Result<Self, Error> {
                let &[u0, u1, u2, l0, l1, l2] = values else {
                    return Err(kine_array::Error::SizeMismatch {
                        expected: 6,
                        found: values.len(),
                    }
                    .into());
                };
                Ok($ty::from_halves(
                    frame,
                    Vector3::new(u0, u1, u2),
                    Vector3::new(l0, l1, l2),
                ))
            }

            /// The frame this quantity is expressed in.
            pub fn frame(&self) -> FrameId {
                self.frame
            }

            /// The six components, upper half first.
            pub fn to_array(&self) -> [T; 6] {
                let (u, l) = (self.upper, self.lower);
                [u.x, u.y, u.z, l.x, l.y, l.z]
            }

            pub fn to_vector(&self) -> DynVector<T> {
                DynVector::from_array(self.to_array())
            }

            pub fn checked_add(&self, other: &Self) -> Result<Self, Error> {
                ensure_frame(self.frame, other.frame)?;
                Ok($ty::from_halves(
                    self.frame,
                    self.upper + other.upper,
                    self.lower + other.lower,
                ))
            }

            pub fn checked_sub(&self, other: &Self) -> Result<Self, Error> {
                ensure_frame(self.frame, other.frame)?;
                Ok($ty::from_halves(
                    self.frame,
                    self.upper - other.upper,
                    self.lower - other.lower,
                ))
            }

            /// Componentwise comparison within `tol`, ignoring frames.
            pub fn rel_equal(&self, other: &Self, tol: T) -> bool {
                self.to_array()
                    .into_iter()
                    .zip(other.to_array())
                    .all(|(a, b)| T::rel_equal_tol(a, b, tol))
            }
        }

        impl<T: Scalar> Mul<T> for $ty<T> {
            type Output = $ty<T>;

            fn mul(self, rhs: T) -> Self::Output {
                $ty::from_halves(self.frame, self.upper * rhs, self.lower * rhs)
            }
        }

        impl<T: Scalar> Neg for $ty<T> {
            type Output = $ty<T>;

            fn neg(self) -> Self::Output {
                $ty::from_halves(self.frame, -self.upper, -self.lower)
            }
        }

        impl<T: Scalar> fmt::Display for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let [u0, u1, u2, l0, l1, l2] = self.to_array();
                write!(f, "{u0}, {u1}, {u2}, {l0}, {l1}, {l2} ({})", self.frame)
            }
        }
    };
}

impl_spatial!(SpatialMotion);
impl_spatial!(SpatialForce);

impl<T: Scalar> SpatialMotion<T> {
    pub fn new(frame: FrameId, angular: Vector3<T>, linear: Vector3<T>) -> Self {
        SpatialMotion::from_halves(frame, angular, linear)
    }

    pub fn from_angular(frame: FrameId, angular: Vector3<T>) -> Self {
        SpatialMotion::new(frame, angular, Vector3::zeros())
    }

    pub fn from_linear(frame: FrameId, linear: Vector3<T>) -> Self {
        SpatialMotion::new(frame, Vector3::zeros(), linear)
    }

    pub fn angular(&self) -> Vector3<T> {
        self.upper
    }

    pub fn linear(&self) -> Vector3<T> {
        self.lower
    }

    /// Power delivered by `force` along this motion. Both must be expressed in
    /// the same frame.
    pub fn dot(&self, force: &SpatialForce<T>) -> Result<T, Error> {
        ensure_frame(self.frame, force.frame)?;
        Ok(self.upper.dot(&force.lower) + self.lower.dot(&force.upper))
    }

    /// Motion cross product `self ×`.
    pub fn cross(&self, other: &SpatialMotion<T>) -> Result<SpatialMotion<T>, Error> {
        ensure_frame(self.frame, other.frame)?;
        let (w, v) = (self.angular(), self.linear());
        let angular = w.cross(&other.angular());
        let linear = w.cross(&other.linear()) + v.cross(&other.angular());
        Ok(SpatialMotion::new(self.frame, angular, linear))
    }

    /// Force cross product `self ×*`.
    pub fn cross_dual(&self, force: &SpatialForce<T>) -> Result<SpatialForce<T>, Error> {
        ensure_frame(self.frame, force.frame)?;
        let (w, v) = (self.angular(), self.linear());
        let torque = w.cross(&force.torque()) + v.cross(&force.force());
        let linear = w.cross(&force.force());
        Ok(SpatialForce::new(self.frame, linear, torque))
    }
}

impl<T: Scalar> SpatialForce<T> {
    pub fn new(frame: FrameId, force: Vector3<T>, torque: Vector3<T>) -> Self {
        SpatialForce::from_halves(frame, force, torque)
    }

    pub fn from_force(frame: FrameId, force: Vector3<T>) -> Self {
        SpatialForce::new(frame, force, Vector3::zeros())
    }

    pub fn from_torque(frame: FrameId, torque: Vector3<T>) -> Self {
        SpatialForce::new(frame, Vector3::zeros(), torque)
    }

    pub fn force(&self) -> Vector3<T> {
        self.upper
    }

    pub fn torque(&self) -> Vector3<T> {
        self.lower
    }

    /// Power delivered along `motion`. Both must be expressed in the same
    /// frame.
    pub fn dot(&self, motion: &SpatialMotion<T>) -> Result<T, Error> {
        motion.dot(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::vector;

    use super::*;
    use crate::FrameRegistry;

    #[test]
    fn test_cross_category_dot() {
        let mut frames = FrameRegistry::new();
        let body = frames.create("body");
        let v = SpatialMotion::new(body, vector![1.0, 2.0, 3.0], vector![4.0, 5.0, 6.0]);
        let f = SpatialForce::new(body, vector![1.0, 0.0, 0.0], vector![0.0, 2.0, 0.0]);
        // ω . torque + v . force
        assert_eq!(v.dot(&f), Ok(8.0));
        assert_eq!(f.dot(&v), Ok(8.0));
        // not the plain Euclidean product of the six components
        let euclid: f64 = v.to_array().iter().zip(f.to_array()).map(|(a, b)| a * b).sum();
        assert_eq!(euclid, 11.0);
    }

    #[test]
    fn test_frame_mismatch() {
        let mut frames = FrameRegistry::new();
        let a = frames.create("a");
        let b = frames.create("b");
        let v = SpatialMotion::<f64>::from_angular(a, vector![1.0, 0.0, 0.0]);
        let f = SpatialForce::<f64>::from_force(b, vector![1.0, 0.0, 0.0]);
        assert_eq!(
            v.dot(&f),
            Err(Error::FrameMismatch {
                expected: a,
                found: b
            })
        );
        assert!(f.dot(&v).is_err());
        assert!(v.checked_add(&SpatialMotion::zero(b)).is_err());
        assert!(v.cross(&SpatialMotion::zero(b)).is_err());
        assert!(v.cross_dual(&f).is_err());
    }

    #[test]
    fn test_cross_products() {
        let frames = FrameRegistry::new();
        let world = frames.world();
        let a = SpatialMotion::new(world, vector![0.0, 0.0, 1.0], vector![1.0, 0.0, 0.0]);
        let b = SpatialMotion::new(world, vector![1.0, 0.0, 0.0], vector![0.0, 1.0, 0.0]);
        let c = a.cross(&b).unwrap();
        assert_relative_eq!(c.angular(), vector![0.0, 1.0, 0.0]);
        assert_relative_eq!(c.linear(), vector![-1.0, 0.0, 0.0]);

        // ×* is the negative adjoint of ×
        let f = SpatialForce::new(world, vector![0.5, -1.0, 2.0], vector![1.0, 3.0, -1.0]);
        let lhs = a.cross(&b).unwrap().dot(&f).unwrap();
        let rhs = b.dot(&a.cross_dual(&f).unwrap()).unwrap();
        assert_relative_eq!(lhs, -rhs, epsilon = 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let frames = FrameRegistry::new();
        let world = frames.world();
        let a = SpatialMotion::from_slice(world, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(a.angular(), vector![1.0, 2.0, 3.0]);
        assert_eq!((a * 2.0).to_array(), [2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
        assert_eq!(a.checked_sub(&a).unwrap(), SpatialMotion::zero(world));
        assert_eq!((-a).checked_add(&a).unwrap(), SpatialMotion::zero(world));
        assert_eq!(a.to_vector().to_vec(), a.to_array().to_vec());
        assert!(SpatialMotion::<f64>::from_slice(world, &[1.0]).is_err());

        let f = SpatialForce::from_slice(world, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(f.force(), vector![1.0, 2.0, 3.0]);
        assert_eq!(f.torque(), vector![4.0, 5.0, 6.0]);
    }
}
