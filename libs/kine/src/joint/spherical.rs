//! Three degree of freedom ball joint.
use kine_array::DynVector;
use nalgebra::{Rotation3, Vector3};
use num_traits::Float;

use super::{Axis, Joint, JointCore};
use crate::{Error, FrameRegistry, Scalar, SpatialMotion, Transform, axis_angle, complete_basis};

/// Outcome of setting a spherical joint axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisCompletion {
    /// All three axes are known.
    Complete,
    /// No axis has been given yet; the joint cannot be evaluated.
    Unconfigured,
}

/// A ball joint parameterized by three successive rotations.
///
/// The first axis is fixed in the joint frame. The second is its base
/// direction turned about the first by `q[0]`. The third is its base direction
/// turned about the base second axis by `q[1]`, then about the first by
/// `q[0]`. The induced rotation is `R1 * R2 * R3`. Tares are added to `q`
/// before any of these rotations.
///
/// The parameterization degenerates when the current axes become coplanar,
/// which happens at `q[1] = ±π/2` for an orthonormal triad; see
/// [`SphericalJoint::is_singular`].
pub struct SphericalJoint<T: Scalar> {
    core: JointCore<T>,
    axes: [Vector3<T>; 3],
    specified: [bool; 3],
    singular_tol: T,
}

impl<T: Scalar> SphericalJoint<T> {
    pub fn new(frames: &mut FrameRegistry, label: &str) -> Self {
        SphericalJoint {
            core: JointCore::new(frames, label, 3),
            axes: [Vector3::zeros(); 3],
            specified: [false; 3],
            singular_tol: nalgebra::convert(1e-2),
        }
    }

    /// Sets the triple product magnitude below which the joint reports itself
    /// singular.
    pub fn with_singular_tol(mut self, singular_tol: T) -> Self {
        self.singular_tol = singular_tol;
        self
    }

    pub fn singular_tol(&self) -> T {
        self.singular_tol
    }

    /// Sets one axis, in joint frame coordinates, and re-derives the axes that
    /// were not given.
    ///
    /// Non-unit input is normalized. A zero vector withdraws the axis. With a
    /// single axis given, the other two complete it as in
    /// [`complete_basis`], assigned in cyclic order after it. With two given,
    /// they must be orthogonal and the third is their cross product in cyclic
    /// order. Three given axes are used as they are. On error the joint is
    /// left unchanged.
    pub fn set_axis(&mut self, which: Axis, axis: Vector3<T>) -> Result<AxisCompletion, Error> {
        let (axes, specified) = (self.axes, self.specified);
        let i = which.index();
        let norm = axis.norm();
        if norm == T::zero() {
            self.specified[i] = false;
        } else {
            self.axes[i] = axis / norm;
            self.specified[i] = true;
        }
        self.complete_axes().inspect_err(|_| {
            self.axes = axes;
            self.specified = specified;
        })
    }

    fn complete_axes(&mut self) -> Result<AxisCompletion, Error> {
        let given = self.specified.iter().filter(|s| **s).count();
        match given {
            0 => {
                self.axes = [Vector3::zeros(); 3];
                return Ok(AxisCompletion::Unconfigured);
            }
            1 => {
                let i = self.given_index(true);
                let (b, c) = complete_basis(&self.axes[i]);
                self.axes[(i + 1) % 3] = b;
                self.axes[(i + 2) % 3] = c;
            }
            2 => {
                let k = self.given_index(false);
                let (a, b) = (self.axes[(k + 1) % 3], self.axes[(k + 2) % 3]);
                let third = a.cross(&b);
                let norm = third.norm();
                if norm < T::EPS {
                    return Err(Error::Config("spherical joint axes are parallel".into()));
                }
                if Float::abs(a.dot(&b)) >= Float::sqrt(T::EPS) {
                    return Err(Error::Config("spherical joint axes are not orthogonal".into()));
                }
                self.axes[k] = third / norm;
            }
            _ => {}
        }
        debug_assert!(
            self.is_orthonormal(),
            "spherical joint axes must be orthonormal"
        );
        tracing::debug!(given, "completed spherical joint axes");
        Ok(AxisCompletion::Complete)
    }

    fn given_index(&self, specified: bool) -> usize {
        self.specified
            .iter()
            .position(|s| *s == specified)
            .unwrap_or_default()
    }

    fn is_orthonormal(&self) -> bool {
        let tol = Float::sqrt(T::EPS);
        let unit = self.axes.iter().all(|a| Float::abs(a.norm() - T::one()) < tol);
        let orthogonal = (0..3).all(|i| Float::abs(self.axes[i].dot(&self.axes[(i + 1) % 3])) < tol);
        unit && orthogonal
    }

    /// True once at least one axis has been given.
    pub fn is_configured(&self) -> bool {
        self.specified.contains(&true)
    }

    /// Whether `which` was given explicitly rather than derived.
    pub fn is_specified(&self, which: Axis) -> bool {
        self.specified[which.index()]
    }

    /// Base direction of `which` in the joint frame, at `q = 0`. Zero while
    /// the joint is unconfigured.
    pub fn base_axis(&self, which: Axis) -> Vector3<T> {
        self.axes[which.index()]
    }

    /// Current direction of `which` in the joint frame.
    pub fn axis(&self, which: Axis) -> Result<Vector3<T>, Error> {
        Ok(self.current_axes()?[which.index()])
    }

    /// True when the current axes are within the singularity tolerance of
    /// being linearly dependent.
    pub fn is_singular(&self) -> Result<bool, Error> {
        let [u1, u2, u3] = self.current_axes()?;
        Ok(Float::abs(u1.dot(&u2.cross(&u3))) < self.singular_tol)
    }

    fn ensure_configured(&self) -> Result<(), Error> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(Error::Config("spherical joint axes are not set".into()))
        }
    }

    fn rotations(&self) -> Result<[Rotation3<T>; 3], Error> {
        self.ensure_configured()?;
        let mut rotations = [Rotation3::identity(); 3];
        for (i, rotation) in rotations.iter_mut().enumerate() {
            *rotation = axis_angle(&self.axes[i], self.core.coordinate(i)?);
        }
        Ok(rotations)
    }

    fn current_axes(&self) -> Result<[Vector3<T>; 3], Error> {
        let [r1, r2, _] = self.rotations()?;
        let [a1, a2, a3] = self.axes;
        Ok([a1, r1 * a2, r1 * (r2 * a3)])
    }
}

impl<T: Scalar> Joint<T> for SphericalJoint<T> {
    fn core(&self) -> &JointCore<T> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut JointCore<T> {
        &mut self.core
    }

    fn spatial_axes(&mut self) -> Result<&[SpatialMotion<T>], Error> {
        self.core.ensure_attached()?;
        let axes = self.current_axes()?;
        let frame = self.core.frame();
        Ok(self
            .core
            .cache_axes(axes.map(|u| SpatialMotion::from_angular(frame, u))))
    }

    fn spatial_axes_dot(&mut self) -> Result<&[SpatialMotion<T>], Error> {
        self.core.ensure_attached()?;
        let [r1, r2, _] = self.rotations()?;
        let [a1, a2, a3] = self.axes;
        let w1 = a1 * self.core.rate(0)?;
        let w2 = a2 * self.core.rate(1)?;
        let r2a3 = r2 * a3;
        let derivatives = [
            Vector3::zeros(),
            w1.cross(&(r1 * a2)),
            w1.cross(&(r1 * r2a3)) + r1 * w2.cross(&r2a3),
        ];
        let frame = self.core.frame();
        Ok(self
            .core
            .cache_axes_dot(derivatives.map(|d| SpatialMotion::from_angular(frame, d))))
    }

    fn rotation(&self) -> Result<Rotation3<T>, Error> {
        let [r1, r2, r3] = self.rotations()?;
        Ok(r1 * r2 * r3)
    }

    fn induced_pose(&self) -> Result<Transform<T>, Error> {
        Ok(Transform::from_rotation(
            self.core.induced_frame(),
            self.core.frame(),
            self.rotation()?,
        ))
    }

    fn determine_q(
        &self,
        _inboard_pose: &Transform<T>,
        _outboard_pose: &Transform<T>,
    ) -> Result<DynVector<T>, Error> {
        tracing::warn!("recovering coordinates from poses is not implemented for spherical joints");
        Err(Error::Unsupported(
            "spherical joint cannot determine q from poses".into(),
        ))
    }
}
