//! Rigid transforms between frames.
use std::fmt;

use nalgebra::{Point3, Rotation3, Vector3};

use crate::frame::ensure_frame;
use crate::{Error, FrameId, Scalar, SpatialForce, SpatialMotion};

/// A rigid transform mapping coordinates expressed in `source` to coordinates
/// expressed in `target`: `x_target = rotation * x_source + translation`.
///
/// `translation` is the origin of `source` expressed in `target`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "T: nalgebra::Scalar + serde::Serialize",
        deserialize = "T: nalgebra::Scalar + serde::Deserialize<'de>"
    ))
)]
pub struct Transform<T> {
    rotation: Rotation3<T>,
    translation: Vector3<T>,
    source: FrameId,
    target: FrameId,
}

impl<T: Scalar> Transform<T> {
    pub fn new(
        source: FrameId,
        target: FrameId,
        rotation: Rotation3<T>,
        translation: Vector3<T>,
    ) -> Self {
        Transform {
            rotation,
            translation,
            source,
            target,
        }
    }

    /// The identity on `frame`.
    pub fn identity(frame: FrameId) -> Self {
        Transform::new(frame, frame, Rotation3::identity(), Vector3::zeros())
    }

    pub fn from_rotation(source: FrameId, target: FrameId, rotation: Rotation3<T>) -> Self {
        Transform::new(source, target, rotation, Vector3::zeros())
    }

    pub fn from_translation(source: FrameId, target: FrameId, translation: Vector3<T>) -> Self {
        Transform::new(source, target, Rotation3::identity(), translation)
    }

    pub fn rotation(&self) -> &Rotation3<T> {
        &self.rotation
    }

    pub fn translation(&self) -> &Vector3<T> {
        &self.translation
    }

    pub fn source(&self) -> FrameId {
        self.source
    }

    pub fn target(&self) -> FrameId {
        self.target
    }

    /// `self ∘ inner`: applies `inner` first, then `self`.
    ///
    /// Fails unless `inner` lands in the frame `self` starts from.
    pub fn compose(&self, inner: &Transform<T>) -> Result<Transform<T>, Error> {
        ensure_frame(self.source, inner.target)?;
        Ok(Transform::new(
            inner.source,
            self.target,
            self.rotation * inner.rotation,
            self.rotation * inner.translation + self.translation,
        ))
    }

    pub fn inverse(&self) -> Transform<T> {
        let rotation = self.rotation.inverse();
        let translation = -(rotation * self.translation);
        Transform::new(self.target, self.source, rotation, translation)
    }

    /// Rotates then translates a point.
    pub fn transform_point(&self, point: &Point3<T>) -> Point3<T> {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    /// Rotates a free vector. Translation does not apply to directions.
    pub fn transform_vector(&self, vector: &Vector3<T>) -> Vector3<T> {
        self.rotation * vector
    }

    /// Re-expresses a motion given in `source` in `target`, moving the
    /// reference point to the origin of `target`.
    pub fn transform_motion(&self, motion: &SpatialMotion<T>) -> Result<SpatialMotion<T>, Error> {
        ensure_frame(self.source, motion.frame())?;
        let angular = self.rotation * motion.angular();
        let linear = self.rotation * motion.linear() + self.translation.cross(&angular);
        Ok(SpatialMotion::new(self.target, angular, linear))
    }

    /// Re-expresses a force given in `source` in `target`, moving the
    /// reference point to the origin of `target`.
    pub fn transform_force(&self, force: &SpatialForce<T>) -> Result<SpatialForce<T>, Error> {
        ensure_frame(self.source, force.frame())?;
        let linear = self.rotation * force.force();
        let torque = self.rotation * force.torque() + self.translation.cross(&linear);
        Ok(SpatialForce::new(self.target, linear, torque))
    }

    /// Componentwise comparison of rotation and translation within `tol`.
    ///
    /// Frames are ignored; this is meant for tests, not for deciding whether
    /// two transforms may be composed.
    pub fn rel_equal(&self, other: &Transform<T>, tol: T) -> bool {
        let rotations = self
            .rotation
            .matrix()
            .iter()
            .zip(other.rotation.matrix().iter());
        let translations = self.translation.iter().zip(other.translation.iter());
        rotations
            .chain(translations)
            .all(|(a, b)| T::rel_equal_tol(*a, *b, tol))
    }
}

impl<T: Scalar> PartialEq for Transform<T> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.rotation == other.rotation
            && self.translation == other.translation
    }
}

impl<T: Scalar> fmt::Display for Transform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} -> {}", self.source, self.target)?;
        let m = self.rotation.matrix();
        for r in 0..3 {
            writeln!(f, "{}, {}, {}", m[(r, 0)], m[(r, 1)], m[(r, 2)])?;
        }
        let p = &self.translation;
        write!(f, "{}, {}, {}", p.x, p.y, p.z)
    }
}
