//! Joint kinematics.
//!
//! A joint sits between an inboard and an outboard link. It owns two frames:
//! the joint frame, fixed relative to the inboard link through the reference
//! pose, and the induced frame, which moves with the generalized coordinates
//! `q`. Joint axes and their derivatives are reported as spatial motions in
//! the joint frame.
mod spherical;

pub use spherical::*;

use kine_array::{AsStrided, DynVector, VectorSlice, ensure_size};
use nalgebra::Rotation3;

use crate::frame::ensure_frame;
use crate::{Error, FrameId, FrameRegistry, RigidLink, Scalar, SpatialMotion, Transform};

/// Selects one of the axes of a multi-axis joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    First,
    Second,
    Third,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::First, Axis::Second, Axis::Third];

    /// Zero-based position of the axis, which is also the index of its
    /// generalized coordinate.
    pub fn index(self) -> usize {
        match self {
            Axis::First => 0,
            Axis::Second => 1,
            Axis::Third => 2,
        }
    }
}

/// State shared by every joint type.
///
/// `q` and `qd` are views: by default each points at storage private to the
/// joint, and [`JointCore::bind_coordinates`] repoints them into an external
/// generalized coordinate vector so that the joint reads the current values
/// on every query.
pub struct JointCore<T> {
    num_dof: usize,
    frame: FrameId,
    induced: FrameId,
    inboard: Option<FrameId>,
    outboard: Option<FrameId>,
    reference_pose: Option<Transform<T>>,
    q: VectorSlice<T>,
    qd: VectorSlice<T>,
    q_tare: DynVector<T>,
    s: Vec<SpatialMotion<T>>,
    s_dot: Vec<SpatialMotion<T>>,
}

impl<T: Scalar> JointCore<T> {
    /// Registers the joint frame as `label` and the induced frame as
    /// `label/induced`.
    pub fn new(frames: &mut FrameRegistry, label: &str, num_dof: usize) -> Self {
        JointCore {
            num_dof,
            frame: frames.create(label),
            induced: frames.create(format!("{label}/induced")),
            inboard: None,
            outboard: None,
            reference_pose: None,
            q: DynVector::zeros(num_dof).as_slice_mut(),
            qd: DynVector::zeros(num_dof).as_slice_mut(),
            q_tare: DynVector::zeros(num_dof),
            s: Vec::with_capacity(num_dof),
            s_dot: Vec::with_capacity(num_dof),
        }
    }

    pub fn num_dof(&self) -> usize {
        self.num_dof
    }

    /// The joint frame.
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// The frame carried along by the joint motion.
    pub fn induced_frame(&self) -> FrameId {
        self.induced
    }

    pub fn inboard(&self) -> Option<FrameId> {
        self.inboard
    }

    pub fn outboard(&self) -> Option<FrameId> {
        self.outboard
    }

    /// Attaches the inboard link. A reference pose into another frame is
    /// dropped.
    pub fn attach_inboard(&mut self, link: &impl RigidLink) {
        let frame = link.frame();
        if self
            .reference_pose
            .is_some_and(|pose| pose.target() != frame)
        {
            self.reference_pose = None;
        }
        self.inboard = Some(frame);
    }

    pub fn attach_outboard(&mut self, link: &impl RigidLink) {
        self.outboard = Some(link.frame());
    }

    pub fn reference_pose(&self) -> Option<&Transform<T>> {
        self.reference_pose.as_ref()
    }

    /// Sets the fixed pose of the joint frame in the inboard frame.
    pub fn set_reference_pose(&mut self, pose: Transform<T>) -> Result<(), Error> {
        let inboard = self
            .inboard
            .ok_or(Error::Config("joint has no inboard link".into()))?;
        ensure_frame(self.frame, pose.source())?;
        ensure_frame(inboard, pose.target())?;
        self.reference_pose = Some(pose);
        Ok(())
    }

    pub fn q(&self) -> &VectorSlice<T> {
        &self.q
    }

    pub fn qd(&self) -> &VectorSlice<T> {
        &self.qd
    }

    pub fn q_tare(&self) -> &DynVector<T> {
        &self.q_tare
    }

    /// Writes the generalized coordinates, through to the bound store if any.
    pub fn set_q(&mut self, q: &impl AsStrided<T>) -> Result<(), Error> {
        Ok(self.q.copy_from(q)?)
    }

    /// Writes the generalized velocities, through to the bound store if any.
    pub fn set_qd(&mut self, qd: &impl AsStrided<T>) -> Result<(), Error> {
        Ok(self.qd.copy_from(qd)?)
    }

    /// Sets the offsets added to `q` before use.
    pub fn set_q_tare(&mut self, tare: &impl AsStrided<T>) -> Result<(), Error> {
        Ok(self.q_tare.copy_from(tare)?)
    }

    /// Reads `q` and `qd` from the given views from now on.
    pub fn bind_coordinates(&mut self, q: VectorSlice<T>, qd: VectorSlice<T>) -> Result<(), Error> {
        ensure_size(self.num_dof, q.len())?;
        ensure_size(self.num_dof, qd.len())?;
        self.q = q;
        self.qd = qd;
        Ok(())
    }

    /// `q[i] + q_tare[i]`
    pub fn coordinate(&self, i: usize) -> Result<T, Error> {
        Ok(self.q.get(i)? + self.q_tare.get(i)?)
    }

    pub fn rate(&self, i: usize) -> Result<T, Error> {
        Ok(self.qd.get(i)?)
    }

    pub(crate) fn ensure_attached(&self) -> Result<(), Error> {
        if self.inboard.is_none() {
            return Err(Error::Config("joint has no inboard link".into()));
        }
        if self.outboard.is_none() {
            return Err(Error::Config("joint has no outboard link".into()));
        }
        Ok(())
    }

    pub(crate) fn cache_axes(
        &mut self,
        axes: impl IntoIterator<Item = SpatialMotion<T>>,
    ) -> &[SpatialMotion<T>] {
        self.s.clear();
        self.s.extend(axes);
        &self.s
    }

    pub(crate) fn cache_axes_dot(
        &mut self,
        axes_dot: impl IntoIterator<Item = SpatialMotion<T>>,
    ) -> &[SpatialMotion<T>] {
        self.s_dot.clear();
        self.s_dot.extend(axes_dot);
        &self.s_dot
    }
}

/// Kinematic behaviour of a joint type.
pub trait Joint<T: Scalar> {
    fn core(&self) -> &JointCore<T>;

    fn core_mut(&mut self) -> &mut JointCore<T>;

    fn num_dof(&self) -> usize {
        self.core().num_dof()
    }

    /// One spatial axis per degree of freedom, in the joint frame, at the
    /// current `q`.
    fn spatial_axes(&mut self) -> Result<&[SpatialMotion<T>], Error>;

    /// Time derivatives of [`Joint::spatial_axes`] at the current `q` and
    /// `qd`.
    fn spatial_axes_dot(&mut self) -> Result<&[SpatialMotion<T>], Error>;

    /// Rotation of the induced frame relative to the joint frame.
    fn rotation(&self) -> Result<Rotation3<T>, Error>;

    /// Pose of the induced frame in the joint frame.
    fn induced_pose(&self) -> Result<Transform<T>, Error>;

    /// Recovers `q` from the poses of the inboard and outboard links.
    fn determine_q(
        &self,
        inboard_pose: &Transform<T>,
        outboard_pose: &Transform<T>,
    ) -> Result<DynVector<T>, Error>;

    /// Pose of the induced frame in the inboard frame.
    fn pose_in_inboard(&self) -> Result<Transform<T>, Error> {
        let reference = self
            .core()
            .reference_pose()
            .ok_or(Error::Config("joint has no reference pose".into()))?;
        reference.compose(&self.induced_pose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pose_frames() {
        let mut frames = FrameRegistry::new();
        let base = frames.create("base");
        let mut core = JointCore::<f64>::new(&mut frames, "hinge", 1);
        let pose = Transform::identity(core.frame());
        assert!(matches!(core.set_reference_pose(pose), Err(Error::Config(_))));

        core.attach_inboard(&base);
        assert_eq!(
            core.set_reference_pose(pose),
            Err(Error::FrameMismatch {
                expected: base,
                found: core.frame()
            })
        );
        let pose = Transform::from_translation(core.frame(), base, nalgebra::vector![0.0, 0.0, 1.0]);
        core.set_reference_pose(pose).unwrap();
        assert_eq!(core.reference_pose(), Some(&pose));

        core.attach_inboard(&frames.world());
        assert_eq!(core.reference_pose(), None);
    }

    #[test]
    fn test_bound_coordinates() {
        let mut frames = FrameRegistry::new();
        let mut core = JointCore::<f64>::new(&mut frames, "ball", 3);
        let mut state = DynVector::zeros(8);
        core.bind_coordinates(state.segment_mut(1, 4).unwrap(), state.segment_mut(4, 7).unwrap())
            .unwrap();
        state.set(2, 0.5).unwrap();
        assert_eq!(core.q().get(1), Ok(0.5));
        core.set_qd(&DynVector::from_array([1.0, 2.0, 3.0])).unwrap();
        assert_eq!(state.get(6), Ok(3.0));

        core.set_q_tare(&DynVector::from_array([0.0, 0.25, 0.0])).unwrap();
        assert_eq!(core.coordinate(1), Ok(0.75));
        assert!(core.set_q_tare(&DynVector::from_array([0.0])).is_err());
        assert!(core
            .bind_coordinates(state.segment_mut(0, 2).unwrap(), state.segment_mut(2, 5).unwrap())
            .is_err());
    }

    #[test]
    #[cfg(not(feature = "unchecked"))]
    fn test_bind_rejects_wrong_length() {
        let mut frames = FrameRegistry::new();
        let mut core = JointCore::<f64>::new(&mut frames, "ball", 3);
        let mut state = DynVector::zeros(7);
        assert_eq!(
            core.bind_coordinates(state.segment_mut(0, 3).unwrap(), state.segment_mut(3, 7).unwrap()),
            Err(Error::Array(kine_array::Error::SizeMismatch {
                expected: 3,
                found: 4
            }))
        );
        assert_eq!(core.q().len(), 3);
    }
}
