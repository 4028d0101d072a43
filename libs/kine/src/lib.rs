//! Frames, transforms, spatial vectors and joint kinematics for rigid-body
//! dynamics.
//!
//! Every geometric quantity is tagged with the [`FrameId`] it is expressed in,
//! and operations that combine quantities check those tags at runtime.
//! Spatial quantities follow Featherstone's notation: [`SpatialMotion`]
//! (velocities, accelerations, joint axes) and [`SpatialForce`] (forces,
//! momenta) are separate types, and the only product between them is the
//! motion/force pairing.
mod error;
mod frame;
mod geometry;
pub mod joint;
mod spatial;
mod transform;

pub use error::*;
pub use frame::*;
pub use geometry::*;
pub use spatial::*;
pub use transform::*;

pub use kine_array;
pub use nalgebra;

use kine_array::Real;
use nalgebra::RealField;

/// Scalar types usable by the kinematics layer: the array kernel's [`Real`]
/// plus nalgebra's [`RealField`]. Implemented for `f32` and `f64`.
pub trait Scalar: Real + RealField {}

impl<T: Real + RealField> Scalar for T {}
