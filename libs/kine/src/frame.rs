//! Coordinate frame identities.
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::Error;

static NEXT_REGISTRY: AtomicU32 = AtomicU32::new(0);

/// Handle to a frame stored in a [`FrameRegistry`].
///
/// Equality is identity: two frames created separately never compare equal,
/// whatever their labels, and handles from different registries never
/// collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameId {
    registry: u32,
    index: usize,
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}.{}", self.registry, self.index)
    }
}

/// Arena of named frames. A new registry starts out holding `world`.
#[derive(Debug)]
pub struct FrameRegistry {
    id: u32,
    labels: Vec<String>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        FrameRegistry {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            labels: vec!["world".to_string()],
        }
    }

    /// The root frame every registry is created with.
    pub fn world(&self) -> FrameId {
        FrameId {
            registry: self.id,
            index: 0,
        }
    }

    /// Adds a frame. Labels are informational and need not be unique.
    pub fn create(&mut self, label: impl Into<String>) -> FrameId {
        let index = self.labels.len();
        self.labels.push(label.into());
        FrameId {
            registry: self.id,
            index,
        }
    }

    pub fn contains(&self, id: FrameId) -> bool {
        id.registry == self.id && id.index < self.labels.len()
    }

    /// The label `id` was created with, if it belongs to this registry.
    pub fn label(&self, id: FrameId) -> Option<&str> {
        if id.registry != self.id {
            return None;
        }
        self.labels.get(id.index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrameId, &str)> {
        self.labels.iter().enumerate().map(|(index, label)| {
            (
                FrameId {
                    registry: self.id,
                    index,
                },
                label.as_str(),
            )
        })
    }
}

impl Default for FrameRegistry {
    fn default() -> Self {
        FrameRegistry::new()
    }
}

/// A rigid body a joint can be attached to.
///
/// Joints only need the frame a link is expressed in; `FrameId` implements
/// this directly so bare frames can stand in for links.
pub trait RigidLink {
    fn frame(&self) -> FrameId;
}

impl RigidLink for FrameId {
    fn frame(&self) -> FrameId {
        *self
    }
}

pub(crate) fn ensure_frame(expected: FrameId, found: FrameId) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::FrameMismatch { expected, found })
    }
}
