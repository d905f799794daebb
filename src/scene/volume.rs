//! Bounding volumes: the analytic shapes the intersection kernel understands.

use glam::Vec4;

/// Tagged analytic shape. A volume is positioned by the node carrying it;
/// the payload only holds the shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingVolume {
    /// Sphere of the given radius around the node position.
    Ball {
        /// Sphere radius.
        radius: f32,
    },
    /// Axis-aligned box around the node position.
    Box {
        /// Half extent along each axis (`w` unused).
        half_extents: Vec4,
    },
    /// View frustum described by its six plane offsets.
    Frustum {
        /// Left plane offset.
        left: f32,
        /// Right plane offset.
        right: f32,
        /// Bottom plane offset.
        bottom: f32,
        /// Top plane offset.
        top: f32,
        /// Near plane distance.
        near: f32,
        /// Far plane distance.
        far: f32,
    },
    /// Half-line from the node position along `direction`.
    Ray {
        /// Ray direction (`w = 0`, unit length for the kernel's quadratic
        /// to be well-scaled).
        direction: Vec4,
    },
}

impl BoundingVolume {
    /// Variant tag of this volume.
    #[must_use]
    pub fn kind(&self) -> VolumeKind {
        match self {
            Self::Ball { .. } => VolumeKind::Ball,
            Self::Box { .. } => VolumeKind::Box,
            Self::Frustum { .. } => VolumeKind::Frustum,
            Self::Ray { .. } => VolumeKind::Ray,
        }
    }
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::Ball { radius: 0.0 }
    }
}

/// Variant tags for [`BoundingVolume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeKind {
    /// Sphere.
    Ball,
    /// Axis-aligned box.
    Box,
    /// View frustum.
    Frustum,
    /// Half-line.
    Ray,
}
