//! Geometry components. A node with a geometry is renderable and must also
//! carry a bounding volume (for intersection) and a material (for shading).

/// Tagged surface description. Only the parametric sphere is realized;
/// the tag leaves room for further analytic surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Sphere of the given radius around the node position.
    ParametricSphere {
        /// Sphere radius.
        radius: f32,
    },
}

impl Geometry {
    /// Variant tag of this geometry.
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::ParametricSphere { .. } => GeometryKind::ParametricSphere,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::ParametricSphere { radius: 0.0 }
    }
}

/// Variant tags for [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Analytic sphere.
    ParametricSphere,
}
