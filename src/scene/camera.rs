//! Camera component: projection, output filter, and antialiasing settings.

/// Projection variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Pinhole perspective projection.
    Perspective {
        /// Width over height of the image plane.
        aspect_ratio: f32,
        /// Vertical field of view in degrees.
        yfov: f32,
        /// Near clip distance (carried in the data model, unused by the
        /// ray-casting driver).
        znear: f32,
        /// Far clip distance (carried, unused).
        zfar: f32,
    },
}

impl Projection {
    /// Variant tag of this projection.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        match self {
            Self::Perspective { .. } => ProjectionKind::Perspective,
        }
    }
}

/// Variant tags for [`Projection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    /// Pinhole perspective.
    Perspective,
}

/// Post-visibility transform from a collision to an output color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Shade the hit under the scene lights.
    #[default]
    Color,
    /// Visualize the world-space hit depth (`hit_point.z` on all channels).
    Depth,
    /// Visualize the surface normal mapped into `[0, 1]`.
    Normal,
}

/// Antialiasing technique applied per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AntiAliasing {
    /// One sample through the pixel center.
    #[default]
    None,
    /// Uniform stochastic supersampling: `samples_count` jittered samples
    /// per pixel, averaged.
    Stochastic,
}

/// Camera component payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Projection variant and its parameters.
    pub projection: Projection,
    /// Output filter.
    pub filter: Filter,
    /// Antialiasing technique.
    pub anti_aliasing: AntiAliasing,
    /// Samples per pixel when `anti_aliasing` is stochastic; must be >= 1.
    pub samples_count: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective {
                aspect_ratio: 1.0,
                yfov: 60.0,
                znear: 0.1,
                zfar: 1000.0,
            },
            filter: Filter::Color,
            anti_aliasing: AntiAliasing::None,
            samples_count: 1,
        }
    }
}
