//! Light components: ambient, directional, point, and spot sources.

use glam::Vec4;

/// Distance attenuation coefficients for point and spot lights.
///
/// The attenuation factor at distance `d` is
/// `constant + linear·d + quadratic·d²`; the shader divides the light color
/// by this factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    /// Constant coefficient.
    pub constant: f32,
    /// Linear (per unit distance) coefficient.
    pub linear: f32,
    /// Quadratic (per squared distance) coefficient.
    pub quadratic: f32,
}

impl Attenuation {
    /// Attenuation factor at distance `d`.
    #[inline]
    #[must_use]
    pub fn at(&self, d: f32) -> f32 {
        self.constant + self.linear * d + self.quadratic * d * d
    }
}

impl Default for Attenuation {
    /// No falloff: constant 1.
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

/// Tagged light source. Positional variants take their location from the
/// node carrying the component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light with no location or direction.
    Ambient {
        /// Light color.
        color: Vec4,
    },
    /// Light arriving from one direction everywhere.
    Directional {
        /// Light color.
        color: Vec4,
        /// Incident direction (`w = 0`).
        direction: Vec4,
    },
    /// Light radiating from the node position, attenuated by distance.
    Point {
        /// Light color.
        color: Vec4,
        /// Distance attenuation coefficients.
        attenuation: Attenuation,
    },
    /// Cone light radiating from the node position along a direction.
    Spot {
        /// Light color.
        color: Vec4,
        /// Cone axis, expressed surface-to-light like the diffuse term's
        /// light vector (`w = 0`).
        direction: Vec4,
        /// Distance attenuation coefficients.
        attenuation: Attenuation,
        /// Cone half-angle in degrees; intensity is zero outside it.
        falloff_angle: f32,
        /// Exponent shaping the intensity falloff toward the cone edge.
        falloff_exponent: f32,
    },
}

impl Light {
    /// Variant tag of this light.
    #[must_use]
    pub fn kind(&self) -> LightKind {
        match self {
            Self::Ambient { .. } => LightKind::Ambient,
            Self::Directional { .. } => LightKind::Directional,
            Self::Point { .. } => LightKind::Point,
            Self::Spot { .. } => LightKind::Spot,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::Ambient { color: Vec4::ZERO }
    }
}

/// Variant tags for [`Light`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Uniform ambient light.
    Ambient,
    /// Directional light.
    Directional,
    /// Point light.
    Point,
    /// Spot light.
    Spot,
}
