//! Material components and their resolution into concrete surface values.

use glam::Vec4;

/// A material slot that is either a flat color or a texture reference.
///
/// Textures are reserved in the data model; only the color variant is
/// realized, and resolving a texture slot is a fatal assertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceChannel {
    /// Flat RGBA color in `[0, 1]` per channel.
    Color(Vec4),
    /// Reserved: sampled texture.
    Texture,
}

impl SurfaceChannel {
    /// Resolve this slot to a color at the given surface coordinates.
    ///
    /// # Panics
    ///
    /// Resolving the reserved texture variant is protocol misuse and fatal.
    #[must_use]
    pub fn resolve(&self, _coords: Vec4) -> Vec4 {
        match self {
            Self::Color(c) => *c,
            Self::Texture => panic!("texture channels are reserved and not realized"),
        }
    }

    /// Black color slot.
    pub const BLACK: Self = Self::Color(Vec4::ZERO);
}

impl Default for SurfaceChannel {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Tagged material payload.
///
/// The reflectance/transmittance slots (`reflective`, `transparent`, and
/// their scalars) are carried in the data model for scene compatibility;
/// reflection and refraction rays are reserved and never cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Self-luminous surface, unaffected by diffuse or specular response.
    Constant {
        /// Emitted color.
        emission: SurfaceChannel,
        /// Reserved: reflected color.
        reflective: SurfaceChannel,
        /// Reserved: reflectivity amount.
        reflectivity: f32,
        /// Reserved: transmitted color.
        transparent: SurfaceChannel,
        /// Reserved: transparency amount.
        transparency: f32,
        /// Reserved: index of refraction.
        ior: f32,
    },
    /// Classical Phong response.
    Phong {
        /// Emitted color.
        emission: SurfaceChannel,
        /// Ambient response color.
        ambient: SurfaceChannel,
        /// Diffuse response color.
        diffuse: SurfaceChannel,
        /// Specular response color.
        specular: SurfaceChannel,
        /// Shininess, stored as a color and applied per channel.
        shininess: SurfaceChannel,
        /// Reserved: reflected color.
        reflective: SurfaceChannel,
        /// Reserved: reflectivity amount.
        reflectivity: f32,
        /// Reserved: transmitted color.
        transparent: SurfaceChannel,
        /// Reserved: transparency amount.
        transparency: f32,
        /// Reserved: index of refraction.
        ior: f32,
    },
}

impl Material {
    /// Variant tag of this material.
    #[must_use]
    pub fn kind(&self) -> MaterialKind {
        match self {
            Self::Constant { .. } => MaterialKind::Constant,
            Self::Phong { .. } => MaterialKind::Phong,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::Constant {
            emission: SurfaceChannel::BLACK,
            reflective: SurfaceChannel::BLACK,
            reflectivity: 0.0,
            transparent: SurfaceChannel::BLACK,
            transparency: 0.0,
            ior: 0.0,
        }
    }
}

/// Variant tags for [`Material`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Self-luminous material.
    Constant,
    /// Phong material.
    Phong,
}

/// Concrete per-point surface values a material resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceAttributes {
    /// Emitted color.
    pub emission: Vec4,
    /// Ambient response.
    pub ambient: Vec4,
    /// Diffuse response.
    pub diffuse: Vec4,
    /// Specular response.
    pub specular: Vec4,
    /// Per-channel shininess.
    pub shininess: Vec4,
}

/// Resolve a material to its concrete surface values at `coords`.
///
/// Constant materials contribute emission only; the remaining channels
/// resolve to black.
#[must_use]
pub fn surface_attributes(material: &Material, coords: Vec4) -> SurfaceAttributes {
    match material {
        Material::Constant { emission, .. } => SurfaceAttributes {
            emission: emission.resolve(coords),
            ..SurfaceAttributes::default()
        },
        Material::Phong {
            emission,
            ambient,
            diffuse,
            specular,
            shininess,
            ..
        } => SurfaceAttributes {
            emission: emission.resolve(coords),
            ambient: ambient.resolve(coords),
            diffuse: diffuse.resolve(coords),
            specular: specular.resolve(coords),
            shininess: shininess.resolve(coords),
        },
    }
}
