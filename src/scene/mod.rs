//! Scene graph and component store.
//!
//! A [`Scene`] owns every node and component. Components live in per-family
//! pools (generational arenas), nodes hold non-owning keys into those pools.
//! Five families exist: cameras, bounding volumes, geometries, lights, and
//! materials; each family payload is a sum type with a kind tag.
//!
//! Mutation (attach/detach, acquire/release) takes `&mut Scene` and is
//! load-time only; during a draw the scene is shared read-only across all
//! worker threads.

mod camera;
mod geometry;
mod light;
mod material;
mod node;
mod volume;
#[allow(clippy::module_inception)]
mod scene;

pub use camera::{AntiAliasing, Camera, Filter, Projection, ProjectionKind};
pub use geometry::{Geometry, GeometryKind};
pub use light::{Attenuation, Light, LightKind};
pub use material::{
    surface_attributes, Material, MaterialKind, SurfaceAttributes, SurfaceChannel,
};
pub use node::{Node, NODE_LIST_CAPACITY};
pub use scene::{Scene, SceneCapacities};
pub use volume::{BoundingVolume, VolumeKind};

slotmap::new_key_type! {
    /// Key into the scene's node pool.
    pub struct NodeKey;
    /// Key into the camera pool.
    pub struct CameraKey;
    /// Key into the bounding-volume pool.
    pub struct VolumeKey;
    /// Key into the geometry pool.
    pub struct GeometryKey;
    /// Key into the light pool.
    pub struct LightKey;
    /// Key into the material pool.
    pub struct MaterialKey;
}

/// The five component families a node can aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentFamily {
    /// Projection, filter, and antialiasing settings.
    Camera,
    /// Analytic shape used for ray intersection.
    BoundingVolume,
    /// Renderable surface description.
    Geometry,
    /// Light source.
    Light,
    /// Surface response under lighting.
    Material,
}

/// A typed reference to a component in one of the five family pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKey {
    /// Camera component.
    Camera(CameraKey),
    /// Bounding-volume component.
    BoundingVolume(VolumeKey),
    /// Geometry component.
    Geometry(GeometryKey),
    /// Light component.
    Light(LightKey),
    /// Material component.
    Material(MaterialKey),
}

impl ComponentKey {
    /// Family this component belongs to.
    #[must_use]
    pub fn family(self) -> ComponentFamily {
        match self {
            Self::Camera(_) => ComponentFamily::Camera,
            Self::BoundingVolume(_) => ComponentFamily::BoundingVolume,
            Self::Geometry(_) => ComponentFamily::Geometry,
            Self::Light(_) => ComponentFamily::Light,
            Self::Material(_) => ComponentFamily::Material,
        }
    }
}

/// A (family, variant) pair, used to look up a component by exact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Camera with the given projection variant.
    Camera(ProjectionKind),
    /// Bounding volume of the given shape.
    BoundingVolume(VolumeKind),
    /// Geometry of the given variant.
    Geometry(GeometryKind),
    /// Light of the given variant.
    Light(LightKind),
    /// Material of the given variant.
    Material(MaterialKind),
}

impl ComponentKind {
    /// Family half of the pair.
    #[must_use]
    pub fn family(self) -> ComponentFamily {
        match self {
            Self::Camera(_) => ComponentFamily::Camera,
            Self::BoundingVolume(_) => ComponentFamily::BoundingVolume,
            Self::Geometry(_) => ComponentFamily::Geometry,
            Self::Light(_) => ComponentFamily::Light,
            Self::Material(_) => ComponentFamily::Material,
        }
    }
}
