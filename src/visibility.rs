//! Visibility: find the node a ray sees.
//!
//! Traversal is linear over the scene - no spatial acceleration - and keeps
//! the hit with the greatest `z`. Under the right-handed view convention
//! (forward mapped to −Z) visible hits have negative `z`, so the greatest
//! `z` is the hit closest to the camera.

use glam::Vec4;

use crate::collision::{collide, Collision};
use crate::scene::{BoundingVolume, ComponentFamily, ComponentKey, NodeKey, Scene};

/// The winning node of a trace, with its collision record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Visible {
    /// Node carrying the geometry the ray sees, if any.
    pub geometry: Option<NodeKey>,
    /// Collision with that node's bounding volume.
    pub collision: Collision,
}

/// Cast `volume` (a ray) from `origin` through the scene and return the
/// nearest visible node.
///
/// Every node carrying a geometry component is tested against its bounding
/// volume. A geometry node without a bounding volume violates the scene
/// invariants and is fatal.
///
/// # Panics
///
/// When `volume` is not a ray, or a geometry node lacks a bounding volume.
#[must_use]
pub fn trace_ray(scene: &Scene, origin: Vec4, volume: &BoundingVolume) -> Visible {
    assert!(
        matches!(volume, BoundingVolume::Ray { .. }),
        "trace_ray expects a ray volume"
    );

    let mut visible = Visible::default();
    scene.traverse(&mut |key, node| {
        if scene
            .find_any_component(key, ComponentFamily::Geometry)
            .is_none()
        {
            return;
        }

        let Some(ComponentKey::BoundingVolume(vkey)) =
            scene.find_any_component(key, ComponentFamily::BoundingVolume)
        else {
            panic!("geometry node has no bounding volume");
        };
        let Some(bounds) = scene.bounding_volume(vkey) else {
            panic!("geometry node references a released bounding volume");
        };

        let collision = collide(volume, origin, bounds, node.position);
        if collision.hit
            && (visible.geometry.is_none()
                || collision.hit_point.z > visible.collision.hit_point.z)
        {
            visible.geometry = Some(key);
            visible.collision = collision;
        }
    });

    visible
}
