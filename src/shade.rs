//! Local illumination: evaluate a surface under a single light.
//!
//! The model is classical Phong with a few conventions inherited from the
//! scene data model:
//!
//! - `blend` (componentwise multiply) modulates the accumulated surface
//!   terms by the light color;
//! - shininess is a color, and the specular term is raised per channel to
//!   `1 − shininess`;
//! - point and spot light colors are divided by the distance attenuation
//!   factor;
//! - the view node's interest point stands in for the eye direction in the
//!   specular term.

use glam::Vec4;

use crate::math::{powv, reflect};
use crate::scene::{
    surface_attributes, ComponentFamily, ComponentKey, Light, NodeKey, Scene, SurfaceAttributes,
};
use crate::visibility::Visible;

/// Componentwise color modulation.
#[inline]
#[must_use]
pub fn blend(a: Vec4, b: Vec4) -> Vec4 {
    a * b
}

/// Shade the visible surface under the light carried by `light_node`.
///
/// `view_node` supplies the eye surrogate (its interest point). The result
/// is the modulated contribution of this single light; combining lights is
/// the renderer's concern.
///
/// # Panics
///
/// When `visible` has no geometry node, or the involved nodes are missing
/// their material/light components (scene invariant violations).
#[must_use]
pub fn shade(scene: &Scene, visible: &Visible, light_node: NodeKey, view_node: NodeKey) -> Vec4 {
    let Some(geometry) = visible.geometry else {
        panic!("shade called without a visible geometry");
    };

    let surface = resolve_surface(scene, geometry);

    let Some(ComponentKey::Light(light_key)) =
        scene.find_any_component(light_node, ComponentFamily::Light)
    else {
        panic!("light node has no light component");
    };
    let Some(light) = scene.light(light_key) else {
        panic!("light node references a released light");
    };

    let position = scene.node(light_node).map_or(Vec4::ZERO, |n| n.position);
    let eye = scene.node(view_node).map_or(Vec4::ZERO, |n| n.interest);

    enlighten(
        surface,
        visible.collision.hit_normal,
        visible.collision.hit_point,
        light,
        position,
        eye,
    )
}

/// Resolve the material attributes of a geometry node at the hit point.
///
/// # Panics
///
/// When the node carries no material (scene invariant violation).
#[must_use]
pub fn resolve_surface(scene: &Scene, geometry: NodeKey) -> SurfaceAttributes {
    let Some(ComponentKey::Material(material_key)) =
        scene.find_any_component(geometry, ComponentFamily::Material)
    else {
        panic!("geometry node has no material");
    };
    let Some(material) = scene.material(material_key) else {
        panic!("geometry node references a released material");
    };
    surface_attributes(material, Vec4::ZERO)
}

/// Evaluate one light against resolved surface attributes.
fn enlighten(
    mut surface: SurfaceAttributes,
    normal: Vec4,
    intersect: Vec4,
    light: &Light,
    position: Vec4,
    eye: Vec4,
) -> Vec4 {
    match light {
        Light::Ambient { color } => blend(surface.emission + surface.ambient, *color),
        Light::Directional { color, direction } => {
            surface.diffuse *= normal.dot(*direction).clamp(0.0, 1.0);

            let reflection = reflect(*direction, normal);
            surface.specular *= reflection.dot(eye).clamp(0.0, 1.0);
            surface.specular = powv(surface.specular, Vec4::ONE - surface.shininess);

            blend(
                surface.emission + surface.ambient + surface.diffuse + surface.specular,
                *color,
            )
        }
        Light::Point { color, attenuation } => {
            let direction = (position - intersect).normalize();
            surface.diffuse *= normal.dot(direction).clamp(0.0, 1.0);

            let reflection = reflect(direction, normal);
            surface.specular *= reflection.dot(eye).clamp(0.0, 1.0);
            surface.specular = powv(surface.specular, Vec4::ONE - surface.shininess);

            let attenuation = attenuation.at((intersect - position).length());
            blend(
                surface.emission + surface.ambient + surface.diffuse + surface.specular,
                *color / attenuation,
            )
        }
        Light::Spot {
            color,
            direction,
            attenuation,
            falloff_angle,
            falloff_exponent,
        } => {
            surface.diffuse *= normal.dot(*direction).clamp(0.0, 1.0);

            let reflection = reflect(*direction, normal);
            surface.specular *= reflection.dot(eye).clamp(0.0, 1.0);
            surface.specular = powv(surface.specular, Vec4::ONE - surface.shininess);

            let cone = cone_factor(*direction, position, intersect, *falloff_angle, *falloff_exponent);
            let attenuation = attenuation.at((intersect - position).length());
            blend(
                surface.emission + surface.ambient + surface.diffuse + surface.specular,
                *color * cone / attenuation,
            )
        }
    }
}

/// Spot cone intensity: `cosθ^exponent` for surface points within
/// `falloff_angle` degrees of the cone axis, zero outside.
///
/// The spot's configured direction follows the same convention the diffuse
/// term uses (it points from the surface toward the light), so θ is measured
/// against the surface-to-light path.
fn cone_factor(axis: Vec4, position: Vec4, intersect: Vec4, angle_deg: f32, exponent: f32) -> f32 {
    let to_light = (position - intersect).normalize();
    let cos_theta = axis.normalize().dot(to_light);
    if cos_theta < angle_deg.to_radians().cos() {
        0.0
    } else {
        cos_theta.max(0.0).powf(exponent)
    }
}
