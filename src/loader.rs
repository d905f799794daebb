//! Declarative scene files.
//!
//! Scenes are TOML documents listing components by family, then nodes that
//! reference components (and child nodes) by name. The loader populates a
//! [`Scene`] exclusively through its public API; names must be declared
//! before they are referenced by a node.
//!
//! ```toml
//! view = "observer"
//!
//! [[cameras]]
//! name = "main"
//! filter = "color"
//! [cameras.projection.perspective]
//! aspect_ratio = 1.0
//! yfov = 60.0
//!
//! [[geometries]]
//! name = "sphere"
//! kind = { parametric_sphere = { radius = 1.0 } }
//!
//! [[bounding_volumes]]
//! name = "sphere-bounds"
//! kind = { ball = { radius = 1.0 } }
//!
//! [[materials]]
//! name = "red"
//! kind = { constant = { emission = [1.0, 0.0, 0.0, 1.0] } }
//!
//! [[nodes]]
//! name = "observer"
//! components = ["main"]
//!
//! [[nodes]]
//! name = "ball"
//! position = [0.0, 0.0, -5.0, 1.0]
//! components = ["sphere", "sphere-bounds", "red"]
//! ```

use std::path::Path;

use glam::Vec4;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use crate::error::UmbraError;
use crate::scene::{
    AntiAliasing, Attenuation, BoundingVolume, Camera, ComponentFamily, ComponentKey, Filter,
    Geometry, Light, Material, Projection, Scene, SceneCapacities, SurfaceChannel,
};

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

fn default_one() -> u32 {
    1
}

fn default_znear() -> f32 {
    0.1
}

fn default_zfar() -> f32 {
    1000.0
}

fn default_constant_attenuation() -> f32 {
    1.0
}

fn default_falloff_angle() -> f32 {
    180.0
}

fn default_position() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_interest() -> [f32; 4] {
    [0.0, 0.0, -1.0, 1.0]
}

fn default_up() -> [f32; 4] {
    [0.0, 1.0, 0.0, 0.0]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    /// Name of the node carrying the camera.
    view: String,
    #[serde(default)]
    cameras: Vec<CameraDecl>,
    #[serde(default)]
    bounding_volumes: Vec<VolumeDecl>,
    #[serde(default)]
    geometries: Vec<GeometryDecl>,
    #[serde(default)]
    materials: Vec<MaterialDecl>,
    #[serde(default)]
    lights: Vec<LightDecl>,
    #[serde(default)]
    nodes: Vec<NodeDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CameraDecl {
    name: String,
    #[serde(default)]
    filter: FilterDecl,
    projection: ProjectionDecl,
    anti_aliasing: Option<AntiAliasingDecl>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FilterDecl {
    #[default]
    Color,
    Depth,
    Normal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum ProjectionDecl {
    Perspective {
        aspect_ratio: f32,
        yfov: f32,
        #[serde(default = "default_znear")]
        znear: f32,
        #[serde(default = "default_zfar")]
        zfar: f32,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AntiAliasingDecl {
    technique: TechniqueDecl,
    #[serde(default = "default_one")]
    samples_count: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TechniqueDecl {
    None,
    Stochastic,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VolumeDecl {
    name: String,
    kind: VolumeKindDecl,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum VolumeKindDecl {
    Ball {
        radius: f32,
    },
    Box {
        half_extents: [f32; 4],
    },
    Frustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Ray {
        direction: [f32; 4],
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeometryDecl {
    name: String,
    kind: GeometryKindDecl,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum GeometryKindDecl {
    ParametricSphere { radius: f32 },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaterialDecl {
    name: String,
    kind: MaterialKindDecl,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum MaterialKindDecl {
    Constant {
        #[serde(default)]
        emission: [f32; 4],
        #[serde(default)]
        reflective: [f32; 4],
        #[serde(default)]
        reflectivity: f32,
        #[serde(default)]
        transparent: [f32; 4],
        #[serde(default)]
        transparency: f32,
        #[serde(default)]
        ior: f32,
    },
    Phong {
        #[serde(default)]
        emission: [f32; 4],
        #[serde(default)]
        ambient: [f32; 4],
        #[serde(default)]
        diffuse: [f32; 4],
        #[serde(default)]
        specular: [f32; 4],
        #[serde(default)]
        shininess: [f32; 4],
        #[serde(default)]
        reflective: [f32; 4],
        #[serde(default)]
        reflectivity: f32,
        #[serde(default)]
        transparent: [f32; 4],
        #[serde(default)]
        transparency: f32,
        #[serde(default)]
        ior: f32,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LightDecl {
    name: String,
    kind: LightKindDecl,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum LightKindDecl {
    Ambient {
        color: [f32; 4],
    },
    Directional {
        color: [f32; 4],
        direction: [f32; 4],
    },
    Point {
        color: [f32; 4],
        #[serde(default = "default_constant_attenuation")]
        constant_attenuation: f32,
        #[serde(default)]
        linear_attenuation: f32,
        #[serde(default)]
        quadratic_attenuation: f32,
    },
    Spot {
        color: [f32; 4],
        direction: [f32; 4],
        #[serde(default = "default_constant_attenuation")]
        constant_attenuation: f32,
        #[serde(default)]
        linear_attenuation: f32,
        #[serde(default)]
        quadratic_attenuation: f32,
        #[serde(default = "default_falloff_angle")]
        falloff_angle: f32,
        #[serde(default)]
        falloff_exponent: f32,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeDecl {
    name: String,
    #[serde(default = "default_position")]
    position: [f32; 4],
    #[serde(default = "default_interest")]
    interest: [f32; 4],
    #[serde(default = "default_up")]
    up: [f32; 4],
    #[serde(default)]
    components: Vec<String>,
    #[serde(default)]
    children: Vec<String>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

fn parse_err(msg: impl Into<String>) -> UmbraError {
    UmbraError::SceneParse(msg.into())
}

fn vec4(v: [f32; 4]) -> Vec4 {
    Vec4::from_array(v)
}

fn channel(v: [f32; 4]) -> SurfaceChannel {
    SurfaceChannel::Color(vec4(v))
}

/// Read and build a scene from a TOML file on disk.
///
/// # Errors
///
/// I/O failures and every malformation [`parse_scene`] reports.
pub fn load_scene(path: &Path) -> Result<Scene, UmbraError> {
    let text = std::fs::read_to_string(path)?;
    let scene = parse_scene(&text)?;
    log::info!(
        "loaded scene {}: {} nodes",
        path.display(),
        scene.node_count()
    );
    Ok(scene)
}

/// Build a scene from TOML text.
///
/// # Errors
///
/// Returns [`UmbraError::SceneParse`] on malformed TOML, duplicate or
/// unresolved names, a missing or camera-less view node, a geometry node
/// without bounding volume and material, or a zero sample count.
pub fn parse_scene(text: &str) -> Result<Scene, UmbraError> {
    let file: SceneFile = toml::from_str(text).map_err(|e| parse_err(e.to_string()))?;
    build_scene(&file)
}

fn build_scene(file: &SceneFile) -> Result<Scene, UmbraError> {
    let defaults = SceneCapacities::default();
    let mut scene = Scene::with_capacities(SceneCapacities {
        nodes: defaults.nodes.max(file.nodes.len()),
        cameras: defaults.cameras.max(file.cameras.len()),
        bounding_volumes: defaults.bounding_volumes.max(file.bounding_volumes.len()),
        geometries: defaults.geometries.max(file.geometries.len()),
        lights: defaults.lights.max(file.lights.len()),
        materials: defaults.materials.max(file.materials.len()),
    });

    let mut components: FxHashMap<&str, ComponentKey> = FxHashMap::default();

    for decl in &file.cameras {
        let key = ComponentKey::Camera(scene.acquire_camera(camera_from(decl)?));
        insert_component(&mut components, &decl.name, key)?;
    }
    for decl in &file.bounding_volumes {
        let key =
            ComponentKey::BoundingVolume(scene.acquire_bounding_volume(volume_from(&decl.kind)));
        insert_component(&mut components, &decl.name, key)?;
    }
    for decl in &file.geometries {
        let key = ComponentKey::Geometry(scene.acquire_geometry(geometry_from(&decl.kind)));
        insert_component(&mut components, &decl.name, key)?;
    }
    for decl in &file.materials {
        let key = ComponentKey::Material(scene.acquire_material(material_from(&decl.kind)));
        insert_component(&mut components, &decl.name, key)?;
    }
    for decl in &file.lights {
        let key = ComponentKey::Light(scene.acquire_light(light_from(&decl.kind)));
        insert_component(&mut components, &decl.name, key)?;
    }

    // Nodes: create them all first so children can reference any node.
    let mut nodes: FxHashMap<&str, crate::scene::NodeKey> = FxHashMap::default();
    for decl in &file.nodes {
        let key = scene.create_node();
        if nodes.insert(&decl.name, key).is_some() {
            return Err(parse_err(format!("duplicate node name '{}'", decl.name)));
        }
        {
            let Some(node) = scene.node_mut(key) else {
                unreachable!("freshly created node must resolve");
            };
            node.position = vec4(decl.position);
            node.interest = vec4(decl.interest);
            node.up = vec4(decl.up);
        }
        for reference in &decl.components {
            let Some(&component) = components.get(reference.as_str()) else {
                return Err(parse_err(format!(
                    "node '{}' references unknown component '{reference}'",
                    decl.name
                )));
            };
            scene.attach_component(key, component);
        }
    }

    let mut attached: FxHashSet<&str> = FxHashSet::default();
    for decl in &file.nodes {
        let Some(&parent) = nodes.get(decl.name.as_str()) else {
            unreachable!("node was created above");
        };
        for reference in &decl.children {
            let Some(&child) = nodes.get(reference.as_str()) else {
                return Err(parse_err(format!(
                    "node '{}' references unknown child '{reference}'",
                    decl.name
                )));
            };
            if !attached.insert(reference.as_str()) {
                return Err(parse_err(format!(
                    "node '{reference}' is attached to more than one parent"
                )));
            }
            if child == parent {
                return Err(parse_err(format!(
                    "node '{reference}' cannot be its own child"
                )));
            }
            scene.attach_child(parent, child);
        }
    }

    // Scene invariants the renderer relies on.
    for decl in &file.nodes {
        let Some(&key) = nodes.get(decl.name.as_str()) else {
            unreachable!("node was created above");
        };
        if scene
            .find_any_component(key, ComponentFamily::Geometry)
            .is_some()
        {
            let has_bounds = scene
                .find_any_component(key, ComponentFamily::BoundingVolume)
                .is_some();
            let has_material = scene
                .find_any_component(key, ComponentFamily::Material)
                .is_some();
            if !has_bounds || !has_material {
                return Err(parse_err(format!(
                    "geometry node '{}' needs both a bounding volume and a material",
                    decl.name
                )));
            }
        }
    }

    let Some(&view) = nodes.get(file.view.as_str()) else {
        return Err(parse_err(format!("view references unknown node '{}'", file.view)));
    };
    if scene
        .find_any_component(view, ComponentFamily::Camera)
        .is_none()
    {
        return Err(parse_err(format!(
            "view node '{}' carries no camera",
            file.view
        )));
    }
    scene.set_view(view);

    Ok(scene)
}

fn insert_component<'a>(
    components: &mut FxHashMap<&'a str, ComponentKey>,
    name: &'a str,
    key: ComponentKey,
) -> Result<(), UmbraError> {
    if components.insert(name, key).is_some() {
        return Err(parse_err(format!("duplicate component name '{name}'")));
    }
    Ok(())
}

fn camera_from(decl: &CameraDecl) -> Result<Camera, UmbraError> {
    let (aspect_ratio, yfov, znear, zfar) = match decl.projection {
        ProjectionDecl::Perspective {
            aspect_ratio,
            yfov,
            znear,
            zfar,
        } => (aspect_ratio, yfov, znear, zfar),
    };

    let (anti_aliasing, samples_count) = match decl.anti_aliasing {
        None
        | Some(AntiAliasingDecl {
            technique: TechniqueDecl::None,
            ..
        }) => (AntiAliasing::None, 1),
        Some(AntiAliasingDecl {
            technique: TechniqueDecl::Stochastic,
            samples_count,
        }) => {
            if samples_count == 0 {
                return Err(parse_err(format!(
                    "camera '{}': samples_count must be at least 1",
                    decl.name
                )));
            }
            (AntiAliasing::Stochastic, samples_count)
        }
    };

    Ok(Camera {
        projection: Projection::Perspective {
            aspect_ratio,
            yfov,
            znear,
            zfar,
        },
        filter: match decl.filter {
            FilterDecl::Color => Filter::Color,
            FilterDecl::Depth => Filter::Depth,
            FilterDecl::Normal => Filter::Normal,
        },
        anti_aliasing,
        samples_count,
    })
}

fn volume_from(decl: &VolumeKindDecl) -> BoundingVolume {
    match *decl {
        VolumeKindDecl::Ball { radius } => BoundingVolume::Ball { radius },
        VolumeKindDecl::Box { half_extents } => BoundingVolume::Box {
            half_extents: vec4(half_extents),
        },
        VolumeKindDecl::Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        } => BoundingVolume::Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        },
        VolumeKindDecl::Ray { direction } => BoundingVolume::Ray {
            direction: vec4(direction),
        },
    }
}

fn geometry_from(decl: &GeometryKindDecl) -> Geometry {
    match *decl {
        GeometryKindDecl::ParametricSphere { radius } => Geometry::ParametricSphere { radius },
    }
}

fn material_from(decl: &MaterialKindDecl) -> Material {
    match *decl {
        MaterialKindDecl::Constant {
            emission,
            reflective,
            reflectivity,
            transparent,
            transparency,
            ior,
        } => Material::Constant {
            emission: channel(emission),
            reflective: channel(reflective),
            reflectivity,
            transparent: channel(transparent),
            transparency,
            ior,
        },
        MaterialKindDecl::Phong {
            emission,
            ambient,
            diffuse,
            specular,
            shininess,
            reflective,
            reflectivity,
            transparent,
            transparency,
            ior,
        } => Material::Phong {
            emission: channel(emission),
            ambient: channel(ambient),
            diffuse: channel(diffuse),
            specular: channel(specular),
            shininess: channel(shininess),
            reflective: channel(reflective),
            reflectivity,
            transparent: channel(transparent),
            transparency,
            ior,
        },
    }
}

fn light_from(decl: &LightKindDecl) -> Light {
    match *decl {
        LightKindDecl::Ambient { color } => Light::Ambient { color: vec4(color) },
        LightKindDecl::Directional { color, direction } => Light::Directional {
            color: vec4(color),
            direction: vec4(direction),
        },
        LightKindDecl::Point {
            color,
            constant_attenuation,
            linear_attenuation,
            quadratic_attenuation,
        } => Light::Point {
            color: vec4(color),
            attenuation: Attenuation {
                constant: constant_attenuation,
                linear: linear_attenuation,
                quadratic: quadratic_attenuation,
            },
        },
        LightKindDecl::Spot {
            color,
            direction,
            constant_attenuation,
            linear_attenuation,
            quadratic_attenuation,
            falloff_angle,
            falloff_exponent,
        } => Light::Spot {
            color: vec4(color),
            direction: vec4(direction),
            attenuation: Attenuation {
                constant: constant_attenuation,
                linear: linear_attenuation,
                quadratic: quadratic_attenuation,
            },
            falloff_angle,
            falloff_exponent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ComponentKind, LightKind, MaterialKind, ProjectionKind, VolumeKind};

    const FULL_SCENE: &str = r#"
view = "observer"

[[cameras]]
name = "main"
filter = "color"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 60.0
znear = 1.0
zfar = 100.0
[cameras.anti_aliasing]
technique = "stochastic"
samples_count = 4

[[bounding_volumes]]
name = "unit-ball"
kind = { ball = { radius = 1.0 } }

[[geometries]]
name = "sphere"
kind = { parametric_sphere = { radius = 1.0 } }

[[materials]]
name = "red"
kind = { constant = { emission = [1.0, 0.0, 0.0, 1.0] } }

[[materials]]
name = "shiny"
[materials.kind.phong]
ambient = [0.1, 0.1, 0.1, 1.0]
diffuse = [0.7, 0.7, 0.7, 1.0]
specular = [1.0, 1.0, 1.0, 1.0]
shininess = [0.9, 0.9, 0.9, 1.0]

[[lights]]
name = "sun"
kind = { directional = { color = [1.0, 1.0, 1.0, 1.0], direction = [0.0, 1.0, 0.0, 0.0] } }

[[lights]]
name = "bulb"
kind = { point = { color = [1.0, 1.0, 1.0, 1.0], linear_attenuation = 0.1 } }

[[nodes]]
name = "observer"
position = [0.0, 0.0, 0.0, 1.0]
interest = [0.0, 0.0, -1.0, 1.0]
up = [0.0, 1.0, 0.0, 0.0]
components = ["main"]

[[nodes]]
name = "ball"
position = [0.0, 0.0, -5.0, 1.0]
components = ["sphere", "unit-ball", "red"]

[[nodes]]
name = "rig"
children = ["lamp"]

[[nodes]]
name = "lamp"
position = [0.0, 4.0, -5.0, 1.0]
components = ["sun", "bulb"]
"#;

    #[test]
    fn full_scene_round_trip() {
        let scene = parse_scene(FULL_SCENE).expect("scene should load");
        assert_eq!(scene.node_count(), 4);

        let view = scene.view().expect("view is set");
        let camera = scene
            .find_component(view, ComponentKind::Camera(ProjectionKind::Perspective))
            .expect("view camera");
        let ComponentKey::Camera(camera_key) = camera else {
            unreachable!()
        };
        let camera = scene.camera(camera_key).expect("camera payload");
        assert_eq!(camera.samples_count, 4);
        assert_eq!(camera.anti_aliasing, AntiAliasing::Stochastic);

        // Post-order traversal sees the lamp before its rig parent.
        let mut kinds = Vec::new();
        scene.traverse(&mut |key, _| {
            if let Some(ComponentKey::Light(light)) =
                scene.find_any_component(key, ComponentFamily::Light)
            {
                kinds.push(scene.light(light).expect("light").kind());
            }
        });
        assert_eq!(kinds, vec![LightKind::Directional]);
    }

    #[test]
    fn point_light_defaults_keep_constant_attenuation() {
        let scene = parse_scene(FULL_SCENE).expect("scene should load");
        let mut found = None;
        scene.traverse(&mut |key, _| {
            if let Some(ComponentKey::Light(light)) =
                scene.find_component(key, ComponentKind::Light(LightKind::Point))
            {
                found = scene.light(light).copied();
            }
        });
        let Some(Light::Point { attenuation, .. }) = found else {
            panic!("point light expected");
        };
        assert_eq!(attenuation.constant, 1.0);
        assert_eq!(attenuation.linear, 0.1);
    }

    #[test]
    fn phong_material_parses_all_channels() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0

[[bounding_volumes]]
name = "bv"
kind = { ball = { radius = 2.0 } }

[[geometries]]
name = "geo"
kind = { parametric_sphere = { radius = 2.0 } }

[[materials]]
name = "mat"
[materials.kind.phong]
diffuse = [0.5, 0.5, 0.5, 1.0]

[[nodes]]
name = "v"
components = ["cam"]

[[nodes]]
name = "thing"
components = ["geo", "bv", "mat"]
"#;
        let scene = parse_scene(text).expect("phong scene");
        let mut seen = false;
        scene.traverse(&mut |key, _| {
            if let Some(ComponentKey::Material(m)) =
                scene.find_component(key, ComponentKind::Material(MaterialKind::Phong))
            {
                let Some(Material::Phong { diffuse, .. }) = scene.material(m) else {
                    panic!("phong payload expected");
                };
                assert_eq!(diffuse.resolve(Vec4::ZERO), Vec4::new(0.5, 0.5, 0.5, 1.0));
                seen = true;
            }
        });
        assert!(seen, "phong material should be attached");
    }

    #[test]
    fn spot_light_parses_cone_parameters_with_defaults() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0

[[lights]]
name = "narrow"
[lights.kind.spot]
color = [1.0, 1.0, 1.0, 1.0]
direction = [0.0, 1.0, 0.0, 0.0]
falloff_angle = 20.0

[[nodes]]
name = "v"
components = ["cam", "narrow"]
"#;
        let scene = parse_scene(text).expect("spot scene");
        let view = scene.view().expect("view");
        let Some(ComponentKey::Light(key)) =
            scene.find_component(view, ComponentKind::Light(LightKind::Spot))
        else {
            panic!("spot light expected");
        };
        let Some(Light::Spot {
            attenuation,
            falloff_angle,
            falloff_exponent,
            ..
        }) = scene.light(key)
        else {
            panic!("spot payload expected");
        };
        assert_eq!(attenuation.constant, 1.0);
        assert_eq!(*falloff_angle, 20.0);
        assert_eq!(*falloff_exponent, 0.0);
    }

    #[test]
    fn node_pose_defaults_face_minus_z() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0

[[nodes]]
name = "v"
components = ["cam"]
"#;
        let scene = parse_scene(text).expect("scene");
        let view = scene.view().expect("view");
        let node = scene.node(view).expect("node");
        assert_eq!(node.position, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(node.interest, Vec4::new(0.0, 0.0, -1.0, 1.0));
        assert_eq!(node.up, Vec4::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn child_attached_to_two_parents_is_an_error() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0

[[nodes]]
name = "v"
components = ["cam"]

[[nodes]]
name = "a"
children = ["shared"]

[[nodes]]
name = "b"
children = ["shared"]

[[nodes]]
name = "shared"
"#;
        let err = parse_scene(text).expect_err("must fail");
        assert!(err.to_string().contains("more than one parent"));
    }

    #[test]
    fn unknown_component_reference_is_an_error() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0

[[nodes]]
name = "v"
components = ["cam", "missing"]
"#;
        let err = parse_scene(text).expect_err("must fail");
        assert!(err.to_string().contains("unknown component 'missing'"));
    }

    #[test]
    fn view_without_camera_is_an_error() {
        let text = r#"
view = "v"

[[nodes]]
name = "v"
"#;
        let err = parse_scene(text).expect_err("must fail");
        assert!(err.to_string().contains("carries no camera"));
    }

    #[test]
    fn geometry_without_material_is_an_error() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0

[[bounding_volumes]]
name = "bv"
kind = { ball = { radius = 1.0 } }

[[geometries]]
name = "geo"
kind = { parametric_sphere = { radius = 1.0 } }

[[nodes]]
name = "v"
components = ["cam"]

[[nodes]]
name = "bare"
components = ["geo", "bv"]
"#;
        let err = parse_scene(text).expect_err("must fail");
        assert!(err.to_string().contains("bounding volume and a material"));
    }

    #[test]
    fn zero_samples_count_is_an_error() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0
[cameras.anti_aliasing]
technique = "stochastic"
samples_count = 0

[[nodes]]
name = "v"
components = ["cam"]
"#;
        let err = parse_scene(text).expect_err("must fail");
        assert!(err.to_string().contains("samples_count"));
    }

    #[test]
    fn duplicate_component_names_are_an_error() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0

[[materials]]
name = "dup"
kind = { constant = {} }

[[materials]]
name = "dup"
kind = { constant = {} }

[[nodes]]
name = "v"
components = ["cam"]
"#;
        let err = parse_scene(text).expect_err("must fail");
        assert!(err.to_string().contains("duplicate component name 'dup'"));
    }

    #[test]
    fn volume_kinds_all_parse() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 45.0

[[bounding_volumes]]
name = "a"
kind = { ball = { radius = 1.0 } }

[[bounding_volumes]]
name = "b"
kind = { box = { half_extents = [1.0, 2.0, 3.0, 0.0] } }

[[bounding_volumes]]
name = "c"
kind = { frustum = { left = -1.0, right = 1.0, bottom = -1.0, top = 1.0, near = 0.1, far = 10.0 } }

[[bounding_volumes]]
name = "d"
kind = { ray = { direction = [0.0, 0.0, -1.0, 0.0] } }

[[nodes]]
name = "v"
components = ["cam", "a", "b", "c", "d"]
"#;
        let scene = parse_scene(text).expect("volumes parse");
        let view = scene.view().expect("view");
        for kind in [
            VolumeKind::Ball,
            VolumeKind::Box,
            VolumeKind::Frustum,
            VolumeKind::Ray,
        ] {
            assert!(
                scene
                    .find_component(view, ComponentKind::BoundingVolume(kind))
                    .is_some(),
                "{kind:?} missing"
            );
        }
    }
}
