//! The rendering driver.
//!
//! Per frame: reset the counters, enumerate light nodes, partition the
//! framebuffer into row bands, and submit one task per band to the executor.
//! Each task generates camera rays (optionally jittered for stochastic
//! supersampling), traces them, shades hits under the scene lights with
//! shadow probes, and paints packed pixels.
//!
//! The scene is shared read-only across all bands; each band writes a
//! disjoint set of rows.

mod counters;
mod framebuffer;

pub use counters::{Counters, RayKind};
pub use framebuffer::{pack, Framebuffer, Paint, PixelBuffer};

use glam::{Mat4, Vec4};
use rand::Rng;

use crate::executor::Executor;
use crate::math;
use crate::scene::{
    AntiAliasing, BoundingVolume, ComponentFamily, ComponentKey, ComponentKind, Filter, Light,
    NodeKey, Projection, ProjectionKind, Scene,
};
use crate::shade;
use crate::visibility::{trace_ray, Visible};

/// Color returned for rays that hit nothing: a diagnostic blue.
pub const CLEAR_COLOR: Vec4 = Vec4::new(0.0, 0.0, 1.0, 0.0);

/// A classified ray ready to cast.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Counter bucket this cast belongs to.
    pub kind: RayKind,
    /// World-space origin (`w = 1`).
    pub origin: Vec4,
    /// Unit direction (`w = 0`).
    pub direction: Vec4,
}

/// Per-frame camera state shared by every row band.
#[derive(Debug, Clone, Copy)]
struct FrameSetup {
    view: NodeKey,
    origin: Vec4,
    transform: Mat4,
    aspect_ratio: f32,
    half_fov_tan: f32,
    filter: Filter,
    anti_aliasing: AntiAliasing,
    samples_count: u32,
    width: f32,
    height: f32,
}

/// A band of framebuffer rows `[y0, y1)`.
#[derive(Debug, Clone, Copy)]
struct Band {
    y0: u32,
    y1: u32,
}

/// Resolve the view node and its perspective camera into per-frame state.
///
/// # Panics
///
/// Protocol misuse is fatal: no view node, or a view node without a
/// perspective camera.
fn frame_setup(scene: &Scene, width: u32, height: u32) -> FrameSetup {
    let Some(view) = scene.view() else {
        panic!("scene has no view node");
    };
    let Some(node) = scene.node(view) else {
        panic!("view node is not in the node pool");
    };
    let Some(camera_ref) =
        scene.find_component(view, ComponentKind::Camera(ProjectionKind::Perspective))
    else {
        panic!("view node has no perspective camera");
    };
    let ComponentKey::Camera(camera_key) = camera_ref else {
        unreachable!("camera lookup returned a non-camera component");
    };
    let Some(camera) = scene.camera(camera_key) else {
        panic!("view node references a released camera");
    };
    let (aspect_ratio, yfov) = match camera.projection {
        Projection::Perspective {
            aspect_ratio, yfov, ..
        } => (aspect_ratio, yfov),
    };

    FrameSetup {
        view,
        origin: node.position,
        transform: math::look_at(node.position, node.interest, node.up),
        aspect_ratio,
        half_fov_tan: (yfov * 0.5).to_radians().tan(),
        filter: camera.filter,
        anti_aliasing: camera.anti_aliasing,
        samples_count: camera.samples_count,
        width: width as f32,
        height: height as f32,
    }
}

/// Split `height` rows into `count` bands. The last band absorbs the
/// remainder so every row is covered.
fn partition_rows(height: u32, count: u32) -> Vec<Band> {
    let count = count.max(1);
    let size = height / count;
    (0..count)
        .map(|i| Band {
            y0: i * size,
            y1: if i + 1 == count { height } else { (i + 1) * size },
        })
        .collect()
}

/// The renderer: drives visibility and shading over an executor, and owns
/// the per-frame ray counters.
pub struct Renderer<'e> {
    executor: &'e dyn Executor,
    counters: Counters,
    lights: Vec<NodeKey>,
}

impl<'e> Renderer<'e> {
    /// Create a renderer driving the given executor.
    #[must_use]
    pub fn new(executor: &'e dyn Executor) -> Self {
        Self {
            executor,
            counters: Counters::new(),
            lights: Vec::new(),
        }
    }

    /// The per-frame ray counters. Totals are exact once `draw` returns.
    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Render one frame into `framebuffer`.
    ///
    /// The scene must be fully populated and is not mutated; attach/detach
    /// while a draw is in flight is excluded by the `&Scene` borrow.
    ///
    /// # Panics
    ///
    /// On protocol misuse: no view node, or a view node without a
    /// perspective camera.
    pub fn draw(&mut self, scene: &Scene, framebuffer: &Framebuffer<'_>) {
        self.counters.reset();

        self.lights.clear();
        let lights = &mut self.lights;
        scene.traverse(&mut |key, _| {
            if scene
                .find_any_component(key, ComponentFamily::Light)
                .is_some()
            {
                lights.push(key);
            }
        });

        let setup = frame_setup(scene, framebuffer.width, framebuffer.height);
        let bands = partition_rows(framebuffer.height, self.executor.nprocs());

        let renderer: &Self = self;
        let tasks: Vec<_> = bands
            .iter()
            .map(|&band| move || renderer.render_band(scene, framebuffer, &setup, band))
            .collect();
        let task_refs: Vec<&(dyn Fn() + Send + Sync)> = tasks
            .iter()
            .map(|task| -> &(dyn Fn() + Send + Sync) { task })
            .collect();
        renderer.executor.run(&task_refs);
    }

    /// Render one row band: every pixel, one or many samples each.
    fn render_band(
        &self,
        scene: &Scene,
        framebuffer: &Framebuffer<'_>,
        setup: &FrameSetup,
        band: Band,
    ) {
        let mut rng = rand::rng();
        for y in band.y0..band.y1 {
            for x in 0..framebuffer.width {
                let color = match setup.anti_aliasing {
                    AntiAliasing::Stochastic => {
                        let mut acc = Vec4::ZERO;
                        for _ in 0..setup.samples_count {
                            let sx = x as f32 + rng.random::<f32>();
                            let sy = y as f32 + rng.random::<f32>();
                            acc += self.cast_sample(scene, setup, sx, sy);
                        }
                        acc / setup.samples_count as f32
                    }
                    AntiAliasing::None => {
                        self.cast_sample(scene, setup, x as f32 + 0.5, y as f32 + 0.5)
                    }
                };
                framebuffer.target.paint(x, y, pack(color));
            }
        }
    }

    /// Build and cast the camera ray through sample point `(sx, sy)`.
    ///
    /// Pixel coordinates map to NDC `[0, 1]`, to screen `[-1, 1]` with Y
    /// flipped, then onto the camera plane at `z = -1`; the view transform
    /// orients the result into the world.
    fn cast_sample(&self, scene: &Scene, setup: &FrameSetup, sx: f32, sy: f32) -> Vec4 {
        let ndc_x = sx / setup.width;
        let ndc_y = sy / setup.height;
        let screen_x = 2.0 * ndc_x - 1.0;
        let screen_y = 1.0 - 2.0 * ndc_y;
        let camera_x = screen_x * setup.aspect_ratio * setup.half_fov_tan;
        let camera_y = screen_y * setup.half_fov_tan;

        let point = Vec4::new(camera_x, camera_y, -1.0, 1.0);
        let direction = math::direction(setup.transform * point);

        self.cast(
            scene,
            setup,
            &Ray {
                kind: RayKind::Camera,
                origin: setup.origin,
                direction,
            },
        )
    }

    /// Cast one ray: count it, trace it, and turn the result into a color
    /// through the camera's filter. Misses return [`CLEAR_COLOR`].
    fn cast(&self, scene: &Scene, setup: &FrameSetup, ray: &Ray) -> Vec4 {
        self.counters.record(ray.kind);

        let visible = trace_ray(
            scene,
            ray.origin,
            &BoundingVolume::Ray {
                direction: ray.direction,
            },
        );
        if !visible.collision.hit {
            return CLEAR_COLOR;
        }

        match setup.filter {
            Filter::Color => self.shade_visible(scene, setup.view, &visible),
            Filter::Depth => {
                let z = visible.collision.hit_point.z;
                Vec4::new(z, z, z, 0.0)
            }
            Filter::Normal => {
                let n = visible.collision.hit_normal;
                Vec4::new(
                    (n.x + 1.0) * 0.5,
                    (n.y + 1.0) * 0.5,
                    (n.z + 1.0) * 0.5,
                    0.0,
                )
            }
        }
    }

    /// Combine the scene lights over a hit: start from the surface emission
    /// and add each light's modulated contribution unless a shadow probe
    /// finds an occluder.
    fn shade_visible(&self, scene: &Scene, view: NodeKey, visible: &Visible) -> Vec4 {
        let Some(geometry) = visible.geometry else {
            unreachable!("shade_visible requires a hit");
        };

        let mut color = shade::resolve_surface(scene, geometry).emission;
        for &light_node in &self.lights {
            let Some(ComponentKey::Light(light_key)) =
                scene.find_any_component(light_node, ComponentFamily::Light)
            else {
                panic!("enumerated light node lost its light component");
            };
            let Some(light) = scene.light(light_key) else {
                panic!("light node references a released light");
            };
            let position = scene.node(light_node).map_or(Vec4::ZERO, |n| n.position);

            if !self.occluded(scene, light, position, visible.collision.hit_point) {
                color += shade::shade(scene, visible, light_node, view);
            }
        }
        color
    }

    /// Shadow probe: is the path from `hit_point` toward the light blocked?
    ///
    /// Ambient lights cast no shadows (and no ray). Directional lights probe
    /// along the light's own direction; point and spot lights probe toward
    /// the light's position.
    fn occluded(
        &self,
        scene: &Scene,
        light: &Light,
        light_position: Vec4,
        hit_point: Vec4,
    ) -> bool {
        let direction = match light {
            Light::Ambient { .. } => return false,
            Light::Directional { direction, .. } => *direction,
            Light::Point { .. } | Light::Spot { .. } => {
                (light_position - hit_point).normalize()
            }
        };

        self.counters.record(RayKind::Shadow);
        trace_ray(scene, hit_point, &BoundingVolume::Ray { direction })
            .collision
            .hit
    }
}
