//! Ray–primitive intersection kernel.
//!
//! The collision test double-dispatches on the shape tags of both volumes.
//! Only the ray↔ball pair is realized; every other pairing reports a miss
//! (and trips a debug assertion, since reaching it means the scene asked for
//! an unimplemented test).

use glam::Vec4;

use crate::math::solve_quadratic;
use crate::scene::BoundingVolume;

/// Result of an intersection test: hit flag plus the world-space contact
/// point and surface normal. Point and normal are meaningful only when
/// `hit` is true.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Collision {
    /// Whether the volumes intersect.
    pub hit: bool,
    /// World-space contact point (`w = 1`).
    pub hit_point: Vec4,
    /// Unit surface normal at the contact point (`w = 0`).
    pub hit_normal: Vec4,
}

impl Collision {
    /// The no-intersection result.
    pub const MISS: Self = Self {
        hit: false,
        hit_point: Vec4::ZERO,
        hit_normal: Vec4::ZERO,
    };
}

/// Test two positioned volumes for intersection.
///
/// `pa`/`pb` are the world positions of `a`/`b` (for a ray, its origin).
/// The test is symmetric: `collide(a, pa, b, pb)` and `collide(b, pb, a, pa)`
/// yield identical results for the realized pairs.
#[must_use]
pub fn collide(a: &BoundingVolume, pa: Vec4, b: &BoundingVolume, pb: Vec4) -> Collision {
    match (a, b) {
        (BoundingVolume::Ray { direction }, BoundingVolume::Ball { radius }) => {
            ray_ball(*direction, pa, *radius, pb)
        }
        (BoundingVolume::Ball { radius }, BoundingVolume::Ray { direction }) => {
            ray_ball(*direction, pb, *radius, pa)
        }
        _ => {
            debug_assert!(
                false,
                "unsupported collision pair ({:?}, {:?})",
                a.kind(),
                b.kind()
            );
            Collision::MISS
        }
    }
}

/// Ray↔ball test: solve `|d|²·x² + 2·d·(o−c)·x + (|o−c|²−r²) = 0` and take
/// the smallest positive root as the ray parameter.
///
/// A ray that starts inside the ball and runs toward the center (`b <= 0`)
/// hits the far surface. A ray that starts on or just inside the boundary
/// while pointing away must not re-hit its own surface - shadow probes
/// launch from hit points whose residual against the sphere is a rounding
/// artifact - so the far root is ignored when the ray points outward.
fn ray_ball(direction: Vec4, origin: Vec4, radius: f32, center: Vec4) -> Collision {
    let oc = origin - center;
    let a = direction.dot(direction);
    let b = 2.0 * direction.dot(oc);
    let c = oc.dot(oc) - radius * radius;

    let Some((x0, x1)) = solve_quadratic(a, b, c) else {
        return Collision::MISS;
    };

    let x = if x0 > 0.0 {
        x0
    } else if b <= 0.0 {
        x1
    } else {
        x0
    };
    if x <= 0.0 {
        return Collision::MISS;
    }

    let hit_point = origin + direction * x;
    Collision {
        hit: true,
        hit_point,
        hit_normal: (hit_point - center).normalize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(x: f32, y: f32, z: f32) -> BoundingVolume {
        BoundingVolume::Ray {
            direction: Vec4::new(x, y, z, 0.0),
        }
    }

    const ORIGIN: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

    #[test]
    fn axial_ray_hits_front_surface() {
        // Ball at (0, 0, -d): the hit sits at z = -(d - r) with normal +Z.
        for (d, r) in [(5.0_f32, 1.0_f32), (10.0, 2.5), (3.0, 0.25)] {
            let ball = BoundingVolume::Ball { radius: r };
            let center = Vec4::new(0.0, 0.0, -d, 1.0);
            let hit = collide(&ray(0.0, 0.0, -1.0), ORIGIN, &ball, center);
            assert!(hit.hit, "d={d} r={r}");
            assert!((hit.hit_point.z - (-(d - r))).abs() < 1e-4);
            assert!((hit.hit_normal.truncate() - glam::Vec3::Z).length() < 1e-4);
        }
    }

    #[test]
    fn dispatch_is_symmetric() {
        let ball = BoundingVolume::Ball { radius: 1.0 };
        let center = Vec4::new(0.0, 0.0, -5.0, 1.0);
        let r = ray(0.0, 0.0, -1.0);
        let forward = collide(&r, ORIGIN, &ball, center);
        let swapped = collide(&ball, center, &r, ORIGIN);
        assert_eq!(forward, swapped);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ball = BoundingVolume::Ball { radius: 1.0 };
        let center = Vec4::new(0.0, 0.0, -5.0, 1.0);
        let miss = collide(&ray(0.0, 0.0, 1.0), ORIGIN, &ball, center);
        assert!(!miss.hit);
    }

    #[test]
    fn grazing_ray_misses() {
        let ball = BoundingVolume::Ball { radius: 1.0 };
        let center = Vec4::new(0.0, 2.0, -5.0, 1.0);
        let miss = collide(&ray(0.0, 0.0, -1.0), ORIGIN, &ball, center);
        assert!(!miss.hit);
    }

    #[test]
    fn ray_from_inside_hits_exit_surface() {
        let ball = BoundingVolume::Ball { radius: 2.0 };
        let hit = collide(&ray(0.0, 0.0, -1.0), ORIGIN, &ball, ORIGIN);
        assert!(hit.hit);
        assert!((hit.hit_point.z - (-2.0)).abs() < 1e-4);
        // Outward normal at the exit point faces away from the ray origin.
        assert!((hit.hit_normal.truncate() - (-glam::Vec3::Z)).length() < 1e-4);
    }

    #[test]
    fn surface_origin_pointing_outward_does_not_self_hit() {
        // A shadow probe from a point on (or float-epsilon inside) the
        // surface, aimed away from the center, must miss its own ball.
        let ball = BoundingVolume::Ball { radius: 1.0 };
        let center = Vec4::new(0.0, 0.0, -5.0, 1.0);
        for origin in [
            Vec4::new(0.0, 0.0, -4.0, 1.0),
            Vec4::new(0.0, 0.0, -4.000001, 1.0),
        ] {
            let miss = collide(&ray(0.0, 0.0, 1.0), origin, &ball, center);
            assert!(!miss.hit, "self-hit from origin {origin:?}");
        }
    }

    #[test]
    fn non_unit_direction_reaches_the_same_hit_point() {
        // The quadratic is scale-aware: a longer direction shortens the
        // parameter but lands on the same surface point.
        let ball = BoundingVolume::Ball { radius: 1.0 };
        let center = Vec4::new(0.0, 0.0, -5.0, 1.0);
        let unit = collide(&ray(0.0, 0.0, -1.0), ORIGIN, &ball, center);
        let double = collide(&ray(0.0, 0.0, -2.0), ORIGIN, &ball, center);
        assert!(unit.hit && double.hit);
        assert!((unit.hit_point - double.hit_point).length() < 1e-4);
        assert!((unit.hit_normal - double.hit_normal).length() < 1e-4);
    }

    #[test]
    fn off_axis_hit_point_lies_on_sphere() {
        let ball = BoundingVolume::Ball { radius: 1.0 };
        let center = Vec4::new(0.5, 0.0, -4.0, 1.0);
        let dir = Vec4::new(0.1, 0.0, -1.0, 0.0).normalize();
        let hit = collide(
            &BoundingVolume::Ray { direction: dir },
            ORIGIN,
            &ball,
            center,
        );
        assert!(hit.hit);
        assert!(((hit.hit_point - center).length() - 1.0).abs() < 1e-4);
        assert!((hit.hit_normal.length() - 1.0).abs() < 1e-4);
    }
}
