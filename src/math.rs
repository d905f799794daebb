//! Small math kernel on top of [`glam`]: the quadratic solver, the view
//! transform, and the few vector helpers glam does not provide in the exact
//! shape the renderer needs.
//!
//! Conventions used throughout the crate:
//!
//! - Positions are [`Vec4`] with `w = 1`, directions are [`Vec4`] with
//!   `w = 0`. Keeping the `w` lane zeroed on directions makes glam's 4-lane
//!   `dot`/`normalize` agree with their 3-D meaning, so the intersection
//!   quadratic stays exact.
//! - The view transform is right-handed with the forward axis mapped to −Z.

use glam::{Mat4, Vec4};

/// Solve `a·x² + b·x + c = 0` for real roots.
///
/// Returns `Some((x0, x1))` with `x0 <= x1`, or `None` when the discriminant
/// is negative. A double root is reported as two equal values `-b / 2a`.
///
/// Uses the numerically stable form: the root with the larger magnitude is
/// computed first (avoiding cancellation between `-b` and the discriminant),
/// the other from the product identity `x0·x1 = c/a`.
#[must_use]
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    let d = b * b - 4.0 * a * c;
    if d < 0.0 {
        return None;
    }
    if d == 0.0 {
        let x = -0.5 * b / a;
        return Some((x, x));
    }

    let q = if b > 0.0 {
        -0.5 * (b + d.sqrt())
    } else {
        -0.5 * (b - d.sqrt())
    };
    let x0 = q / a;
    let x1 = c / q;

    if x0 > x1 { Some((x1, x0)) } else { Some((x0, x1)) }
}

/// Mirror `d` about the plane with normal `n`: `d − 2·(d·n)·n`.
///
/// `n` is expected to be unit length; the result has the same length as `d`.
#[inline]
#[must_use]
pub fn reflect(d: Vec4, n: Vec4) -> Vec4 {
    d - 2.0 * d.dot(n) * n
}

/// Raise each lane of `v` to the corresponding lane of `e`.
///
/// Used by the shading model, which stores shininess as a color and
/// exponentiates the specular term per channel.
#[inline]
#[must_use]
pub fn powv(v: Vec4, e: Vec4) -> Vec4 {
    Vec4::new(
        v.x.powf(e.x),
        v.y.powf(e.y),
        v.z.powf(e.z),
        v.w.powf(e.w),
    )
}

/// Build the right-handed view matrix for an eye at `eye` looking at
/// `interest` with the given `up` hint.
///
/// The `w` lanes of the inputs are ignored. Undefined when `interest == eye`
/// or `up` is parallel to the view direction, as for any look-at transform.
#[inline]
#[must_use]
pub fn look_at(eye: Vec4, interest: Vec4, up: Vec4) -> Mat4 {
    Mat4::look_at_rh(eye.truncate(), interest.truncate(), up.truncate())
}

/// Re-homogenize a transformed camera-plane point into a direction:
/// zero the `w` lane, then normalize.
///
/// Undefined for a zero `xyz` part, like [`Vec4::normalize`] itself.
#[inline]
#[must_use]
pub fn direction(v: Vec4) -> Vec4 {
    Vec4::new(v.x, v.y, v.z, 0.0).normalize()
}
