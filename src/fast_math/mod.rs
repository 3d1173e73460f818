//! Fast Math: angle and coordinate helpers shared by the layout engines
//! and the camera choreographer.
//!
//! ## Angle wrapping
//! All azimuths live in (−π, π]. `wrap_angle` folds any finite angle into
//! that range so interpolation always takes the short way around.
//!
//! ## Conventions
//! - Horizontal plane is X/Z, Y is up.
//! - Spherical: polar 0 = +Y (straight up), azimuth measured from +Z toward +X.

use std::f32::consts::{PI, TAU};

/// A point in world space.
pub type Point3 = [f32; 3];

/// Golden angle in radians: π(3 − √5).
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Fused multiply-add: a * b + c.
#[inline(always)]
pub fn fma(a: f32, b: f32, c: f32) -> f32 {
    a.mul_add(b, c)
}

/// Linear interpolation using FMA: a + (b - a) * t
#[inline(always)]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    fma(b - a, t, a)
}

/// Ease-out cubic: 1 − (1 − t)³, with t clamped to [0, 1].
#[inline(always)]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Fold an angle into (−π, π].
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    // In-range values pass through untouched so wrapping is idempotent.
    if angle > -PI && angle <= PI {
        return angle;
    }
    let mut a = (angle + PI).rem_euclid(TAU) - PI;
    if a <= -PI {
        a += TAU;
    }
    a
}

/// Shortest signed angular delta from `from` to `to`, in (−π, π].
#[inline]
pub fn shortest_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Horizontal polar → Cartesian, with an explicit height.
#[inline]
pub fn polar_to_cartesian(radius: f32, angle: f32, height: f32) -> Point3 {
    [radius * angle.cos(), height, radius * angle.sin()]
}

/// Spherical (azimuth, polar, radius) → Cartesian offset from the origin.
#[inline]
pub fn spherical_to_cartesian(azimuth: f32, polar: f32, radius: f32) -> Point3 {
    let sin_p = polar.sin();
    [
        radius * sin_p * azimuth.sin(),
        radius * polar.cos(),
        radius * sin_p * azimuth.cos(),
    ]
}

/// Cartesian offset → (azimuth, polar, radius). The zero vector maps to
/// (0, π/2, 0).
pub fn cartesian_to_spherical(p: Point3) -> (f32, f32, f32) {
    let radius = length(p);
    if radius <= f32::EPSILON {
        return (0.0, std::f32::consts::FRAC_PI_2, 0.0);
    }
    let polar = (p[1] / radius).clamp(-1.0, 1.0).acos();
    let azimuth = p[0].atan2(p[2]);
    (wrap_angle(azimuth), polar, radius)
}

/// Squared distance between two points (no sqrt needed for comparisons).
#[inline(always)]
pub fn distance_squared(a: Point3, b: Point3) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    fma(dx, dx, fma(dy, dy, dz * dz))
}

#[inline(always)]
pub fn distance(a: Point3, b: Point3) -> f32 {
    distance_squared(a, b).sqrt()
}

#[inline(always)]
pub fn length(p: Point3) -> f32 {
    distance_squared(p, [0.0; 3]).sqrt()
}

#[inline(always)]
pub fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline(always)]
pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline(always)]
pub fn dot(a: Point3, b: Point3) -> f32 {
    fma(a[0], b[0], fma(a[1], b[1], a[2] * b[2]))
}

#[inline(always)]
pub fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Unit vector, or the zero vector when `p` has no length.
pub fn normalize(p: Point3) -> Point3 {
    let len = length(p);
    if len <= f32::EPSILON {
        return [0.0; 3];
    }
    let inv = 1.0 / len;
    [p[0] * inv, p[1] * inv, p[2] * inv]
}
