//! Degree/radian conversion and angle wrapping

use std::f64::consts::{PI, TAU};

/// Degrees to radians. Exact inverse of [`to_degree`], no wrapping.
pub fn to_radian(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Radians to degrees. Exact inverse of [`to_radian`], no wrapping.
pub fn to_degree(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Reduce an angle into [0, 2π).
///
/// For display and comparison only; mean anomaly is propagated unwrapped.
pub fn normalize_angle(rad: f64) -> f64 {
    let a = rad.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Signed difference `to - from`, wrapped to (-π, π].
pub fn angle_between(from: f64, to: f64) -> f64 {
    let d = normalize_angle(to - from);
    if d > PI { d - TAU } else { d }
}

/// Unsigned angular distance between two angles, in [0, π].
pub fn angular_distance(a: f64, b: f64) -> f64 {
    angle_between(a, b).abs()
}
