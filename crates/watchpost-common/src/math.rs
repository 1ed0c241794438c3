//! Small math helpers shared by agents and ports.
//!
//! World space is Y-up: the horizontal plane is XZ.

pub use glam::Vec3;

/// Linearly remaps `value` from `[from_min, from_max]` to `[to_min, to_max]`.
///
/// The result is not clamped. A degenerate source range maps everything to
/// `to_min`.
#[must_use]
pub fn remap(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    let span = from_max - from_min;
    if span.abs() <= f32::EPSILON {
        return to_min;
    }
    (value - from_min) / span * (to_max - to_min) + to_min
}

/// Drops the vertical component of `point`, replacing it with `height`.
#[must_use]
pub fn at_height(point: Vec3, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.z)
}

/// Unit direction from `from` to `to` on the horizontal plane.
///
/// Returns `None` when the two points are vertically aligned.
#[must_use]
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = at_height(to, from.y) - from;
    delta.try_normalize()
}

/// Distance between two points on the horizontal plane.
#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    at_height(b, a.y).distance(a)
}
