//! Confines movement intent to the tangent plane of the current surface.
use glam::{Vec2, Vec3};

use crate::vector_math::{fallback_perpendicular, tangent_direction, try_unit};
use crate::DEGENERATE_EPSILON;

/// Resolves the reference forward/right pair into unit tangents of `up`.
///
/// A reference colinear with `up` is replaced: forward is rebuilt from
/// `right × up`, and failing that from [`fallback_perpendicular`]; right is
/// rebuilt from `up × forward`.
#[must_use]
pub fn tangent_basis(reference_forward: Vec3, reference_right: Vec3, up: Vec3) -> (Vec3, Vec3) {
    let up_unit = try_unit(up).unwrap_or(Vec3::Y);
    let right_tangent = tangent_direction(reference_right, up_unit);
    let forward = tangent_direction(reference_forward, up_unit)
        .or_else(|| right_tangent.map(|r| r.cross(up_unit)))
        .unwrap_or_else(|| fallback_perpendicular(up_unit));
    let right = right_tangent.unwrap_or_else(|| up_unit.cross(forward));
    (forward, right)
}

/// Converts 2D intent into a world-space direction in the plane of `up`.
///
/// `intent.y` drives forward/back and `intent.x` drives right/left. The
/// result is normalised only when it would exceed unit length, so analog
/// input can still request partial speed. Intent within epsilon of zero
/// returns [`Vec3::ZERO`], which callers must read as "no movement".
///
/// # Examples
/// ```
/// use glam::{Vec2, Vec3};
/// use limpet::locomotion::solve;
/// // Camera tilted down toward a floor: the forward push stays horizontal.
/// let forward = Vec3::new(0.0, -0.6, 0.8);
/// let dir = solve(Vec2::new(0.0, 1.0), forward, Vec3::X, Vec3::Y);
/// assert!((dir - Vec3::Z).length() < 1e-5);
/// assert_eq!(solve(Vec2::ZERO, forward, Vec3::X, Vec3::Y), Vec3::ZERO);
/// ```
#[must_use]
pub fn solve(intent: Vec2, reference_forward: Vec3, reference_right: Vec3, up: Vec3) -> Vec3 {
    if !intent.is_finite() || intent.length_squared() < DEGENERATE_EPSILON {
        return Vec3::ZERO;
    }
    let (forward, right) = tangent_basis(reference_forward, reference_right, up);
    let combined = forward * intent.y + right * intent.x;
    if combined.length_squared() > 1.0 {
        combined.normalize_or_zero()
    } else {
        combined
    }
}
