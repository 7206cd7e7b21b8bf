//! Smoothly re-aligns an orientation so its up tracks a surface normal.
use glam::{Quat, Vec3};

use crate::numeric::step_fraction;
use crate::vector_math::{shortest_arc, try_unit};

/// Rotates `orientation` part of the way toward the orientation whose up is
/// `sampled_normal`.
///
/// The target is the shortest-arc rotation from `current_up` to
/// `sampled_normal` applied on top of `orientation`, so heading is preserved
/// as far as the surface change allows. The blend factor is
/// `smoothing_rate * dt`, clamped to `[0, 1]`. An antiparallel normal turns
/// about a deterministic perpendicular axis instead of producing `NaN`.
///
/// The function is pure; callers commit the returned rotation.
///
/// # Examples
/// ```
/// use glam::{Quat, Vec3};
/// use limpet::locomotion::align;
/// let next = align(Quat::IDENTITY, Vec3::Y, Vec3::X, 100.0, 1.0);
/// assert!((next * Vec3::Y - Vec3::X).length() < 1e-5);
/// ```
#[must_use]
pub fn align(
    orientation: Quat,
    current_up: Vec3,
    sampled_normal: Vec3,
    smoothing_rate: f32,
    dt: f32,
) -> Quat {
    let (Some(from), Some(to)) = (try_unit(current_up), try_unit(sampled_normal)) else {
        return orientation;
    };
    let fraction = step_fraction(smoothing_rate, dt);
    if fraction <= 0.0 {
        return orientation;
    }
    let target = (shortest_arc(from, to) * orientation).normalize();
    let next = orientation.slerp(target, fraction).normalize();
    if next.is_finite() {
        next
    } else {
        orientation
    }
}
