//! Vector helpers for tangent-plane geometry.
//!
//! Everything here is total: degenerate inputs produce a deterministic
//! fallback rather than `NaN`. The local frame convention used across the
//! crate is forward = `+Z`, up = `+Y`, right = `+X`, so `right = up × forward`
//! and `forward = right × up`.
use glam::{Mat3, Quat, Vec3};

use crate::DEGENERATE_EPSILON;

/// Returns the unit vector in the direction of `vector`, or `None` when it is
/// too short or not finite.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use limpet::vector_math::try_unit;
/// assert_eq!(try_unit(Vec3::new(0.0, 3.0, 0.0)), Some(Vec3::Y));
/// assert_eq!(try_unit(Vec3::ZERO), None);
/// ```
#[must_use]
pub fn try_unit(vector: Vec3) -> Option<Vec3> {
    if !vector.is_finite() || vector.length_squared() < DEGENERATE_EPSILON {
        return None;
    }
    vector.try_normalize()
}

/// Removes the component of `vector` along the unit `normal`.
#[must_use]
pub fn project_onto_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    vector - normal * vector.dot(normal)
}

/// Projects `vector` onto the plane of `normal` and normalises the result.
///
/// Returns `None` when `vector` is (nearly) colinear with `normal`.
#[must_use]
pub fn tangent_direction(vector: Vec3, normal: Vec3) -> Option<Vec3> {
    try_unit(project_onto_plane(vector, normal))
}

/// Deterministic unit vector perpendicular to `vector`.
///
/// The world axis matching the smallest absolute component of `vector` is
/// the one least aligned with it, so projecting that axis is always
/// well-conditioned. Ties prefer `X`, then `Y`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use limpet::vector_math::fallback_perpendicular;
/// let p = fallback_perpendicular(Vec3::Y);
/// assert!(p.dot(Vec3::Y).abs() < 1e-6);
/// assert!((p.length() - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn fallback_perpendicular(vector: Vec3) -> Vec3 {
    let abs = vector.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let unit = try_unit(vector).unwrap_or(Vec3::Y);
    tangent_direction(axis, unit).unwrap_or_else(|| unit.any_orthonormal_vector())
}

/// Shortest-arc rotation taking unit `from` onto unit `to`.
///
/// When the vectors are antiparallel the arc is undefined; the rotation is
/// then a half turn about [`fallback_perpendicular`] of `from`.
#[must_use]
pub fn shortest_arc(from: Vec3, to: Vec3) -> Quat {
    let dot = from.dot(to);
    if dot < -1.0 + DEGENERATE_EPSILON {
        return Quat::from_axis_angle(fallback_perpendicular(from), std::f32::consts::PI);
    }
    Quat::from_rotation_arc(from, to)
}

/// Spherically interpolates between two unit directions by `fraction`.
///
/// Antiparallel endpoints follow the [`shortest_arc`] fallback axis, so the
/// result is always a finite unit vector.
#[must_use]
pub fn slerp_direction(from: Vec3, to: Vec3, fraction: f32) -> Vec3 {
    let arc = shortest_arc(from, to);
    let partial = Quat::IDENTITY.slerp(arc, fraction.clamp(0.0, 1.0));
    try_unit(partial * from).unwrap_or(from)
}

/// Orientation whose forward (`+Z`) is `forward` and whose up (`+Y`) is as
/// close to `up` as orthogonality allows.
///
/// A `forward` parallel to `up` is replaced by a deterministic tangent so
/// the frame never degenerates.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use limpet::vector_math::look_rotation;
/// let q = look_rotation(Vec3::X, Vec3::Y);
/// assert!((q * Vec3::Z - Vec3::X).length() < 1e-5);
/// assert!((q * Vec3::Y - Vec3::Y).length() < 1e-5);
/// ```
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let up_unit = try_unit(up).unwrap_or(Vec3::Y);
    let forward_unit =
        tangent_direction(forward, up_unit).unwrap_or_else(|| fallback_perpendicular(up_unit));
    let right = up_unit.cross(forward_unit).normalize();
    let true_up = forward_unit.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, forward_unit)).normalize()
}
