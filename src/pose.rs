//! Position plus orientation of a body, camera, or agent.
use glam::{Quat, Vec3};

use crate::vector_math::look_rotation;

/// World-space placement with an orthonormal local frame.
///
/// The local frame is forward = `+Z`, up = `+Y`, right = `+X`; the accessors
/// rotate those axes by `orientation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// Unit rotation from the local frame into world space.
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Pose at the origin facing `+Z` with `+Y` up.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Creates a pose from a position and rotation.
    #[must_use]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a pose facing `forward` with the given `up`.
    ///
    /// `forward` is re-projected onto the plane of `up`; a colinear
    /// `forward` falls back to a deterministic tangent.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use limpet::Pose;
    /// let pose = Pose::facing(Vec3::ZERO, Vec3::X, Vec3::Y);
    /// assert!((pose.forward() - Vec3::X).length() < 1e-5);
    /// assert!((pose.up() - Vec3::Y).length() < 1e-5);
    /// ```
    #[must_use]
    pub fn facing(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        Self::new(position, look_rotation(forward, up))
    }

    /// Local forward axis in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Local up axis in world space.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Local right axis in world space.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_frame_matches_axes() {
        let pose = Pose::default();
        assert_eq!(pose.forward(), Vec3::Z);
        assert_eq!(pose.up(), Vec3::Y);
        assert_eq!(pose.right(), Vec3::X);
    }

    #[test]
    fn facing_builds_right_handed_frame() {
        let pose = Pose::facing(Vec3::ONE, Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        let f = pose.forward();
        let u = pose.up();
        let r = pose.right();
        assert_relative_eq!(u.cross(f).distance(r), 0.0, epsilon = 1e-5);
        assert_relative_eq!(u.distance(Vec3::X), 0.0, epsilon = 1e-5);
        assert_eq!(pose.position, Vec3::ONE);
    }
}
