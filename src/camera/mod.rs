//! Third-person orbit camera that stays level with a wall-walking body.
//!
//! The camera never uses the body's instantaneous up. It keeps its own
//! `smoothed_up`, which chases the body's up at `up_align_speed`, and builds
//! the whole orbit frame from that each frame. Sudden surface changes
//! therefore rotate the view gradually instead of snapping or flipping.

use glam::{Quat, Vec2, Vec3};

use crate::config::{CameraConfig, ConfigError};
use crate::locomotion::ViewReference;
use crate::numeric::{exponential_fraction, step_fraction, wrap_degrees};
use crate::pose::Pose;
use crate::vector_math::{look_rotation, slerp_direction, tangent_direction, try_unit};

/// Orbit state plus the derived camera pose.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCameraController {
    config: CameraConfig,
    yaw: f32,
    pitch: f32,
    distance: f32,
    smoothed_up: Vec3,
    pose: Pose,
}

impl OrbitCameraController {
    /// Creates a camera already settled behind `target`.
    ///
    /// Pitch starts at zero (or the nearest configured bound) and the
    /// smoothed up starts at the target's up, so the first frame needs no
    /// catching up.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn new(config: CameraConfig, target: &Pose) -> Result<Self, ConfigError> {
        config.validate()?;
        let smoothed_up = try_unit(target.up()).unwrap_or(Vec3::Y);
        let yaw = 0.0;
        let pitch = 0.0_f32.clamp(config.min_pitch, config.max_pitch);
        let distance = config.distance;
        let look = orbit_direction(smoothed_up, yaw, pitch);
        let pose = Pose::new(
            desired_position(target.position, smoothed_up, look, &config, distance),
            look_rotation(look, smoothed_up),
        );
        Ok(Self {
            config,
            yaw,
            pitch,
            distance,
            smoothed_up,
            pose,
        })
    }

    /// Applies one frame of look and zoom input, then re-derives the pose.
    ///
    /// `look.x` turns yaw, `look.y` tilts pitch (positive input looks up),
    /// and positive `scroll` zooms in. Non-finite input is ignored.
    pub fn late_tick(&mut self, target: &Pose, look: Vec2, scroll: f32, dt: f32) {
        if look.is_finite() {
            self.yaw = wrap_degrees(self.yaw + look.x * self.config.sensitivity_x);
            self.pitch = (self.pitch - look.y * self.config.sensitivity_y)
                .clamp(self.config.min_pitch, self.config.max_pitch);
        }
        if scroll.is_finite() {
            self.distance = (self.distance - scroll * self.config.zoom_speed)
                .clamp(self.config.min_distance, self.config.max_distance);
        }

        let target_up = try_unit(target.up()).unwrap_or(self.smoothed_up);
        let blended = slerp_direction(
            self.smoothed_up,
            target_up,
            step_fraction(self.config.up_align_speed, dt),
        );
        self.smoothed_up = try_unit(blended).unwrap_or(self.smoothed_up);

        let look_dir = self.look_direction();
        let desired = desired_position(
            target.position,
            self.smoothed_up,
            look_dir,
            &self.config,
            self.distance,
        );
        self.pose.position = self
            .pose
            .position
            .lerp(desired, exponential_fraction(self.config.follow_speed, dt));
        self.pose.orientation = look_rotation(look_dir, self.smoothed_up);
    }

    /// Direction the camera looks along, built from the smoothed up.
    #[must_use]
    pub fn look_direction(&self) -> Vec3 {
        orbit_direction(self.smoothed_up, self.yaw, self.pitch)
    }

    /// Current pose.
    #[must_use]
    pub const fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Yaw in degrees, within `(-180, 180]`.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees, within the configured bounds.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Orbit distance, within the configured bounds.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Up the camera frame is built from.
    #[must_use]
    pub const fn smoothed_up(&self) -> Vec3 {
        self.smoothed_up
    }

    /// Tuning this camera was built with.
    #[must_use]
    pub const fn config(&self) -> &CameraConfig {
        &self.config
    }
}

impl ViewReference for OrbitCameraController {
    fn view_forward(&self) -> Vec3 {
        self.pose.forward()
    }

    fn view_right(&self) -> Vec3 {
        self.pose.right()
    }
}

/// World `+Z` in the plane of `up`, or world `+X` when `up` is along `Z`.
fn basis_forward(up: Vec3) -> Vec3 {
    tangent_direction(Vec3::Z, up)
        .or_else(|| tangent_direction(Vec3::X, up))
        .unwrap_or(Vec3::Z)
}

fn orbit_direction(up: Vec3, yaw: f32, pitch: f32) -> Vec3 {
    let yawed = Quat::from_axis_angle(up, yaw.to_radians()) * basis_forward(up);
    let right = up.cross(yawed).normalize_or_zero();
    if right == Vec3::ZERO {
        return yawed;
    }
    (Quat::from_axis_angle(right, pitch.to_radians()) * yawed).normalize_or(yawed)
}

fn desired_position(
    target: Vec3,
    up: Vec3,
    look: Vec3,
    config: &CameraConfig,
    distance: f32,
) -> Vec3 {
    target + up * config.height_offset - look * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const DT: f32 = 1.0 / 60.0;

    fn camera() -> OrbitCameraController {
        OrbitCameraController::new(CameraConfig::default(), &Pose::IDENTITY)
            .expect("default config is valid")
    }

    #[test]
    fn starts_behind_and_above_target() {
        let cam = camera();
        let config = CameraConfig::default();
        let expected = Vec3::new(0.0, config.height_offset, -config.distance);
        assert_relative_eq!(cam.pose().position.distance(expected), 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam.view_forward().distance(Vec3::Z), 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam.view_right().distance(Vec3::X), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn rejects_inverted_distance_bounds() {
        let config = CameraConfig {
            min_distance: 9.0,
            max_distance: 3.0,
            ..CameraConfig::default()
        };
        assert!(OrbitCameraController::new(config, &Pose::IDENTITY).is_err());
    }

    #[test]
    fn yaw_wraps_into_range() {
        let mut cam = camera();
        cam.late_tick(&Pose::IDENTITY, Vec2::new(70.0, 0.0), 0.0, DT);
        assert_relative_eq!(cam.yaw(), -150.0, epsilon = 1e-3);
    }

    #[rstest]
    #[case::look_far_up(-100.0, CameraConfig::default().max_pitch)]
    #[case::look_far_down(100.0, CameraConfig::default().min_pitch)]
    fn pitch_is_clamped(#[case] look_y: f32, #[case] expected: f32) {
        let mut cam = camera();
        cam.late_tick(&Pose::IDENTITY, Vec2::new(0.0, look_y), 0.0, DT);
        assert_eq!(cam.pitch(), expected);
    }

    #[rstest]
    #[case::zoom_in(100.0, CameraConfig::default().min_distance)]
    #[case::zoom_out(-100.0, CameraConfig::default().max_distance)]
    fn distance_is_clamped(#[case] scroll: f32, #[case] expected: f32) {
        let mut cam = camera();
        cam.late_tick(&Pose::IDENTITY, Vec2::ZERO, scroll, DT);
        assert_eq!(cam.distance(), expected);
    }

    #[test]
    fn quarter_yaw_turns_view_to_world_x() {
        let mut cam = camera();
        cam.late_tick(&Pose::IDENTITY, Vec2::new(30.0, 0.0), 0.0, DT);
        assert_relative_eq!(cam.view_forward().distance(Vec3::X), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn positive_pitch_looks_down_from_above() {
        let mut cam = camera();
        cam.late_tick(&Pose::IDENTITY, Vec2::new(0.0, -10.0), 0.0, DT);
        assert!(cam.pitch() > 0.0);
        assert!(cam.look_direction().y < 0.0);
    }

    #[test]
    fn smoothed_up_lags_sudden_surface_change() {
        let mut cam = camera();
        let on_wall = Pose::facing(Vec3::ZERO, Vec3::Z, Vec3::X);
        cam.late_tick(&on_wall, Vec2::ZERO, 0.0, DT);
        let up = cam.smoothed_up();
        assert!(up.dot(Vec3::Y) > 0.5, "up snapped to {up:?}");
        assert!(up.dot(Vec3::X) > 0.0);
        assert_relative_eq!(up.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn smoothed_up_converges_and_never_flips() {
        let mut cam = camera();
        let ceiling = Pose::facing(Vec3::ZERO, Vec3::Z, Vec3::NEG_Y);
        let mut previous = cam.smoothed_up();
        for _ in 0..600 {
            cam.late_tick(&ceiling, Vec2::ZERO, 0.0, DT);
            let up = cam.smoothed_up();
            assert!(up.is_finite());
            assert!(up.dot(previous) > 0.9, "up jumped from {previous:?} to {up:?}");
            assert!(cam.pose().orientation.is_finite());
            previous = up;
        }
        assert_relative_eq!(previous.distance(Vec3::NEG_Y), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn position_eases_toward_moving_target() {
        let mut cam = camera();
        let before = cam.pose().position;
        let moved = Pose::new(Vec3::new(0.0, 0.0, 10.0), glam::Quat::IDENTITY);
        cam.late_tick(&moved, Vec2::ZERO, 0.0, DT);
        let step = cam.pose().position.z - before.z;
        assert!(step > 0.0 && step < 10.0, "camera moved {step}");
    }
}
