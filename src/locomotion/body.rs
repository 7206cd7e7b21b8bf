//! The controlled body: samples the surface, re-aligns, walks, and sticks.
//!
//! One [`BodyController::tick`] runs the whole pipeline in a fixed order.
//! The surface is sampled and the orientation re-aligned *before* the motion
//! direction is solved, because motion is confined to the plane of the
//! just-updated up.

use glam::{Vec2, Vec3};
use log::debug;

use crate::config::{BodyConfig, ConfigError};
use crate::numeric::step_fraction;
use crate::pose::Pose;
use crate::presentation::AnimationIntent;
use crate::surface::{SurfaceProbe, SurfaceSample, SurfaceSampler};
use crate::vector_math::look_rotation;

use super::{align, solve};

/// Slack on the resting height so a body sitting exactly at it counts as
/// touching.
const CONTACT_SKIN: f32 = 1e-3;

/// Source of the forward/right pair that movement intent is expressed in.
///
/// Usually the orbit camera. Passed to the body explicitly each tick rather
/// than looked up globally.
pub trait ViewReference {
    /// Direction the viewer considers "forward".
    fn view_forward(&self) -> Vec3;
    /// Direction the viewer considers "right".
    fn view_right(&self) -> Vec3;
}

impl ViewReference for Pose {
    fn view_forward(&self) -> Vec3 {
        self.forward()
    }

    fn view_right(&self) -> Vec3 {
        self.right()
    }
}

/// Outcome of one body tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyStep {
    /// Surface found within the probe this tick.
    pub sample: Option<SurfaceSample>,
    /// Unit-or-shorter motion direction; zero when idle.
    pub motion: Vec3,
    /// Presentation signal for this tick.
    pub animation: AnimationIntent,
}

impl BodyStep {
    /// Whether a surface was found this tick.
    #[must_use]
    pub const fn grounded(&self) -> bool {
        self.sample.is_some()
    }
}

/// Surface-relative walker with synthetic gravity along its own negative up.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyController {
    config: BodyConfig,
    sampler: SurfaceSampler,
    pose: Pose,
    velocity: Vec3,
    grounded: bool,
}

impl BodyController {
    /// Creates a body at `pose` at rest.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn new(config: BodyConfig, pose: Pose) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sampler: SurfaceSampler::new(config.ground_check_distance),
            pose: Pose::new(pose.position, pose.orientation.normalize()),
            velocity: Vec3::ZERO,
            grounded: false,
        })
    }

    /// Current pose.
    #[must_use]
    pub const fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Current up, always unit length.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.pose.up()
    }

    /// Velocity accumulated from synthetic gravity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Whether the last tick found a surface.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Tuning this body was built with.
    #[must_use]
    pub const fn config(&self) -> &BodyConfig {
        &self.config
    }

    /// Advances the body by `dt` seconds.
    ///
    /// `intent` is the raw movement axes (`x` right, `y` forward). `view`
    /// supplies the reference basis; without one, world `+Z`/`+X` are used.
    /// A non-positive or non-finite `dt` leaves the body untouched.
    pub fn tick(
        &mut self,
        intent: Vec2,
        view: Option<&dyn ViewReference>,
        probe: &dyn SurfaceProbe,
        dt: f32,
    ) -> BodyStep {
        if !(dt.is_finite() && dt > 0.0) {
            return BodyStep {
                sample: None,
                motion: Vec3::ZERO,
                animation: AnimationIntent::default(),
            };
        }

        let sample = self.ground(probe, dt);
        let up = self.pose.up();

        let (reference_forward, reference_right) =
            view.map_or((Vec3::Z, Vec3::X), |v| (v.view_forward(), v.view_right()));
        let motion = solve(intent, reference_forward, reference_right, up);
        if motion != Vec3::ZERO {
            let facing = look_rotation(motion, up);
            self.pose.orientation = self
                .pose
                .orientation
                .slerp(facing, step_fraction(self.config.turn_speed, dt))
                .normalize();
            self.pose.position += motion * self.config.move_speed * dt;
        }

        let touching =
            sample.is_some_and(|hit| hit.distance <= self.config.ground_offset + CONTACT_SKIN);
        self.apply_gravity(up, touching, dt);

        BodyStep {
            sample,
            motion,
            animation: AnimationIntent {
                moving: motion != Vec3::ZERO,
                chasing: false,
            },
        }
    }

    /// Samples below the body and re-aligns toward the surface normal.
    fn ground(&mut self, probe: &dyn SurfaceProbe, dt: f32) -> Option<SurfaceSample> {
        let up = self.pose.up();
        let sample = self.sampler.sample_below(probe, self.pose.position, up);
        if let Some(hit) = sample {
            self.pose.orientation = align(
                self.pose.orientation,
                up,
                hit.normal,
                self.config.align_to_ground_speed,
                dt,
            );
        }
        let grounded = sample.is_some();
        if grounded != self.grounded {
            debug!(
                "body {} at {:?}",
                if grounded { "grounded" } else { "airborne" },
                self.pose.position
            );
        }
        self.grounded = grounded;
        sample
    }

    /// Accelerates along `-up`, then integrates.
    ///
    /// While `touching`, only velocity leaving the surface survives: the
    /// into-surface part is cancelled and so is the sideways remainder that
    /// earlier gravity leaves behind once up has turned. A grounded body
    /// hovering above its resting height keeps falling until it touches.
    fn apply_gravity(&mut self, up: Vec3, touching: bool, dt: f32) {
        self.velocity -= up * self.config.gravity_strength * dt;
        if touching {
            self.velocity = up * self.velocity.dot(up).max(0.0);
        }
        self.pose.position += self.velocity * dt;
    }
}
