//! Geometric sight test: distance, field of view, and plane agreement.
use glam::Vec3;

use crate::config::DetectionThresholds;
use crate::pose::Pose;
use crate::DEGENERATE_EPSILON;

/// Raw perception signals for one agent/target pair, plus the verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Distance from agent to target.
    pub distance: f32,
    /// `dot(target_up, agent_up)`.
    pub plane_dot: f32,
    /// `dot(direction_to_target, agent_forward)`; `None` when the two
    /// positions coincide.
    pub facing_dot: Option<f32>,
    /// Whether every gate passed.
    pub can_see: bool,
}

impl Observation {
    /// Whether the target has drifted beyond `lose_distance`.
    #[must_use]
    pub fn too_far(&self, thresholds: &DetectionThresholds) -> bool {
        self.distance > thresholds.lose_distance
    }

    /// Whether the target has left the agent's surface plane.
    ///
    /// Uses a strict `<`, which is independent of the `>` used by the sight
    /// gate: a `plane_dot` exactly at the threshold neither sees nor loses.
    #[must_use]
    pub fn plane_lost(&self, thresholds: &DetectionThresholds) -> bool {
        self.plane_dot < thresholds.same_plane_dot_threshold
    }
}

/// Measures `target` from `agent`'s point of view.
///
/// The target is seen when it shares the agent's plane
/// (`plane_dot > same_plane_dot_threshold`), is strictly within
/// `detect_distance`, and lies in front
/// (`facing_dot > fov_dot_threshold`). Coincident positions have no facing
/// and are never seen.
#[must_use]
pub fn observe(agent: &Pose, target: &Pose, thresholds: &DetectionThresholds) -> Observation {
    let offset = target.position - agent.position;
    let distance = offset.length();
    let plane_dot = target.up().dot(agent.up());
    let facing_dot = (distance > DEGENERATE_EPSILON)
        .then(|| (offset / distance).dot(agent.forward()))
        .filter(|dot| dot.is_finite());

    let same_plane = plane_dot > thresholds.same_plane_dot_threshold;
    let in_range = distance < thresholds.detect_distance;
    let in_front = facing_dot.is_some_and(|dot| dot > thresholds.fov_dot_threshold);

    Observation {
        distance,
        plane_dot,
        facing_dot,
        can_see: same_plane && in_range && in_front,
    }
}

/// Whether `agent` sees `target`. Pure and deterministic.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use limpet::config::DetectionThresholds;
/// use limpet::perception::can_see;
/// use limpet::Pose;
///
/// let thresholds = DetectionThresholds::default();
/// let agent = Pose::IDENTITY;
/// let ahead = Pose::facing(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, Vec3::Y);
/// let upside_down = Pose::facing(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, Vec3::NEG_Y);
/// assert!(can_see(&agent, &ahead, &thresholds));
/// assert!(!can_see(&agent, &upside_down, &thresholds));
/// ```
#[must_use]
pub fn can_see(agent: &Pose, target: &Pose, thresholds: &DetectionThresholds) -> bool {
    observe(agent, target, thresholds).can_see
}

/// Unit direction from `from` toward `to`, if they are apart.
#[must_use]
pub fn direction_to(from: Vec3, to: Vec3) -> Option<Vec3> {
    crate::vector_math::try_unit(to - from)
}
