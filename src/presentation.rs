//! Presentation signals emitted by the simulation.
//!
//! The simulation never drives animation or UI directly. Each tick it pushes
//! typed signals into a [`PresentationSink`]: an [`AnimationIntent`] per body
//! and agent, and an [`IndicatorVisual`] plus billboard rotation per agent.
//! What a sink does with them (blend trees, sprites, nothing) is its own
//! business.

use glam::{Quat, Vec3};
use serde::Serialize;

use crate::agent::AgentId;
use crate::perception::{AlarmLevel, AlarmTransition, AlarmUpdate};
use crate::pose::Pose;
use crate::vector_math::{look_rotation, try_unit};

/// Locomotion state for animation playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AnimationIntent {
    /// The character is translating this tick.
    pub moving: bool,
    /// The character is pursuing a target.
    pub chasing: bool,
}

/// What an agent's alarm indicator should show.
///
/// The variant only changes on alarm transitions; in-state ticks update the
/// suspicion fill.
///
/// # Examples
/// ```
/// use limpet::perception::{AgentIntent, AlarmLevel, AlarmTransition, AlarmUpdate};
/// use limpet::presentation::IndicatorVisual;
///
/// let primed = IndicatorVisual::Hidden.apply(&AlarmUpdate {
///     level: AlarmLevel::Suspicious,
///     value: 0.0,
///     intent: AgentIntent::ReturnToSpawn,
///     transition: Some(AlarmTransition { from: AlarmLevel::Idle, to: AlarmLevel::Suspicious }),
/// });
/// assert_eq!(primed, IndicatorVisual::Suspicion { fill: 0.0 });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorVisual {
    /// Nothing shown.
    #[default]
    Hidden,
    /// Suspicion meter at `fill` in `[0, 1]`.
    Suspicion {
        /// Current alarm charge.
        fill: f32,
    },
    /// Alert marker at full charge.
    Alert,
}

impl IndicatorVisual {
    /// Visual appropriate for an alarm level at a given charge.
    #[must_use]
    pub const fn for_level(level: AlarmLevel, value: f32) -> Self {
        match level {
            AlarmLevel::Idle => Self::Hidden,
            AlarmLevel::Suspicious => Self::Suspicion { fill: value },
            AlarmLevel::Alert => Self::Alert,
        }
    }

    /// Folds one alarm tick into the visual.
    #[must_use]
    pub const fn apply(self, update: &AlarmUpdate) -> Self {
        match (update.transition, self) {
            (Some(AlarmTransition { to, .. }), _) => Self::for_level(to, update.value),
            (None, Self::Suspicion { .. }) => Self::Suspicion { fill: update.value },
            (None, current) => current,
        }
    }

    /// Whether anything is shown.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Billboard rotation for an indicator at `position` so it faces `camera`.
///
/// The indicator's forward points away from the camera (so its front face
/// is toward the viewer) and its up follows the camera's up. When the
/// indicator sits on the camera, the camera's own orientation is reused.
#[must_use]
pub fn face_camera(position: Vec3, camera: &Pose) -> Quat {
    try_unit(position - camera.position).map_or(camera.orientation, |away| {
        look_rotation(away, camera.up())
    })
}

/// Receiver of per-tick presentation output.
#[cfg_attr(test, mockall::automock)]
pub trait PresentationSink {
    /// Body locomotion state for this tick.
    fn body_animation(&mut self, intent: AnimationIntent);
    /// Agent locomotion state for this tick.
    fn agent_animation(&mut self, agent: AgentId, intent: AnimationIntent);
    /// Agent indicator visual and its billboard rotation for this tick.
    fn indicator(&mut self, agent: AgentId, visual: IndicatorVisual, rotation: Quat);
    /// Agent alarm level change. Called only on ticks where the level changed.
    fn alarm_transition(&mut self, agent: AgentId, transition: AlarmTransition);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn body_animation(&mut self, _intent: AnimationIntent) {}

    fn agent_animation(&mut self, _agent: AgentId, _intent: AnimationIntent) {}

    fn indicator(&mut self, _agent: AgentId, _visual: IndicatorVisual, _rotation: Quat) {}

    fn alarm_transition(&mut self, _agent: AgentId, _transition: AlarmTransition) {}
}
