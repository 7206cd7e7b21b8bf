//! Utility helpers for tests.
//!
//! Pose and threshold builders keep integration tests terse, and
//! [`RecordingSink`] captures presentation output for later assertions.

use glam::{Quat, Vec3};
use limpet::agent::AgentId;
use limpet::config::{DetectionThresholds, LimpetConfig};
use limpet::perception::AlarmTransition;
use limpet::presentation::{AnimationIntent, IndicatorVisual, PresentationSink};
use limpet::surface::PlaneSurface;
use limpet::{Pose, Simulation};

/// Height of a standing body's origin above the floor.
pub const STANDING_HEIGHT: f32 = 0.5;

/// Pose standing on the `y = 0` floor at `(x, z)` facing `forward`.
#[must_use]
pub fn standing(x: f32, z: f32, forward: Vec3) -> Pose {
    Pose::facing(Vec3::new(x, STANDING_HEIGHT, z), forward, Vec3::Y)
}

/// Pose at `position` facing `forward` with the given `up`.
#[must_use]
pub fn posed(position: Vec3, forward: Vec3, up: Vec3) -> Pose {
    Pose::facing(position, forward, up)
}

/// Builder over [`DetectionThresholds`] starting from the defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdsBuilder(DetectionThresholds);

impl ThresholdsBuilder {
    /// Sets the detection and lose distances together.
    #[must_use]
    pub const fn range(mut self, detect: f32, lose: f32) -> Self {
        self.0.detect_distance = detect;
        self.0.lose_distance = lose;
        self
    }

    /// Sets the field-of-view dot threshold.
    #[must_use]
    pub const fn fov(mut self, dot: f32) -> Self {
        self.0.fov_dot_threshold = dot;
        self
    }

    /// Sets the same-plane dot threshold.
    #[must_use]
    pub const fn same_plane(mut self, dot: f32) -> Self {
        self.0.same_plane_dot_threshold = dot;
        self
    }

    /// Sets the charge and decay rates.
    #[must_use]
    pub const fn rates(mut self, charge: f32, decay: f32) -> Self {
        self.0.charge_speed = charge;
        self.0.decay_speed = decay;
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub const fn build(self) -> DetectionThresholds {
        self.0
    }
}

/// Starts a [`ThresholdsBuilder`].
#[must_use]
pub fn thresholds() -> ThresholdsBuilder {
    ThresholdsBuilder::default()
}

/// Simulation on an infinite `y = 0` floor with the body at the origin.
///
/// # Panics
/// Panics if `config` fails validation.
#[must_use]
pub fn floor_simulation(config: LimpetConfig) -> Simulation {
    Simulation::new(
        config,
        standing(0.0, 0.0, Vec3::Z),
        Box::new(PlaneSurface::new(Vec3::ZERO, Vec3::Y)),
    )
    .expect("test configuration should be valid")
}

/// Presentation sink that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Body animation per tick.
    pub body: Vec<AnimationIntent>,
    /// Agent animation per tick.
    pub agents: Vec<(AgentId, AnimationIntent)>,
    /// Indicator visual and rotation per agent per tick.
    pub indicators: Vec<(AgentId, IndicatorVisual, Quat)>,
    /// Alarm transitions in emission order.
    pub transitions: Vec<(AgentId, AlarmTransition)>,
}

impl RecordingSink {
    /// Transitions emitted for `agent`.
    #[must_use]
    pub fn transitions_for(&self, agent: AgentId) -> Vec<AlarmTransition> {
        self.transitions
            .iter()
            .filter(|(id, _)| *id == agent)
            .map(|(_, transition)| *transition)
            .collect()
    }

    /// Most recent indicator visual for `agent`.
    #[must_use]
    pub fn last_indicator(&self, agent: AgentId) -> Option<IndicatorVisual> {
        self.indicators
            .iter()
            .rev()
            .find(|(id, _, _)| *id == agent)
            .map(|(_, visual, _)| *visual)
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.body.clear();
        self.agents.clear();
        self.indicators.clear();
        self.transitions.clear();
    }
}

impl PresentationSink for RecordingSink {
    fn body_animation(&mut self, intent: AnimationIntent) {
        self.body.push(intent);
    }

    fn agent_animation(&mut self, agent: AgentId, intent: AnimationIntent) {
        self.agents.push((agent, intent));
    }

    fn indicator(&mut self, agent: AgentId, visual: IndicatorVisual, rotation: Quat) {
        self.indicators.push((agent, visual, rotation));
    }

    fn alarm_transition(&mut self, agent: AgentId, transition: AlarmTransition) {
        self.transitions.push((agent, transition));
    }
}
