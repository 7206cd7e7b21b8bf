//! Agents that watch the controlled body and chase it when alarmed.
//!
//! An [`Agent`] bundles its pose, alarm, motion driver, pathfinder and
//! indicator. Each tick it reads the target pose (never owning it), updates
//! its alarm, and moves through its pathfinder. Agents share no mutable
//! state, so they can be ticked in any order.

mod motion;
mod pathfinder;

use std::fmt;

use glam::Vec3;
use serde::Serialize;

use crate::config::{AgentConfig, ConfigError, DetectionThresholds};
use crate::perception::{observe, AlarmStateMachine, AlarmUpdate, Observation};
use crate::pose::Pose;
use crate::presentation::{AnimationIntent, IndicatorVisual};
use crate::vector_math::{look_rotation, tangent_direction};

pub use motion::{AgentMotionDriver, MotionStatus};
#[cfg(test)]
pub use pathfinder::MockPathfinder;
pub use pathfinder::{DirectPathfinder, Pathfinder};

/// Stable handle for an agent inside a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Everything an agent produced in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTick {
    /// Raw perception signals.
    pub observation: Observation,
    /// Alarm state after the tick.
    pub alarm: AlarmUpdate,
    /// Pathfinder interaction.
    pub motion: MotionStatus,
    /// Animation signal.
    pub animation: AnimationIntent,
    /// Indicator visual after the tick.
    pub indicator: IndicatorVisual,
}

/// One perceiving, chasing agent.
pub struct Agent {
    pose: Pose,
    alarm: AlarmStateMachine,
    driver: AgentMotionDriver,
    pathfinder: Box<dyn Pathfinder>,
    indicator: IndicatorVisual,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("pose", &self.pose)
            .field("alarm", &self.alarm)
            .field("driver", &self.driver)
            .field("indicator", &self.indicator)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Creates an agent at `pose` that treats `pose.position` as its spawn.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when `thresholds` fail validation.
    pub fn new(
        pose: Pose,
        thresholds: DetectionThresholds,
        pathfinder: Box<dyn Pathfinder>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            pose: Pose::new(pose.position, pose.orientation.normalize()),
            alarm: AlarmStateMachine::new(thresholds)?,
            driver: AgentMotionDriver::new(pose.position),
            pathfinder,
            indicator: IndicatorVisual::Hidden,
        })
    }

    /// Creates an agent that travels with a [`DirectPathfinder`].
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn with_config(pose: Pose, config: &AgentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pathfinder = DirectPathfinder::new(pose.position, config.speed, config.stopping_distance);
        Self::new(pose, config.detection, Box::new(pathfinder))
    }

    /// Current pose.
    #[must_use]
    pub const fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Immutable spawn point.
    #[must_use]
    pub const fn spawn(&self) -> Vec3 {
        self.driver.spawn()
    }

    /// Alarm state.
    #[must_use]
    pub const fn alarm(&self) -> &AlarmStateMachine {
        &self.alarm
    }

    /// Indicator visual as of the last tick.
    #[must_use]
    pub const fn indicator(&self) -> IndicatorVisual {
        self.indicator
    }

    /// Perceives `target`, updates the alarm, and moves for `dt` seconds.
    ///
    /// The agent turns to face its travel direction within its own surface
    /// plane; it keeps its up.
    pub fn tick(&mut self, target: &Pose, dt: f32) -> AgentTick {
        let observation = observe(&self.pose, target, self.alarm.thresholds());
        let alarm = self.alarm.tick(&observation, dt);
        self.indicator = self.indicator.apply(&alarm);

        let motion = self
            .driver
            .drive(alarm.intent, target.position, self.pathfinder.as_mut());
        self.pathfinder.advance(dt);

        let next = self.pathfinder.position();
        let up = self.pose.up();
        if let Some(heading) = tangent_direction(next - self.pose.position, up) {
            self.pose.orientation = look_rotation(heading, up);
        }
        self.pose.position = next;

        AgentTick {
            observation,
            alarm,
            motion,
            animation: AnimationIntent {
                moving: !motion.idle,
                chasing: alarm.intent.is_chase(),
            },
            indicator: self.indicator,
        }
    }
}
