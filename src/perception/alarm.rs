//! Per-agent alarm: a three-level state machine with an analog charge.
//!
//! ```text
//! Idle --sees--> Suspicious --charge >= 1--> Alert
//!   ^                |  ^                      |
//!   +--charge <= 0---+  +--too far / off plane--+
//! ```
//!
//! Alert never drops straight to Idle.

use std::fmt;

use log::info;
use serde::Serialize;

use crate::config::{ConfigError, DetectionThresholds};

use super::Observation;

/// Charge within this distance of full or empty counts as full or empty.
/// Repeated `f32` accumulation otherwise stops a hair short and costs a tick.
const CHARGE_EPSILON: f32 = 1e-4;

/// Discrete alarm level. The discriminants order the levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmLevel {
    /// Unaware of the target.
    #[default]
    Idle = 0,
    /// Has glimpsed the target; the charge is filling or draining.
    Suspicious = 1,
    /// Actively chasing.
    Alert = 2,
}

impl fmt::Display for AlarmLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Suspicious => "suspicious",
            Self::Alert => "alert",
        })
    }
}

/// Behaviour requested from the agent's motion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AgentIntent {
    /// Hold at, or walk back to, the spawn point.
    #[default]
    ReturnToSpawn,
    /// Pursue the target.
    Chase,
}

impl AgentIntent {
    /// Intent implied by an alarm level.
    #[must_use]
    pub const fn for_level(level: AlarmLevel) -> Self {
        match level {
            AlarmLevel::Alert => Self::Chase,
            AlarmLevel::Idle | AlarmLevel::Suspicious => Self::ReturnToSpawn,
        }
    }

    /// Whether the agent should chase.
    #[must_use]
    pub const fn is_chase(self) -> bool {
        matches!(self, Self::Chase)
    }
}

/// A change of alarm level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmTransition {
    /// Level before the tick.
    pub from: AlarmLevel,
    /// Level after the tick.
    pub to: AlarmLevel,
}

/// Result of one alarm tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlarmUpdate {
    /// Level after the tick.
    pub level: AlarmLevel,
    /// Charge after the tick, in `[0, 1]`.
    pub value: f32,
    /// Intent for this tick, already reflecting any transition.
    pub intent: AgentIntent,
    /// Set only on ticks where the level changed.
    pub transition: Option<AlarmTransition>,
}

/// Alarm level plus charge for one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmStateMachine {
    thresholds: DetectionThresholds,
    level: AlarmLevel,
    value: f32,
}

impl AlarmStateMachine {
    /// Creates an idle machine with no charge.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when `thresholds` fail validation.
    pub fn new(thresholds: DetectionThresholds) -> Result<Self, ConfigError> {
        Self::with_state(thresholds, AlarmLevel::Idle, 0.0)
    }

    /// Creates a machine resumed at `level` with charge `value`.
    ///
    /// The charge is clamped to `[0, 1]`; a non-finite charge becomes zero.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when `thresholds` fail validation.
    pub fn with_state(
        thresholds: DetectionThresholds,
        level: AlarmLevel,
        value: f32,
    ) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            level,
            value: clamp_unit(value),
        })
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> AlarmLevel {
        self.level
    }

    /// Current charge.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Intent implied by the current level.
    #[must_use]
    pub const fn intent(&self) -> AgentIntent {
        AgentIntent::for_level(self.level)
    }

    /// Thresholds this machine was built with.
    #[must_use]
    pub const fn thresholds(&self) -> &DetectionThresholds {
        &self.thresholds
    }

    /// Advances the machine by `dt` seconds given this tick's observation.
    ///
    /// # Examples
    /// ```
    /// use limpet::config::DetectionThresholds;
    /// use limpet::perception::{AlarmLevel, AlarmStateMachine, Observation};
    ///
    /// let mut alarm = AlarmStateMachine::new(DetectionThresholds::default())
    ///     .expect("default thresholds are valid");
    /// let seen = Observation { distance: 3.0, plane_dot: 1.0, facing_dot: Some(1.0), can_see: true };
    /// let update = alarm.tick(&seen, 0.1);
    /// assert_eq!(update.level, AlarmLevel::Suspicious);
    /// assert_eq!(update.value, 0.0);
    /// ```
    pub fn tick(&mut self, observation: &Observation, dt: f32) -> AlarmUpdate {
        let elapsed = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let from = self.level;
        match self.level {
            AlarmLevel::Idle => {
                if observation.can_see {
                    self.level = AlarmLevel::Suspicious;
                    self.value = 0.0;
                }
            }
            AlarmLevel::Suspicious => self.tick_suspicious(observation.can_see, elapsed),
            AlarmLevel::Alert => {
                if observation.too_far(&self.thresholds)
                    || observation.plane_lost(&self.thresholds)
                {
                    self.level = AlarmLevel::Suspicious;
                }
            }
        }

        let transition = (from != self.level).then_some(AlarmTransition {
            from,
            to: self.level,
        });
        if let Some(change) = transition {
            info!(
                "alarm {} -> {} (charge {:.2}, distance {:.2})",
                change.from, change.to, self.value, observation.distance
            );
        }
        AlarmUpdate {
            level: self.level,
            value: self.value,
            intent: self.intent(),
            transition,
        }
    }

    fn tick_suspicious(&mut self, sees: bool, dt: f32) {
        if sees {
            self.value = clamp_unit(self.value + self.thresholds.charge_speed * dt);
            if self.value >= 1.0 - CHARGE_EPSILON {
                self.value = 1.0;
                self.level = AlarmLevel::Alert;
            }
        } else {
            self.value = clamp_unit(self.value - self.thresholds.decay_speed * dt);
            if self.value <= CHARGE_EPSILON {
                self.value = 0.0;
                self.level = AlarmLevel::Idle;
            }
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
