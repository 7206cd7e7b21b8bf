//! Fixed-step accumulator.
use log::debug;

use crate::config::ConfigError;
use crate::constants::{FIXED_DELTA, MAX_STEPS_PER_FRAME};

/// Splits variable frame times into whole fixed ticks.
///
/// When a frame would need more than `max_steps` ticks, the whole backlog
/// beyond the cap is dropped so one slow frame cannot snowball into ever longer
/// catch-up frames.
///
/// # Examples
/// ```
/// use limpet::simulation::FixedStep;
/// let mut clock = FixedStep::from_hz(50.0).expect("positive rate");
/// assert_eq!(clock.advance(0.05), 2);
/// assert_eq!(clock.advance(0.005), 0);
/// assert_eq!(clock.advance(0.01), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self {
            step: FIXED_DELTA,
            max_steps: MAX_STEPS_PER_FRAME,
            accumulator: 0.0,
        }
    }
}

impl FixedStep {
    /// Clock ticking `hz` times per simulated second.
    ///
    /// # Errors
    /// Returns [`ConfigError`] unless `hz` is finite and positive.
    pub fn from_hz(hz: f32) -> Result<Self, ConfigError> {
        if !hz.is_finite() {
            return Err(ConfigError::NonFinite { field: "hz" });
        }
        if hz <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "hz",
                value: hz,
            });
        }
        Ok(Self {
            step: hz.recip(),
            ..Self::default()
        })
    }

    /// Replaces the per-frame tick cap. A cap of zero is raised to one.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Seconds per tick.
    #[must_use]
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Fraction of a tick currently accumulated, in `[0, 1)`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Adds `frame_dt` seconds and returns how many ticks to run now.
    ///
    /// Negative or non-finite frame times add nothing.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        let mut steps = 0;
        while self.accumulator + f32::EPSILON >= self.step && steps < self.max_steps {
            self.accumulator = (self.accumulator - self.step).max(0.0);
            steps += 1;
        }
        if self.accumulator >= self.step {
            debug!(
                "fixed step backlog capped at {} ticks; dropped {:.3}s",
                self.max_steps, self.accumulator
            );
            self.accumulator = 0.0;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-30.0)]
    #[case::nan(f32::NAN)]
    fn rejects_bad_rates(#[case] hz: f32) {
        assert!(FixedStep::from_hz(hz).is_err());
    }

    #[test]
    fn accumulates_partial_frames() {
        let mut clock = FixedStep::from_hz(60.0).expect("positive rate");
        let total: u32 = (0..60).map(|_| clock.advance(1.0 / 120.0)).sum();
        assert_eq!(total, 30);
    }

    #[test]
    fn long_frame_is_capped() {
        let mut clock = FixedStep::default().with_max_steps(4);
        assert_eq!(clock.advance(1.0), 4);
        assert!(clock.alpha() < 1.0);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn alpha_reports_leftover() {
        let mut clock = FixedStep::from_hz(10.0).expect("positive rate");
        clock.advance(0.25);
        assert_relative_eq!(clock.alpha(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn negative_frame_time_adds_nothing() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
    }
}
