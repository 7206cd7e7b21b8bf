//! Scripted demo worlds for the headless runner.
//!
//! Each scenario builds a [`Simulation`] with its own surfaces and agents and
//! supplies the input for every tick, so runs are fully reproducible.

use std::fmt;

use glam::{Quat, Vec2, Vec3};
use serde::Serialize;

use crate::agent::AgentId;
use crate::config::{ConfigError, LimpetConfig};
use crate::perception::AlarmLevel;
use crate::pose::Pose;
use crate::presentation::NullSink;
use crate::simulation::{FixedStep, FrameInput, Simulation};
use crate::surface::{BoxSurface, PlaneSurface, SphereSurface, SurfaceProbe, SurfaceSet};

/// Radius of the planet in the sphere scenario.
pub const PLANET_RADIUS: f32 = 10.0;

/// Available demo worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Flat floor with one agent ahead and one looking away.
    Floor,
    /// Floor meeting a tall block; the body walks into the block and climbs.
    Corner,
    /// Small planet; the body walks around it.
    Sphere,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Floor => "floor",
            Self::Corner => "corner",
            Self::Sphere => "sphere",
        })
    }
}

impl ScenarioKind {
    /// World geometry for this scenario.
    #[must_use]
    pub fn surfaces(self) -> Box<dyn SurfaceProbe> {
        match self {
            Self::Floor => Box::new(PlaneSurface::new(Vec3::ZERO, Vec3::Y)),
            Self::Corner => Box::new(
                SurfaceSet::new()
                    .with(PlaneSurface::new(Vec3::ZERO, Vec3::Y))
                    .with(BoxSurface::new(
                        Vec3::new(4.0, -1.0, -10.0),
                        Vec3::new(6.0, 8.0, 10.0),
                    )),
            ),
            Self::Sphere => Box::new(SphereSurface::new(Vec3::ZERO, PLANET_RADIUS)),
        }
    }

    /// Where the body starts.
    #[must_use]
    pub fn body_pose(self) -> Pose {
        match self {
            Self::Floor | Self::Corner => Pose::new(Vec3::new(0.0, 0.5, 0.0), Quat::IDENTITY),
            Self::Sphere => Pose::new(Vec3::new(0.0, PLANET_RADIUS + 0.5, 0.0), Quat::IDENTITY),
        }
    }

    /// Where the agents start.
    #[must_use]
    pub fn agent_poses(self) -> Vec<Pose> {
        match self {
            Self::Floor => vec![
                Pose::facing(Vec3::new(0.0, 0.5, 12.0), Vec3::NEG_Z, Vec3::Y),
                Pose::facing(Vec3::new(-8.0, 0.5, -8.0), Vec3::NEG_X, Vec3::Y),
            ],
            Self::Corner => vec![
                Pose::facing(Vec3::new(0.0, 0.5, -6.0), Vec3::Z, Vec3::Y),
                Pose::facing(Vec3::new(3.5, 7.0, 0.0), Vec3::NEG_Y, Vec3::NEG_X),
            ],
            Self::Sphere => vec![Pose::facing(
                Vec3::new(0.0, -(PLANET_RADIUS + 0.5), 0.0),
                Vec3::Z,
                Vec3::NEG_Y,
            )],
        }
    }

    /// Builds the simulation with its agents.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when `config` is invalid.
    pub fn build(self, config: LimpetConfig) -> Result<Simulation, ConfigError> {
        let mut sim = Simulation::new(config, self.body_pose(), self.surfaces())?;
        for pose in self.agent_poses() {
            sim.spawn_agent(pose)?;
        }
        Ok(sim)
    }

    /// Scripted input for tick `tick` of a run stepping `dt` seconds.
    #[must_use]
    pub fn input_at(self, tick: u64, dt: f32) -> FrameInput {
        #[expect(
            clippy::cast_precision_loss,
            reason = "tick counts in demo runs stay far below f32 precision limits"
        )]
        let seconds = tick as f32 * dt;
        match self {
            Self::Floor => {
                if seconds < 2.0 {
                    FrameInput::movement(0.0, 1.0)
                } else if seconds < 4.0 {
                    FrameInput {
                        movement: Vec2::new(1.0, 0.5),
                        look: Vec2::new(0.5, 0.0),
                        scroll: 0.0,
                    }
                } else {
                    FrameInput::default()
                }
            }
            Self::Corner => FrameInput::movement(1.0, 0.0),
            Self::Sphere => FrameInput::movement(0.0, 1.0),
        }
    }

    /// Runs the scenario for `ticks` fixed steps at `clock`'s rate.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when `config` is invalid.
    pub fn run(
        self,
        config: LimpetConfig,
        clock: &FixedStep,
        ticks: u64,
    ) -> Result<RunSummary, ConfigError> {
        let mut sim = self.build(config)?;
        let dt = clock.step();
        let mut grounded_ticks = 0;
        let mut transitions = 0;
        let mut peak = AlarmLevel::Idle;
        for tick in 0..ticks {
            let report = sim.tick(&self.input_at(tick, dt), dt, &mut NullSink);
            grounded_ticks += u64::from(report.body.grounded());
            for (_, outcome) in &report.agents {
                transitions += u64::from(outcome.alarm.transition.is_some());
                peak = peak.max(outcome.alarm.level);
            }
        }
        Ok(RunSummary::collect(
            self,
            &sim,
            ticks,
            grounded_ticks,
            transitions,
            peak,
        ))
    }
}

/// Final state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    /// Agent handle.
    pub id: AgentId,
    /// Final alarm level.
    pub level: AlarmLevel,
    /// Final alarm charge.
    pub value: f32,
    /// Final position.
    pub position: [f32; 3],
}

/// JSON-friendly outcome of a scripted run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Scenario that was run.
    pub scenario: ScenarioKind,
    /// Ticks simulated.
    pub ticks: u64,
    /// Ticks on which the body found a surface.
    pub grounded_ticks: u64,
    /// Final body position.
    pub body_position: [f32; 3],
    /// Final body up.
    pub body_up: [f32; 3],
    /// Total alarm transitions across all agents.
    pub alarm_transitions: u64,
    /// Highest alarm level any agent reached.
    pub peak_alarm: AlarmLevel,
    /// Final agent states in id order.
    pub agents: Vec<AgentSummary>,
}

impl RunSummary {
    fn collect(
        scenario: ScenarioKind,
        sim: &Simulation,
        ticks: u64,
        grounded_ticks: u64,
        alarm_transitions: u64,
        peak_alarm: AlarmLevel,
    ) -> Self {
        let agents = sim
            .agent_ids()
            .into_iter()
            .filter_map(|id| {
                sim.agent(id).map(|agent| AgentSummary {
                    id,
                    level: agent.alarm().level(),
                    value: agent.alarm().value(),
                    position: agent.pose().position.to_array(),
                })
            })
            .collect();
        Self {
            scenario,
            ticks,
            grounded_ticks,
            body_position: sim.body().pose().position.to_array(),
            body_up: sim.body().up().to_array(),
            alarm_transitions,
            peak_alarm,
            agents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::floor(ScenarioKind::Floor, 2)]
    #[case::corner(ScenarioKind::Corner, 2)]
    #[case::sphere(ScenarioKind::Sphere, 1)]
    fn scenarios_build_with_agents(#[case] kind: ScenarioKind, #[case] agents: usize) {
        let sim = kind.build(LimpetConfig::default()).expect("default config is valid");
        assert_eq!(sim.agent_ids().len(), agents);
    }

    #[test]
    fn floor_script_stops_after_four_seconds() {
        let dt = 1.0 / 60.0;
        assert_eq!(ScenarioKind::Floor.input_at(0, dt).movement, Vec2::new(0.0, 1.0));
        assert_eq!(ScenarioKind::Floor.input_at(300, dt), FrameInput::default());
    }

    #[test]
    fn summary_counts_ticks() {
        let clock = FixedStep::default();
        let summary = ScenarioKind::Floor
            .run(LimpetConfig::default(), &clock, 30)
            .expect("default config is valid");
        assert_eq!(summary.ticks, 30);
        assert_eq!(summary.grounded_ticks, 30);
        assert_eq!(summary.agents.len(), 2);
    }

    #[test]
    fn sphere_run_keeps_the_body_on_the_planet() {
        let clock = FixedStep::default();
        let summary = ScenarioKind::Sphere
            .run(LimpetConfig::default(), &clock, 600)
            .expect("default config is valid");
        assert_eq!(summary.grounded_ticks, summary.ticks);
        let position = Vec3::from_array(summary.body_position);
        let radius = position.length();
        assert!(
            (PLANET_RADIUS - 0.1..=PLANET_RADIUS + 1.0).contains(&radius),
            "body ended at radius {radius}"
        );
        assert!(Vec3::from_array(summary.body_up).dot(position / radius) > 0.95);
    }

    #[test]
    fn display_matches_cli_names() {
        assert_eq!(ScenarioKind::Corner.to_string(), "corner");
    }
}
