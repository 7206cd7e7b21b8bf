//! The tick loop tying body, camera, and agents together.
//!
//! Order within a tick is fixed: the body moves first (using last frame's
//! camera as its view reference), then the camera follows the body's new
//! pose, then every agent perceives that same pose. Agents are ticked in
//! ascending [`AgentId`] order so runs are reproducible.

mod clock;

use bevy::prelude::Resource;
use glam::{Vec2, Vec3};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId, AgentTick};
use crate::camera::OrbitCameraController;
use crate::config::{ConfigError, LimpetConfig};
use crate::constants::INDICATOR_HEIGHT;
use crate::locomotion::{BodyController, BodyStep};
use crate::pose::Pose;
use crate::presentation::{face_camera, PresentationSink};
use crate::surface::SurfaceProbe;

pub use clock::FixedStep;

/// Normalised input for one frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    /// Movement axes: `x` right/left, `y` forward/back, each in `[-1, 1]`.
    pub movement: Vec2,
    /// Look axes: `x` yaw, `y` pitch.
    pub look: Vec2,
    /// Zoom input; positive zooms in.
    pub scroll: f32,
}

impl FrameInput {
    /// Input that only moves the body.
    #[must_use]
    pub const fn movement(x: f32, y: f32) -> Self {
        Self {
            movement: Vec2::new(x, y),
            look: Vec2::ZERO,
            scroll: 0.0,
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Body outcome.
    pub body: BodyStep,
    /// Camera pose after the tick.
    pub camera: Pose,
    /// Agent outcomes in ascending id order.
    pub agents: Vec<(AgentId, AgentTick)>,
}

/// Owns the body, its camera, the agents, and the world surfaces.
pub struct Simulation {
    config: LimpetConfig,
    body: BodyController,
    camera: OrbitCameraController,
    agents: HashMap<AgentId, Agent>,
    next_agent: u32,
    surfaces: Box<dyn SurfaceProbe>,
    ticks: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("body", &self.body)
            .field("camera", &self.camera)
            .field("agents", &self.agents.len())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Builds a simulation with the body at `body_pose` and no agents.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when any section of `config` is invalid.
    pub fn new(
        config: LimpetConfig,
        body_pose: Pose,
        surfaces: Box<dyn SurfaceProbe>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let body = BodyController::new(config.body, body_pose)?;
        let camera = OrbitCameraController::new(config.camera, body.pose())?;
        Ok(Self {
            config,
            body,
            camera,
            agents: HashMap::new(),
            next_agent: 0,
            surfaces,
            ticks: 0,
        })
    }

    /// Spawns an agent at `pose` using the configured agent tuning.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the agent tuning is invalid.
    pub fn spawn_agent(&mut self, pose: Pose) -> Result<AgentId, ConfigError> {
        let agent = Agent::with_config(pose, &self.config.agent)?;
        Ok(self.insert_agent(agent))
    }

    /// Adds a pre-built agent and returns its id.
    pub fn insert_agent(&mut self, agent: Agent) -> AgentId {
        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        self.agents.insert(id, agent);
        id
    }

    /// Removes an agent.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    /// Looks up an agent.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Agent ids in ascending order.
    #[must_use]
    pub fn agent_ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.agents.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The controlled body.
    #[must_use]
    pub const fn body(&self) -> &BodyController {
        &self.body
    }

    /// The orbit camera.
    #[must_use]
    pub const fn camera(&self) -> &OrbitCameraController {
        &self.camera
    }

    /// Configuration the simulation was built with.
    #[must_use]
    pub const fn config(&self) -> &LimpetConfig {
        &self.config
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one tick of `dt` seconds and pushes presentation output to `sink`.
    pub fn tick(
        &mut self,
        input: &FrameInput,
        dt: f32,
        sink: &mut dyn PresentationSink,
    ) -> TickReport {
        let body = self
            .body
            .tick(input.movement, Some(&self.camera), self.surfaces.as_ref(), dt);
        sink.body_animation(body.animation);

        self.camera
            .late_tick(self.body.pose(), input.look, input.scroll, dt);
        let target = *self.body.pose();
        let camera = *self.camera.pose();

        let mut agents = Vec::with_capacity(self.agents.len());
        for id in self.agent_ids() {
            let Some(agent) = self.agents.get_mut(&id) else {
                continue;
            };
            let outcome = agent.tick(&target, dt);
            sink.agent_animation(id, outcome.animation);
            if let Some(transition) = outcome.alarm.transition {
                sink.alarm_transition(id, transition);
            }
            let pose = agent.pose();
            let anchor = pose.position + pose.up() * INDICATOR_HEIGHT;
            sink.indicator(id, outcome.indicator, face_camera(anchor, &camera));
            agents.push((id, outcome));
        }

        self.ticks += 1;
        TickReport {
            body,
            camera,
            agents,
        }
    }

    /// Feeds a frame of `frame_dt` seconds through `clock` and runs the
    /// resulting whole ticks with the same input.
    pub fn advance_frame(
        &mut self,
        clock: &mut FixedStep,
        input: &FrameInput,
        frame_dt: f32,
        sink: &mut dyn PresentationSink,
    ) -> Vec<TickReport> {
        let steps = clock.advance(frame_dt);
        (0..steps)
            .map(|_| self.tick(input, clock.step(), sink))
            .collect()
    }

    /// Position of the body, for quick inspection.
    #[must_use]
    pub fn body_position(&self) -> Vec3 {
        self.body.pose().position
    }
}
