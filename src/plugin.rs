//! Bevy integration: runs a [`Simulation`] on the fixed-update schedule.
//!
//! The plugin owns no simulation logic. It ticks the [`SimulationState`]
//! resource once per fixed step with the current [`FrameInput`], mirrors the
//! resulting poses onto tagged entities' `Transform`s, and collects
//! presentation output into [`PresentationFrame`] for rendering systems to
//! read.

use bevy::prelude::*;
use hashbrown::HashMap;

use crate::agent::AgentId;
use crate::perception::AlarmTransition;
use crate::pose::Pose;
use crate::presentation::{AnimationIntent, IndicatorVisual, PresentationSink};
use crate::simulation::{FrameInput, Simulation};

/// The running simulation, as a Bevy resource.
#[derive(Resource, Debug)]
pub struct SimulationState(pub Simulation);

/// Marks the entity that mirrors the controlled body.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct BodyMarker;

/// Marks the entity that mirrors the orbit camera.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct CameraMarker;

/// Marks an entity that mirrors the agent with the given id.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentMarker(pub AgentId);

/// Latest presentation output for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPresentation {
    /// Animation signal.
    pub animation: AnimationIntent,
    /// Indicator visual.
    pub indicator: IndicatorVisual,
    /// Billboard rotation for the indicator.
    pub indicator_rotation: Quat,
}

/// Presentation output gathered during the current frame.
///
/// Per-tick signals overwrite the previous value; alarm transitions
/// accumulate until the start of the next frame so none are lost when
/// several fixed steps run in one frame.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PresentationFrame {
    /// Body animation signal.
    pub body: AnimationIntent,
    /// Per-agent output.
    pub agents: HashMap<AgentId, AgentPresentation>,
    /// Alarm transitions seen this frame, in order.
    pub transitions: Vec<(AgentId, AlarmTransition)>,
}

impl PresentationFrame {
    fn agent_entry(&mut self, agent: AgentId) -> &mut AgentPresentation {
        self.agents.entry(agent).or_insert(AgentPresentation {
            animation: AnimationIntent::default(),
            indicator: IndicatorVisual::Hidden,
            indicator_rotation: Quat::IDENTITY,
        })
    }
}

impl PresentationSink for PresentationFrame {
    fn body_animation(&mut self, intent: AnimationIntent) {
        self.body = intent;
    }

    fn agent_animation(&mut self, agent: AgentId, intent: AnimationIntent) {
        self.agent_entry(agent).animation = intent;
    }

    fn indicator(&mut self, agent: AgentId, visual: IndicatorVisual, rotation: Quat) {
        let entry = self.agent_entry(agent);
        entry.indicator = visual;
        entry.indicator_rotation = rotation;
    }

    fn alarm_transition(&mut self, agent: AgentId, transition: AlarmTransition) {
        self.transitions.push((agent, transition));
    }
}

/// Runs one simulation tick of the fixed timestep.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn tick_simulation_system(
    time: Res<Time<Fixed>>,
    input: Res<FrameInput>,
    mut state: ResMut<SimulationState>,
    mut frame: ResMut<PresentationFrame>,
) {
    let dt = time.timestep().as_secs_f32();
    state.0.tick(&input, dt, &mut *frame);
}

type MirrorQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        AnyOf<(&'static BodyMarker, &'static CameraMarker, &'static AgentMarker)>,
    ),
>;

/// Copies simulation poses onto tagged entities.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_transforms_system(state: Res<SimulationState>, mut query: MirrorQuery<'_, '_>) {
    let sim = &state.0;
    for (mut transform, (body, camera, agent)) in &mut query {
        let pose = if body.is_some() {
            Some(*sim.body().pose())
        } else if camera.is_some() {
            Some(*sim.camera().pose())
        } else {
            agent.and_then(|AgentMarker(id)| sim.agent(*id).map(|a| *a.pose()))
        };
        if let Some(pose) = pose {
            apply_pose(&mut transform, &pose);
        }
    }
}

/// Drops last frame's alarm transitions.
pub fn clear_presentation_transitions(mut frame: ResMut<PresentationFrame>) {
    frame.transitions.clear();
}

fn apply_pose(transform: &mut Transform, pose: &Pose) {
    transform.translation = pose.position;
    transform.rotation = pose.orientation;
}

/// Installs the fixed-step simulation systems.
///
/// Insert a [`SimulationState`] to start simulating; until then the systems
/// are skipped.
#[derive(Debug, Default)]
pub struct LimpetPlugin;

impl Plugin for LimpetPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BodyMarker>();
        app.register_type::<CameraMarker>();
        app.init_resource::<FrameInput>();
        app.init_resource::<PresentationFrame>();
        app.add_systems(First, clear_presentation_transitions);
        app.add_systems(
            FixedUpdate,
            (tick_simulation_system, sync_transforms_system)
                .chain()
                .run_if(resource_exists::<SimulationState>),
        );
    }
}
