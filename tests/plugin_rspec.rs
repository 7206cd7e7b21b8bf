//! Behavioural tests for `LimpetPlugin` using rust-rspec.
//!
//! The app is ticked by running `FixedUpdate` directly so each example sees a
//! known number of simulation steps.

#[path = "support/thread_safe_app.rs"]
mod thread_safe_app;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use std::sync::{Arc, Mutex, MutexGuard};

use bevy::prelude::*;
use limpet::agent::AgentId;
use limpet::config::LimpetConfig;
use limpet::perception::AlarmLevel;
use limpet::plugin::{AgentMarker, BodyMarker, CameraMarker, PresentationFrame, SimulationState};
use limpet::{FrameInput, LimpetPlugin};
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::{floor_simulation, standing};
use thread_safe_app::{lock_app, SharedApp, ThreadSafeApp};

/// Entities mirroring the simulation.
#[derive(Debug, Clone, Copy)]
struct Mirrors {
    body: Entity,
    camera: Entity,
    agent: Entity,
    agent_id: AgentId,
}

#[derive(Debug, Clone)]
struct PluginFixture {
    app: SharedApp,
    mirrors: Arc<Mutex<Option<Mirrors>>>,
}

impl PluginFixture {
    fn new() -> Self {
        Self {
            app: Arc::new(Mutex::new(ThreadSafeApp(App::new()))),
            mirrors: Arc::new(Mutex::new(None)),
        }
    }

    fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        lock_app(&self.app)
    }

    /// Rebuilds the app with a floor world, one guard ahead of the body, and
    /// an entity mirroring each simulated object.
    fn bootstrap(&self) {
        let mut sim = floor_simulation(LimpetConfig::default());
        let agent_id = sim
            .spawn_agent(standing(0.0, 6.0, Vec3::NEG_Z))
            .expect("default agent config is valid");

        let mut app = App::new();
        app.add_plugins(LimpetPlugin);
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app.insert_resource(SimulationState(sim));
        let body = app.world_mut().spawn((BodyMarker, Transform::default())).id();
        let camera = app
            .world_mut()
            .spawn((CameraMarker, Transform::default()))
            .id();
        let agent = app
            .world_mut()
            .spawn((AgentMarker(agent_id), Transform::default()))
            .id();

        *self.app_guard() = ThreadSafeApp(app);
        *self
            .mirrors
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(Mirrors {
            body,
            camera,
            agent,
            agent_id,
        });
    }

    fn mirrors(&self) -> Mirrors {
        self.mirrors
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .expect("fixture bootstrapped")
    }

    fn set_input(&self, input: FrameInput) {
        self.app_guard().insert_resource(input);
    }

    fn fixed_ticks(&self, count: usize) {
        let mut app = self.app_guard();
        for _ in 0..count {
            app.world_mut().run_schedule(FixedUpdate);
        }
    }

    fn start_frame(&self) {
        self.app_guard().world_mut().run_schedule(First);
    }

    fn transform(&self, entity: Entity) -> Transform {
        *self
            .app_guard()
            .world()
            .get::<Transform>(entity)
            .expect("mirror entity has a transform")
    }

    fn frame(&self) -> PresentationFrame {
        self.app_guard()
            .world()
            .resource::<PresentationFrame>()
            .clone()
    }

    fn simulated_body_position(&self) -> Vec3 {
        self.app_guard()
            .world()
            .resource::<SimulationState>()
            .0
            .body_position()
    }

    fn simulated_camera_position(&self) -> Vec3 {
        self.app_guard()
            .world()
            .resource::<SimulationState>()
            .0
            .camera()
            .pose()
            .position
    }
}

#[test]
fn plugin_mirrors_the_simulation() {
    run_serial(&rspec::given(
        "a Bevy app running LimpetPlugin over a floor world",
        PluginFixture::new(),
        |scenario: &mut Scenario<PluginFixture>| {
            scenario.when("the body walks forward for half a second", |ctx| {
                ctx.before_each(|state| {
                    state.bootstrap();
                    state.set_input(FrameInput::movement(0.0, 1.0));
                    state.fixed_ticks(30);
                });

                ctx.then("the body entity follows the simulated body", |state| {
                    let transform = state.transform(state.mirrors().body);
                    assert_eq!(transform.translation, state.simulated_body_position());
                    assert!(transform.translation.z > 2.0);
                });

                ctx.then("the camera entity follows the orbit camera", |state| {
                    let transform = state.transform(state.mirrors().camera);
                    assert_eq!(transform.translation, state.simulated_camera_position());
                });

                ctx.then("the presentation frame marks the body as moving", |state| {
                    assert!(state.frame().body.moving);
                });
            });

            scenario.when("the guard sees the body for one tick", |ctx| {
                ctx.before_each(|state| {
                    state.bootstrap();
                    state.fixed_ticks(1);
                });

                ctx.then("the guard's suspicion is recorded", |state| {
                    let frame = state.frame();
                    let id = state.mirrors().agent_id;
                    let (agent, transition) =
                        frame.transitions.first().copied().expect("a transition");
                    assert_eq!(agent, id);
                    assert_eq!(transition.to, AlarmLevel::Suspicious);
                    let presentation = frame.agents.get(&id).expect("guard presented");
                    assert!(presentation.indicator.is_visible());
                });

                ctx.then("the guard entity stays at its spawn", |state| {
                    let transform = state.transform(state.mirrors().agent);
                    assert_eq!(transform.translation, standing(0.0, 6.0, Vec3::Z).position);
                });
            });

            scenario.when("a new frame starts", |ctx| {
                ctx.before_each(|state| {
                    state.bootstrap();
                    state.fixed_ticks(1);
                    state.start_frame();
                });

                ctx.then("last frame's transitions are cleared", |state| {
                    assert!(state.frame().transitions.is_empty());
                });
            });
        },
    ));
}
