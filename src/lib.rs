#![cfg_attr(docsrs, feature(doc_cfg))]
//! Surface-relative locomotion and agent perception for wall-walking games.
//!
//! A controlled body walks across floors, walls, and spheres by re-deriving
//! its up from the surface beneath it every tick. An orbit camera follows
//! without flipping, and agents notice the body using distance, field of
//! view, and surface-plane agreement before charging an alarm and giving
//! chase.
//!
//! Everything is driven by explicit `tick` calls on plain owned structs; the
//! [`simulation::Simulation`] aggregate fixes the order and
//! [`plugin::LimpetPlugin`] runs it inside Bevy.
pub mod agent;
pub mod camera;
pub mod config;
pub mod constants;
pub mod locomotion;
pub mod logging;
pub mod numeric;
pub mod perception;
pub mod plugin;
pub mod pose;
pub mod presentation;
pub mod scenario;
pub mod simulation;
pub mod surface;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use agent::{Agent, AgentId, DirectPathfinder, Pathfinder};
pub use camera::OrbitCameraController;
pub use config::{ConfigError, ConfigLoadError, LimpetConfig};
pub use locomotion::{BodyController, ViewReference};
pub use logging::init as init_logging;
pub use perception::{can_see, AlarmLevel, AlarmStateMachine};
pub use plugin::LimpetPlugin;
pub use pose::Pose;
pub use simulation::{FixedStep, FrameInput, Simulation};
pub use surface::{SurfaceProbe, SurfaceSample};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use limpet::prelude::*;
    //! ```

    pub use crate::config::{BodyConfig, CameraConfig, DetectionThresholds, LimpetConfig};
    pub use crate::locomotion::{align, solve, BodyController, ViewReference};
    pub use crate::perception::{observe, AgentIntent, AlarmLevel, AlarmStateMachine};
    pub use crate::presentation::{AnimationIntent, IndicatorVisual, PresentationSink};
    pub use crate::simulation::{FixedStep, FrameInput, Simulation};
    pub use crate::surface::{PlaneSurface, SphereSurface, SurfaceProbe, SurfaceSet};
    pub use crate::Pose;
    pub use ordered_float::OrderedFloat;
}
