//! Agent perception: the pure sight model and the alarm it drives.

mod alarm;
mod model;

pub use alarm::{AgentIntent, AlarmLevel, AlarmStateMachine, AlarmTransition, AlarmUpdate};
pub use model::{can_see, direction_to, observe, Observation};
