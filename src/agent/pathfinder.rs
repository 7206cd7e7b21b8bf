//! The pathfinding collaborator and a straight-line stand-in.
use glam::Vec3;

/// Navigation agent that plans and follows paths for one agent.
///
/// Path computation over a navigable surface lives outside this crate. The
/// collaborator owns the agent's travel: [`Pathfinder::advance`] moves it
/// and [`Pathfinder::position`] reports where it ended up.
#[cfg_attr(test, mockall::automock)]
pub trait Pathfinder: Send + Sync {
    /// Requests a path to `destination`, replacing any current one.
    fn set_destination(&mut self, destination: Vec3);
    /// Whether a requested path is still being computed.
    fn is_path_pending(&self) -> bool;
    /// Distance left along the current path; zero with no destination.
    fn remaining_distance(&self) -> f32;
    /// Remaining distance at which the destination counts as reached.
    fn stopping_distance(&self) -> f32;
    /// Whether travel is halted.
    fn is_stopped(&self) -> bool;
    /// Halts or resumes travel.
    fn set_stopped(&mut self, stopped: bool);
    /// Moves along the current path for `dt` seconds.
    fn advance(&mut self, dt: f32);
    /// Current position of the navigating agent.
    fn position(&self) -> Vec3;
}

/// Moves in a straight line toward the destination at a fixed speed.
///
/// A new destination is "pending" until the next [`Pathfinder::advance`],
/// mimicking an asynchronous planner that answers one tick later.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectPathfinder {
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    stopping_distance: f32,
    stopped: bool,
    pending: bool,
}

impl DirectPathfinder {
    /// Creates a pathfinder at `position` with no destination.
    ///
    /// Negative or non-finite tuning is treated as zero.
    #[must_use]
    pub fn new(position: Vec3, speed: f32, stopping_distance: f32) -> Self {
        Self {
            position,
            destination: None,
            speed: non_negative(speed),
            stopping_distance: non_negative(stopping_distance),
            stopped: false,
            pending: false,
        }
    }

    /// Current destination, if any.
    #[must_use]
    pub const fn destination(&self) -> Option<Vec3> {
        self.destination
    }
}

impl Pathfinder for DirectPathfinder {
    fn set_destination(&mut self, destination: Vec3) {
        if destination.is_finite() {
            self.destination = Some(destination);
            self.pending = true;
        }
    }

    fn is_path_pending(&self) -> bool {
        self.pending
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |destination| self.position.distance(destination))
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn advance(&mut self, dt: f32) {
        self.pending = false;
        if self.stopped || !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let Some(destination) = self.destination else {
            return;
        };
        let remaining = self.position.distance(destination);
        if remaining <= self.stopping_distance {
            return;
        }
        let step = (self.speed * dt).min(remaining - self.stopping_distance);
        self.position += (destination - self.position) * (step / remaining);
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
