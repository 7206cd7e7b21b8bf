//! Turns alarm intent into pathfinder requests.
use glam::Vec3;
use log::debug;

use crate::perception::AgentIntent;

use super::Pathfinder;

/// What the motion driver did this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStatus {
    /// Destination for this tick.
    pub destination: Vec3,
    /// Whether a new destination was sent to the pathfinder.
    pub requested: bool,
    /// No path pending and within stopping distance of the destination.
    pub idle: bool,
}

/// Chooses between the target and the spawn point and forwards the choice to
/// a [`Pathfinder`] only when it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentMotionDriver {
    spawn: Vec3,
    last_destination: Option<Vec3>,
}

impl AgentMotionDriver {
    /// Creates a driver that returns to `spawn` when not chasing.
    #[must_use]
    pub const fn new(spawn: Vec3) -> Self {
        Self {
            spawn,
            last_destination: None,
        }
    }

    /// Spawn point this driver returns to.
    #[must_use]
    pub const fn spawn(&self) -> Vec3 {
        self.spawn
    }

    /// Last destination sent to the pathfinder.
    #[must_use]
    pub const fn last_destination(&self) -> Option<Vec3> {
        self.last_destination
    }

    /// Issues this tick's destination and reports idle status.
    ///
    /// A new destination also resumes a stopped pathfinder. Once idle at the
    /// spawn point the pathfinder is stopped.
    pub fn drive(
        &mut self,
        intent: AgentIntent,
        target: Vec3,
        pathfinder: &mut dyn Pathfinder,
    ) -> MotionStatus {
        let destination = if intent.is_chase() { target } else { self.spawn };
        let requested = self.last_destination != Some(destination);
        if requested {
            debug!("destination {destination:?} ({intent:?})");
            pathfinder.set_destination(destination);
            pathfinder.set_stopped(false);
            self.last_destination = Some(destination);
        }

        let idle = !pathfinder.is_path_pending()
            && pathfinder.remaining_distance() <= pathfinder.stopping_distance();
        if idle && !intent.is_chase() && !pathfinder.is_stopped() {
            pathfinder.set_stopped(true);
        }

        MotionStatus {
            destination,
            requested,
            idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MockPathfinder;
    use mockall::predicate::eq;

    const SPAWN: Vec3 = Vec3::new(1.0, 0.0, 1.0);
    const TARGET: Vec3 = Vec3::new(5.0, 0.0, 5.0);

    fn moving_pathfinder() -> MockPathfinder {
        let mut path = MockPathfinder::new();
        path.expect_is_path_pending().return_const(false);
        path.expect_remaining_distance().return_const(4.0_f32);
        path.expect_stopping_distance().return_const(0.5_f32);
        path.expect_is_stopped().return_const(false);
        path
    }

    #[test]
    fn same_destination_is_sent_once() {
        let mut path = moving_pathfinder();
        path.expect_set_destination()
            .with(eq(SPAWN))
            .times(1)
            .return_const(());
        path.expect_set_stopped()
            .with(eq(false))
            .times(1)
            .return_const(());
        let mut driver = AgentMotionDriver::new(SPAWN);
        let first = driver.drive(AgentIntent::ReturnToSpawn, TARGET, &mut path);
        let second = driver.drive(AgentIntent::ReturnToSpawn, TARGET, &mut path);
        assert!(first.requested);
        assert!(!second.requested);
        assert!(!second.idle);
    }

    #[test]
    fn chase_targets_the_target_then_returns_home() {
        let mut path = moving_pathfinder();
        let mut sequence = mockall::Sequence::new();
        path.expect_set_destination()
            .with(eq(TARGET))
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        path.expect_set_destination()
            .with(eq(SPAWN))
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        path.expect_set_stopped().with(eq(false)).return_const(());
        let mut driver = AgentMotionDriver::new(SPAWN);
        let chase = driver.drive(AgentIntent::Chase, TARGET, &mut path);
        assert_eq!(chase.destination, TARGET);
        let home = driver.drive(AgentIntent::ReturnToSpawn, TARGET, &mut path);
        assert_eq!(home.destination, SPAWN);
        assert_eq!(driver.last_destination(), Some(SPAWN));
    }

    #[test]
    fn idle_at_spawn_stops_pathfinder() {
        let mut path = MockPathfinder::new();
        path.expect_set_destination().return_const(());
        path.expect_is_path_pending().return_const(false);
        path.expect_remaining_distance().return_const(0.2_f32);
        path.expect_stopping_distance().return_const(0.5_f32);
        path.expect_is_stopped().return_const(false);
        path.expect_set_stopped().with(eq(false)).times(1).return_const(());
        path.expect_set_stopped().with(eq(true)).times(1).return_const(());
        let mut driver = AgentMotionDriver::new(SPAWN);
        let status = driver.drive(AgentIntent::ReturnToSpawn, TARGET, &mut path);
        assert!(status.idle);
    }

    #[test]
    fn pending_path_is_never_idle() {
        let mut path = MockPathfinder::new();
        path.expect_set_destination().return_const(());
        path.expect_set_stopped().with(eq(false)).return_const(());
        path.expect_is_path_pending().return_const(true);
        path.expect_remaining_distance().return_const(0.0_f32);
        path.expect_stopping_distance().return_const(0.5_f32);
        let mut driver = AgentMotionDriver::new(SPAWN);
        let status = driver.drive(AgentIntent::ReturnToSpawn, TARGET, &mut path);
        assert!(!status.idle);
    }
}
