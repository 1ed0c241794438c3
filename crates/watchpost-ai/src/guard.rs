//! The guard agent: pose, tuning, per-state data and its state machine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use watchpost_common::{horizontal_direction, EntityId, Vec3};

use crate::belief::ChaseBelief;
use crate::config::GuardConfig;
use crate::fsm::{Agent, FsmResult, StateId, StateMachine, StateTable};
use crate::ports::{GuardEnv, Observer};

/// Arguments handed to a guard state on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnterArgs {
    /// No arguments
    #[default]
    None,
    /// Entity to pursue
    Target(EntityId),
}

/// Cyclic list of patrol waypoints with the index of the next one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    /// Waypoints in visiting order
    pub waypoints: Vec<Vec3>,
    /// Index of the waypoint currently headed for
    pub next: usize,
}

impl PatrolRoute {
    /// Creates a route starting at the first waypoint.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints, next: 0 }
    }

    /// Waypoint currently headed for.
    #[must_use]
    pub fn current(&self) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            None
        } else {
            self.waypoints.get(self.next % self.waypoints.len()).copied()
        }
    }

    /// Moves on to the following waypoint, wrapping around.
    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.next = (self.next + 1) % self.waypoints.len();
        }
    }

    /// Returns whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// A guard NPC.
#[derive(Debug)]
pub struct Guard {
    id: EntityId,
    /// Position in world space
    pub position: Vec3,
    /// Unit facing direction on the horizontal plane
    pub facing: Vec3,
    /// Current movement speed
    pub speed: f32,
    config: GuardConfig,
    pub(crate) chase: Option<ChaseBelief>,
    pub(crate) patrol: PatrolRoute,
    machine: StateMachine<Guard>,
}

impl Agent for Guard {
    type Env = GuardEnv;
    type Args = EnterArgs;

    fn machine(&self) -> &StateMachine<Self> {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut StateMachine<Self> {
        &mut self.machine
    }
}

impl Guard {
    /// Creates a guard with no active state. Call [`Guard::switch_state`]
    /// to put it into its initial state.
    #[must_use]
    pub fn new(id: EntityId, position: Vec3, config: GuardConfig, table: Arc<StateTable<Guard>>) -> Self {
        Self {
            id,
            position,
            facing: Vec3::Z,
            speed: config.patrol_speed,
            config,
            chase: None,
            patrol: PatrolRoute::default(),
            machine: StateMachine::new(table),
        }
    }

    /// Sets the patrol route.
    #[must_use]
    pub fn with_patrol(mut self, waypoints: Vec<Vec3>) -> Self {
        self.patrol = PatrolRoute::new(waypoints);
        self
    }

    /// Sets the initial movement speed.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Returns the guard's entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the guard's tuning.
    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Returns the active chase belief, if chasing.
    #[must_use]
    pub fn chase_belief(&self) -> Option<&ChaseBelief> {
        self.chase.as_ref()
    }

    /// Returns the patrol route.
    #[must_use]
    pub fn patrol(&self) -> &PatrolRoute {
        &self.patrol
    }

    /// Pose used for perception queries.
    #[must_use]
    pub fn observer(&self) -> Observer {
        Observer {
            id: self.id,
            position: self.position,
            facing: self.facing,
        }
    }

    /// Distance from the guard to `point`.
    #[must_use]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    /// Turns to face `point`, ignoring its height. Keeps the current facing
    /// when `point` is directly above or below the guard.
    pub fn face_towards_horizontal(&mut self, point: Vec3) {
        if let Some(direction) = horizontal_direction(self.position, point) {
            self.facing = direction;
        }
    }

    /// Active state, if any.
    #[must_use]
    pub fn current_state(&self) -> Option<StateId> {
        self.machine.current_state()
    }

    /// State active before the current one, if any.
    #[must_use]
    pub fn previous_state(&self) -> Option<StateId> {
        self.machine.previous_state()
    }

    /// Whether `state` is the active state.
    #[must_use]
    pub fn is_in_state(&self, state: StateId) -> bool {
        self.machine.is_in_state(state)
    }

    /// Name of the active state.
    #[must_use]
    pub fn state_name(&self) -> &'static str {
        self.machine.state_name()
    }

    /// Switches the guard into `state`.
    pub fn switch_state(&mut self, world: &mut GuardEnv, state: StateId, args: EnterArgs) -> FsmResult<()> {
        StateMachine::switch_state(self, world, state, args)
    }

    /// Starts chasing `target`. This is the external detection trigger.
    pub fn begin_chase(&mut self, world: &mut GuardEnv, target: EntityId) -> FsmResult<()> {
        self.switch_state(world, StateId::CHASE, EnterArgs::Target(target))
    }

    /// Runs one simulation tick of `dt` seconds.
    pub fn tick(&mut self, world: &mut GuardEnv, dt: f32) -> FsmResult<()> {
        StateMachine::update(self, world, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::guard_states;

    fn guard() -> Guard {
        Guard::new(
            EntityId::from_raw(1),
            Vec3::new(0.0, 1.0, 0.0),
            GuardConfig::default(),
            guard_states().expect("guard states"),
        )
    }

    #[test]
    fn test_new_guard_has_no_state() {
        let g = guard();
        assert_eq!(g.current_state(), None);
        assert_eq!(g.previous_state(), None);
        assert_eq!(g.state_name(), "none");
        assert!(g.chase_belief().is_none());
        assert_eq!(g.speed, GuardConfig::default().patrol_speed);
    }

    #[test]
    fn test_face_towards_ignores_height() {
        let mut g = guard();
        g.face_towards_horizontal(Vec3::new(0.0, 8.0, -4.0));
        assert!((g.facing - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(g.facing.y, 0.0);
    }

    #[test]
    fn test_face_towards_directly_above_keeps_facing() {
        let mut g = guard();
        let before = g.facing;
        g.face_towards_horizontal(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(g.facing, before);
    }

    #[test]
    fn test_patrol_route_wraps() {
        let mut route = PatrolRoute::new(vec![Vec3::ZERO, Vec3::X]);
        assert_eq!(route.current(), Some(Vec3::ZERO));
        route.advance();
        assert_eq!(route.current(), Some(Vec3::X));
        route.advance();
        assert_eq!(route.current(), Some(Vec3::ZERO));
        assert!(PatrolRoute::default().current().is_none());
    }

    #[test]
    fn test_observer_snapshot() {
        let g = guard().with_speed(4.0);
        let obs = g.observer();
        assert_eq!(obs.id, g.id());
        assert_eq!(obs.position, g.position);
        assert_eq!(obs.facing, Vec3::Z);
        assert_eq!(g.speed, 4.0);
    }
}
