use tracing::{debug, warn};
use watchpost_common::horizontal_distance;

use crate::fsm::{State, StateId, Transition};
use crate::guard::{EnterArgs, Guard};
use crate::ports::GuardEnv;

/// Walks the guard's waypoints in a loop at patrol speed.
///
/// A waypoint counts as reached once the guard is within
/// `waypoint_tolerance` of it on the horizontal plane. Unreachable waypoints
/// are skipped. A guard without a route drops to Idle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Patrol;

impl State<Guard> for Patrol {
    fn id(&self) -> StateId {
        StateId::PATROL
    }

    fn name(&self) -> &'static str {
        "Patrol"
    }

    fn enter(&self, guard: &mut Guard, _world: &mut GuardEnv, _args: EnterArgs) {
        guard.speed = guard.config().patrol_speed;
        debug!(
            "Guard {} patrolling {} waypoints",
            guard.id(),
            guard.patrol().waypoints.len()
        );
    }

    fn update(&self, guard: &mut Guard, world: &mut GuardEnv, _dt: f32) -> Transition<EnterArgs> {
        let Some(mut waypoint) = guard.patrol.current() else {
            debug!("Guard {} has no patrol route", guard.id());
            return Transition::Switch(StateId::IDLE, EnterArgs::None);
        };

        if horizontal_distance(guard.position, waypoint) <= guard.config().waypoint_tolerance {
            guard.patrol.advance();
            if let Some(next) = guard.patrol.current() {
                waypoint = next;
            }
        }

        if !world.move_toward(guard.id(), waypoint) {
            warn!("Guard {} cannot reach waypoint {}, skipping", guard.id(), waypoint);
            guard.patrol.advance();
        }

        Transition::Stay
    }

    fn exit(&self, guard: &mut Guard, world: &mut GuardEnv) {
        world.stop(guard.id());
    }
}
