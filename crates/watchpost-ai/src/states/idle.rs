use tracing::debug;

use crate::fsm::{State, StateId, Transition};
use crate::guard::{EnterArgs, Guard};
use crate::ports::GuardEnv;

/// Stands still until something external switches the guard away.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl State<Guard> for Idle {
    fn id(&self) -> StateId {
        StateId::IDLE
    }

    fn name(&self) -> &'static str {
        "Idle"
    }

    fn enter(&self, guard: &mut Guard, world: &mut GuardEnv, _args: EnterArgs) {
        debug!("Guard {} idling at {}", guard.id(), guard.position);
        world.stop(guard.id());
    }

    fn update(&self, _guard: &mut Guard, _world: &mut GuardEnv, _dt: f32) -> Transition<EnterArgs> {
        Transition::Stay
    }

    fn exit(&self, _guard: &mut Guard, _world: &mut GuardEnv) {}
}
