//! Guard states and the table that registers them.

mod chase;
mod idle;
mod patrol;

pub use chase::Chase;
pub use idle::Idle;
pub use patrol::Patrol;

use std::sync::Arc;

use crate::fsm::{FsmResult, StateId, StateTable};
use crate::guard::Guard;

impl StateId {
    /// Standing still. Fallback when a chase is abandoned with no previous state.
    pub const IDLE: Self = StateId(0);
    /// Walking the patrol route.
    pub const PATROL: Self = StateId(1);
    /// Pursuing a target.
    pub const CHASE: Self = StateId(2);
}

/// Builds the state table shared by all guards, with Idle as fallback.
pub fn guard_states() -> FsmResult<Arc<StateTable<Guard>>> {
    let mut table = StateTable::new(StateId::IDLE);
    table.register(Idle)?;
    table.register(Patrol)?;
    table.register(Chase)?;
    Ok(Arc::new(table))
}
