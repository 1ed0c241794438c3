//! # Watchpost AI
//!
//! Guard behavior for Watchpost.
//!
//! This crate provides:
//! - A generic state machine container (state table, current/previous state)
//! - Collaborator ports for perception, locomotion, feedback and targets
//! - The chase belief: sight/sound fusion and the sight accumulator
//! - Guard states (Idle, Patrol, Chase)
//! - Recording mocks of every port for tests

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod belief;
pub mod config;
pub mod fsm;
pub mod guard;
pub mod mock;
pub mod ports;
pub mod states;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::belief::*;
    pub use crate::config::*;
    pub use crate::fsm::*;
    pub use crate::guard::*;
    pub use crate::ports::*;
    pub use crate::states::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockWorld;
    use watchpost_common::{EntityId, Vec3};

    #[test]
    fn test_guard_lifecycle() {
        let mut world = MockWorld::new();
        let intruder = EntityId::from_raw(50);
        world.add_target(intruder, Vec3::new(0.0, 0.0, 12.0)).visible(true);

        let table = guard_states().expect("guard states");
        let mut guard = Guard::new(EntityId::from_raw(1), Vec3::ZERO, GuardConfig::default(), table)
            .with_patrol(vec![Vec3::new(4.0, 0.0, 0.0)]);

        guard
            .switch_state(&mut world, StateId::PATROL, EnterArgs::None)
            .expect("patrol");
        guard.tick(&mut world, 0.1).expect("tick");
        assert_eq!(guard.state_name(), "Patrol");

        guard.begin_chase(&mut world, intruder).expect("chase");
        assert_eq!(guard.state_name(), "Chase");
        assert_eq!(guard.previous_state(), Some(StateId::PATROL));

        world.set_reachable(false);
        guard.tick(&mut world, 0.1).expect("tick");
        assert_eq!(guard.current_state(), Some(StateId::PATROL));
        assert_eq!(guard.speed, GuardConfig::default().patrol_speed);
    }
}
