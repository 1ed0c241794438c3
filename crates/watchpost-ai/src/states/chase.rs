//! Pursuit of a single target.
//!
//! Each tick fuses sight and sound into the guard's [`ChaseBelief`], advances
//! the sight accumulator, tells the target how close it is to being caught,
//! and then either closes in on the last known position or gives up.
//!
//! Giving up happens in two cases: the last known position is far away and
//! unreachable, or the guard stands near it with neither sense reporting the
//! target. A vanished target is treated the same as a lost one.

use tracing::{debug, info, warn};
use watchpost_common::{EntityId, Vec3};

use crate::belief::{AlertLevel, ChaseBelief, Evidence};
use crate::fsm::{State, StateId, Transition};
use crate::guard::{EnterArgs, Guard};
use crate::ports::{Cue, GuardEnv, Tint};

/// Chase state. Holds no data; everything per guard lives in
/// [`Guard::chase_belief`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Chase;

impl Chase {
    fn sense(guard: &Guard, world: &GuardEnv, target: EntityId, target_position: Vec3) -> Evidence {
        let observer = guard.observer();
        if world.is_visible(&observer, target) {
            return Evidence::Sighted(target_position);
        }
        world
            .sound_emitter(target)
            .and_then(|emitter| world.localize_sound(&observer, emitter))
            .map_or(Evidence::Nothing, Evidence::Heard)
    }
}

impl State<Guard> for Chase {
    fn id(&self) -> StateId {
        StateId::CHASE
    }

    fn name(&self) -> &'static str {
        "Chase"
    }

    fn enter(&self, guard: &mut Guard, world: &mut GuardEnv, args: EnterArgs) {
        let EnterArgs::Target(target) = args else {
            warn!("Guard {} entered Chase without a target", guard.id());
            return;
        };
        let Some(position) = world.target_position(target) else {
            warn!("Guard {} entered Chase on missing target {}", guard.id(), target);
            return;
        };

        guard.chase = Some(ChaseBelief::new(target, position, guard.speed));
        guard.speed = guard.config().chase_speed;

        let id = guard.id();
        world.set_body_tint(id, Tint::Alert);
        world.set_spotlight_tint(id, Tint::Alert);
        world.play_cue(id, Cue::Alert);
        info!("Guard {} chasing {} at {}", id, target, position);
    }

    fn update(&self, guard: &mut Guard, world: &mut GuardEnv, dt: f32) -> Transition<EnterArgs> {
        let id = guard.id();
        let max_sight = guard.config().max_sight_duration;
        let lost_distance = guard.config().lost_distance;

        let Some(target) = guard.chase.as_ref().map(ChaseBelief::target) else {
            return Transition::Revert;
        };
        let Some(target_position) = world.target_position(target) else {
            debug!("Guard {} lost target {}: gone", id, target);
            return Transition::Revert;
        };

        let evidence = Self::sense(guard, world, target, target_position);
        let Some(belief) = guard.chase.as_mut() else {
            return Transition::Revert;
        };
        belief.record(evidence);
        belief.integrate(evidence.is_sighted(), dt, max_sight);
        let level = belief.alert_level(max_sight);
        let destination = belief.last_known_position();

        if let Some(receiver) = world.alert_receiver(target) {
            if !receiver.is_caught() {
                match level {
                    AlertLevel::Full => {
                        info!("Guard {} fully detected {}", id, target);
                        receiver.notify_fully_detected(id);
                    },
                    AlertLevel::Partial(alertness) => receiver.notify_partial_alert(id, alertness),
                }
            }
        }

        if guard.distance_to(destination) > lost_distance {
            if !world.move_toward(id, destination) {
                debug!("Guard {} abandons chase: {} unreachable", id, destination);
                return Transition::Revert;
            }
        } else if !evidence.is_corroborating() {
            debug!("Guard {} abandons chase: {} lost near {}", id, target, destination);
            return Transition::Revert;
        } else {
            world.stop(id);
            guard.face_towards_horizontal(target_position);
        }

        Transition::Stay
    }

    fn exit(&self, guard: &mut Guard, world: &mut GuardEnv) {
        let id = guard.id();
        if let Some(belief) = guard.chase.take() {
            if let Some(receiver) = world.alert_receiver(belief.target()) {
                receiver.notify_partial_alert(id, 0.0);
            }
            guard.speed = belief.saved_agent_speed();
        }
        world.set_body_tint(id, Tint::Neutral);
        world.set_spotlight_tint(id, Tint::Neutral);
    }
}
