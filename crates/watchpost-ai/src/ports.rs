//! Collaborator interfaces the guard states are written against.
//!
//! Perception, locomotion, feedback and target lookup are all supplied by
//! the host simulation. Every call is synchronous and total: a missing target
//! or an unlocalizable sound is an `Option`, never a panic.

use serde::{Deserialize, Serialize};
use watchpost_common::{EmitterId, EntityId, Vec3};

/// Pose of the agent asking a perception query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Observing agent
    pub id: EntityId,
    /// Eye position in world space
    pub position: Vec3,
    /// Unit facing direction
    pub facing: Vec3,
}

/// Low-level perception primitives.
pub trait Perception {
    /// Whether `observer` currently has line of sight to `target`.
    fn is_visible(&self, observer: &Observer, target: EntityId) -> bool;

    /// Where `listener` believes the sound from `emitter` originates, if it
    /// can hear it at all.
    fn localize_sound(&self, listener: &Observer, emitter: EmitterId) -> Option<Vec3>;
}

/// Path following for a single agent.
pub trait Locomotion {
    /// Steers `agent` toward `destination`. Returns `false` if the
    /// destination is unreachable, `true` if reached or in progress.
    fn move_toward(&mut self, agent: EntityId, destination: Vec3) -> bool;

    /// Halts any movement of `agent`.
    fn stop(&mut self, agent: EntityId);
}

/// Visual tint applied to a guard's body or spotlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tint {
    /// Default look
    #[default]
    Neutral,
    /// Chasing / alerted look
    Alert,
}

/// One-shot audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Played when a guard starts chasing
    Alert,
}

/// Audiovisual feedback. Fire-and-forget.
pub trait Feedback {
    /// Sets the body tint of `agent`.
    fn set_body_tint(&mut self, agent: EntityId, tint: Tint);

    /// Sets the spotlight tint of `agent`.
    fn set_spotlight_tint(&mut self, agent: EntityId, tint: Tint);

    /// Plays a one-shot cue at `agent`.
    fn play_cue(&mut self, agent: EntityId, cue: Cue);
}

/// Capability of a target to be told how close it is to being caught.
pub trait AlertReceiver {
    /// Whether the target is already in its terminal caught state.
    fn is_caught(&self) -> bool;

    /// `detector` has fully detected the target.
    fn notify_fully_detected(&mut self, detector: EntityId);

    /// `detector` is `alertness` (0..=1) of the way to detecting the target.
    fn notify_partial_alert(&mut self, detector: EntityId, alertness: f32);
}

/// Lookup of pursued entities.
pub trait TargetDirectory {
    /// Current position of `target`, or `None` if it no longer exists.
    fn target_position(&self, target: EntityId) -> Option<Vec3>;

    /// Sound emitter carried by `target`, if any.
    fn sound_emitter(&self, target: EntityId) -> Option<EmitterId>;

    /// Alert notification channel of `target`, if it supports one.
    fn alert_receiver(&mut self, target: EntityId) -> Option<&mut dyn AlertReceiver>;
}

/// Everything a guard state needs from its surroundings.
pub trait GuardWorld: Perception + Locomotion + Feedback + TargetDirectory {}

impl<T> GuardWorld for T where T: Perception + Locomotion + Feedback + TargetDirectory {}

/// Environment type the guard states run against.
pub type GuardEnv = dyn GuardWorld + 'static;
