//! Recording fakes for every guard port.
//!
//! `MockWorld` answers perception and locomotion queries from plain flags and
//! remembers every command it receives, so tests can assert on exactly what a
//! state did during a tick.

use std::cell::Cell;
use std::collections::HashMap;

use watchpost_common::{EmitterId, EntityId, Vec3};

use crate::ports::{AlertReceiver, Cue, Feedback, Locomotion, Observer, Perception, TargetDirectory, Tint};

/// Notification received by a [`RecordingReceiver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertEvent {
    /// Fully detected by `detector`
    FullyDetected {
        /// Detecting guard
        detector: EntityId,
    },
    /// Partially alerted
    Partial {
        /// Detecting guard
        detector: EntityId,
        /// Normalized alertness
        alertness: f32,
    },
}

/// Alert receiver that stores every notification.
#[derive(Debug, Clone, Default)]
pub struct RecordingReceiver {
    caught: bool,
    catch_on_detection: bool,
    events: Vec<AlertEvent>,
}

impl RecordingReceiver {
    /// Creates a receiver that never becomes caught on its own.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a receiver that enters the caught state on full detection.
    #[must_use]
    pub fn capturing() -> Self {
        Self {
            catch_on_detection: true,
            ..Self::default()
        }
    }

    /// Forces the caught flag.
    pub fn set_caught(&mut self, caught: bool) {
        self.caught = caught;
    }

    /// All notifications in arrival order.
    #[must_use]
    pub fn events(&self) -> &[AlertEvent] {
        &self.events
    }

    /// Number of full detections received.
    #[must_use]
    pub fn full_detections(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AlertEvent::FullyDetected { .. }))
            .count()
    }

    /// Alertness values of all partial notifications, in order.
    #[must_use]
    pub fn partial_alerts(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AlertEvent::Partial { alertness, .. } => Some(*alertness),
                AlertEvent::FullyDetected { .. } => None,
            })
            .collect()
    }

    /// The most recent notification.
    #[must_use]
    pub fn last_event(&self) -> Option<AlertEvent> {
        self.events.last().copied()
    }
}

impl AlertReceiver for RecordingReceiver {
    fn is_caught(&self) -> bool {
        self.caught
    }

    fn notify_fully_detected(&mut self, detector: EntityId) {
        self.events.push(AlertEvent::FullyDetected { detector });
        if self.catch_on_detection {
            self.caught = true;
        }
    }

    fn notify_partial_alert(&mut self, detector: EntityId, alertness: f32) {
        self.events.push(AlertEvent::Partial {
            detector,
            alertness,
        });
    }
}

/// A pursuable entity inside a [`MockWorld`].
#[derive(Debug, Clone, Default)]
pub struct MockTarget {
    /// World position
    pub position: Vec3,
    /// Whether every observer can see it
    pub visible: bool,
    /// Attached sound emitter
    pub emitter: Option<EmitterId>,
    /// Alert notification channel
    pub receiver: Option<RecordingReceiver>,
}

impl MockTarget {
    /// Sets visibility.
    pub fn visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }

    /// Attaches a sound emitter.
    pub fn emitting(&mut self, emitter: EmitterId) -> &mut Self {
        self.emitter = Some(emitter);
        self
    }

    /// Attaches an alert receiver.
    pub fn receiving(&mut self, receiver: RecordingReceiver) -> &mut Self {
        self.receiver = Some(receiver);
        self
    }
}

/// Mock world for testing guard states.
#[derive(Debug, Default)]
pub struct MockWorld {
    targets: HashMap<EntityId, MockTarget>,
    sounds: HashMap<EmitterId, Vec3>,
    unreachable: bool,
    moves: Vec<(EntityId, Vec3)>,
    stops: Vec<EntityId>,
    body_tints: HashMap<EntityId, Tint>,
    spotlight_tints: HashMap<EntityId, Tint>,
    cues: Vec<(EntityId, Cue)>,
    sound_queries: Cell<usize>,
}

impl MockWorld {
    /// Creates an empty world where every destination is reachable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target and returns it for further setup.
    pub fn add_target(&mut self, id: EntityId, position: Vec3) -> &mut MockTarget {
        let target = self.targets.entry(id).or_default();
        target.position = position;
        target
    }

    /// Mutable access to a target.
    pub fn target_mut(&mut self, id: EntityId) -> Option<&mut MockTarget> {
        self.targets.get_mut(&id)
    }

    /// Destroys a target; later lookups find nothing.
    pub fn remove_target(&mut self, id: EntityId) -> Option<MockTarget> {
        self.targets.remove(&id)
    }

    /// Sets where a sound from `emitter` localizes to. `None` makes it
    /// inaudible.
    pub fn set_heard_at(&mut self, emitter: EmitterId, at: Option<Vec3>) {
        match at {
            Some(at) => {
                self.sounds.insert(emitter, at);
            },
            None => {
                self.sounds.remove(&emitter);
            },
        }
    }

    /// Sets whether `move_toward` succeeds.
    pub fn set_reachable(&mut self, reachable: bool) {
        self.unreachable = !reachable;
    }

    /// Alert receiver of a target.
    #[must_use]
    pub fn receiver(&self, id: EntityId) -> Option<&RecordingReceiver> {
        self.targets.get(&id).and_then(|t| t.receiver.as_ref())
    }

    /// All move commands in order.
    #[must_use]
    pub fn moves(&self) -> &[(EntityId, Vec3)] {
        &self.moves
    }

    /// All stop commands in order.
    #[must_use]
    pub fn stops(&self) -> &[EntityId] {
        &self.stops
    }

    /// All cues played in order.
    #[must_use]
    pub fn cues(&self) -> &[(EntityId, Cue)] {
        &self.cues
    }

    /// Current body tint of `agent`.
    #[must_use]
    pub fn body_tint(&self, agent: EntityId) -> Tint {
        self.body_tints.get(&agent).copied().unwrap_or_default()
    }

    /// Current spotlight tint of `agent`.
    #[must_use]
    pub fn spotlight_tint(&self, agent: EntityId) -> Tint {
        self.spotlight_tints.get(&agent).copied().unwrap_or_default()
    }

    /// Number of sound localization queries answered.
    #[must_use]
    pub fn sound_queries(&self) -> usize {
        self.sound_queries.get()
    }

    /// Forgets recorded commands.
    pub fn clear_log(&mut self) {
        self.moves.clear();
        self.stops.clear();
        self.cues.clear();
        self.sound_queries.set(0);
    }
}

impl Perception for MockWorld {
    fn is_visible(&self, _observer: &Observer, target: EntityId) -> bool {
        self.targets.get(&target).is_some_and(|t| t.visible)
    }

    fn localize_sound(&self, _listener: &Observer, emitter: EmitterId) -> Option<Vec3> {
        self.sound_queries.set(self.sound_queries.get() + 1);
        self.sounds.get(&emitter).copied()
    }
}

impl Locomotion for MockWorld {
    fn move_toward(&mut self, agent: EntityId, destination: Vec3) -> bool {
        self.moves.push((agent, destination));
        !self.unreachable
    }

    fn stop(&mut self, agent: EntityId) {
        self.stops.push(agent);
    }
}

impl Feedback for MockWorld {
    fn set_body_tint(&mut self, agent: EntityId, tint: Tint) {
        self.body_tints.insert(agent, tint);
    }

    fn set_spotlight_tint(&mut self, agent: EntityId, tint: Tint) {
        self.spotlight_tints.insert(agent, tint);
    }

    fn play_cue(&mut self, agent: EntityId, cue: Cue) {
        self.cues.push((agent, cue));
    }
}

impl TargetDirectory for MockWorld {
    fn target_position(&self, target: EntityId) -> Option<Vec3> {
        self.targets.get(&target).map(|t| t.position)
    }

    fn sound_emitter(&self, target: EntityId) -> Option<EmitterId> {
        self.targets.get(&target).and_then(|t| t.emitter)
    }

    fn alert_receiver(&mut self, target: EntityId) -> Option<&mut dyn AlertReceiver> {
        self.targets
            .get_mut(&target)
            .and_then(|t| t.receiver.as_mut())
            .map(|r| r as &mut dyn AlertReceiver)
    }
}
