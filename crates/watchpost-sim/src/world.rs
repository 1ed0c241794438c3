//! Headless level implementing every guard port.
//!
//! The navigable area is a square around the origin; anything outside it or
//! inside a wall is unreachable. Walls also block sight. Sound localization
//! gets noisier with distance.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, info};
use watchpost_ai::{AlertReceiver, Cue, Feedback, Guard, Locomotion, Observer, Perception, TargetDirectory, Tint};
use watchpost_common::{horizontal_direction, horizontal_distance, EmitterId, EntityId, Vec3};

use crate::config::{IntruderConfig, SimConfig, WallBox};

/// The single pursued entity.
#[derive(Debug, Clone)]
pub struct Intruder {
    id: EntityId,
    emitter: EmitterId,
    /// Current position
    pub position: Vec3,
    path: Vec<Vec3>,
    next: usize,
    speed: f32,
    silent_after: Option<f32>,
    caught_on_detection: bool,
    caught: bool,
    alertness: f32,
    peak_alertness: f32,
    detections: u32,
}

impl Intruder {
    fn new(id: EntityId, config: &IntruderConfig) -> Self {
        Self {
            id,
            emitter: EmitterId::new(1),
            position: config.path.first().copied().unwrap_or(Vec3::ZERO),
            path: config.path.clone(),
            next: 0,
            speed: config.speed,
            silent_after: config.silent_after,
            caught_on_detection: config.caught_on_detection,
            caught: false,
            alertness: 0.0,
            peak_alertness: 0.0,
            detections: 0,
        }
    }

    /// Entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Latest partial alertness reported by any guard.
    #[must_use]
    pub fn alertness(&self) -> f32 {
        self.alertness
    }

    /// Highest alertness seen so far.
    #[must_use]
    pub fn peak_alertness(&self) -> f32 {
        self.peak_alertness
    }

    /// Number of full detections received.
    #[must_use]
    pub fn detections(&self) -> u32 {
        self.detections
    }

    /// Whether the intruder is audible at time `elapsed`.
    #[must_use]
    pub fn is_noisy(&self, elapsed: f32) -> bool {
        !self.caught && self.silent_after.map_or(true, |t| elapsed < t)
    }

    fn walk(&mut self, dt: f32) {
        if self.caught || self.path.is_empty() {
            return;
        }
        let Some(&goal) = self.path.get(self.next) else {
            self.next = 0;
            return;
        };
        let remaining = self.position.distance(goal);
        let step = self.speed * dt;
        if remaining <= step {
            self.position = goal;
            self.next = (self.next + 1) % self.path.len();
        } else {
            self.position += (goal - self.position) / remaining * step;
        }
    }
}

impl AlertReceiver for Intruder {
    fn is_caught(&self) -> bool {
        self.caught
    }

    fn notify_fully_detected(&mut self, detector: EntityId) {
        self.detections += 1;
        self.alertness = 1.0;
        self.peak_alertness = 1.0;
        if self.caught_on_detection && !self.caught {
            self.caught = true;
            info!("Intruder {} caught by guard {}", self.id, detector);
        }
    }

    fn notify_partial_alert(&mut self, _detector: EntityId, alertness: f32) {
        self.alertness = alertness;
        self.peak_alertness = self.peak_alertness.max(alertness);
    }
}

/// Movement and feedback state the world keeps per guard.
#[derive(Debug, Clone, Copy, Default)]
struct Body {
    destination: Option<Vec3>,
    body_tint: Tint,
    spotlight_tint: Tint,
}

/// Simulated level.
#[derive(Debug)]
pub struct SimWorld {
    half_extent: f32,
    walls: Vec<WallBox>,
    view_distance: f32,
    view_cos: f32,
    eye_height: f32,
    hearing_range: f32,
    hearing_jitter: f32,
    rng: RefCell<fastrand::Rng>,
    bodies: HashMap<EntityId, Body>,
    intruder: Intruder,
    elapsed: f32,
    cues: u32,
}

impl SimWorld {
    /// Builds the level described by `config`.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        let rng = config.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        Self {
            half_extent: config.half_extent,
            walls: config.walls.clone(),
            view_distance: config.view_distance,
            view_cos: (config.view_angle.to_radians() * 0.5).cos(),
            eye_height: config.eye_height,
            hearing_range: config.hearing_range,
            hearing_jitter: config.hearing_jitter,
            rng: RefCell::new(rng),
            bodies: HashMap::new(),
            intruder: Intruder::new(EntityId::new(), &config.intruder),
            elapsed: 0.0,
            cues: 0,
        }
    }

    /// The intruder.
    #[must_use]
    pub fn intruder(&self) -> &Intruder {
        &self.intruder
    }

    /// Mutable access to the intruder.
    pub fn intruder_mut(&mut self) -> &mut Intruder {
        &mut self.intruder
    }

    /// Simulated seconds since the start.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of cues played.
    #[must_use]
    pub fn cues_played(&self) -> u32 {
        self.cues
    }

    /// Destination `agent` is currently heading for.
    #[must_use]
    pub fn destination(&self, agent: EntityId) -> Option<Vec3> {
        self.bodies.get(&agent).and_then(|b| b.destination)
    }

    /// Body tint of `agent`.
    #[must_use]
    pub fn body_tint(&self, agent: EntityId) -> Tint {
        self.bodies.get(&agent).map(|b| b.body_tint).unwrap_or_default()
    }

    /// Spotlight tint of `agent`.
    #[must_use]
    pub fn spotlight_tint(&self, agent: EntityId) -> Tint {
        self.bodies.get(&agent).map(|b| b.spotlight_tint).unwrap_or_default()
    }

    /// Whether `point` can be walked to.
    #[must_use]
    pub fn is_navigable(&self, point: Vec3) -> bool {
        point.x.abs() <= self.half_extent
            && point.z.abs() <= self.half_extent
            && !self.walls.iter().any(|w| w.contains(point))
    }

    /// Whether nothing blocks the straight line between two eye points.
    #[must_use]
    pub fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        !self.walls.iter().any(|w| w.intersects_segment(from, to))
    }

    /// Moves `guard` toward its commanded destination at its current speed.
    pub fn steer(&mut self, guard: &mut Guard, dt: f32) {
        let Some(destination) = self.destination(guard.id()) else {
            return;
        };
        let remaining = horizontal_distance(guard.position, destination);
        let step = guard.speed * dt.max(0.0);
        if remaining <= step {
            guard.position.x = destination.x;
            guard.position.z = destination.z;
        } else if let Some(direction) = horizontal_direction(guard.position, destination) {
            guard.position += direction * step;
            guard.facing = direction;
        }
    }

    /// Advances world time and the intruder.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        self.intruder.walk(dt.max(0.0));
    }

    fn body(&mut self, agent: EntityId) -> &mut Body {
        self.bodies.entry(agent).or_default()
    }

    fn jitter(&self, scale: f32) -> Vec3 {
        let mut rng = self.rng.borrow_mut();
        let x = (rng.f32() * 2.0 - 1.0) * scale;
        let z = (rng.f32() * 2.0 - 1.0) * scale;
        Vec3::new(x, 0.0, z)
    }
}

impl Perception for SimWorld {
    fn is_visible(&self, observer: &Observer, target: EntityId) -> bool {
        if target != self.intruder.id {
            return false;
        }
        let eye = observer.position + Vec3::Y * self.eye_height;
        let seen = self.intruder.position + Vec3::Y * self.eye_height;
        if eye.distance(seen) > self.view_distance {
            return false;
        }
        if let Some(direction) = horizontal_direction(observer.position, self.intruder.position) {
            if direction.dot(observer.facing) < self.view_cos {
                return false;
            }
        }
        self.has_line_of_sight(eye, seen)
    }

    fn localize_sound(&self, listener: &Observer, emitter: EmitterId) -> Option<Vec3> {
        if emitter != self.intruder.emitter || !self.intruder.is_noisy(self.elapsed) {
            return None;
        }
        let distance = listener.position.distance(self.intruder.position);
        if distance > self.hearing_range {
            return None;
        }
        let falloff = if self.hearing_range > 0.0 {
            distance / self.hearing_range
        } else {
            0.0
        };
        Some(self.intruder.position + self.jitter(self.hearing_jitter * falloff))
    }
}

impl Locomotion for SimWorld {
    fn move_toward(&mut self, agent: EntityId, destination: Vec3) -> bool {
        if !self.is_navigable(destination) {
            self.body(agent).destination = None;
            return false;
        }
        self.body(agent).destination = Some(destination);
        true
    }

    fn stop(&mut self, agent: EntityId) {
        self.body(agent).destination = None;
    }
}

impl Feedback for SimWorld {
    fn set_body_tint(&mut self, agent: EntityId, tint: Tint) {
        self.body(agent).body_tint = tint;
    }

    fn set_spotlight_tint(&mut self, agent: EntityId, tint: Tint) {
        self.body(agent).spotlight_tint = tint;
    }

    fn play_cue(&mut self, agent: EntityId, cue: Cue) {
        self.cues += 1;
        debug!("Guard {} plays {:?}", agent, cue);
    }
}

impl TargetDirectory for SimWorld {
    fn target_position(&self, target: EntityId) -> Option<Vec3> {
        (target == self.intruder.id).then_some(self.intruder.position)
    }

    fn sound_emitter(&self, target: EntityId) -> Option<EmitterId> {
        (target == self.intruder.id).then_some(self.intruder.emitter)
    }

    fn alert_receiver(&mut self, target: EntityId) -> Option<&mut dyn AlertReceiver> {
        if target == self.intruder.id {
            Some(&mut self.intruder)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> SimWorld {
        let config = SimConfig {
            seed: Some(7),
            walls: vec![WallBox::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 3.0, 1.0))],
            intruder: IntruderConfig {
                path: vec![Vec3::new(0.0, 0.0, 5.0)],
                ..IntruderConfig::default()
            },
            ..SimConfig::default()
        };
        SimWorld::new(&config)
    }

    fn looking(position: Vec3, facing: Vec3) -> Observer {
        Observer {
            id: EntityId::from_raw(900),
            position,
            facing,
        }
    }

    #[test]
    fn test_visible_in_front() {
        let w = world();
        let id = w.intruder().id();
        assert!(w.is_visible(&looking(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z), id));
        assert!(!w.is_visible(&looking(Vec3::new(0.0, 0.0, 10.0), Vec3::Z), id));
    }

    #[test]
    fn test_wall_blocks_sight() {
        let w = world();
        let id = w.intruder().id();
        assert!(!w.is_visible(&looking(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), id));
    }

    #[test]
    fn test_out_of_range_not_visible() {
        let w = world();
        let id = w.intruder().id();
        assert!(!w.is_visible(&looking(Vec3::new(0.0, 0.0, 24.0), Vec3::NEG_Z), id));
    }

    #[test]
    fn test_sound_jitter_bounded() {
        let w = world();
        let listener = looking(Vec3::new(5.0, 0.0, 5.0), Vec3::Z);
        let heard = w.localize_sound(&listener, EmitterId::new(1)).expect("audible");
        assert!(horizontal_distance(heard, Vec3::new(0.0, 0.0, 5.0)) <= 1.5 * 2.0_f32.sqrt());
        assert!(w
            .localize_sound(&looking(Vec3::new(0.0, 0.0, -20.0), Vec3::Z), EmitterId::new(1))
            .is_none());
    }

    #[test]
    fn test_silent_intruder() {
        let mut w = world();
        w.intruder_mut().silent_after = Some(1.0);
        w.advance(2.0);
        let listener = looking(Vec3::new(0.0, 0.0, 6.0), Vec3::Z);
        assert!(w.localize_sound(&listener, EmitterId::new(1)).is_none());
    }

    #[test]
    fn test_navigation_bounds() {
        let mut w = world();
        let agent = EntityId::from_raw(900);
        assert!(!w.move_toward(agent, Vec3::new(100.0, 0.0, 0.0)));
        assert!(!w.move_toward(agent, Vec3::new(0.0, 1.0, 0.0)));
        assert!(w.move_toward(agent, Vec3::new(5.0, 0.0, 5.0)));
        assert_eq!(w.destination(agent), Some(Vec3::new(5.0, 0.0, 5.0)));
        w.stop(agent);
        assert_eq!(w.destination(agent), None);
    }

    #[test]
    fn test_capture() {
        let mut w = world();
        let id = w.intruder().id();
        let rx = w.alert_receiver(id).expect("receiver");
        rx.notify_partial_alert(EntityId::from_raw(900), 0.4);
        rx.notify_fully_detected(EntityId::from_raw(900));
        assert!(w.intruder().is_caught());
        assert_eq!(w.intruder().peak_alertness(), 1.0);
    }
}
