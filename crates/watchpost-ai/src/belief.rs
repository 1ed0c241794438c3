//! Chase belief: where the target probably is and how sure the guard is.

use watchpost_common::{remap, EntityId, Vec3};

/// What the senses reported about the target during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evidence {
    /// Direct line of sight, with the target's true position.
    Sighted(Vec3),
    /// Sound localization, with the estimated source position.
    Heard(Vec3),
    /// Neither channel produced a location.
    Nothing,
}

impl Evidence {
    /// Reported location, if any.
    #[must_use]
    pub fn location(self) -> Option<Vec3> {
        match self {
            Self::Sighted(at) | Self::Heard(at) => Some(at),
            Self::Nothing => None,
        }
    }

    /// Whether the target was seen this tick.
    #[must_use]
    pub fn is_sighted(self) -> bool {
        matches!(self, Self::Sighted(_))
    }

    /// Whether any channel corroborates the target's presence.
    #[must_use]
    pub fn is_corroborating(self) -> bool {
        !matches!(self, Self::Nothing)
    }
}

/// Alert signal derived from the sight accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertLevel {
    /// Accumulated sight reached the threshold.
    Full,
    /// Fraction of the way to full detection, in `[0, 1)`.
    Partial(f32),
}

/// Per-agent state of an active chase.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaseBelief {
    target: EntityId,
    last_known_position: Vec3,
    saved_agent_speed: f32,
    sight_accumulator: f32,
}

impl ChaseBelief {
    /// Starts a fresh belief about `target`, last seen at `position`.
    /// `saved_agent_speed` is restored when the chase ends.
    #[must_use]
    pub fn new(target: EntityId, position: Vec3, saved_agent_speed: f32) -> Self {
        Self {
            target,
            last_known_position: position,
            saved_agent_speed,
            sight_accumulator: 0.0,
        }
    }

    /// The pursued entity.
    #[must_use]
    pub fn target(&self) -> EntityId {
        self.target
    }

    /// Best current estimate of the target's location.
    #[must_use]
    pub fn last_known_position(&self) -> Vec3 {
        self.last_known_position
    }

    /// Agent speed captured when the chase started.
    #[must_use]
    pub fn saved_agent_speed(&self) -> f32 {
        self.saved_agent_speed
    }

    /// Accumulated sight time in seconds.
    #[must_use]
    pub fn sight_accumulator(&self) -> f32 {
        self.sight_accumulator
    }

    /// Moves the last known position to whatever the evidence reports.
    /// Holds the old value when nothing was sensed.
    pub fn record(&mut self, evidence: Evidence) {
        if let Some(at) = evidence.location() {
            self.last_known_position = at;
        }
    }

    /// Grows the accumulator by `dt` while the target is seen, shrinks it
    /// otherwise. Stays within `[0, max_sight_duration]`.
    pub fn integrate(&mut self, on_sight: bool, dt: f32, max_sight_duration: f32) {
        let dt = dt.max(0.0);
        let next = if on_sight {
            self.sight_accumulator + dt
        } else {
            self.sight_accumulator - dt
        };
        self.sight_accumulator = next.clamp(0.0, max_sight_duration.max(0.0));
    }

    /// Current alert signal for a detection threshold of
    /// `max_sight_duration` seconds.
    #[must_use]
    pub fn alert_level(&self, max_sight_duration: f32) -> AlertLevel {
        if self.sight_accumulator >= max_sight_duration {
            AlertLevel::Full
        } else {
            let alertness = remap(self.sight_accumulator, 0.0, max_sight_duration, 0.0, 1.0);
            AlertLevel::Partial(alertness.clamp(0.0, 1.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAX: f32 = 2.0;

    fn belief() -> ChaseBelief {
        ChaseBelief::new(EntityId::from_raw(7), Vec3::new(1.0, 0.0, 1.0), 3.5)
    }

    #[test]
    fn test_new_belief_is_reset() {
        let b = belief();
        assert_eq!(b.target(), EntityId::from_raw(7));
        assert_eq!(b.last_known_position(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(b.saved_agent_speed(), 3.5);
        assert_eq!(b.sight_accumulator(), 0.0);
    }

    #[test]
    fn test_record_holds_last_known_without_evidence() {
        let mut b = belief();
        b.record(Evidence::Heard(Vec3::new(4.0, 0.0, 4.0)));
        assert_eq!(b.last_known_position(), Vec3::new(4.0, 0.0, 4.0));

        b.record(Evidence::Nothing);
        assert_eq!(b.last_known_position(), Vec3::new(4.0, 0.0, 4.0));

        b.record(Evidence::Sighted(Vec3::new(9.0, 1.0, 0.0)));
        assert_eq!(b.last_known_position(), Vec3::new(9.0, 1.0, 0.0));
    }

    #[test]
    fn test_integrate_clamps_both_ends() {
        let mut b = belief();
        b.integrate(false, 0.5, MAX);
        assert_eq!(b.sight_accumulator(), 0.0);

        b.integrate(true, 5.0, MAX);
        assert_eq!(b.sight_accumulator(), MAX);
    }

    #[test]
    fn test_decay_is_gradual() {
        let mut b = belief();
        b.integrate(true, 1.5, MAX);
        b.integrate(false, 0.5, MAX);
        assert_eq!(b.sight_accumulator(), 1.0);
    }

    #[test]
    fn test_alert_level_full_at_threshold() {
        let mut b = belief();
        b.integrate(true, MAX, MAX);
        assert_eq!(b.alert_level(MAX), AlertLevel::Full);
    }

    #[test]
    fn test_alert_level_partial_remap() {
        let mut b = belief();
        b.integrate(true, 0.5, MAX);
        assert_eq!(b.alert_level(MAX), AlertLevel::Partial(0.25));
        assert_eq!(belief().alert_level(MAX), AlertLevel::Partial(0.0));
    }

    #[test]
    fn test_evidence_helpers() {
        assert!(Evidence::Sighted(Vec3::ZERO).is_sighted());
        assert!(!Evidence::Heard(Vec3::ZERO).is_sighted());
        assert!(Evidence::Heard(Vec3::ZERO).is_corroborating());
        assert!(!Evidence::Nothing.is_corroborating());
        assert_eq!(Evidence::Nothing.location(), None);
    }

    proptest! {
        #[test]
        fn prop_accumulator_stays_bounded(
            max in 0.1f32..10.0,
            ticks in prop::collection::vec((any::<bool>(), 0.0f32..1.0), 0..200),
        ) {
            let mut b = belief();
            for (on_sight, dt) in ticks {
                b.integrate(on_sight, dt, max);
                prop_assert!(b.sight_accumulator() >= 0.0);
                prop_assert!(b.sight_accumulator() <= max);
            }
        }

        #[test]
        fn prop_accumulator_moves_strictly_until_clamped(
            max in 0.5f32..10.0,
            start in 0.0f32..1.0,
            on_sight in any::<bool>(),
            dt in 0.001f32..0.5,
        ) {
            let mut b = belief();
            b.integrate(true, start * max, max);
            let before = b.sight_accumulator();
            b.integrate(on_sight, dt, max);
            let after = b.sight_accumulator();

            if on_sight {
                prop_assert!(after > before || after == max);
            } else {
                prop_assert!(after < before || after == 0.0);
            }
        }

        #[test]
        fn prop_alertness_is_normalized_ratio(
            max in 0.1f32..10.0,
            seen in 0.0f32..20.0,
        ) {
            let mut b = belief();
            b.integrate(true, seen, max);
            let acc = b.sight_accumulator();
            match b.alert_level(max) {
                AlertLevel::Full => prop_assert!(acc >= max),
                AlertLevel::Partial(alertness) => {
                    prop_assert!(acc < max);
                    prop_assert!((0.0..=1.0).contains(&alertness));
                    prop_assert!((alertness - (acc / max).clamp(0.0, 1.0)).abs() < 1e-5);
                }
            }
        }
    }
}
