//! Drives guards and the intruder through a configured level.

use thiserror::Error;
use tracing::{debug, info};
use watchpost_ai::{guard_states, AlertReceiver, EnterArgs, FsmError, Guard, Perception, StateId};
use watchpost_common::{ConfigError, EntityId};

use crate::config::SimConfig;
use crate::timing::FixedStep;
use crate::world::SimWorld;

/// Errors that stop a scenario from running.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// State machine misconfiguration
    #[error("State machine error: {0}")]
    Fsm(#[from] FsmError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    /// Fixed ticks executed
    pub ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// Chases started by detection
    pub chases_started: u32,
    /// Simulated second the intruder was caught at
    pub caught_at: Option<f32>,
    /// Highest alertness the intruder reached
    pub peak_alertness: f32,
    /// Chase cues played by all guards
    pub cues_played: u32,
    /// Final state name of every guard
    pub guard_states: Vec<(EntityId, &'static str)>,
}

/// A level with its guards.
#[derive(Debug)]
pub struct Scenario {
    world: SimWorld,
    guards: Vec<Guard>,
    timing: FixedStep,
    frame_time: f32,
    duration: f32,
    ticks: u64,
    chases_started: u32,
    caught_at: Option<f32>,
}

impl Scenario {
    /// Builds the world and spawns guards into their starting states.
    pub fn new(config: &SimConfig) -> Result<Self, ScenarioError> {
        config.check()?;
        let table = guard_states()?;
        let mut world = SimWorld::new(config);

        let mut guards = Vec::with_capacity(config.guards.len());
        for spawn in &config.guards {
            let mut guard = Guard::new(EntityId::new(), spawn.position, config.guard.clone(), table.clone())
                .with_patrol(spawn.patrol.clone());
            let start = if spawn.patrol.is_empty() {
                StateId::IDLE
            } else {
                StateId::PATROL
            };
            guard.switch_state(&mut world, start, EnterArgs::None)?;
            info!("Spawned guard {} at {} ({})", guard.id(), guard.position, guard.state_name());
            guards.push(guard);
        }

        Ok(Self {
            world,
            guards,
            timing: FixedStep::new(config.fixed_dt()),
            frame_time: config.frame_time,
            duration: config.duration,
            ticks: 0,
            chases_started: 0,
            caught_at: None,
        })
    }

    /// The simulated level.
    #[must_use]
    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    /// All guards.
    #[must_use]
    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// Runs one fixed tick.
    pub fn step(&mut self, dt: f32) -> Result<(), ScenarioError> {
        let intruder = self.world.intruder().id();

        for guard in &mut self.guards {
            let spotted = !self.world.intruder().is_caught()
                && !guard.is_in_state(StateId::CHASE)
                && self.world.is_visible(&guard.observer(), intruder);
            if spotted {
                info!("Guard {} spotted intruder {}", guard.id(), intruder);
                guard.begin_chase(&mut self.world, intruder)?;
                self.chases_started += 1;
            }

            let before = guard.current_state();
            guard.tick(&mut self.world, dt)?;
            if guard.current_state() != before {
                debug!("Guard {} now {}", guard.id(), guard.state_name());
            }
            self.world.steer(guard, dt);
        }

        self.world.advance(dt);
        self.ticks += 1;

        if self.caught_at.is_none() && self.world.intruder().is_caught() {
            self.caught_at = Some(self.world.elapsed());
        }
        Ok(())
    }

    /// Runs frames until the configured duration elapses or the intruder is
    /// caught.
    pub fn run(&mut self) -> Result<SimReport, ScenarioError> {
        let mut frame_clock = 0.0;
        while frame_clock < self.duration && self.caught_at.is_none() {
            let steps = self.timing.accumulate(self.frame_time);
            for _ in 0..steps {
                self.step(self.timing.fixed_dt())?;
            }
            frame_clock += self.frame_time;
        }

        let report = self.report();
        info!(
            "Run finished: {} ticks, {:.1}s, {} chases, {} cues, caught: {}, peak alertness {:.2}",
            report.ticks,
            report.elapsed,
            report.chases_started,
            report.cues_played,
            report.caught_at.map_or_else(|| "no".to_string(), |t| format!("at {t:.1}s")),
            report.peak_alertness
        );
        for (id, state) in &report.guard_states {
            info!("Guard {}: {}", id, state);
        }
        Ok(report)
    }

    /// Snapshot of the run so far.
    #[must_use]
    pub fn report(&self) -> SimReport {
        SimReport {
            ticks: self.ticks,
            elapsed: self.world.elapsed(),
            chases_started: self.chases_started,
            caught_at: self.caught_at,
            peak_alertness: self.world.intruder().peak_alertness(),
            cues_played: self.world.cues_played(),
            guard_states: self.guards.iter().map(|g| (g.id(), g.state_name())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GuardSpawn, IntruderConfig, WallBox};
    use watchpost_common::Vec3;

    fn standoff(walls: Vec<WallBox>) -> SimConfig {
        SimConfig {
            seed: Some(1),
            duration: 10.0,
            walls,
            guards: vec![GuardSpawn {
                position: Vec3::ZERO,
                patrol: Vec::new(),
            }],
            intruder: IntruderConfig {
                path: vec![Vec3::new(0.0, 0.0, 8.0)],
                silent_after: Some(0.0),
                ..IntruderConfig::default()
            },
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_guard_spots_and_catches() {
        let mut scenario = Scenario::new(&standoff(Vec::new())).expect("scenario");
        let report = scenario.run().expect("run");

        assert_eq!(report.chases_started, 1);
        assert_eq!(report.cues_played, 1);
        let caught_at = report.caught_at.expect("caught");
        assert!(caught_at > 1.9 && caught_at < 2.2, "caught at {caught_at}");
        assert_eq!(report.peak_alertness, 1.0);
        assert_eq!(report.guard_states[0].1, "Chase");

        let guard = &scenario.guards()[0];
        assert!(guard.position.distance(Vec3::new(0.0, 0.0, 8.0)) <= guard.config().lost_distance + 0.5);
    }

    #[test]
    fn test_wall_hides_intruder() {
        let wall = WallBox::new(Vec3::new(-3.0, 0.0, 3.0), Vec3::new(3.0, 4.0, 4.0));
        let mut config = standoff(vec![wall]);
        config.duration = 3.0;
        let mut scenario = Scenario::new(&config).expect("scenario");
        let report = scenario.run().expect("run");

        assert_eq!(report.chases_started, 0);
        assert_eq!(report.cues_played, 0);
        assert_eq!(report.caught_at, None);
        assert_eq!(report.guard_states[0].1, "Idle");
        assert!(report.elapsed >= 2.9);
    }

    #[test]
    fn test_patrolling_guard_starts_in_patrol() {
        let mut config = standoff(Vec::new());
        config.guards[0].patrol = vec![Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, -5.0)];
        config.guards[0].position = Vec3::new(0.0, 0.0, -5.0);
        config.intruder.path = vec![Vec3::new(0.0, 0.0, 20.0)];

        let mut scenario = Scenario::new(&config).expect("scenario");
        assert!(scenario.guards()[0].is_in_state(StateId::PATROL));

        for _ in 0..30 {
            scenario.step(1.0 / 30.0).expect("step");
        }
        let guard = &scenario.guards()[0];
        assert!(guard.position.x < 0.0);
        assert!(guard.is_in_state(StateId::PATROL));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = standoff(Vec::new());
        config.guard.max_sight_duration = 0.0;
        assert!(matches!(
            Scenario::new(&config),
            Err(ScenarioError::Config(ConfigError::NotPositive { .. }))
        ));
    }
}
