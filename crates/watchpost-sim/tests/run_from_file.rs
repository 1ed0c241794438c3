//! Loading a level from disk and running it to completion.

use tempfile::TempDir;
use watchpost_common::Vec3;
use watchpost_sim::{GuardSpawn, IntruderConfig, Scenario, SimConfig};

const LEVEL: &str = r#"
tick_rate = 20
duration = 8.0
seed = 99
half_extent = 15.0
view_distance = 12.0
walls = []

[guard]
max_sight_duration = 1.0

[intruder]
path = [[0.0, 0.0, 6.0], [0.0, 0.0, 7.0]]
speed = 0.5

[[guards]]
position = [0.0, 0.0, 0.0]
"#;

#[test]
fn level_file_runs_to_capture() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("level.toml");
    std::fs::write(&path, LEVEL).expect("write level");

    let config = SimConfig::load_strict(&path).expect("load level");
    assert_eq!(config.tick_rate, 20);
    assert_eq!(config.guards.len(), 1);
    assert!(config.walls.is_empty());

    let report = Scenario::new(&config).expect("scenario").run().expect("run");
    assert_eq!(report.chases_started, 1);
    let caught_at = report.caught_at.expect("caught");
    assert!(caught_at < 2.0, "caught at {caught_at}");
}

#[test]
fn saved_default_reloads_identically() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("watchpost.toml");

    let mut config = SimConfig::default();
    config.seed = Some(5);
    config.intruder = IntruderConfig {
        silent_after: Some(4.0),
        ..IntruderConfig::default()
    };
    config.guards.push(GuardSpawn {
        position: Vec3::new(3.0, 0.0, 3.0),
        patrol: Vec::new(),
    });
    config.save_to(&path).expect("save");

    assert_eq!(SimConfig::load_strict(&path).expect("reload"), config);
}

#[test]
fn default_level_runs_for_its_duration() {
    let config = SimConfig {
        seed: Some(3),
        duration: 5.0,
        ..SimConfig::default()
    };
    let mut scenario = Scenario::new(&config).expect("scenario");
    let report = scenario.run().expect("run");

    assert!(report.ticks > 0);
    assert_eq!(report.guard_states.len(), 2);
    assert!(report.peak_alertness >= 0.0 && report.peak_alertness <= 1.0);
}
