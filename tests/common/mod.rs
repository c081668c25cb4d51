//! Shared harness for the scenario tests.

#![allow(dead_code)]

use std::path::PathBuf;

use graha_nav::config::GrahaConfig;
use graha_nav::planet::{PlanetGraph, StackMode};
use graha_nav::sim::{self, MothershipLog, PlanetMap};
use graha_nav::{Mission, MissionReport};

/// Result of one simulated mission.
pub struct Outcome {
    pub report: MissionReport,
    pub log: MothershipLog,
    pub graph: PlanetGraph,
}

/// Config with short deadlines; the in-process mothership answers in
/// microseconds.
pub fn fast_config(stack_mode: StackMode) -> GrahaConfig {
    let mut config = GrahaConfig::default();
    config.timing.override_window_ms = 50;
    config.timing.path_ack_timeout_ms = 2000;
    config.timing.planet_timeout_ms = 2000;
    config.timing.completion_timeout_ms = 2000;
    config.exploration.stack_mode = stack_mode;
    config
}

/// Planet shipped with the crate.
pub fn planet(name: &str) -> PlanetMap {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("planets")
        .join(format!("{}.toml", name));
    PlanetMap::load(&path).unwrap()
}

/// Run a mission to the end and collect what both sides saw.
pub fn run_mission(map: PlanetMap, config: &GrahaConfig) -> Outcome {
    let simulation = sim::spawn(map).unwrap();
    let mut mission = Mission::new(
        config,
        simulation.transport,
        simulation.robot,
        simulation.inbox,
    )
    .with_max_legs(100);

    let report = mission.run().unwrap();
    let graph = mission.navigator().graph().clone();
    drop(mission);

    let log = simulation.mothership.join().unwrap().unwrap();
    Outcome { report, log, graph }
}
