//! End-to-end missions against the simulated mothership.

mod common;

use common::{fast_config, planet, run_mission};
use graha_nav::NavState;
use graha_nav::planet::{Heading, Node, StackMode};
use graha_nav::planning::shortest_path;
use graha_nav::sim::PlanetMap;

#[test]
fn test_gromit_fully_explored() {
    let outcome = run_mission(planet("gromit"), &fast_config(StackMode::Keyed));
    let report = &outcome.report;

    assert!(report.done);
    assert_eq!(report.final_state, NavState::Done);
    assert_eq!(report.done_message.as_deref(), Some("Planet explored"));
    assert_eq!(report.planet.as_deref(), Some("Gromit"));
    assert_eq!(report.nodes, 8);
    assert_eq!(report.legs, 11);

    assert_eq!(outcome.log.paths, 11);
    assert_eq!(outcome.log.overrides_sent, 1);

    // Blocked lines are known but never routed through
    let graph = &outcome.graph;
    assert!(!graph.edge(Node::new(1, 1), Heading::North).unwrap().is_passable());
    let route = shortest_path(graph, Node::new(1, 1), Node::new(1, 2)).unwrap();
    assert_eq!(route.cost, 5);
    assert_eq!(route.first_heading(), Some(Heading::West));
}

#[test]
fn test_message_order() {
    let mut config = fast_config(StackMode::Keyed);
    config.mission.test_planet = Some("Gromit".into());
    let outcome = run_mission(planet("gromit"), &config);

    let kinds = outcome.log.kinds();
    assert_eq!(&kinds[..2], &["testPlanet", "ready"]);
    assert_eq!(kinds.last(), Some(&"explorationCompleted"));

    for (topic, kind) in &outcome.log.received {
        match kind.as_str() {
            "path" | "pathSelect" => assert_eq!(topic, "planet/Gromit/127"),
            _ => assert_eq!(topic, "explorer/127"),
        }
    }
    // Every leg was proposed before it was driven
    let selects = kinds.iter().filter(|k| **k == "pathSelect").count();
    assert_eq!(selects, outcome.report.legs);
}

#[test]
fn test_positional_stack_stops_early() {
    // Popping the stack top when (0,0) is reconciled drops (0,1), which
    // still has a pending heading. The rest of the planet is never reached.
    let keyed = run_mission(planet("gromit"), &fast_config(StackMode::Keyed));
    let positional = run_mission(planet("gromit"), &fast_config(StackMode::Positional));

    assert!(positional.report.done);
    assert_eq!(positional.report.legs, 5);
    assert!(positional.report.legs < keyed.report.legs);
    assert!(positional.graph.edge(Node::new(0, 1), Heading::North).is_none());
}

#[test]
fn test_target_reached() {
    let outcome = run_mission(planet("cheese"), &fast_config(StackMode::Keyed));
    let report = &outcome.report;

    assert_eq!(report.targets_reached, 1);
    assert_eq!(report.legs, 2);
    assert!(report.done);
    assert_eq!(report.done_message.as_deref(), Some("Target reached"));
    assert_eq!(outcome.log.kinds().last(), Some(&"targetReached"));
}

#[test]
fn test_single_node_planet() {
    let map = PlanetMap::from_toml(
        r#"
name = "Pebble"
start = { x = 3, y = 4, orientation = 180 }
"#,
    )
    .unwrap();
    let outcome = run_mission(map, &fast_config(StackMode::Keyed));

    assert_eq!(outcome.report.legs, 0);
    assert_eq!(outcome.report.nodes, 1);
    assert!(outcome.report.done);
    assert_eq!(outcome.log.kinds(), vec!["ready", "explorationCompleted"]);
}
