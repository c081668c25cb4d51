//! GrahaNav - runs one exploration mission against a simulated planet.
//!
//! ```text
//! graha-nav --planet planets/gromit.toml [--config graha.toml]
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use graha_nav::mission::DEFAULT_MAX_LEGS;
use graha_nav::sim::{self, PlanetMap};
use graha_nav::{GrahaConfig, Mission, Result};

/// Explore a simulated planet
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (default: graha.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Planet ground truth (TOML)
    #[arg(short, long)]
    planet: PathBuf,

    /// Grace window for remote overrides, overrides the config file
    #[arg(long)]
    override_window_ms: Option<u64>,

    /// Stop after this many legs
    #[arg(long, default_value_t = DEFAULT_MAX_LEGS)]
    max_legs: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GrahaConfig::load(path)?,
        None if Path::new("graha.toml").exists() => GrahaConfig::load(Path::new("graha.toml"))?,
        None => GrahaConfig::default(),
    };
    if let Some(ms) = args.override_window_ms {
        config.timing.override_window_ms = ms;
    }

    // Initialize logging
    let filter = EnvFilter::from_default_env();
    let filter = match format!("graha_nav={}", config.logging.level).parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("Invalid log level '{}': {}", config.logging.level, e);
            filter
        }
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("GrahaNav v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Group {}, override window {} ms, stack mode {:?}",
        config.mission.group_id, config.timing.override_window_ms, config.exploration.stack_mode
    );

    let map = PlanetMap::load(&args.planet)?;
    let simulation = sim::spawn(map)?;

    let mut mission = Mission::new(
        &config,
        simulation.transport,
        simulation.robot,
        simulation.inbox,
    )
    .with_max_legs(args.max_legs);
    let report = mission.run()?;
    drop(mission);

    match simulation.mothership.join() {
        Ok(Ok(log)) => info!(
            "Mothership handled {} frames, {} paths, {} overrides",
            log.received.len(),
            log.paths,
            log.overrides_sent
        ),
        Ok(Err(e)) => return Err(e),
        Err(_) => tracing::error!("Mothership thread panicked"),
    }

    info!(
        "Planet {}: {} legs, {} nodes, {} line entries, {} targets reached, done: {}",
        report.planet.as_deref().unwrap_or("?"),
        report.legs,
        report.nodes,
        report.edges,
        report.targets_reached,
        report.done_message.as_deref().unwrap_or("no")
    );
    Ok(())
}
