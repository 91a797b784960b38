//! RekhaNav - line-following controller
//!
//! Runs the control loop against the mock runtime: loads configuration,
//! builds the simulated environment and the tracker, and drives the loop
//! until the environment signals end-of-run.

use rekha_nav::config::RekhaConfig;
use rekha_nav::error::Result;
use rekha_nav::runtime::RobotRuntime;
use rekha_nav::sim::SimRuntime;
use rekha_nav::tracker::LineTracker;
use rekha_nav::vision::Roi;
use rekha_nav::viz::{OverlayRenderer, OverlaySink};

use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rekha_nav=info".parse().unwrap()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config = if args.len() > 1 {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        RekhaConfig::load(config_path)?
    } else if Path::new("rekha.toml").exists() {
        info!("Loading configuration from rekha.toml");
        RekhaConfig::load(Path::new("rekha.toml"))?
    } else {
        info!("Using default configuration");
        RekhaConfig::default()
    };

    info!("RekhaNav v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Timestep {} ms, base speed {:.2} rad/s, max speed {:.2} rad/s",
        config.robot.timestep_ms, config.control.base_speed, config.control.max_speed
    );

    let mut runtime = SimRuntime::from_config(&config)?;
    let (width, height) = runtime.camera_frame().dimensions();
    let mut tracker = LineTracker::new(&config, width, height)?;

    let sink = if config.output.snapshot_ticks > 0 {
        let renderer = OverlayRenderer::new(width, height, Roi::bottom_band(width, height));
        Some(OverlaySink::new(
            Path::new(&config.output.overlay_dir),
            config.output.snapshot_ticks,
            renderer,
        )?)
    } else {
        None
    };

    let ticks = tracker.run(&mut runtime, sink.as_ref())?;

    let (x, y, theta) = runtime.pose();
    info!(
        "Run complete: {} ticks, final pose ({:.3}, {:.3}, {:.1}°)",
        ticks,
        x,
        y,
        theta.to_degrees()
    );

    Ok(())
}
