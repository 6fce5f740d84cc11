//! # mazearm_sim - Maze-tracking arm, headless
//!
//! Usage:
//!   mazearm_sim                               # 10x10 maze, fresh seed
//!   mazearm_sim --seed 42 --show-maze         # Reproducible maze, drawn in the log
//!   mazearm_sim --config arm.yaml             # Settings from file
//!   mazearm_sim --record run.json             # Keep every frame's joint angles
//!
//! Log level follows RUST_LOG (default: info).

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mazearm_sim::{run, Cli, RunOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting mazearm_sim");

    let config = cli.resolve_config().context("loading configuration")?;
    info!(
        "Grid {}x{}, cell size {}, {} frames per waypoint",
        config.grid.width,
        config.grid.height,
        config.driver.cell_size,
        config.driver.frames_per_waypoint()
    );

    let options = RunOptions {
        heuristic: cli.heuristic.into(),
        waypoints: cli.waypoints,
        show_maze: cli.show_maze,
        record: cli.record.is_some(),
    };
    let output = run(&config, &options)?;

    if let (Some(path), Some(recording)) = (&cli.record, &output.recording) {
        recording
            .save_to_file(path)
            .with_context(|| format!("writing recording to {}", path.display()))?;
        info!("Recorded {} frames to {}", recording.len(), path.display());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
    }

    Ok(())
}
