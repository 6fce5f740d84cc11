use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use mazearm_core::{Heuristic, MazeArmConfig, MazeArmResult};

#[derive(Parser, Debug, Clone)]
#[command(name = "mazearm_sim")]
#[command(about = "Headless maze-tracking arm driver", long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, or TOML by extension)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    /// Maze seed; omitted means a fresh maze every run
    #[arg(short, long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub cell_size: Option<f64>,

    #[arg(long)]
    pub max_iterations: Option<usize>,

    #[arg(long)]
    pub threshold: Option<f64>,

    /// Let the solver leave joint limits
    #[arg(long, default_value_t = false)]
    pub no_clamp: bool,

    /// Keep the joint before the end-effector still
    #[arg(long, default_value_t = false)]
    pub freeze_pre_effector: bool,

    #[arg(long, value_enum, default_value_t = HeuristicArg::Manhattan)]
    pub heuristic: HeuristicArg,

    /// Waypoint advances to simulate; defaults to one full replay of the path
    #[arg(short, long)]
    pub waypoints: Option<usize>,

    /// Write the recorded trajectory to this JSON file
    #[arg(short, long)]
    pub record: Option<PathBuf>,

    /// Log the maze with the planned path drawn in
    #[arg(long, default_value_t = false)]
    pub show_maze: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeuristicArg {
    Manhattan,
    Euclidean,
    Zero,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Manhattan => Heuristic::Manhattan,
            HeuristicArg::Euclidean => Heuristic::Euclidean,
            HeuristicArg::Zero => Heuristic::Zero,
        }
    }
}

impl Cli {
    /// File configuration (or defaults) with command-line overrides applied
    pub fn resolve_config(&self) -> MazeArmResult<MazeArmConfig> {
        let mut config = match &self.config {
            Some(path) => MazeArmConfig::load(path)?,
            None => MazeArmConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if self.seed.is_some() {
            config.grid.seed = self.seed;
        }
        if let Some(cell_size) = self.cell_size {
            config.driver.cell_size = cell_size;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.solver.max_iterations = max_iterations;
        }
        if let Some(threshold) = self.threshold {
            config.solver.threshold = threshold;
        }
        if self.no_clamp {
            config.solver.clamp_to_limits = false;
        }
        if self.freeze_pre_effector {
            config.solver.freeze_pre_effector = true;
        }

        config.validate()?;
        Ok(config)
    }
}
