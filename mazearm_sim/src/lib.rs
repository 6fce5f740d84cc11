//! # mazearm_sim
//!
//! Headless driver for the maze-tracking arm: builds a maze, plans the
//! shortest route from its origin to its goal and replays that route on the
//! six-axis arm frame by frame.

pub mod cli;
pub mod runner;

pub use cli::{Cli, HeuristicArg};
pub use runner::{run, RunOptions, RunOutput, RunSummary};
