//! # MazeArm Core
//!
//! A robotic arm that traces a path through a generated maze.
//!
//! ## Structure
//!
//! ```text
//! mazearm_core/
//! ── algorithms/     # Maze carving and A* path planning
//! ── kinematics/     # Joint chain and CCD inverse kinematics
//! ── driver          # Waypoint replay over a planned path
//! ── session         # Per-frame tracking loop
//! ── recording       # Joint-angle sinks and JSON trajectories
//! ── config          # YAML/TOML configuration
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mazearm_core::{find_path, generate, WaypointDriver};
//!
//! let cells = generate(9, 9, Some(3)).unwrap();
//! let goal = *cells.last().unwrap();
//!
//! let path = find_path(&cells, &cells[0], &goal);
//! assert_eq!(path.first().map(|c| c.coord()), Some((0, 0)));
//! assert_eq!(path.last().map(|c| c.coord()), Some(goal.coord()));
//!
//! let mut driver = WaypointDriver::new(path, 0.05);
//! assert!(driver.tick().is_some());
//! ```

pub mod algorithms;
pub mod config;
pub mod driver;
pub mod error;
pub mod kinematics;
pub mod recording;
pub mod session;

pub use algorithms::astar::{find_path, AStar, Heuristic};
pub use algorithms::maze::{generate, Grid, GridCell};
pub use config::{DriverConfig, GridConfig, MazeArmConfig, SolverConfig};
pub use driver::{cell_to_world, WaypointDriver};
pub use error::{MazeArmError, MazeArmResult};
pub use kinematics::{CcdSolver, Joint, JointAxis, JointLimits, KinematicChain, SolveReport};
pub use recording::{FrameRecord, JointAngleSink, TrajectoryRecorder};
pub use session::TrackingSession;
