//! Headless frame loop
//!
//! Stands in for an animation loop: every waypoint interval the driver
//! advances, and each of the frames in between re-solves the arm toward the
//! current target.

use nalgebra::Point3;
use serde::Serialize;
use tracing::{debug, info, warn};

use mazearm_core::{
    AStar, Grid, Heuristic, JointAngleSink, KinematicChain, MazeArmConfig, MazeArmResult,
    TrackingSession, TrajectoryRecorder,
};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub heuristic: Heuristic,
    /// Waypoint advances; `None` replays the path once, wrap tick included
    pub waypoints: Option<usize>,
    pub show_maze: bool,
    pub record: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub width: usize,
    pub height: usize,
    pub seed: Option<u64>,
    pub open_cells: usize,
    pub path_length: usize,
    pub expanded_nodes: usize,
    pub waypoint_ticks: usize,
    pub frames: u64,
    pub solved_frames: u64,
    pub converged_frames: u64,
    pub final_target: Option<Point3<f64>>,
    pub final_effector: Point3<f64>,
    pub final_angles: Vec<f64>,
}

impl RunSummary {
    pub fn convergence_rate(&self) -> f64 {
        if self.solved_frames == 0 {
            return 0.0;
        }
        self.converged_frames as f64 / self.solved_frames as f64
    }

    /// Frames were solved but none reached its target
    pub fn tracking_stalled(&self) -> bool {
        self.solved_frames > 0 && self.converged_frames == 0
    }
}

#[derive(Debug)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub recording: Option<TrajectoryRecorder>,
}

/// Generate, plan, then drive the six-axis arm along the path
pub fn run(config: &MazeArmConfig, options: &RunOptions) -> MazeArmResult<RunOutput> {
    let grid = Grid::generate(&config.grid)?;
    let cells = grid.open_cells();
    let start = grid.origin();
    let goal = grid.goal();

    let mut planner = AStar::with_heuristic(options.heuristic);
    let path = planner.find_path(&cells, &start, &goal);

    if path.is_empty() {
        warn!(
            "No path from ({}, {}) to ({}, {}), the arm will stay put",
            start.x, start.y, goal.x, goal.y
        );
    } else {
        info!(
            "Planned {} waypoints to ({}, {}), {} nodes expanded",
            path.len(),
            goal.x,
            goal.y,
            planner.last_expanded()
        );
    }

    if options.show_maze {
        info!("Maze:\n{}", grid.render_ascii(&path));
    }

    let path_length = path.len();
    let waypoint_ticks = options.waypoints.unwrap_or(path_length + 1);
    let frames_per_waypoint = config.driver.frames_per_waypoint();

    let mut session = TrackingSession::new(
        KinematicChain::six_axis_arm(),
        path,
        &config.driver,
        config.solver.clone(),
    );
    let mut recording = options.record.then(TrajectoryRecorder::new);

    let mut solved_frames = 0;
    let mut converged_frames = 0;

    for tick in 0..waypoint_ticks {
        session.advance_waypoint();

        for _ in 0..frames_per_waypoint {
            let report = match recording.as_mut() {
                Some(recorder) => session.update_and_publish(recorder as &mut dyn JointAngleSink),
                None => session.update(),
            };

            if let Some(report) = &report {
                solved_frames += 1;
                if report.converged {
                    converged_frames += 1;
                }
            }
        }

        debug!(
            "Tick {}: effector at {:?}",
            tick,
            session.chain().end_effector_position()
        );
    }

    let summary = RunSummary {
        width: grid.width(),
        height: grid.height(),
        seed: config.grid.seed,
        open_cells: cells.len(),
        path_length,
        expanded_nodes: planner.last_expanded(),
        waypoint_ticks,
        frames: session.frame(),
        solved_frames,
        converged_frames,
        final_target: session.current_target(),
        final_effector: session.chain().end_effector_position(),
        final_angles: session.chain().angles(),
    };

    info!(
        "Simulated {} frames over {} waypoint ticks, {:.1}% converged",
        summary.frames,
        summary.waypoint_ticks,
        summary.convergence_rate() * 100.0
    );

    if summary.tracking_stalled() {
        warn!(
            "The arm reached none of {} targets; joint limits may be pinning it (clamp_to_limits: {})",
            summary.solved_frames, config.solver.clamp_to_limits
        );
    }

    Ok(RunOutput { summary, recording })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazearm_core::GridConfig;

    fn small_config() -> MazeArmConfig {
        MazeArmConfig {
            grid: GridConfig {
                width: 5,
                height: 5,
                seed: Some(11),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_run_replays_path_once() {
        let options = RunOptions {
            record: true,
            ..Default::default()
        };
        let output = run(&small_config(), &options).unwrap();
        assert!(format!("{:?}", output).contains("RunSummary"));
        let summary = &output.summary;

        // 5x5 carves every even cell: 9 of them plus 8 passages
        assert_eq!(summary.open_cells, 17);
        assert!(summary.path_length >= 9);
        assert_eq!(summary.waypoint_ticks, summary.path_length + 1);
        assert_eq!(summary.frames, summary.waypoint_ticks as u64 * 30);

        // Every frame has a target once the first waypoint is issued
        assert_eq!(summary.solved_frames, summary.frames);
        assert_eq!(summary.final_target, Some(Point3::new(0.2, 0.025, 0.2)));

        let recording = output.recording.unwrap();
        assert_eq!(recording.len() as u64, summary.frames);
        assert!(summary.final_angles.iter().all(|a| a.is_finite()));
    }

    #[test]
    fn test_limits_hold_over_a_run() {
        let output = run(&small_config(), &RunOptions::default()).unwrap();
        let arm = KinematicChain::six_axis_arm();

        for (joint, angle) in arm.joints().iter().zip(&output.summary.final_angles) {
            if let Some(limits) = joint.limits {
                assert!(limits.contains(*angle), "{} at {}", joint.name, angle);
            }
        }
        assert!(output.recording.is_none());
    }

    fn maze_config(seed: u64, clamp_to_limits: bool) -> MazeArmConfig {
        let mut config = MazeArmConfig::default();
        config.grid.seed = Some(seed);
        config.solver.clamp_to_limits = clamp_to_limits;
        config
    }

    #[test]
    fn test_six_axis_limits_pin_the_arm_when_clamping() {
        let summary = run(&maze_config(42, true), &RunOptions::default())
            .unwrap()
            .summary;

        assert!(summary.solved_frames > 0);
        assert_eq!(summary.converged_frames, 0);
        assert_eq!(summary.convergence_rate(), 0.0);
        assert!(summary.tracking_stalled());
    }

    #[test]
    fn test_six_axis_tracks_without_clamping() {
        for seed in [11, 42] {
            let options = RunOptions {
                record: true,
                ..Default::default()
            };
            let output = run(&maze_config(seed, false), &options).unwrap();
            let summary = &output.summary;

            assert!(
                summary.convergence_rate() > 0.9,
                "seed {}: rate {}",
                seed,
                summary.convergence_rate()
            );
            assert!(!summary.tracking_stalled());

            // Recording goes through the sink and keeps each solve's outcome
            let recording = output.recording.unwrap();
            assert_eq!(recording.convergence_rate(), summary.convergence_rate());
        }
    }

    #[test]
    fn test_zero_waypoints_solves_nothing() {
        let options = RunOptions {
            waypoints: Some(0),
            ..Default::default()
        };
        let summary = run(&small_config(), &options).unwrap().summary;
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.final_target, None);
        assert_eq!(summary.convergence_rate(), 0.0);
        assert!(!summary.tracking_stalled());
    }

    #[test]
    fn test_invalid_grid_is_error() {
        let mut config = small_config();
        config.grid.width = 0;
        assert!(run(&config, &RunOptions::default()).is_err());
    }
}
