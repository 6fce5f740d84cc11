//! Joint-angle recording
//!
//! A [`JointAngleSink`] receives the chain's angles once per frame. The
//! [`TrajectoryRecorder`] sink keeps every frame and can write the run out as
//! pretty-printed JSON for offline inspection.

use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::MazeArmResult;
use crate::kinematics::SolveReport;

/// Consumer of per-frame joint angles
pub trait JointAngleSink {
    fn publish(&mut self, frame: u64, angles: &[f64]);

    /// Angles together with the target and solve that produced them.
    ///
    /// Sinks that only care about angles can leave the default.
    fn publish_solve(
        &mut self,
        frame: u64,
        angles: &[f64],
        _target: Option<Point3<f64>>,
        _report: Option<&SolveReport>,
    ) {
        self.publish(frame, angles);
    }
}

/// Joint state after one frame's solve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub target: Option<Point3<f64>>,
    pub joint_angles: Vec<f64>,
    pub converged: bool,
    pub end_effector_distance: Option<f64>,
}

/// Recorded run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecorder {
    pub frames: Vec<FrameRecord>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: FrameRecord) {
        self.frames.push(record);
    }

    /// Record a frame along with the solve that produced it
    pub fn record_solve(
        &mut self,
        frame: u64,
        target: Option<Point3<f64>>,
        angles: &[f64],
        report: Option<&SolveReport>,
    ) {
        self.record(FrameRecord {
            frame,
            target,
            joint_angles: angles.to_vec(),
            converged: report.is_some_and(|r| r.converged),
            end_effector_distance: report.map(|r| r.final_distance),
        });
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Fraction of solved frames that converged
    pub fn convergence_rate(&self) -> f64 {
        let solved: Vec<_> = self
            .frames
            .iter()
            .filter(|f| f.end_effector_distance.is_some())
            .collect();
        if solved.is_empty() {
            return 0.0;
        }
        solved.iter().filter(|f| f.converged).count() as f64 / solved.len() as f64
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> MazeArmResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> MazeArmResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl JointAngleSink for TrajectoryRecorder {
    fn publish(&mut self, frame: u64, angles: &[f64]) {
        self.record(FrameRecord {
            frame,
            target: None,
            joint_angles: angles.to_vec(),
            converged: false,
            end_effector_distance: None,
        });
    }

    fn publish_solve(
        &mut self,
        frame: u64,
        angles: &[f64],
        target: Option<Point3<f64>>,
        report: Option<&SolveReport>,
    ) {
        self.record_solve(frame, target, angles, report);
    }
}
