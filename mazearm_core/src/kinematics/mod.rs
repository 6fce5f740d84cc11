//! Kinematic chain and Cyclic Coordinate Descent solver
//!
//! # Overview
//!
//! - [`Joint`]: local offset, fixed orientation bias, one free rotation
//! - [`KinematicChain`]: root-first joint list with on-demand world transforms
//! - [`CcdSolver`]: rotates joints tip-to-root until the end-effector reaches a target
//!
//! The solver works against the [`ArticulatedChain`] trait, so any chain that
//! can report world transforms and read/write its joint angles can be driven.
//!
//! # Example
//!
//! ```rust
//! use mazearm_core::kinematics::{CcdSolver, KinematicChain};
//! use nalgebra::Point3;
//!
//! let mut arm = KinematicChain::planar(&[1.0, 0.8]);
//! let solver = CcdSolver::default();
//!
//! let converged = solver.solve(&mut arm, &Point3::new(1.0, 0.0, 0.5));
//! assert!(converged);
//! ```

mod ccd;
mod chain;
mod joint;

pub use ccd::{solve, wrap_angle, CcdSolver, SolveReport};
pub use chain::KinematicChain;
pub use joint::{orientation_from_euler_xyz, Joint, JointAxis, JointLimits};

use nalgebra::{Isometry3, Point3};

/// Chain handle the solver drives.
///
/// Index 0 is the root, `joint_count() - 1` the end-effector. Callers pass
/// indices in `0..joint_count()`.
pub trait ArticulatedChain {
    fn joint_count(&self) -> usize;

    /// Joint frame to world, composed from the root
    fn world_transform(&self, index: usize) -> Isometry3<f64>;

    fn rotation_angle(&self, index: usize) -> f64;

    fn set_rotation_angle(&mut self, index: usize, angle: f64);

    fn rotation_axis(&self, index: usize) -> JointAxis;

    fn rotation_limits(&self, index: usize) -> Option<JointLimits>;

    fn world_position(&self, index: usize) -> Point3<f64> {
        self.world_transform(index) * Point3::origin()
    }
}
