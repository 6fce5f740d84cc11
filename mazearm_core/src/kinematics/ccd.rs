//! Cyclic Coordinate Descent inverse kinematics
//!
//! Each pass walks the chain from the joint before the end-effector back to
//! the first joint after the root. A joint is turned about its free axis by
//! the signed angle between "joint to end-effector" and "joint to target",
//! both measured in the joint's own frame and projected onto its rotation
//! plane. The solve stops as soon as the end-effector is within `threshold`
//! of the target.

use std::f64::consts::{PI, TAU};

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::ArticulatedChain;
use crate::config::SolverConfig;

/// Shorter vectors count as zero-length when normalizing
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Outcome of one solve call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub converged: bool,
    /// Outer passes started; zero when the chain was already on target
    pub iterations: usize,
    /// End-effector to target distance when the call returned
    pub final_distance: f64,
}

/// CCD solver
#[derive(Debug, Clone, Default)]
pub struct CcdSolver {
    config: SolverConfig,
}

impl CcdSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.config.max_iterations = max_iterations;
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.config.threshold = threshold;
    }

    /// Move `chain` toward `target`, returning whether it got within threshold.
    ///
    /// Partial progress is kept when it does not.
    pub fn solve<C: ArticulatedChain + ?Sized>(&self, chain: &mut C, target: &Point3<f64>) -> bool {
        self.solve_detailed(chain, target).converged
    }

    pub fn solve_detailed<C: ArticulatedChain + ?Sized>(
        &self,
        chain: &mut C,
        target: &Point3<f64>,
    ) -> SolveReport {
        let joint_count = chain.joint_count();
        if joint_count == 0 {
            return SolveReport {
                converged: false,
                iterations: 0,
                final_distance: f64::INFINITY,
            };
        }

        let effector = joint_count - 1;
        let threshold = self.config.threshold;
        let mut distance = (chain.world_position(effector) - target).norm();

        if distance < threshold {
            return SolveReport {
                converged: true,
                iterations: 0,
                final_distance: distance,
            };
        }

        for iteration in 1..=self.config.max_iterations {
            for joint in (1..effector).rev() {
                if self.config.freeze_pre_effector && joint + 1 == effector {
                    continue;
                }

                let Some(delta) = angle_to_target(chain, joint, effector, target) else {
                    trace!("Joint {} degenerate this pass, skipping", joint);
                    continue;
                };

                let mut angle = chain.rotation_angle(joint) + delta;
                if self.config.clamp_to_limits {
                    if let Some(limits) = chain.rotation_limits(joint) {
                        angle = limits.clamp(angle);
                    }
                }
                chain.set_rotation_angle(joint, angle);

                distance = (chain.world_position(effector) - target).norm();
                if distance < threshold {
                    trace!(
                        "Converged after {} iterations, distance {:.5}",
                        iteration,
                        distance
                    );
                    return SolveReport {
                        converged: true,
                        iterations: iteration,
                        final_distance: distance,
                    };
                }
            }
        }

        debug!(
            "No convergence in {} iterations, {:.5} from target",
            self.config.max_iterations, distance
        );

        SolveReport {
            converged: false,
            iterations: self.config.max_iterations,
            final_distance: distance,
        }
    }
}

/// Solve with limit clamping on and every non-root joint updated
pub fn solve<C: ArticulatedChain + ?Sized>(
    chain: &mut C,
    target: &Point3<f64>,
    max_iterations: usize,
    threshold: f64,
) -> bool {
    CcdSolver::new(SolverConfig {
        max_iterations,
        threshold,
        ..SolverConfig::default()
    })
    .solve(chain, target)
}

/// Wrap an angle into `[-π, π)`
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Signed rotation about `joint`'s free axis that swings the end-effector
/// direction onto the target direction. `None` when either direction, or its
/// projection onto the rotation plane, has no length.
fn angle_to_target<C: ArticulatedChain + ?Sized>(
    chain: &C,
    joint: usize,
    effector: usize,
    target: &Point3<f64>,
) -> Option<f64> {
    let joint_transform = chain.world_transform(joint);
    let joint_position = Point3::from(joint_transform.translation.vector);

    let to_effector = (chain.world_position(effector) - joint_position).try_normalize(DEGENERATE_EPSILON)?;
    let to_target = (target - joint_position).try_normalize(DEGENERATE_EPSILON)?;

    // Directions only need the rotational part of the inverse
    let to_local = joint_transform.rotation.inverse();
    let axis = chain.rotation_axis(joint);

    let local_effector = axis
        .project(&(to_local * to_effector))
        .try_normalize(DEGENERATE_EPSILON)?;
    let local_target = axis
        .project(&(to_local * to_target))
        .try_normalize(DEGENERATE_EPSILON)?;

    let delta = axis.planar_angle(&local_target) - axis.planar_angle(&local_effector);
    Some(wrap_angle(delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::{Joint, JointAxis, KinematicChain};
    use approx::assert_relative_eq;

    fn two_link() -> KinematicChain {
        KinematicChain::planar(&[1.0, 0.8])
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(wrap_angle(0.0), 0.0);
        assert_relative_eq!(wrap_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(5.0 * TAU + 0.25), 0.25, epsilon = 1e-9);
        assert!((-PI..PI).contains(&wrap_angle(PI)));
    }

    #[test]
    fn test_reachable_targets_converge() {
        let targets = [
            Point3::new(1.0, 0.0, 0.5),
            Point3::new(-0.9, 0.0, 0.6),
            Point3::new(0.4, 0.0, -1.3),
            Point3::new(0.3, 0.0, 1.4),
        ];

        for target in targets {
            let mut chain = two_link();
            let report = CcdSolver::default().solve_detailed(&mut chain, &target);

            assert!(report.converged, "target {:?}: {:?}", target, report);
            assert!(report.iterations <= 100);
            assert!((chain.end_effector_position() - target).norm() < 0.01);
        }
    }

    #[test]
    fn test_unreachable_target_reports_false() {
        let mut chain = two_link();
        let target = Point3::new(2.5, 0.0, 0.0);

        let report = CcdSolver::default().solve_detailed(&mut chain, &target);
        assert!(!report.converged);
        assert_eq!(report.iterations, 100);

        // Best effort: the arm ends up pointing at the target
        assert_relative_eq!(report.final_distance, 2.5 - 1.8, epsilon = 1e-3);
    }

    #[test]
    fn test_solve_is_stable_after_convergence() {
        let mut chain = two_link();
        let target = Point3::new(-0.9, 0.0, 0.6);
        assert!(solve(&mut chain, &target, 100, 0.01));

        let before = chain.angles();
        let report = CcdSolver::default().solve_detailed(&mut chain, &target);
        assert!(report.converged);
        assert_eq!(report.iterations, 0);

        for (a, b) in before.iter().zip(chain.angles()) {
            assert!((a - b).abs() < 0.01);
        }
    }

    #[test]
    fn test_target_on_joint_is_skipped() {
        let mut chain = two_link();
        // Exactly where the elbow sits: its own direction to target is zero
        let target = Point3::new(0.0, 0.0, 1.0);

        let converged = CcdSolver::default().solve(&mut chain, &target);
        assert!(!converged);

        let angles = chain.angles();
        assert!(angles.iter().all(|a| a.is_finite()));
        assert_eq!(angles[0], 0.0);
        assert_eq!(angles[2], 0.0);
        assert!(angles[1].abs() < 1e-9);
    }

    #[test]
    fn test_target_along_axis_is_skipped() {
        let mut chain = two_link();
        // Straight above the shoulder: no component in the XZ plane
        let target = Point3::new(0.0, 1.5, 0.0);

        CcdSolver::default().solve(&mut chain, &target);
        assert!(chain.angles().iter().all(|a| a.is_finite()));
    }

    #[test]
    fn test_root_and_effector_never_rotated() {
        let mut chain = KinematicChain::planar(&[0.5, 0.5, 0.5]);
        chain.set_angle(0, 0.3).unwrap();
        chain.set_angle(4, -0.2).unwrap();

        CcdSolver::default().solve(&mut chain, &Point3::new(0.7, 0.0, 0.4));

        assert_eq!(chain.angle(0).unwrap(), 0.3);
        assert_eq!(chain.angle(4).unwrap(), -0.2);
    }

    #[test]
    fn test_limits_respected_when_clamping() {
        let mut chain = KinematicChain::new(vec![
            Joint::new("root"),
            Joint::new("shoulder").with_limits(-0.5, 0.5),
            Joint::new("elbow").with_offset(0.0, 0.0, 1.0).with_limits(-0.5, 0.5),
            Joint::new("tip").with_offset(0.0, 0.0, 1.0),
        ])
        .unwrap();

        // Needs far more than half a radian at the shoulder
        let target = Point3::new(-1.2, 0.0, -0.8);
        let converged = CcdSolver::default().solve(&mut chain, &target);

        assert!(!converged);
        for angle in &chain.angles()[1..3] {
            assert!((-0.5..=0.5).contains(angle), "angle {} escaped limits", angle);
        }
    }

    #[test]
    fn test_limits_ignored_when_clamping_disabled() {
        let mut chain = KinematicChain::new(vec![
            Joint::new("root"),
            Joint::new("shoulder").with_limits(-0.5, 0.5),
            Joint::new("elbow").with_offset(0.0, 0.0, 1.0).with_limits(-0.5, 0.5),
            Joint::new("tip").with_offset(0.0, 0.0, 1.0),
        ])
        .unwrap();

        let solver = CcdSolver::new(SolverConfig {
            clamp_to_limits: false,
            ..Default::default()
        });
        assert!(solver.solve(&mut chain, &Point3::new(-1.2, 0.0, -0.8)));
    }

    #[test]
    fn test_freeze_pre_effector() {
        let mut chain = KinematicChain::planar(&[1.0, 0.8, 0.5]);
        let solver = CcdSolver::new(SolverConfig {
            freeze_pre_effector: true,
            ..Default::default()
        });

        solver.solve(&mut chain, &Point3::new(0.9, 0.0, 0.9));

        let pre_effector = chain.end_effector_index() - 1;
        assert_eq!(chain.angle(pre_effector).unwrap(), 0.0);
        assert_ne!(chain.angle(1).unwrap(), 0.0);
    }

    #[test]
    fn test_other_axes() {
        // Same planar arm turning about Z with links along X
        let mut chain = KinematicChain::new(vec![
            Joint::new("root"),
            Joint::new("shoulder").with_axis(JointAxis::Z),
            Joint::new("elbow").with_offset(1.0, 0.0, 0.0).with_axis(JointAxis::Z),
            Joint::new("tip").with_offset(0.8, 0.0, 0.0),
        ])
        .unwrap();

        let target = Point3::new(0.5, 1.0, 0.0);
        assert!(CcdSolver::default().solve(&mut chain, &target));
        assert!((chain.end_effector_position() - target).norm() < 0.01);
    }

    #[test]
    fn test_single_joint_chain() {
        let mut chain = KinematicChain::new(vec![Joint::new("only")]).unwrap();
        assert!(CcdSolver::default().solve(&mut chain, &Point3::origin()));
        assert!(!CcdSolver::default().solve(&mut chain, &Point3::new(1.0, 0.0, 0.0)));
    }
}
