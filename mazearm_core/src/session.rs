//! Per-frame tracking loop
//!
//! A [`TrackingSession`] owns the arm, the waypoint driver and the solver.
//! The host calls [`TrackingSession::advance_waypoint`] on the waypoint
//! interval and [`TrackingSession::update`] once per frame; every update
//! re-solves toward the current target, so the arm keeps tracking it between
//! waypoint changes.

use nalgebra::Point3;
use tracing::{debug, info};

use crate::algorithms::maze::GridCell;
use crate::config::{DriverConfig, SolverConfig};
use crate::driver::WaypointDriver;
use crate::kinematics::{CcdSolver, KinematicChain, SolveReport};
use crate::recording::JointAngleSink;

#[derive(Debug)]
pub struct TrackingSession {
    chain: KinematicChain,
    driver: WaypointDriver,
    solver: CcdSolver,
    frame: u64,
}

impl TrackingSession {
    pub fn new(
        chain: KinematicChain,
        path: Vec<GridCell>,
        driver_config: &DriverConfig,
        solver_config: SolverConfig,
    ) -> Self {
        info!(
            "Tracking session: {} joints, {} waypoints",
            chain.len(),
            path.len()
        );
        Self {
            chain,
            driver: WaypointDriver::new(path, driver_config.cell_size),
            solver: CcdSolver::new(solver_config),
            frame: 0,
        }
    }

    /// Issue the next waypoint; `None` on the wraparound tick
    pub fn advance_waypoint(&mut self) -> Option<Point3<f64>> {
        let target = self.driver.tick();
        match target {
            Some(t) => debug!(
                "Waypoint {} -> ({:.3}, {:.3}, {:.3})",
                self.driver.index(),
                t.x,
                t.y,
                t.z
            ),
            None => debug!("Waypoint path wrapped"),
        }
        target
    }

    /// Solve toward the current target, if one has been issued
    pub fn update(&mut self) -> Option<SolveReport> {
        self.frame += 1;
        let target = self.driver.current_target()?;
        Some(self.solver.solve_detailed(&mut self.chain, &target))
    }

    /// [`update`](Self::update), then hand the resulting angles, target and
    /// solve outcome to `sink`
    pub fn update_and_publish<S: JointAngleSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Option<SolveReport> {
        let frame = self.frame;
        let report = self.update();
        sink.publish_solve(
            frame,
            &self.chain.angles(),
            self.current_target(),
            report.as_ref(),
        );
        report
    }

    pub fn current_target(&self) -> Option<Point3<f64>> {
        self.driver.current_target()
    }

    pub fn chain(&self) -> &KinematicChain {
        &self.chain
    }

    pub fn driver(&self) -> &WaypointDriver {
        &self.driver
    }

    pub fn solver(&self) -> &CcdSolver {
        &self.solver
    }

    /// Frames updated so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
