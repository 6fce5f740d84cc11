//! Waypoint driver
//!
//! Replays a planned path one cell per tick, mapping each cell to a world
//! point for the arm to reach. After the last waypoint the next tick resets to
//! the start and issues nothing, so the last target is held for one interval
//! before the replay begins again.

use nalgebra::Point3;

use crate::algorithms::maze::GridCell;

/// World point for a grid cell: `(x * size, size / 2, y * size)`
pub fn cell_to_world(cell: &GridCell, cell_size: f64) -> Point3<f64> {
    Point3::new(
        cell.x as f64 * cell_size,
        cell_size / 2.0,
        cell.y as f64 * cell_size,
    )
}

#[derive(Debug, Clone)]
pub struct WaypointDriver {
    path: Vec<GridCell>,
    cell_size: f64,
    index: usize,
    current_target: Option<Point3<f64>>,
}

impl WaypointDriver {
    pub fn new(path: Vec<GridCell>, cell_size: f64) -> Self {
        Self {
            path,
            cell_size,
            index: 0,
            current_target: None,
        }
    }

    /// Advance one waypoint.
    ///
    /// Returns the new target, or `None` on the wraparound tick (and always
    /// for an empty path).
    pub fn tick(&mut self) -> Option<Point3<f64>> {
        match self.path.get(self.index) {
            Some(cell) => {
                let target = cell_to_world(cell, self.cell_size);
                self.index += 1;
                self.current_target = Some(target);
                Some(target)
            }
            None => {
                self.index = 0;
                None
            }
        }
    }

    /// Most recently issued target
    pub fn current_target(&self) -> Option<Point3<f64>> {
        self.current_target
    }

    /// Index of the next waypoint to issue
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &[GridCell] {
        &self.path
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.current_target = None;
    }
}
