//! A* Pathfinding over open grid cells
//!
//! Optimal shortest-path search on the 4-connected adjacency induced by a set
//! of open cells: two cells are neighbours when their Manhattan distance is
//! exactly one. Every step costs one.
//!
//! # Features
//!
//! - Manhattan, Euclidean or zero (Dijkstra) heuristic, all admissible here
//! - Binary-heap frontier with stale-entry skipping
//! - Expanded node count per query for diagnostics
//!
//! # Example
//!
//! ```rust
//! use mazearm_core::algorithms::astar::AStar;
//! use mazearm_core::algorithms::maze::GridCell;
//!
//! let cells: Vec<GridCell> = (0..3)
//!     .flat_map(|y| (0..3).map(move |x| GridCell::new(x, y)))
//!     .collect();
//!
//! let mut astar = AStar::new();
//! let path = astar.find_path(&cells, &GridCell::new(0, 0), &GridCell::new(2, 2));
//! assert_eq!(path.len(), 5);
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::algorithms::maze::GridCell;

/// Heuristic function type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
    /// No estimate; the search degrades to Dijkstra
    Zero,
}

impl Heuristic {
    fn estimate(&self, from: (i32, i32), to: (i32, i32)) -> f64 {
        let dx = (from.0 - to.0) as f64;
        let dy = (from.1 - to.1) as f64;
        match self {
            Heuristic::Manhattan => dx.abs() + dy.abs(),
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Zero => 0.0,
        }
    }
}

/// Frontier entry, ordered so `BinaryHeap` pops the lowest estimated total first
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    index: usize,
    g_cost: u32,
    f_cost: f64,
    /// Insertion order, for a stable tie-break among equal estimates
    sequence: u64,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* planner over a list of open cells
#[derive(Debug, Clone, Default)]
pub struct AStar {
    heuristic: Heuristic,
    last_expanded: usize,
}

impl AStar {
    /// Create a planner with the Manhattan heuristic
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heuristic(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            last_expanded: 0,
        }
    }

    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        self.heuristic = heuristic;
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Nodes popped and expanded by the most recent query
    pub fn last_expanded(&self) -> usize {
        self.last_expanded
    }

    /// Shortest 4-connected path from `start` to `goal` through `cells`.
    ///
    /// Cells are matched by coordinate. The returned cells are the entries of
    /// `cells`, start first and goal last. Empty when there is no path or
    /// when `start` or `goal` is not one of the cells.
    pub fn find_path(&mut self, cells: &[GridCell], start: &GridCell, goal: &GridCell) -> Vec<GridCell> {
        self.last_expanded = 0;

        let index: HashMap<(i32, i32), usize> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell.coord(), i))
            .collect();

        let (Some(&start_idx), Some(&goal_idx)) = (index.get(&start.coord()), index.get(&goal.coord())) else {
            debug!(
                "Start {:?} or goal {:?} is not an open cell",
                start.coord(),
                goal.coord()
            );
            return Vec::new();
        };

        let goal_coord = cells[goal_idx].coord();

        // Query-scoped bookkeeping, indexed like `cells`
        let mut g_score = vec![u32::MAX; cells.len()];
        let mut came_from: Vec<Option<usize>> = vec![None; cells.len()];
        let mut open_set = BinaryHeap::new();
        let mut sequence = 0u64;

        g_score[start_idx] = 0;
        open_set.push(FrontierEntry {
            index: start_idx,
            g_cost: 0,
            f_cost: self.heuristic.estimate(cells[start_idx].coord(), goal_coord),
            sequence,
        });

        while let Some(current) = open_set.pop() {
            // Skip entries superseded by a cheaper route
            if current.g_cost > g_score[current.index] {
                continue;
            }

            self.last_expanded += 1;

            if current.index == goal_idx {
                let path = Self::reconstruct_path(cells, &came_from, goal_idx);
                debug!(
                    "Path found: {} cells, {} nodes expanded",
                    path.len(),
                    self.last_expanded
                );
                return path;
            }

            let (x, y) = cells[current.index].coord();
            for neighbor in [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
                let Some(&neighbor_idx) = index.get(&neighbor) else {
                    continue;
                };

                let tentative_g = current.g_cost + 1;
                if tentative_g < g_score[neighbor_idx] {
                    came_from[neighbor_idx] = Some(current.index);
                    g_score[neighbor_idx] = tentative_g;
                    sequence += 1;
                    open_set.push(FrontierEntry {
                        index: neighbor_idx,
                        g_cost: tentative_g,
                        f_cost: tentative_g as f64 + self.heuristic.estimate(neighbor, goal_coord),
                        sequence,
                    });
                }
            }
        }

        trace!(
            "No path from {:?} to {:?} after expanding {} nodes",
            start.coord(),
            goal_coord,
            self.last_expanded
        );
        Vec::new()
    }

    fn reconstruct_path(cells: &[GridCell], came_from: &[Option<usize>], goal_idx: usize) -> Vec<GridCell> {
        let mut path = vec![cells[goal_idx]];
        let mut current = goal_idx;
        while let Some(previous) = came_from[current] {
            path.push(cells[previous]);
            current = previous;
        }
        path.reverse();
        path
    }

    /// Number of unit steps in a path
    pub fn path_steps(path: &[GridCell]) -> usize {
        path.len().saturating_sub(1)
    }
}

/// Shortest path with the default Manhattan heuristic
pub fn find_path(cells: &[GridCell], start: &GridCell, goal: &GridCell) -> Vec<GridCell> {
    AStar::new().find_path(cells, start, goal)
}
