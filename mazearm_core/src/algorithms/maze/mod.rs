//! Randomized maze generation
//!
//! Carves a spanning tree over the even-coordinate sublattice of a grid with
//! a randomized depth-first search, starting from the origin cell. Every open
//! cell therefore has exactly one simple path back to `(0, 0)`.
//!
//! # Example
//!
//! ```rust
//! use mazearm_core::algorithms::maze::Grid;
//! use mazearm_core::config::GridConfig;
//!
//! let config = GridConfig { width: 11, height: 11, seed: Some(7) };
//! let grid = Grid::generate(&config).unwrap();
//!
//! let cells = grid.open_cells();
//! assert_eq!(cells.iter().filter(|c| c.is_goal).count(), 1);
//! assert!(grid.is_open(0, 0));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GridConfig;
use crate::error::{MazeArmError, MazeArmResult};

/// Up, right, down, left
const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// A traversable cell of a generated grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub is_goal: bool,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_goal: false,
        }
    }

    /// Grid coordinate, the identity used for adjacency and lookups
    pub fn coord(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn manhattan_distance(&self, other: &GridCell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Generated grid, immutable once carved
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    open: Vec<bool>,
}

/// One pending cell of the explicit carving stack
struct CarveFrame {
    x: i32,
    y: i32,
    directions: [(i32, i32); 4],
    next: usize,
}

impl CarveFrame {
    fn new<R: Rng + ?Sized>(x: i32, y: i32, rng: &mut R) -> Self {
        let mut directions = DIRECTIONS;
        directions.shuffle(rng);
        Self {
            x,
            y,
            directions,
            next: 0,
        }
    }
}

impl Grid {
    /// Generate a grid from configuration, seeding from entropy when no seed is given
    pub fn generate(config: &GridConfig) -> MazeArmResult<Self> {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let grid = Self::generate_with_rng(config.width, config.height, &mut rng)?;

        info!(
            "Generated {}x{} grid with {} open cells (seed: {:?})",
            grid.width,
            grid.height,
            grid.open_count(),
            config.seed
        );

        Ok(grid)
    }

    /// Generate a grid with a caller-supplied random source
    pub fn generate_with_rng<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> MazeArmResult<Self> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(MazeArmError::InvalidDimensions { width, height });
        }

        let mut grid = Self {
            width,
            height,
            open: vec![false; width * height],
        };
        grid.carve_from_origin(rng);

        Ok(grid)
    }

    /// Depth-first carve with an explicit stack.
    ///
    /// Each visited cell shuffles the four directions once and tries them in
    /// that order; a direction succeeds when the cell two steps away is in
    /// bounds and still closed.
    fn carve_from_origin<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut stack = Vec::with_capacity(self.open.len() / 2 + 1);
        let mut max_depth = 0;

        self.set_open(0, 0);
        stack.push(CarveFrame::new(0, 0, rng));

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                stack.pop();
                continue;
            }

            let (dx, dy) = frame.directions[frame.next];
            frame.next += 1;

            let (x, y) = (frame.x, frame.y);
            let (nx, ny) = (x + dx * 2, y + dy * 2);

            if self.in_bounds(nx, ny) && !self.is_open(nx, ny) {
                self.set_open(x + dx, y + dy);
                self.set_open(nx, ny);
                stack.push(CarveFrame::new(nx, ny, rng));
                max_depth = max_depth.max(stack.len());
            }
        }

        debug!("Carve finished, max stack depth {}", max_depth);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Whether `(x, y)` is an open cell; out-of-bounds cells are closed
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.open[y as usize * self.width + x as usize]
    }

    fn set_open(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            self.open[y as usize * self.width + x as usize] = true;
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|&&open| open).count()
    }

    /// All open cells in row-major scan order, the last one flagged as goal
    pub fn open_cells(&self) -> Vec<GridCell> {
        let mut cells = Vec::with_capacity(self.open_count());
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if self.is_open(x, y) {
                    cells.push(GridCell::new(x, y));
                }
            }
        }

        // The origin is always carved, so there is at least one cell
        if let Some(last) = cells.last_mut() {
            last.is_goal = true;
        }

        cells
    }

    /// The origin cell, where carving starts
    pub fn origin(&self) -> GridCell {
        GridCell::new(0, 0)
    }

    /// The goal cell: last open cell in row-major order
    pub fn goal(&self) -> GridCell {
        (0..self.height as i32)
            .rev()
            .flat_map(|y| (0..self.width as i32).rev().map(move |x| (x, y)))
            .find(|&(x, y)| self.is_open(x, y))
            .map(|(x, y)| GridCell {
                x,
                y,
                is_goal: true,
            })
            .unwrap_or_else(|| self.origin())
    }

    /// Text picture of the grid with an optional path drawn over it.
    ///
    /// `#` closed, `.` open, `*` path, `S` path start, `G` goal.
    pub fn render_ascii(&self, path: &[GridCell]) -> String {
        let goal = self.goal().coord();
        let start = path.first().map(GridCell::coord);

        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let ch = if Some((x, y)) == start {
                    'S'
                } else if (x, y) == goal {
                    'G'
                } else if path.iter().any(|c| c.coord() == (x, y)) {
                    '*'
                } else if self.is_open(x, y) {
                    '.'
                } else {
                    '#'
                };
                out.push(ch);
            }
            if y + 1 < self.height as i32 {
                out.push('\n');
            }
        }
        out
    }
}

/// Generate the open cells of a `width` x `height` grid.
///
/// Same seed, same cells.
pub fn generate(width: usize, height: usize, seed: Option<u64>) -> MazeArmResult<Vec<GridCell>> {
    let config = GridConfig {
        width,
        height,
        seed,
    };
    Ok(Grid::generate(&config)?.open_cells())
}
