//! Grid algorithms for the maze-tracking arm
//!
//! Pure computation with no I/O: the caller owns every input and output.
//!
//! # Available Algorithms
//!
//! - **maze**: randomized depth-first grid carving with an explicit stack
//! - **astar**: A* shortest path over 4-connected open cells

pub mod astar;
pub mod maze;
