//! Laser Puzzle Solver Library
//!
//! Places a fixed inventory of reflect, opaque and refract blocks on a grid
//! so that the lasers bouncing through it pass every checkpoint.

pub mod block;
pub mod geometry;
pub mod grid;
pub mod laser;
pub mod reader;
pub mod solver;

use geometry::Point;
use grid::Board;
use solver::{SolveOutcome, SolverConfig};

/// A loaded puzzle: the starting board and the points lasers must cross.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    pub board: Board,
    /// Sorted, without duplicates.
    pub checkpoints: Vec<Point>,
}

impl Puzzle {
    /// Searches for a placement of the whole inventory that covers every checkpoint.
    pub fn solve(&self, config: &SolverConfig) -> SolveOutcome {
        solver::solve(&self.board, &self.checkpoints, config)
    }

    /// Formats `board` along with which of this puzzle's checkpoints it covers.
    pub fn describe(&self, board: &Board) -> String {
        let evaluation = solver::evaluate(board, &self.checkpoints);
        let mut output = board.format();

        let covered = self
            .checkpoints
            .iter()
            .filter(|&point| evaluation.coverage.contains(point))
            .count();
        output.push_str(&format!(
            "checkpoints: {covered}/{} covered\n",
            self.checkpoints.len()
        ));
        for &(x, y) in &self.checkpoints {
            if !evaluation.coverage.contains(&(x, y)) {
                output.push_str(&format!("  missing ({x}, {y})\n"));
            }
        }
        output.push_str(&format!("lasers: {}\n", board.trace_all().len()));
        output
    }
}
