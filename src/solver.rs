//! Breadth-first placement search.
//!
//! Each search state is a [`Board`]; a step places one block from inventory.
//! After every placement all lasers are re-traced to find which points they
//! cover. Boards whose grid was already seen are skipped, so each grid
//! layout is expanded at most once.
//!
//! While the checkpoints are not yet covered, reflect and refract blocks are
//! only tried in cells a laser currently passes into. This keeps the
//! branching factor small but it is a heuristic: a puzzle whose only
//! solutions need a block placed away from every current laser is missed.

use std::collections::{BTreeSet, VecDeque};

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::block::BlockType;
use crate::geometry::{entered_block, Block, Point};
use crate::grid::{Board, GridKey};

/// Search settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Stop after expanding this many boards. `None` searches exhaustively.
    pub max_states: Option<usize>,
    /// Log a progress event each time the search reaches a deeper generation.
    pub trace_progress: bool,
}

/// Counters collected during a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Boards taken off the queue and evaluated.
    pub expanded: usize,
    /// Boards put on the queue, including the start board.
    pub enqueued: usize,
    /// Child boards dropped because their grid was already visited.
    pub duplicates: usize,
}

/// How a search ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A board with every checkpoint covered and no blocks left to place.
    Solved { board: Board, stats: SolveStats },
    /// Every reachable board was expanded without finding a solution.
    NoSolution { stats: SolveStats },
    /// `max_states` boards were expanded without finding a solution.
    BudgetExhausted { stats: SolveStats },
}

impl SolveOutcome {
    /// The solved board, if any.
    pub fn solution(&self) -> Option<&Board> {
        match self {
            SolveOutcome::Solved { board, .. } => Some(board),
            SolveOutcome::NoSolution { .. } | SolveOutcome::BudgetExhausted { .. } => None,
        }
    }

    pub fn into_solution(self) -> Option<Board> {
        match self {
            SolveOutcome::Solved { board, .. } => Some(board),
            SolveOutcome::NoSolution { .. } | SolveOutcome::BudgetExhausted { .. } => None,
        }
    }

    pub fn stats(&self) -> &SolveStats {
        match self {
            SolveOutcome::Solved { stats, .. }
            | SolveOutcome::NoSolution { stats }
            | SolveOutcome::BudgetExhausted { stats } => stats,
        }
    }
}

/// Laser coverage of one board.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Every point on the path of any active laser.
    pub coverage: FxHashSet<Point>,
    /// Whether `coverage` includes every checkpoint.
    pub completed: bool,
    /// Empty blocks some laser is about to enter along its path.
    laser_adjacent: BTreeSet<Block>,
}

/// Traces all lasers on `board` and checks them against the checkpoints.
pub fn evaluate(board: &Board, checkpoints: &[Point]) -> Evaluation {
    let mut coverage = FxHashSet::default();
    let mut laser_adjacent = BTreeSet::new();

    for (laser, trace) in board.trace_all() {
        // the last point either faces a block that stopped the laser or the
        // board edge, so it never names a cell worth trying
        let leading = &trace.path[..trace.path.len().saturating_sub(1)];
        for &point in leading {
            let block = entered_block(point, laser.direction);
            if board.get(block) == Some(BlockType::Empty) {
                laser_adjacent.insert(block);
            }
        }
        coverage.extend(trace.path);
    }

    let completed = checkpoints.iter().all(|point| coverage.contains(point));
    Evaluation {
        coverage,
        completed,
        laser_adjacent,
    }
}

/// Cells worth trying for `block_type`, in row-major order.
///
/// Every empty cell once the checkpoints are covered or for opaque blocks;
/// otherwise only the empty cells a laser currently passes into.
pub fn candidate_cells(board: &Board, block_type: BlockType, evaluation: &Evaluation) -> Vec<Block> {
    if evaluation.completed || block_type == BlockType::Opaque {
        board.empty_blocks().collect()
    } else {
        evaluation.laser_adjacent.iter().copied().collect()
    }
}

/// Expands one board into every board reachable by a single placement.
///
/// The returned flag is whether `board` itself covers every checkpoint.
pub fn next_states(board: &Board, checkpoints: &[Point]) -> (Vec<Board>, bool) {
    let evaluation = evaluate(board, checkpoints);
    let mut children = Vec::new();

    for block_type in board.inventory().available() {
        for block in candidate_cells(board, block_type, &evaluation) {
            if board.get(block) != Some(BlockType::Empty) {
                continue;
            }
            children.push(board.with_block(block, block_type));
        }
    }

    (children, evaluation.completed)
}

/// Key for visited-state deduplication. See [`Board::canonical_key`].
#[inline]
pub fn canonical_key(board: &Board) -> GridKey {
    board.canonical_key()
}

/// Searches for a board that covers every checkpoint with all blocks placed.
///
/// Boards are expanded in breadth-first order, so a solution is found at
/// the shallowest depth it exists at. With no budget the search always
/// terminates: there are finitely many grids and each is expanded once.
#[tracing::instrument(skip_all, fields(rows = start.rows(), cols = start.cols(), checkpoints = checkpoints.len()))]
pub fn solve(start: &Board, checkpoints: &[Point], config: &SolverConfig) -> SolveOutcome {
    let to_place = start.inventory().total();
    info!(
        inventory = %start.inventory(),
        sources = start.sources().len(),
        "starting search"
    );

    let mut stats = SolveStats {
        enqueued: 1,
        ..SolveStats::default()
    };
    let mut visited: FxHashSet<GridKey> = FxHashSet::default();
    visited.insert(canonical_key(start));
    let mut queue = VecDeque::from([start.clone()]);
    let mut generation = 0;

    while let Some(board) = queue.pop_front() {
        if config.max_states.is_some_and(|limit| stats.expanded >= limit) {
            warn!(
                expanded = stats.expanded,
                queued = queue.len() + 1,
                "state budget exhausted"
            );
            return SolveOutcome::BudgetExhausted { stats };
        }

        let depth = to_place - board.inventory().total();
        if config.trace_progress && depth > generation {
            generation = depth;
            debug!(
                generation,
                expanded = stats.expanded,
                queued = queue.len() + 1,
                visited = visited.len(),
                "reached next generation"
            );
        }

        stats.expanded += 1;
        let (children, completed) = next_states(&board, checkpoints);

        if completed && board.is_exhausted() {
            info!(
                expanded = stats.expanded,
                visited = visited.len(),
                "found solution"
            );
            return SolveOutcome::Solved { board, stats };
        }

        for child in children {
            if visited.insert(canonical_key(&child)) {
                stats.enqueued += 1;
                queue.push_back(child);
            } else {
                stats.duplicates += 1;
            }
        }
    }

    info!(
        expanded = stats.expanded,
        visited = visited.len(),
        "search space exhausted without a solution"
    );
    SolveOutcome::NoSolution { stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Inventory;
    use crate::laser::Laser;

    const SOURCE: Laser = Laser::new((0, 2), (1, -1));

    fn single_reflect_board() -> Board {
        Board::empty(2, 2, Inventory::new(1, 0, 0), [SOURCE])
    }

    #[test]
    fn test_evaluate_coverage_and_completion() {
        let board = single_reflect_board();
        let evaluation = evaluate(&board, &[(2, 0)]);
        let expected: FxHashSet<Point> = [(0, 2), (1, 1), (2, 0)].into_iter().collect();
        assert_eq!(evaluation.coverage, expected);
        assert!(evaluation.completed);

        assert!(!evaluate(&board, &[(2, 0), (4, 4)]).completed);
        // no checkpoints is trivially complete
        assert!(evaluate(&board, &[]).completed);
    }

    #[test]
    fn test_candidates_follow_lasers_until_completed() {
        let board = single_reflect_board();
        let evaluation = evaluate(&board, &[(4, 4)]);
        assert!(!evaluation.completed);

        // the laser crosses (0, 1) and (0, 0); the last point's block is not counted
        assert_eq!(
            candidate_cells(&board, BlockType::Reflect, &evaluation),
            vec![(0, 0), (0, 1)]
        );
        assert_eq!(
            candidate_cells(&board, BlockType::Opaque, &evaluation),
            vec![(0, 0), (0, 1), (1, 0), (1, 1)]
        );

        let evaluation = evaluate(&board, &[(2, 0)]);
        assert_eq!(
            candidate_cells(&board, BlockType::Refract, &evaluation),
            vec![(0, 0), (0, 1), (1, 0), (1, 1)]
        );
    }

    #[test]
    fn test_next_states_places_each_available_type() {
        let board = Board::empty(2, 2, Inventory::new(1, 1, 0), [SOURCE]);
        let (children, completed) = next_states(&board, &[(4, 4)]);
        assert!(!completed);
        // two laser-adjacent reflect placements plus four opaque placements
        assert_eq!(children.len(), 6);
        for child in &children {
            assert_eq!(child.inventory().total(), 1);
            assert_eq!(child.empty_blocks().count(), 3);
        }
        assert_eq!(children[0].get((0, 0)), Some(BlockType::Reflect));
        assert_eq!(children[2].get((0, 0)), Some(BlockType::Opaque));
    }

    #[test]
    fn test_next_states_reports_parent_completion() {
        let board = single_reflect_board();
        let (children, completed) = next_states(&board, &[(2, 0)]);
        assert!(completed);
        assert_eq!(children.len(), 4);
    }

    #[test]
    fn test_solve_places_reflect_keeping_checkpoint() {
        let board = single_reflect_board();
        let checkpoints = [(2, 0)];
        let outcome = solve(&board, &checkpoints, &SolverConfig::default());

        let solution = outcome.solution().expect("fixture is solvable");
        assert_eq!(solution.inventory().get(BlockType::Reflect), 0);
        assert_eq!(solution.empty_blocks().count(), 3);
        assert!(evaluate(solution, &checkpoints).coverage.contains(&(2, 0)));
        // row-major candidate order reaches (1, 0) before (1, 1)
        assert_eq!(solution.get((1, 0)), Some(BlockType::Reflect));
    }

    #[test]
    fn test_solve_reports_unsolvable() {
        let board = Board::empty(2, 2, Inventory::default(), [SOURCE]);
        let outcome = solve(&board, &[(4, 4)], &SolverConfig::default());
        assert_eq!(
            outcome,
            SolveOutcome::NoSolution {
                stats: SolveStats {
                    expanded: 1,
                    enqueued: 1,
                    duplicates: 0
                }
            }
        );
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn test_solve_never_revisits_a_grid() {
        // two opaque blocks on a 2x2 grid: placements in either order reach
        // the same six grids, which must each be queued once
        let board = Board::empty(2, 2, Inventory::new(0, 2, 0), [SOURCE]);
        let outcome = solve(&board, &[(4, 4)], &SolverConfig::default());
        let stats = *outcome.stats();
        assert!(outcome.solution().is_none());
        assert_eq!(stats.enqueued, 1 + 4 + 6);
        assert_eq!(stats.expanded, stats.enqueued);
        assert_eq!(stats.duplicates, 4 * 3 - 6);
    }

    #[test]
    fn test_solve_respects_budget() {
        let board = Board::empty(2, 2, Inventory::new(0, 2, 0), [SOURCE]);
        let config = SolverConfig {
            max_states: Some(3),
            trace_progress: true,
        };
        let outcome = solve(&board, &[(4, 4)], &config);
        assert!(matches!(outcome, SolveOutcome::BudgetExhausted { .. }));
        assert_eq!(outcome.stats().expanded, 3);

        let config = SolverConfig {
            max_states: Some(0),
            trace_progress: false,
        };
        let outcome = solve(&single_reflect_board(), &[(2, 0)], &config);
        assert!(outcome.solution().is_none());
        assert_eq!(outcome.stats().expanded, 0);
    }

    #[test]
    fn test_canonical_key_matches_board_key() {
        let board = single_reflect_board();
        assert_eq!(canonical_key(&board), board.canonical_key());
    }
}
