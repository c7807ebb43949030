//! End-to-end tests: load `.bff` fixtures from `puzzles/` and solve them.

use std::path::PathBuf;

use rstest::rstest;

use lazor::block::BlockType;
use lazor::reader;
use lazor::solver::{self, SolveOutcome, SolveStats, SolverConfig};
use lazor::Puzzle;

fn load(name: &str) -> Puzzle {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "puzzles", name].iter().collect();
    reader::read(&path).unwrap()
}

#[rstest]
#[case("corner.bff")]
#[case("walled.bff")]
#[case("mad_1.bff")]
fn test_solution_covers_checkpoints_with_full_inventory_used(#[case] name: &str) {
    let puzzle = load(name);
    let outcome = puzzle.solve(&SolverConfig::default());
    let solution = outcome.solution().expect("fixture is solvable");

    assert!(solution.is_exhausted());
    let evaluation = solver::evaluate(solution, &puzzle.checkpoints);
    assert!(evaluation.completed);
    for checkpoint in &puzzle.checkpoints {
        assert!(evaluation.coverage.contains(checkpoint));
    }

    // only empty cells of the start board changed, each to a placeable type
    for ((block, start), (_, solved)) in puzzle.board.blocks().zip(solution.blocks()) {
        if start != solved {
            assert_eq!(start, BlockType::Empty, "{block:?} was overwritten");
            assert!(solved.is_placeable());
        }
    }
    let placed = puzzle.board.empty_blocks().count() - solution.empty_blocks().count();
    assert_eq!(placed as u64, puzzle.board.inventory().total());
}

#[test]
fn test_corner_solution() {
    let puzzle = load("corner.bff");
    let outcome = puzzle.solve(&SolverConfig::default());
    let solution = outcome.solution().unwrap();
    assert_eq!(solution.get((1, 0)), Some(BlockType::Reflect));
    insta::assert_snapshot!(puzzle.describe(solution), @r"
    .A
    ..
    inventory: A=0 B=0 C=0
    checkpoints: 1/1 covered
    lasers: 3
    ");
}

#[test]
fn test_walled_solution() {
    let puzzle = load("walled.bff");
    insta::assert_snapshot!(puzzle.describe(&puzzle.board), @r"
    ..x
    .B.
    ...
    inventory: A=1 B=0 C=1
    checkpoints: 0/2 covered
      missing (1, 0)
      missing (2, 3)
    lasers: 1
    ");

    let outcome = puzzle.solve(&SolverConfig::default());
    insta::assert_snapshot!(puzzle.describe(outcome.solution().unwrap()), @r"
    CAx
    .B.
    ...
    inventory: A=0 B=0 C=0
    checkpoints: 2/2 covered
    lasers: 5
    ");
}

#[test]
fn test_mad_1_solution() {
    let puzzle = load("mad_1.bff");
    let outcome = puzzle.solve(&SolverConfig::default());
    let SolveOutcome::Solved { board, stats } = outcome else {
        panic!("mad_1 should be solvable");
    };
    insta::assert_snapshot!(puzzle.describe(&board), @r"
    ..C.
    ...A
    A...
    ....
    inventory: A=0 B=0 C=0
    checkpoints: 4/4 covered
    lasers: 5
    ");
    assert_eq!(
        stats,
        SolveStats {
            expanded: 240,
            enqueued: 340,
            duplicates: 91
        }
    );
}

#[test]
fn test_unsolvable_exhausts_search() {
    let puzzle = load("unsolvable.bff");
    let outcome = puzzle.solve(&SolverConfig::default());
    assert!(matches!(outcome, SolveOutcome::NoSolution { .. }));
    // no duplicates are ever queued, so every queued board was expanded
    let stats = outcome.stats();
    assert_eq!(stats.expanded, stats.enqueued);
    assert_eq!(stats.expanded, 152);
}

#[test]
fn test_budget_stops_search_early() {
    let puzzle = load("mad_1.bff");
    let config = SolverConfig {
        max_states: Some(10),
        trace_progress: false,
    };
    let outcome = puzzle.solve(&config);
    assert!(matches!(outcome, SolveOutcome::BudgetExhausted { .. }));
    assert_eq!(outcome.stats().expanded, 10);
}

#[test]
fn test_solving_twice_gives_the_same_board() {
    let puzzle = load("mad_1.bff");
    let first = puzzle.solve(&SolverConfig::default()).into_solution();
    let second = puzzle.solve(&SolverConfig::default()).into_solution();
    assert!(first.is_some());
    assert_eq!(first, second);
}
