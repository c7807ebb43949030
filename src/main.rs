//! Laser Puzzle Solver
//!
//! Places reflect, opaque and refract blocks on a grid so that every
//! checkpoint lies on some laser's path. Puzzles are read from `.bff`
//! files; solutions are printed as text or shown in an interactive 3D
//! viewer.

mod visualization;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use lazor::reader;
use lazor::solver::{SolveOutcome, SolverConfig};
use lazor::Puzzle;

/// Solves laser puzzles and visualizes the solutions.
#[derive(Parser)]
#[command(name = "lazor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more detail (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle and print the solved board.
    Solve {
        /// Puzzle file in .bff format.
        file: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print a puzzle and the checkpoints its lasers already cover.
    Show {
        /// Puzzle file in .bff format.
        file: PathBuf,
    },
    /// Solve a puzzle and show it in an interactive 3D viewer.
    Display {
        /// Puzzle file in .bff format.
        file: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Give up after expanding this many boards.
    #[arg(long)]
    max_states: Option<usize>,
    /// Log each new search generation (shown with -v).
    #[arg(long)]
    progress: bool,
}

impl From<&SearchArgs> for SolverConfig {
    fn from(args: &SearchArgs) -> Self {
        SolverConfig {
            max_states: args.max_states,
            trace_progress: args.progress,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Solve { file, search } => run_solve(&file, &SolverConfig::from(&search)),
        Command::Show { file } => run_show(&file),
        Command::Display { file, search } => run_display(&file, &SolverConfig::from(&search)),
    }
}

/// Loads a puzzle, reporting failures on stderr.
fn load(file: &Path) -> Option<Puzzle> {
    match reader::read(file) {
        Ok(puzzle) => Some(puzzle),
        Err(e) => {
            eprintln!("Failed to load {}: {}", file.display(), e);
            None
        }
    }
}

/// Prints the outcome of a search. Returns the exit code it implies.
fn report(puzzle: &Puzzle, outcome: &SolveOutcome) -> ExitCode {
    let stats = outcome.stats();
    match outcome {
        SolveOutcome::Solved { board, .. } => {
            print!("{}", puzzle.describe(board));
            println!(
                "Solved after expanding {} boards ({} queued, {} duplicates skipped)",
                stats.expanded, stats.enqueued, stats.duplicates
            );
            ExitCode::SUCCESS
        }
        SolveOutcome::NoSolution { .. } => {
            eprintln!("No solution after expanding {} boards", stats.expanded);
            ExitCode::FAILURE
        }
        SolveOutcome::BudgetExhausted { .. } => {
            eprintln!(
                "Gave up after expanding {} boards; raise --max-states to search further",
                stats.expanded
            );
            ExitCode::FAILURE
        }
    }
}

fn run_solve(file: &Path, config: &SolverConfig) -> ExitCode {
    let Some(puzzle) = load(file) else {
        return ExitCode::FAILURE;
    };
    let outcome = puzzle.solve(config);
    report(&puzzle, &outcome)
}

fn run_show(file: &Path) -> ExitCode {
    let Some(puzzle) = load(file) else {
        return ExitCode::FAILURE;
    };
    print!("{}", puzzle.describe(&puzzle.board));
    ExitCode::SUCCESS
}

/// Solves a puzzle, then shows the start board and any solution in the viewer.
fn run_display(file: &Path, config: &SolverConfig) -> ExitCode {
    let Some(puzzle) = load(file) else {
        return ExitCode::FAILURE;
    };
    let outcome = puzzle.solve(config);
    let exit_code = report(&puzzle, &outcome);

    let mut boards = vec![("Puzzle".to_string(), puzzle.board.clone())];
    if let Some(solution) = outcome.into_solution() {
        boards.push(("Solution".to_string(), solution));
    }
    println!("Controls: Left/Right switch board, R reset view");
    visualization::display(boards, &puzzle.checkpoints);
    exit_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_args_become_config() {
        let cli = Cli::try_parse_from([
            "lazor",
            "-vv",
            "solve",
            "puzzles/mad_1.bff",
            "--max-states",
            "500",
            "--progress",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Solve { file, search } = cli.command else {
            panic!("expected the solve subcommand");
        };
        assert_eq!(file, PathBuf::from("puzzles/mad_1.bff"));
        assert_eq!(
            SolverConfig::from(&search),
            SolverConfig {
                max_states: Some(500),
                trace_progress: true,
            }
        );
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["lazor"]).is_err());
    }
}
