//! Loader for `.bff` puzzle files.
//!
//! ```text
//! # comment
//! GRID START
//! o B o
//! o o x
//! GRID STOP
//! A 2
//! C 1
//! L 2 5 1 -1
//! P 3 0
//! ```
//!
//! Grid rows are listed top to bottom, so the file's column index is a
//! block's first coordinate and its line index the second. Outside the grid,
//! `A`/`B`/`C` set the reflect/opaque/refract inventory, `L x y dx dy` adds a
//! laser source and `P x y` adds a checkpoint.
//!
//! Unknown directives are an error rather than skipped, so a typo in a
//! puzzle file is reported instead of silently dropping a laser or block.
//! Laser origins must lie in the board's point space, and the inventory may
//! not hold more blocks than there are empty cells to put them in.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::block::{BlockType, Inventory};
use crate::geometry::point_in_bounds;
use crate::grid::Board;
use crate::laser::Laser;
use crate::Puzzle;

const GRID_START: &str = "GRID START";
const GRID_STOP: &str = "GRID STOP";

/// Why a puzzle could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: unknown grid cell {token:?}")]
    UnknownCell { line: usize, token: String },
    #[error("line {line}: unknown directive {token:?}")]
    UnknownDirective { line: usize, token: String },
    #[error("line {line}: {directive} takes {expected} arguments, found {found}")]
    ArgumentCount {
        line: usize,
        directive: char,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {token:?} is not a valid number")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: laser direction ({dx}, {dy}) must be a non-zero step of -1, 0 or 1")]
    InvalidDirection { line: usize, dx: i32, dy: i32 },
    #[error("line {line}: grid row has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: GRID START without a matching GRID STOP")]
    UnterminatedGrid { line: usize },
    #[error("line {line}: unexpected {token:?}")]
    UnexpectedMarker { line: usize, token: &'static str },
    #[error("puzzle has no grid")]
    MissingGrid,
    #[error("line {line}: laser origin ({x}, {y}) is outside the points of a {rows}x{cols} grid")]
    SourceOutOfBounds {
        line: usize,
        x: i32,
        y: i32,
        rows: usize,
        cols: usize,
    },
    #[error("inventory holds {requested} blocks but the grid has only {empty} empty cells")]
    TooManyBlocks { requested: u64, empty: usize },
}

/// Reads and parses a puzzle file.
#[tracing::instrument]
pub fn read(path: &Path) -> Result<Puzzle, ReadError> {
    let input = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&input)
}

/// Parses puzzle text.
pub fn parse(input: &str) -> Result<Puzzle, ReadError> {
    // file rows, i.e. indexed [y][x]
    let mut file_rows: Vec<Vec<BlockType>> = Vec::new();
    let mut inventory = Inventory::default();
    let mut sources = Vec::new();
    let mut checkpoints = Vec::new();

    let mut grid_opened_at = None;
    let mut grid_seen = false;

    for (line_index, raw_line) in input.lines().enumerate() {
        let line = line_index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed == GRID_START {
            if grid_opened_at.is_some() || grid_seen {
                return Err(ReadError::UnexpectedMarker {
                    line,
                    token: GRID_START,
                });
            }
            grid_opened_at = Some(line);
            continue;
        }
        if trimmed == GRID_STOP {
            if grid_opened_at.take().is_none() {
                return Err(ReadError::UnexpectedMarker {
                    line,
                    token: GRID_STOP,
                });
            }
            grid_seen = true;
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        if grid_opened_at.is_some() {
            let row = tokens
                .iter()
                .map(|&token| parse_cell(token, line))
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(first) = file_rows.first() {
                if first.len() != row.len() {
                    return Err(ReadError::RaggedRow {
                        line,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            file_rows.push(row);
            continue;
        }

        let (directive, args) = match tokens.split_first() {
            Some((&directive, args)) => (directive, args),
            None => continue,
        };
        match directive {
            "A" | "B" | "C" => {
                let [count] = numbers::<1>(directive, args, line)?;
                let count = u32::try_from(count).map_err(|_| ReadError::InvalidNumber {
                    line,
                    token: args[0].to_string(),
                })?;
                let block_type = match directive {
                    "A" => BlockType::Reflect,
                    "B" => BlockType::Opaque,
                    _ => BlockType::Refract,
                };
                inventory.set(block_type, count);
            }
            "L" => {
                let [x, y, dx, dy] = numbers::<4>(directive, args, line)?;
                if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) || (dx, dy) == (0, 0) {
                    return Err(ReadError::InvalidDirection { line, dx, dy });
                }
                sources.push((line, Laser::new((x, y), (dx, dy))));
            }
            "P" => {
                let [x, y] = numbers::<2>(directive, args, line)?;
                checkpoints.push((x, y));
            }
            _ => {
                return Err(ReadError::UnknownDirective {
                    line,
                    token: directive.to_string(),
                })
            }
        }
    }

    if let Some(line) = grid_opened_at {
        return Err(ReadError::UnterminatedGrid { line });
    }

    let height = file_rows.len();
    let width = file_rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(ReadError::MissingGrid);
    }

    // transpose so the file's x axis becomes the board's first index
    let mut cells = Vec::with_capacity(width * height);
    for x in 0..width {
        for row in &file_rows {
            cells.push(row[x]);
        }
    }

    for &(line, laser) in &sources {
        let (x, y) = laser.origin;
        if !point_in_bounds((x, y), width, height) {
            return Err(ReadError::SourceOutOfBounds {
                line,
                x,
                y,
                rows: width,
                cols: height,
            });
        }
    }

    let empty = cells.iter().filter(|&&cell| cell == BlockType::Empty).count();
    let requested = inventory.total();
    if requested > empty as u64 {
        return Err(ReadError::TooManyBlocks { requested, empty });
    }

    checkpoints.sort_unstable();
    checkpoints.dedup();

    Ok(Puzzle {
        board: Board::new(
            width,
            height,
            cells,
            inventory,
            sources.into_iter().map(|(_, laser)| laser),
        ),
        checkpoints,
    })
}

fn parse_cell(token: &str, line: usize) -> Result<BlockType, ReadError> {
    let mut chars = token.chars();
    let block_type = match (chars.next(), chars.next()) {
        (Some(symbol), None) => BlockType::from_symbol(symbol),
        _ => None,
    };
    block_type.ok_or_else(|| ReadError::UnknownCell {
        line,
        token: token.to_string(),
    })
}

fn numbers<const N: usize>(directive: &str, args: &[&str], line: usize) -> Result<[i32; N], ReadError> {
    if args.len() != N {
        return Err(ReadError::ArgumentCount {
            line,
            directive: directive.chars().next().unwrap_or('?'),
            expected: N,
            found: args.len(),
        });
    }
    let mut values = [0; N];
    for (value, token) in values.iter_mut().zip(args) {
        *value = token.parse().map_err(|_| ReadError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(values)
}
