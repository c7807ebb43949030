//! Laser tracing.
//!
//! A laser walks point by point until it strikes a block or leaves the
//! board. Striking a block never bends the laser in place; instead the
//! interaction emits new lasers, so the full set of lasers on a board is a
//! fixed point computed with a worklist.

use rustc_hash::FxHashSet;

use crate::block::BlockType;
use crate::geometry::{advance, entered_block, point_in_bounds, reflect, Direction, Point};
use crate::grid::Board;

/// A ray starting at `origin` and moving by `direction` each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Laser {
    pub origin: Point,
    pub direction: Direction,
}

impl Laser {
    #[inline]
    pub const fn new(origin: Point, direction: Direction) -> Self {
        Self { origin, direction }
    }
}

/// The result of tracing one laser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    /// Points the laser passes through, starting at its origin.
    pub path: Vec<Point>,
    /// Lasers emitted where this one struck a block.
    pub spawned: Vec<Laser>,
    /// `false` if a block stopped the laser, `true` if it left the board.
    pub open: bool,
}

/// Traces a single laser across a board.
pub fn trace(laser: Laser, board: &Board) -> Trace {
    let Laser {
        origin: mut point,
        direction,
    } = laser;
    let mut path = Vec::new();
    let mut spawned = Vec::new();
    let mut open = true;

    // a stationary laser would never leave its cell
    if direction == (0, 0) {
        return Trace {
            path: vec![point],
            spawned,
            open,
        };
    }

    loop {
        path.push(point);

        let Some(block_type) = board.get(entered_block(point, direction)) else {
            break;
        };

        match block_type {
            BlockType::Reflect => {
                spawned.push(Laser::new(point, reflect(point, direction)));
                open = false;
                break;
            }
            BlockType::Opaque => {
                open = false;
                break;
            }
            BlockType::Refract => {
                spawned.push(Laser::new(point, reflect(point, direction)));
                spawned.push(Laser::new(advance(point, direction), direction));
                open = false;
                break;
            }
            BlockType::Empty | BlockType::FixedBlocker => {}
        }

        point = advance(point, direction);
        if !point_in_bounds(point, board.rows(), board.cols()) {
            break;
        }
    }

    Trace {
        path,
        spawned,
        open,
    }
}

impl Board {
    /// Traces every laser active on this board, sources and spawned alike.
    ///
    /// Each distinct laser is traced exactly once. The result is in
    /// discovery order, which is deterministic for a given board.
    pub fn trace_all(&self) -> Vec<(Laser, Trace)> {
        let mut queue: Vec<Laser> = self.sources().iter().rev().copied().collect();
        let mut known: FxHashSet<Laser> = FxHashSet::default();
        let mut traced = Vec::new();

        while let Some(laser) = queue.pop() {
            if !known.insert(laser) {
                continue;
            }
            let trace = trace(laser, self);
            // reversed so the first spawned laser is popped first
            queue.extend(trace.spawned.iter().rev().copied());
            traced.push((laser, trace));
        }

        traced
    }

    /// Every distinct laser active on this board.
    pub fn all_lasers(&self) -> FxHashSet<Laser> {
        self.trace_all().into_iter().map(|(laser, _)| laser).collect()
    }
}
