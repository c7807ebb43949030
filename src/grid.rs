//! Board state: the block grid, the remaining inventory and the laser sources.
//!
//! The grid is a flat row-major buffer where block `(i, j)` lives at index
//! `i * cols + j`. Boards are cheap to clone per search step: the grid and
//! inventory are copied, the laser sources are shared.

use std::sync::Arc;

use thiserror::Error;

use crate::block::{BlockType, Inventory};
use crate::geometry::{block_in_bounds, Block};
use crate::laser::Laser;

/// Deduplication key for a board: its cells in row-major order.
pub type GridKey = Box<[BlockType]>;

/// A rejected block placement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("block {block:?} is outside the {rows}x{cols} grid")]
    OutOfBounds { block: Block, rows: usize, cols: usize },
    #[error("block {block:?} is already occupied by {occupant}")]
    Occupied { block: Block, occupant: BlockType },
    #[error("{0} blocks are not placed from inventory")]
    NotPlaceable(BlockType),
    #[error("no {0} blocks left in inventory")]
    Exhausted(BlockType),
}

/// One state of the puzzle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<BlockType>,
    inventory: Inventory,
    sources: Arc<[Laser]>,
}

/// Converts a block index to a linear cell index.
///
/// The caller guarantees the block is in bounds.
#[inline(always)]
const fn block_to_idx(block: Block, cols: usize) -> usize {
    block.0 as usize * cols + block.1 as usize
}

/// Converts a linear cell index back to a block index.
#[inline(always)]
const fn idx_to_block(cell_index: usize, cols: usize) -> Block {
    ((cell_index / cols) as i32, (cell_index % cols) as i32)
}

impl Board {
    /// Builds a board from row-major cells.
    ///
    /// Duplicate sources collapse into one; they are kept sorted so iteration
    /// order does not depend on input order.
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != rows * cols`.
    pub fn new(
        rows: usize,
        cols: usize,
        cells: Vec<BlockType>,
        inventory: Inventory,
        sources: impl IntoIterator<Item = Laser>,
    ) -> Self {
        assert_eq!(
            cells.len(),
            rows * cols,
            "grid of {rows}x{cols} needs {} cells",
            rows * cols
        );
        let mut sources: Vec<Laser> = sources.into_iter().collect();
        sources.sort_unstable();
        sources.dedup();
        Self {
            rows,
            cols,
            cells,
            inventory,
            sources: sources.into(),
        }
    }

    /// Builds a board where every cell is empty.
    pub fn empty(
        rows: usize,
        cols: usize,
        inventory: Inventory,
        sources: impl IntoIterator<Item = Laser>,
    ) -> Self {
        Self::new(rows, cols, vec![BlockType::Empty; rows * cols], inventory, sources)
    }

    /// Extent of the grid along the point `x` axis.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Extent of the grid along the point `y` axis.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The puzzle's fixed laser emitters.
    #[inline]
    pub fn sources(&self) -> &[Laser] {
        &self.sources
    }

    /// Whether every placeable block has been used.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.inventory.is_exhausted()
    }

    /// Returns the cell at `block`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, block: Block) -> Option<BlockType> {
        if block_in_bounds(block, self.rows, self.cols) {
            Some(self.cells[block_to_idx(block, self.cols)])
        } else {
            None
        }
    }

    /// Iterates all cells in row-major order.
    pub fn blocks(&self) -> impl Iterator<Item = (Block, BlockType)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(cell_index, &block_type)| (idx_to_block(cell_index, cols), block_type))
    }

    /// Iterates empty cells in row-major order.
    pub fn empty_blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks()
            .filter(|&(_, block_type)| block_type == BlockType::Empty)
            .map(|(block, _)| block)
    }

    /// Places one block from inventory, checking every precondition.
    pub fn try_place(&mut self, block: Block, block_type: BlockType) -> Result<(), PlacementError> {
        if !block_type.is_placeable() {
            return Err(PlacementError::NotPlaceable(block_type));
        }
        let occupant = self.get(block).ok_or(PlacementError::OutOfBounds {
            block,
            rows: self.rows,
            cols: self.cols,
        })?;
        if occupant != BlockType::Empty {
            return Err(PlacementError::Occupied { block, occupant });
        }
        if !self.inventory.take(block_type) {
            return Err(PlacementError::Exhausted(block_type));
        }
        self.cells[block_to_idx(block, self.cols)] = block_type;
        Ok(())
    }

    /// Places one block from inventory.
    ///
    /// # Panics
    ///
    /// Panics if the cell is not empty or no block of that type remains.
    /// Search code only offers empty cells and available types.
    pub fn place(&mut self, block: Block, block_type: BlockType) {
        if let Err(err) = self.try_place(block, block_type) {
            panic!("invalid placement: {err}");
        }
    }

    /// Returns a copy of this board with one more block placed.
    pub fn with_block(&self, block: Block, block_type: BlockType) -> Self {
        let mut next = self.clone();
        next.place(block, block_type);
        next
    }

    /// The key used to skip boards whose grid was already visited.
    ///
    /// Inventory and sources are left out: sources never change during a
    /// search, and the inventory follows from which blocks were placed.
    pub fn canonical_key(&self) -> GridKey {
        self.cells.clone().into_boxed_slice()
    }

    /// Formats the board as text.
    ///
    /// One line per `y` block index, one character per `x` block index,
    /// followed by the remaining inventory. Empty cells show as '.'.
    pub fn format(&self) -> String {
        let mut output = String::with_capacity((self.rows + 1) * self.cols + 32);
        for j in 0..self.cols {
            for i in 0..self.rows {
                let block_type = self.cells[block_to_idx((i as i32, j as i32), self.cols)];
                output.push(match block_type {
                    BlockType::Empty => '.',
                    other => other.symbol(),
                });
            }
            output.push('\n');
        }
        output.push_str(&format!("inventory: {}\n", self.inventory));
        output
    }
}
