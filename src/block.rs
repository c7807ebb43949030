//! Block kinds and the inventory of blocks still to be placed.

use std::fmt;

/// What occupies a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BlockType {
    /// An open cell a block may be placed in.
    Empty,
    /// A cell nothing may be placed in. Lasers pass over it.
    FixedBlocker,
    /// Bounces a laser off the face it hits.
    Reflect,
    /// Absorbs a laser.
    Opaque,
    /// Both bounces a laser and lets it through.
    Refract,
}

impl BlockType {
    /// The block types held in inventory, in the order the solver tries them.
    pub const PLACEABLE: [BlockType; 3] = [BlockType::Reflect, BlockType::Refract, BlockType::Opaque];

    /// Whether this type is drawn from inventory.
    #[inline]
    pub const fn is_placeable(self) -> bool {
        matches!(self, BlockType::Reflect | BlockType::Opaque | BlockType::Refract)
    }

    /// The single-character token used in puzzle files and text output.
    pub const fn symbol(self) -> char {
        match self {
            BlockType::Empty => 'o',
            BlockType::FixedBlocker => 'x',
            BlockType::Reflect => 'A',
            BlockType::Opaque => 'B',
            BlockType::Refract => 'C',
        }
    }

    /// Parses a grid token. Inverse of [`BlockType::symbol`].
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'o' => Some(BlockType::Empty),
            'x' => Some(BlockType::FixedBlocker),
            'A' => Some(BlockType::Reflect),
            'B' => Some(BlockType::Opaque),
            'C' => Some(BlockType::Refract),
            _ => None,
        }
    }

    const fn slot(self) -> Option<usize> {
        match self {
            BlockType::Reflect => Some(0),
            BlockType::Opaque => Some(1),
            BlockType::Refract => Some(2),
            BlockType::Empty | BlockType::FixedBlocker => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::Empty => "empty",
            BlockType::FixedBlocker => "fixed",
            BlockType::Reflect => "reflect",
            BlockType::Opaque => "opaque",
            BlockType::Refract => "refract",
        };
        f.write_str(name)
    }
}

/// Remaining counts of the three placeable block types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Inventory {
    counts: [u32; 3],
}

impl Inventory {
    pub const fn new(reflect: u32, opaque: u32, refract: u32) -> Self {
        Self {
            counts: [reflect, opaque, refract],
        }
    }

    /// Remaining count for a block type. Non-placeable types always have zero.
    #[inline]
    pub const fn get(&self, block_type: BlockType) -> u32 {
        match block_type.slot() {
            Some(slot) => self.counts[slot],
            None => 0,
        }
    }

    /// Sets the count for a placeable type. Returns `false` for other types.
    pub fn set(&mut self, block_type: BlockType, count: u32) -> bool {
        match block_type.slot() {
            Some(slot) => {
                self.counts[slot] = count;
                true
            }
            None => false,
        }
    }

    /// Takes one block of `block_type` out of the inventory.
    ///
    /// Returns `false` and leaves the inventory unchanged when none remain.
    pub fn take(&mut self, block_type: BlockType) -> bool {
        let Some(slot) = block_type.slot() else {
            return false;
        };
        match self.counts[slot].checked_sub(1) {
            Some(left) => {
                self.counts[slot] = left;
                true
            }
            None => false,
        }
    }

    /// Total blocks still to place.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| u64::from(count)).sum()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Iterates placeable types with at least one block left, in solver order.
    pub fn available(&self) -> impl Iterator<Item = BlockType> + '_ {
        BlockType::PLACEABLE
            .into_iter()
            .filter(move |&block_type| self.get(block_type) > 0)
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A={} B={} C={}",
            self.get(BlockType::Reflect),
            self.get(BlockType::Opaque),
            self.get(BlockType::Refract)
        )
    }
}
