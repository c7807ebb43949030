//! Coordinate mapping between laser points and grid blocks.
//!
//! Points live on a grid with twice the resolution of blocks: block `(i, j)`
//! spans points `x` in `2i..=2i+2` and `y` in `2j..=2j+2`. A point with an odd
//! `x` sits on a horizontal block edge, a point with an even `x` on a
//! vertical one, which is what decides the block a laser is about to enter.

/// A fine-grained laser coordinate.
pub type Point = (i32, i32);

/// A laser's step per move, each component in `-1..=1`.
pub type Direction = (i32, i32);

/// A coarse block index `(i, j)`.
pub type Block = (i32, i32);

/// Moves a point one step along a direction.
#[inline(always)]
pub const fn advance(point: Point, direction: Direction) -> Point {
    (point.0 + direction.0, point.1 + direction.1)
}

/// Returns the block a laser at `point` crosses into on its next step.
///
/// An even `x` means the next boundary crossed is along x, so the target row
/// comes from the advanced point while the column stays put. An odd `x` is
/// the opposite case. Division floors so points just outside the board map
/// to negative block indices.
#[inline]
pub const fn entered_block(point: Point, direction: Direction) -> Block {
    let dest = advance(point, direction);
    if point.0 % 2 == 0 {
        (dest.0.div_euclid(2), point.1.div_euclid(2))
    } else {
        (point.0.div_euclid(2), dest.1.div_euclid(2))
    }
}

/// Returns the direction after bouncing off a block face at `point`.
///
/// An even `y` means the laser hit the top or bottom face, which flips the
/// `y` component; otherwise it hit a side and the `x` component flips.
#[inline]
pub const fn reflect(point: Point, direction: Direction) -> Direction {
    if point.1 % 2 == 0 {
        (direction.0, -direction.1)
    } else {
        (-direction.0, direction.1)
    }
}

/// Whether a block index lies inside a `rows x cols` board.
#[inline(always)]
pub const fn block_in_bounds(block: Block, rows: usize, cols: usize) -> bool {
    block.0 >= 0 && block.1 >= 0 && (block.0 as usize) < rows && (block.1 as usize) < cols
}

/// Whether a point lies inside the point space of a `rows x cols` board.
///
/// Point space is inclusive of the far edges: `0..=2*rows` by `0..=2*cols`.
#[inline(always)]
pub const fn point_in_bounds(point: Point, rows: usize, cols: usize) -> bool {
    point.0 >= 0 && point.1 >= 0 && point.0 as usize <= rows * 2 && point.1 as usize <= cols * 2
}
