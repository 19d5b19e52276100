use serde::{Deserialize, Serialize};

use super::{coord::Coord, position::Position, shape::Shape};

/// Anything that can report whether a cell holds a placed block.
///
/// Cells outside the occupancy's bounds are reported as not occupied; bounds
/// are a separate concern from overlap.
pub trait Occupancy {
    fn is_occupied(&self, coord: Coord) -> bool;
}

/// The currently falling piece.
///
/// A piece is mutated in place while it falls and becomes inert once
/// [`disabled`](Self::disable) by placement, until it is [`reset`](Self::reset)
/// with the next shape.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Coord, Piece, Shape};
///
/// let mut piece = Piece::new(Coord::new(1, 4), Shape::O);
/// assert_eq!(
///     piece.block_coords(),
///     [Coord::new(0, 4), Coord::new(0, 5), Coord::new(1, 4), Coord::new(1, 5)],
/// );
///
/// piece.disable();
/// assert!(!piece.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    position: Position,
    shape: Shape,
    active: bool,
}

impl Piece {
    /// Creates an active piece in spawn orientation at `anchor`.
    #[must_use]
    pub const fn new(anchor: Coord, shape: Shape) -> Self {
        Self {
            position: Position::new(anchor),
            shape,
            active: true,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Board cells covered by this piece at its current position.
    #[must_use]
    pub fn block_coords(&self) -> [Coord; 4] {
        self.coords_at(self.position)
    }

    /// Board cells this piece's shape would cover at `position`.
    #[must_use]
    pub fn coords_at(&self, position: Position) -> [Coord; 4] {
        shape_coords(self.shape, position)
    }

    /// Marks the piece as placed. Calling this on an inactive piece does nothing.
    pub fn disable(&mut self) {
        self.active = false;
    }

    /// Reactivates the piece with a new shape at `anchor`, in spawn orientation.
    pub fn reset(&mut self, anchor: Coord, shape: Shape) {
        *self = Self::new(anchor, shape);
    }

    /// Returns `true` if any of the piece's blocks sits on an occupied cell.
    pub fn intersects<B>(&self, board: &B) -> bool
    where
        B: Occupancy + ?Sized,
    {
        self.block_coords().iter().any(|&c| board.is_occupied(c))
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// Board cells covered by `shape` at `position`.
#[must_use]
pub fn shape_coords(shape: Shape, position: Position) -> [Coord; 4] {
    let anchor = position.anchor();
    shape
        .offsets(position.rotation())
        .map(|offset| anchor.wrapping_add(offset))
}
