use serde::{Deserialize, Serialize};

/// A cell location on the board.
///
/// Rows grow downward from the top of the board and columns grow rightward.
/// Coordinates are signed so that candidate positions hanging off an edge can
/// be represented and rejected instead of wrapping.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Display,
)]
#[display("({row}, {col})")]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn row(self) -> i32 {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> i32 {
        self.col
    }

    /// Component-wise addition that wraps on overflow.
    ///
    /// Piece geometry uses this so that an oversized move lands far outside
    /// the board instead of overflowing.
    #[must_use]
    pub const fn wrapping_add(self, other: Self) -> Self {
        Self {
            row: self.row.wrapping_add(other.row),
            col: self.col.wrapping_add(other.col),
        }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}
