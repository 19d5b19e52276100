use serde::{Deserialize, Serialize};

/// A proposed change to a piece's position.
///
/// A move is a `(row, col, rotation)` delta. Rows grow downward, so [`Move::DOWN`]
/// has a positive row delta. Rotation deltas count quarter turns clockwise.
///
/// Moves compose by addition, which is how rotation kicks are built:
///
/// ```
/// use blockfall_engine::Move;
///
/// let kick = Move::CLOCKWISE + Move::LEFT + Move::LEFT;
/// assert_eq!(kick, Move::new(0, -2, 1));
/// assert_eq!(kick, Move::CLOCKWISE + Move::LEFT.scaled(2));
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::AddAssign,
)]
pub struct Move {
    pub row: i32,
    pub col: i32,
    pub rotation: i32,
}

impl Move {
    pub const STAND: Self = Self::new(0, 0, 0);
    pub const LEFT: Self = Self::new(0, -1, 0);
    pub const RIGHT: Self = Self::new(0, 1, 0);
    pub const DOWN: Self = Self::new(1, 0, 0);
    pub const UP: Self = Self::new(-1, 0, 0);
    pub const CLOCKWISE: Self = Self::new(0, 0, 1);
    pub const COUNTERCLOCKWISE: Self = Self::new(0, 0, -1);

    #[must_use]
    pub const fn new(row: i32, col: i32, rotation: i32) -> Self {
        Self { row, col, rotation }
    }

    /// Repeats this move `times` times.
    #[must_use]
    pub const fn scaled(self, times: i32) -> Self {
        Self::new(self.row * times, self.col * times, self.rotation * times)
    }

    /// Returns `true` for the two single quarter-turn rotations.
    #[must_use]
    pub fn is_rotation(self) -> bool {
        self == Self::CLOCKWISE || self == Self::COUNTERCLOCKWISE
    }

    #[must_use]
    pub fn is_stand(self) -> bool {
        self == Self::STAND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_moves_compose() {
        assert_eq!(Move::LEFT + Move::RIGHT, Move::STAND);
        assert_eq!(Move::UP + Move::DOWN, Move::STAND);
        assert_eq!(Move::CLOCKWISE + Move::COUNTERCLOCKWISE, Move::STAND);
        assert_eq!(Move::DOWN + Move::RIGHT, Move::new(1, 1, 0));

        let mut mv = Move::COUNTERCLOCKWISE;
        mv += Move::RIGHT;
        mv += Move::RIGHT;
        assert_eq!(mv, Move::new(0, 2, -1));
    }

    #[test]
    fn test_scaled() {
        assert_eq!(Move::LEFT.scaled(2), Move::new(0, -2, 0));
        assert_eq!(Move::DOWN.scaled(0), Move::STAND);
    }

    #[test]
    fn test_is_rotation() {
        assert!(Move::CLOCKWISE.is_rotation());
        assert!(Move::COUNTERCLOCKWISE.is_rotation());
        assert!(!Move::STAND.is_rotation());
        assert!(!(Move::CLOCKWISE + Move::LEFT).is_rotation());
        assert!(!Move::CLOCKWISE.scaled(2).is_rotation());
    }
}
