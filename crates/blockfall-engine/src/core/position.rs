use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::{coord::Coord, moves::Move};

/// Orientation of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation wraps around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation(u8);

impl Rotation {
    pub const SPAWN: Self = Self(0);

    /// Returns `None` unless `n` is in `0..4`.
    #[must_use]
    pub const fn new(n: u8) -> Option<Self> {
        if n < 4 { Some(Self(n)) } else { None }
    }

    #[must_use]
    #[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn rotated_by(self, quarter_turns: i32) -> Self {
        let n = (i32::from(self.0) + quarter_turns.rem_euclid(4)) % 4;
        Self(n as u8)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    pub(crate) const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Anchor location and orientation of a piece.
///
/// Positions have no knowledge of the board; adding a [`Move`] only shifts the
/// anchor and turns the orientation. Anchor arithmetic wraps instead of
/// overflowing, which always leaves a wrapped position off the board.
///
/// ```
/// use blockfall_engine::{Coord, Move, Position};
///
/// let pos = Position::new(Coord::new(1, 4));
/// let moved = pos + Move::DOWN + Move::COUNTERCLOCKWISE;
/// assert_eq!(moved.anchor(), Coord::new(2, 4));
/// assert_eq!(moved.rotation().as_u8(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    anchor: Coord,
    rotation: Rotation,
}

impl Position {
    #[must_use]
    pub const fn new(anchor: Coord) -> Self {
        Self {
            anchor,
            rotation: Rotation::SPAWN,
        }
    }

    #[must_use]
    pub const fn with_rotation(anchor: Coord, rotation: Rotation) -> Self {
        Self { anchor, rotation }
    }

    #[must_use]
    pub const fn anchor(self) -> Coord {
        self.anchor
    }

    #[must_use]
    pub const fn rotation(self) -> Rotation {
        self.rotation
    }
}

impl Add<Move> for Position {
    type Output = Self;

    fn add(self, mv: Move) -> Self {
        Self {
            anchor: self.anchor.wrapping_add(Coord::new(mv.row, mv.col)),
            rotation: self.rotation.rotated_by(mv.rotation),
        }
    }
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "rotation@row,col" (e.g., "1@4,-1")
        let s = format!(
            "{}@{},{}",
            self.rotation.0, self.anchor.row, self.anchor.col
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (rotation_str, anchor_str) = s.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!("expected format 'rotation@row,col', got '{s}'"))
        })?;
        let rotation_num = rotation_str.parse::<u8>().map_err(|e| {
            serde::de::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        let rotation = Rotation::new(rotation_num).ok_or_else(|| {
            serde::de::Error::custom(format!("rotation must be 0-3, got {rotation_num}"))
        })?;

        let (row_str, col_str) = anchor_str.split_once(',').ok_or_else(|| {
            serde::de::Error::custom(format!("missing ',' in format 'rotation@row,col', got '{s}'"))
        })?;
        let row = row_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid row: {row_str} ({e})")))?;
        let col = col_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid col: {col_str} ({e})")))?;

        Ok(Self::with_rotation(Coord::new(row, col), rotation))
    }
}
