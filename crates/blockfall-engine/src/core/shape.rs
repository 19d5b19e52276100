use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{coord::Coord, position::Rotation};

/// One of the seven tetrominoes.
///
/// Each shape fixes four orientation patterns of block offsets (relative to the
/// piece anchor) and a nonzero cell value that is written to the board when a
/// piece of this shape is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum Shape {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<Shape> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        Shape::ALL[rng.random_range(0..Shape::LEN)]
    }
}

impl Shape {
    /// Number of shapes (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Shape::I,
        Shape::O,
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
        Shape::T,
    ];

    /// Index of this shape in [`Shape::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Cell value written to the board for this shape (`1..=7`).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Shape::value`].
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1..=7 => Some(Self::ALL[(value - 1) as usize]),
            _ => None,
        }
    }

    /// Block offsets, relative to the anchor, for the given orientation.
    #[must_use]
    pub fn offsets(self, rotation: Rotation) -> [Coord; 4] {
        SHAPE_OFFSETS[self.index()][rotation.as_usize()].map(|(row, col)| Coord::new(row, col))
    }

    /// Returns the single character representation of this shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::Shape;
    ///
    /// assert_eq!(Shape::I.as_char(), 'I');
    /// assert_eq!(Shape::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Shape::I => 'I',
            Shape::O => 'O',
            Shape::S => 'S',
            Shape::Z => 'Z',
            Shape::J => 'J',
            Shape::L => 'L',
            Shape::T => 'T',
        }
    }

    /// Parses a shape from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::Shape;
    ///
    /// assert_eq!(Shape::from_char('I'), Some(Shape::I));
    /// assert_eq!(Shape::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Shape::I),
            'O' => Some(Shape::O),
            'S' => Some(Shape::S),
            'Z' => Some(Shape::Z),
            'J' => Some(Shape::J),
            'L' => Some(Shape::L),
            'T' => Some(Shape::T),
            _ => None,
        }
    }
}

/// Offsets of the four blocks of a shape in one orientation, as `(row, col)`.
type ShapeOffsets = [(i32, i32); 4];

/// Generates all 4 orientations by turning the spawn pattern clockwise about the anchor.
///
/// A quarter turn maps `(row, col)` to `(col, -row)`.
const fn offset_rotations(spawn: ShapeOffsets) -> [ShapeOffsets; 4] {
    let mut rotates = [spawn; 4];
    let mut i = 1;
    while i < 4 {
        let mut j = 0;
        while j < 4 {
            let (row, col) = rotates[i - 1][j];
            rotates[i][j] = (col, -row);
            j += 1;
        }
        i += 1;
    }
    rotates
}

// The I and O pieces turn about a point between cells, so their tables are
// written out instead of generated.
const SHAPE_OFFSETS: [[ShapeOffsets; 4]; Shape::LEN] = [
    // I-piece
    [
        [(0, -1), (0, 0), (0, 1), (0, 2)],
        [(-1, 1), (0, 1), (1, 1), (2, 1)],
        [(1, -1), (1, 0), (1, 1), (1, 2)],
        [(-1, 0), (0, 0), (1, 0), (2, 0)],
    ],
    // O-piece
    [[(-1, 0), (-1, 1), (0, 0), (0, 1)]; 4],
    // S-piece
    offset_rotations([(-1, 0), (-1, 1), (0, -1), (0, 0)]),
    // Z-piece
    offset_rotations([(-1, -1), (-1, 0), (0, 0), (0, 1)]),
    // J-piece
    offset_rotations([(-1, -1), (0, -1), (0, 0), (0, 1)]),
    // L-piece
    offset_rotations([(-1, 1), (0, -1), (0, 0), (0, 1)]),
    // T-piece
    offset_rotations([(-1, 0), (0, -1), (0, 0), (0, 1)]),
];
