pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IllegalMoveError {
    #[display("no piece in play")]
    NotInPlay,
    #[display("pieces cannot move upward")]
    Upward,
    #[display("piece blocked at target position")]
    Blocked,
    #[display("rotation blocked at every kick offset")]
    RotationBlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must have at least one row and one column, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },
    #[display("board dimensions {rows}x{cols} are too large")]
    BoardTooLarge { rows: usize, cols: usize },
    #[display("entry anchor {entry} is outside the {rows}x{cols} board")]
    EntryOutOfBounds {
        entry: Coord,
        rows: usize,
        cols: usize,
    },
    #[display("shape {shape:?} spawned at {entry} does not fit the {rows}x{cols} board")]
    SpawnOutOfBounds {
        shape: Shape,
        entry: Coord,
        rows: usize,
        cols: usize,
    },
}
