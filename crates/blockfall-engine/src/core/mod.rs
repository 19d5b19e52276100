pub use self::{coord::*, moves::*, piece::*, position::*, shape::*};

pub(crate) mod coord;
pub(crate) mod moves;
pub(crate) mod piece;
pub(crate) mod position;
pub(crate) mod shape;
