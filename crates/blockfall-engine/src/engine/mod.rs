//! Game state management.
//!
//! This module provides the aggregate that enforces the game rules on top of
//! the core value types:
//!
//! - [`TetrisState`] - Board, falling piece, shape queue and progress counters
//! - [`TetrisConfig`] - Board dimensions, entry anchor and pluggable policies
//! - [`ShapeQueue`] - Endless lookahead of upcoming shapes
//! - [`ShapeSeed`] - Seed for deterministic shape generation
//!
//! # Game Flow
//!
//! The state never advances on its own. A driver (game loop, AI, replay)
//! sequences every step:
//!
//! 1. Propose moves with [`TetrisState::try_move_piece`] and
//!    [`TetrisState::try_rotate_piece`] (or query legality with
//!    [`TetrisState::can_piece_move`] and [`TetrisState::validate_rotation`])
//! 2. Commit the piece with [`TetrisState::place_piece`]
//! 3. Clear [`TetrisState::full_rows`] with [`TetrisState::collapse_rows`]
//! 4. Spawn the next piece with [`TetrisState::reset_piece`]; if
//!    [`TetrisState::piece_overlaps_blocks`], the game is over
//!
//! Score, level and line counters are owned by the state but only change
//! through their setters.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Move, TetrisState};
//!
//! let mut state = TetrisState::default();
//! state.set_started(true);
//!
//! state.try_move_piece(Move::LEFT).ok();
//! state.try_rotate_piece(Move::CLOCKWISE).ok();
//! state.hard_drop_piece();
//! state.place_piece();
//!
//! let full_rows = state.full_rows();
//! state.collapse_rows(&full_rows);
//!
//! state.reset_piece();
//! if state.piece_overlaps_blocks() {
//!     state.set_game_over(true);
//! }
//! assert_eq!(state.num_pieces_dropped(), 1);
//! ```

pub use self::{config::*, shape_queue::*, tetris_state::*};

mod config;
mod shape_queue;
mod tetris_state;
