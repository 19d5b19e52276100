//! Property tests for the rules enforced by `TetrisState`.
//!
//! Random drivers push the state through moves, rotations, placements and row
//! clears; after every step the board size, piece validity and drop counter
//! must still hold.

use blockfall_engine::{
    Coord, Move, QueuePolicy, ShapeSeed, TetrisConfig, TetrisState, calc_entry_column,
};
use proptest::prelude::*;

fn new_state(rows: usize, cols: usize, seed: [u8; 16], uniform: bool) -> TetrisState {
    let policy = if uniform {
        QueuePolicy::Uniform
    } else {
        QueuePolicy::SevenBag
    };
    let config = TetrisConfig::new(rows, cols)
        .with_queue_policy(policy)
        .with_seed(ShapeSeed::from_bytes(seed));
    let mut state = TetrisState::new(config).unwrap();
    state.set_started(true);
    state
}

/// Applies one driver step and returns `true` if a piece was placed.
fn step(state: &mut TetrisState, op: u8) -> bool {
    match op % 6 {
        0 => {
            state.try_move_piece(Move::LEFT).ok();
        }
        1 => {
            state.try_move_piece(Move::RIGHT).ok();
        }
        2 => {
            state.try_move_piece(Move::DOWN).ok();
        }
        3 => {
            state.try_rotate_piece(Move::CLOCKWISE).ok();
        }
        4 => {
            state.try_rotate_piece(Move::COUNTERCLOCKWISE).ok();
        }
        _ => {
            if !state.is_running() {
                return false;
            }
            state.hard_drop_piece();
            state.place_piece();
            let rows = state.full_rows();
            state.collapse_rows(&rows);
            state.reset_piece();
            if state.piece_overlaps_blocks() {
                state.set_game_over(true);
            }
            return true;
        }
    }
    false
}

fn assert_piece_valid(state: &TetrisState) {
    if state.piece().is_active() && !state.is_game_over() {
        assert!(state.piece_in_bounds());
        assert!(state.is_position_valid(state.piece().position()));
    }
}

proptest! {
    #[test]
    fn rollout_respects_core_invariants(
        seed in any::<[u8; 16]>(),
        uniform in any::<bool>(),
        ops in prop::collection::vec(any::<u8>(), 1..300),
    ) {
        let mut state = new_state(20, 10, seed, uniform);
        let mut placed = 0;
        for op in ops {
            if step(&mut state, op) {
                placed += 1;
            }
            prop_assert_eq!(state.cells().len(), 200);
            prop_assert_eq!(state.num_pieces_dropped(), placed);
            prop_assert_eq!(state.dist().iter().sum::<u32>(), placed);
            assert_piece_valid(&state);
            for row in state.full_rows() {
                prop_assert!(state.board_rows().nth(row).unwrap().iter().all(|&c| c != 0));
            }
        }
    }

    #[test]
    fn upward_moves_are_never_legal(
        seed in any::<[u8; 16]>(),
        row in -5i32..0,
        col in -3i32..=3,
        rotation in -2i32..=2,
    ) {
        let state = new_state(20, 10, seed, false);
        prop_assert!(!state.can_piece_move(Move::new(row, col, rotation)));
    }

    #[test]
    fn non_rotations_resolve_to_stand(
        seed in any::<[u8; 16]>(),
        row in -3i32..=3,
        col in -3i32..=3,
        rotation in -3i32..=3,
    ) {
        let mv = Move::new(row, col, rotation);
        prop_assume!(!mv.is_rotation());
        let state = new_state(20, 10, seed, false);
        prop_assert_eq!(state.validate_rotation(mv), Move::STAND);
    }

    #[test]
    fn resolved_rotations_are_legal(
        seed in any::<[u8; 16]>(),
        ops in prop::collection::vec(any::<u8>(), 0..120),
        clockwise in any::<bool>(),
    ) {
        let mut state = new_state(20, 10, seed, false);
        for op in ops {
            step(&mut state, op);
        }
        let rotation = if clockwise { Move::CLOCKWISE } else { Move::COUNTERCLOCKWISE };
        let resolved = state.validate_rotation(rotation);
        if !resolved.is_stand() {
            prop_assert!(state.can_piece_move(resolved));
            prop_assert_eq!(resolved.rotation, rotation.rotation);
            prop_assert_eq!(resolved.row, 0);
            prop_assert!(resolved.col.abs() <= 2);
        }
    }

    #[test]
    fn clone_does_not_share_state(
        seed in any::<[u8; 16]>(),
        ops in prop::collection::vec(any::<u8>(), 1..150),
    ) {
        let original = new_state(12, 8, seed, false);
        let board = original.board();
        let piece = *original.piece();
        let upcoming = original.peek_next_shapes(14);

        let mut copy = original.clone();
        for op in ops {
            step(&mut copy, op);
        }
        copy.set_cell(Coord::new(11, 0), 1);

        prop_assert_eq!(original.board(), board);
        prop_assert_eq!(*original.piece(), piece);
        prop_assert_eq!(original.peek_next_shapes(14), upcoming);
        prop_assert_eq!(original.num_pieces_dropped(), 0);
    }

    #[test]
    fn board_size_is_fixed(
        rows in 1usize..30,
        cols in 1usize..16,
        seed in any::<[u8; 16]>(),
    ) {
        let config = TetrisConfig::new(rows, cols).with_seed(ShapeSeed::from_bytes(seed));
        let Ok(mut state) = TetrisState::new(config) else {
            // Every shape needs two rows and four columns around the entry anchor.
            prop_assert!(rows < 2 || cols < 4);
            return Ok(());
        };
        prop_assert!(state.piece_in_bounds());
        prop_assert_eq!(state.cells().len(), rows * cols);

        let last = Coord::new(i32::try_from(rows).unwrap() - 1, i32::try_from(cols).unwrap() - 1);
        state.set_cell(last, 3);
        state.place_piece();
        let copy = state.clone();
        prop_assert_eq!(state.cells().len(), rows * cols);
        prop_assert_eq!(copy.cells().len(), rows * cols);
        prop_assert_eq!(
            state.entry().col,
            i32::try_from(calc_entry_column(cols)).unwrap()
        );
    }
}
