use blockfall_engine::{Coord, Shape, TetrisState};

const EMPTY: char = '.';
const ACTIVE: char = '@';

/// Draws the board as text, one line per row.
///
/// Placed cells show their shape letter and the falling piece shows as `@`.
pub(crate) fn render_board(state: &TetrisState) -> String {
    let piece = state.piece();
    let active = if piece.is_active() {
        piece.block_coords().to_vec()
    } else {
        vec![]
    };

    let mut out = String::with_capacity(state.rows() * (state.cols() + 3));
    for (row, cells) in state.board_rows().enumerate() {
        out.push('|');
        for (col, &cell) in cells.iter().enumerate() {
            let coord = Coord::new(to_i32(row), to_i32(col));
            let ch = if active.contains(&coord) {
                ACTIVE
            } else {
                Shape::from_value(cell).map_or(EMPTY, Shape::as_char)
            };
            out.push(ch);
        }
        out.push_str("|\n");
    }
    out.push('+');
    out.extend(std::iter::repeat_n('-', state.cols()));
    out.push_str("+\n");
    out
}

/// One-line summary of the progress counters.
pub(crate) fn render_status(state: &TetrisState) -> String {
    let mut out = format!(
        "score {} | level {} | lines {} | pieces {}",
        state.score(),
        state.level(),
        state.lines_cleared(),
        state.num_pieces_dropped(),
    );
    if state.is_game_over() {
        out.push_str(" | game over");
    }
    out
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn to_i32(n: usize) -> i32 {
    n as i32
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{ShapeSeed, TetrisConfig};

    use super::*;

    #[test]
    fn test_render_board() {
        let config = TetrisConfig::new(3, 4).with_seed(ShapeSeed::from_bytes([1; 16]));
        let mut state = TetrisState::new(config).unwrap();
        state.set_cell(Coord::new(2, 0), Shape::T.value());
        state.set_cell(Coord::new(2, 3), Shape::I.value());

        let text = render_board(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "|T..I|");
        assert_eq!(lines[3], "+----+");
        assert_eq!(text.matches(ACTIVE).count(), 4);
    }

    #[test]
    fn test_render_status() {
        let mut state = TetrisState::default();
        state.set_score(300);
        state.set_game_over(true);
        assert_eq!(
            render_status(&state),
            "score 300 | level 0 | lines 0 | pieces 0 | game over"
        );
    }
}
