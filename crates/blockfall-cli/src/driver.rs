use std::collections::BTreeMap;

use anyhow::{bail, ensure};
use blockfall_engine::{
    LinesPerLevel, Move, QueuePolicy, Shape, ShapeSeed, TetrisConfig, TetrisState,
};
use serde::{Deserialize, Serialize};

/// Score values for line clears, multiplied by `level + 1`.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [u64; 5] = [0, 100, 300, 500, 800];

/// Board and policy settings shared by every game of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GameSettings {
    pub rows: usize,
    pub cols: usize,
    pub policy: QueuePolicy,
    pub lines_per_level: u32,
}

impl GameSettings {
    fn config(&self, seed: ShapeSeed) -> TetrisConfig {
        TetrisConfig::new(self.rows, self.cols)
            .with_queue_policy(self.policy)
            .with_lines_per_level(LinesPerLevel::Constant(self.lines_per_level))
            .with_seed(seed)
    }

    pub fn new_state(&self, seed: ShapeSeed) -> anyhow::Result<TetrisState> {
        let mut state = TetrisState::new(self.config(seed))?;
        state.set_started(true);
        let until = state.lines_per_level();
        state.set_lines_until_next_level(until);
        Ok(state)
    }
}

/// One committed piece: clockwise quarter turns, then a horizontal shift, then a hard drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Placement {
    pub shape: Shape,
    pub rotations: u8,
    pub shift: i32,
}

/// Everything needed to reproduce a game, plus its final counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GameRecord {
    pub seed: ShapeSeed,
    pub settings: GameSettings,
    pub score: u64,
    pub level: u32,
    pub lines_cleared: u32,
    pub pieces: u32,
    pub game_over: bool,
    pub dist: BTreeMap<char, u32>,
    pub placements: Vec<Placement>,
}

impl GameRecord {
    fn new(seed: ShapeSeed, settings: GameSettings) -> Self {
        Self {
            seed,
            settings,
            score: 0,
            level: 0,
            lines_cleared: 0,
            pieces: 0,
            game_over: false,
            dist: BTreeMap::new(),
            placements: vec![],
        }
    }

    fn update_from(&mut self, state: &TetrisState) {
        self.score = state.score();
        self.level = state.level();
        self.lines_cleared = state.lines_cleared();
        self.pieces = state.num_pieces_dropped();
        self.game_over = state.is_game_over();
        self.dist = Shape::ALL
            .iter()
            .map(|shape| (shape.as_char(), state.dist()[shape.index()]))
            .collect();
    }
}

/// Rotates, shifts, drops and places the falling piece.
///
/// Returns `false`, leaving the piece unplaced, if any step is illegal.
fn apply_placement(state: &mut TetrisState, rotations: u8, shift: i32) -> bool {
    for _ in 0..rotations {
        if state.try_rotate_piece(Move::CLOCKWISE).is_err() {
            return false;
        }
    }
    let step = if shift < 0 { Move::LEFT } else { Move::RIGHT };
    for _ in 0..shift.unsigned_abs() {
        if state.try_move_piece(step).is_err() {
            return false;
        }
    }
    state.hard_drop_piece();
    state.place_piece();
    true
}

/// Heuristic board quality; higher is better.
///
/// Penalizes aggregate height, holes and bumpiness and rewards full rows.
fn evaluate(state: &TetrisState) -> f64 {
    let cols = state.cols();
    let mut heights = vec![0_u32; cols];
    let mut holes = 0_u32;
    let mut full_rows = 0_u32;
    let mut rows_below = u32::try_from(state.rows()).unwrap_or(u32::MAX);
    for row in state.board_rows() {
        if row.iter().all(|&c| c != 0) {
            full_rows += 1;
        }
        for (col, &cell) in row.iter().enumerate() {
            if cell != 0 {
                if heights[col] == 0 {
                    heights[col] = rows_below;
                }
            } else if heights[col] > 0 {
                holes += 1;
            }
        }
        rows_below -= 1;
    }
    let aggregate_height: u32 = heights.iter().sum();
    let bumpiness: u32 = heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum();

    -0.51 * f64::from(aggregate_height) + 0.76 * f64::from(full_rows)
        - 0.36 * f64::from(holes)
        - 0.18 * f64::from(bumpiness)
}

/// Searches every rotation and shift of the falling piece on clones of `state`.
fn best_placement(state: &TetrisState) -> Option<(u8, i32)> {
    let reach = i32::try_from(state.cols()).ok()?;
    let mut best: Option<((u8, i32), f64)> = None;
    for rotations in 0..4 {
        for shift in -reach..=reach {
            let mut sim = state.clone();
            if !apply_placement(&mut sim, rotations, shift) {
                continue;
            }
            let value = evaluate(&sim);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some(((rotations, shift), value));
            }
        }
    }
    best.map(|(placement, _)| placement)
}

/// Credits cleared rows: score, total lines and level progression.
fn award_lines(state: &mut TetrisState, lines: u32) {
    let base = SCORE_TABLE
        .get(lines as usize)
        .copied()
        .unwrap_or(SCORE_TABLE[4]);
    state.set_score(state.score() + base * u64::from(state.level() + 1));
    state.set_lines_cleared(state.lines_cleared() + lines);

    let mut remaining = lines;
    let mut until = state.lines_until_next_level();
    while remaining >= until {
        remaining -= until;
        state.set_level(state.level() + 1);
        until = state.lines_per_level().max(1);
    }
    state.set_lines_until_next_level(until - remaining);
}

/// Clears full rows, updates progress and spawns the next piece.
///
/// Returns the number of rows cleared.
fn finish_turn(state: &mut TetrisState) -> u32 {
    let rows = state.full_rows();
    if !rows.is_empty() {
        state.set_clearing_lines(true);
        state.collapse_rows(&rows);
        state.set_clearing_lines(false);
    }
    let lines = u32::try_from(rows.len()).unwrap_or(u32::MAX);
    if lines > 0 {
        award_lines(state, lines);
    }

    state.reset_piece();
    if state.piece_overlaps_blocks() {
        state.set_game_over(true);
    }
    lines
}

/// Plays one game with the greedy driver until top-out or `max_pieces` placements.
pub(crate) fn play_game(
    settings: GameSettings,
    seed: ShapeSeed,
    max_pieces: usize,
) -> anyhow::Result<(TetrisState, GameRecord)> {
    let mut state = settings.new_state(seed)?;
    let mut record = GameRecord::new(seed, settings);

    while state.is_running() && record.placements.len() < max_pieces {
        let shape = state.piece().shape();
        // A piece that cannot move anywhere is dropped where it spawned.
        let (rotations, shift) = best_placement(&state).unwrap_or((0, 0));
        if !apply_placement(&mut state, rotations, shift) {
            bail!("chosen placement for {} became illegal", shape.as_char());
        }
        record.placements.push(Placement {
            shape,
            rotations,
            shift,
        });
        finish_turn(&mut state);
    }

    record.update_from(&state);
    Ok((state, record))
}

/// Re-plays a recorded game and checks that it reaches the recorded result.
pub(crate) fn replay(record: &GameRecord) -> anyhow::Result<TetrisState> {
    let mut state = record.settings.new_state(record.seed)?;
    for (i, placement) in record.placements.iter().enumerate() {
        ensure!(state.is_running(), "game ended before placement {i}");
        // Recorded shapes must come from the same queue; forcing them would hide divergence.
        ensure!(
            state.piece().shape() == placement.shape,
            "replay diverged at placement {i}: expected {}, got {}",
            placement.shape.as_char(),
            state.piece().shape().as_char(),
        );
        ensure!(
            apply_placement(&mut state, placement.rotations, placement.shift),
            "placement {i} is illegal",
        );
        finish_turn(&mut state);
    }

    let mut replayed = GameRecord::new(record.seed, record.settings);
    replayed.placements.clone_from(&record.placements);
    replayed.update_from(&state);
    ensure!(
        replayed == *record,
        "replay finished with score {} and {} lines, recorded {} and {}",
        replayed.score,
        replayed.lines_cleared,
        record.score,
        record.lines_cleared,
    );
    Ok(state)
}

/// Plays `pieces` placements on a fresh state, forcing each upcoming shape in turn.
///
/// Shapes are taken from `shapes` cyclically; when empty, the queue decides.
pub(crate) fn play_shapes(
    settings: GameSettings,
    seed: ShapeSeed,
    shapes: &[Shape],
    pieces: usize,
) -> anyhow::Result<TetrisState> {
    let mut state = settings.new_state(seed)?;
    let mut forced = shapes.iter().copied().cycle();
    if let Some(shape) = forced.next() {
        state.set_next_shape(shape);
        state.reset_piece();
    }
    for _ in 0..pieces {
        if !state.is_running() {
            break;
        }
        let (rotations, shift) = best_placement(&state).unwrap_or((0, 0));
        apply_placement(&mut state, rotations, shift);
        if let Some(shape) = forced.next() {
            state.set_next_shape(shape);
        }
        finish_turn(&mut state);
    }
    Ok(state)
}
