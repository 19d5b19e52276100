use arrayvec::ArrayVec;

use crate::{
    ConfigError, Coord, IllegalMoveError, Move, Occupancy, Piece, Position, Shape, shape_coords,
};

use super::{
    config::{LinesPerLevel, TetrisConfig},
    shape_queue::ShapeQueue,
};

/// Largest horizontal shift tried when kicking a blocked rotation.
const MAX_KICK: i32 = 2;

/// Widest column span a valid piece can cover. A wider span means column
/// arithmetic wrapped around a board edge.
const MAX_COLUMN_SPREAD: i32 = 4;

/// Authoritative state of one game.
///
/// `TetrisState` owns the board, the falling piece and the shape queue, and is
/// the only place where moves are judged legal. The board is a flat row-major
/// grid of cell values: `0` is empty and any other value is the
/// [`Shape::value`] of the piece that was placed there.
///
/// Progress counters (score, level, lines) are stored here for the driver but
/// are never computed internally; only [`num_pieces_dropped`](Self::num_pieces_dropped)
/// and [`dist`](Self::dist) are maintained by placement.
///
/// Cloning produces a fully independent game: board, piece and queue are all
/// copied, so a clone can be used for lookahead without touching the original.
#[derive(Debug, Clone)]
pub struct TetrisState {
    rows: usize,
    cols: usize,
    entry: Coord,
    board: Vec<u8>,
    is_game_over: bool,
    is_paused: bool,
    is_clearing_lines: bool,
    has_started: bool,
    level: u32,
    score: u64,
    lines_cleared: u32,
    num_pieces_dropped: u32,
    lines_until_next_level: u32,
    dist: [u32; Shape::LEN],
    lines_per_level: LinesPerLevel,
    next_shapes: ShapeQueue,
    piece: Piece,
}

impl Default for TetrisState {
    fn default() -> Self {
        Self::with_entry(TetrisConfig::default(), TetrisConfig::DEFAULT_ENTRY)
    }
}

impl TetrisState {
    /// Creates a new game with an empty board and the first shape of the queue
    /// falling from the entry anchor.
    pub fn new(config: TetrisConfig) -> Result<Self, ConfigError> {
        let entry = config.resolve_entry()?;
        Ok(Self::with_entry(config, entry))
    }

    fn with_entry(config: TetrisConfig, entry: Coord) -> Self {
        let mut next_shapes = match config.seed {
            Some(seed) => ShapeQueue::with_seed(config.queue_policy, seed),
            None => ShapeQueue::with_policy(config.queue_policy),
        };
        let piece = Piece::new(entry, next_shapes.poll());
        Self {
            rows: config.rows,
            cols: config.cols,
            entry,
            board: vec![0; config.rows * config.cols],
            is_game_over: false,
            is_paused: false,
            is_clearing_lines: false,
            has_started: false,
            level: 0,
            score: 0,
            lines_cleared: 0,
            num_pieces_dropped: 0,
            lines_until_next_level: 0,
            dist: [0; Shape::LEN],
            lines_per_level: config.lines_per_level,
            next_shapes,
            piece,
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Anchor where every new piece spawns.
    #[must_use]
    pub fn entry(&self) -> Coord {
        self.entry
    }

    /// Returns a copy of the board.
    #[must_use]
    pub fn board(&self) -> Vec<u8> {
        self.board.clone()
    }

    /// Borrows the board cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.board
    }

    /// Iterates over the board one row at a time.
    pub fn board_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.board.chunks_exact(self.cols)
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    #[must_use]
    pub fn is_clearing_lines(&self) -> bool {
        self.is_clearing_lines
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.has_started
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    #[must_use]
    pub fn num_pieces_dropped(&self) -> u32 {
        self.num_pieces_dropped
    }

    #[must_use]
    pub fn lines_until_next_level(&self) -> u32 {
        self.lines_until_next_level
    }

    /// Number of placed pieces of each shape, indexed by [`Shape::index`].
    #[must_use]
    pub fn dist(&self) -> [u32; Shape::LEN] {
        self.dist
    }

    /// Returns a copy of the shape queue.
    #[must_use]
    pub fn next_shapes(&self) -> ShapeQueue {
        self.next_shapes.clone()
    }

    /// Returns the next `n` shapes without consuming them.
    #[must_use]
    pub fn peek_next_shapes(&self, n: usize) -> Vec<Shape> {
        self.next_shapes.peek_next(n)
    }

    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn set_lines_cleared(&mut self, lines_cleared: u32) {
        self.lines_cleared = lines_cleared;
    }

    pub fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    pub fn set_clearing_lines(&mut self, is_clearing_lines: bool) {
        self.is_clearing_lines = is_clearing_lines;
    }

    pub fn set_lines_until_next_level(&mut self, lines_until_next_level: u32) {
        self.lines_until_next_level = lines_until_next_level;
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn set_started(&mut self, has_started: bool) {
        self.has_started = has_started;
    }

    pub fn set_game_over(&mut self, is_game_over: bool) {
        self.is_game_over = is_game_over;
    }

    pub fn set_paused(&mut self, is_paused: bool) {
        self.is_paused = is_paused;
    }

    /// Lines needed to advance from the current level.
    #[must_use]
    pub fn lines_per_level(&self) -> u32 {
        self.lines_per_level.evaluate(self.level)
    }

    /// Returns `true` once the game has started and until it is over.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.has_started && !self.is_game_over
    }

    #[expect(clippy::cast_sign_loss)]
    fn index(&self, location: Coord) -> usize {
        debug_assert!(
            self.validate_coord(location),
            "cell {location} outside the board"
        );
        location.row as usize * self.cols + location.col as usize
    }

    /// Returns the value of the cell at `location`.
    ///
    /// The location is not bounds-checked; validate it with
    /// [`validate_coord`](Self::validate_coord) first.
    ///
    /// # Panics
    ///
    /// Panics if `location` does not map into the board.
    #[must_use]
    pub fn cell(&self, location: Coord) -> u8 {
        self.board[self.index(location)]
    }

    /// Sets the value of the cell at `location`.
    ///
    /// # Panics
    ///
    /// Panics if `location` does not map into the board.
    pub fn set_cell(&mut self, location: Coord, value: u8) {
        let index = self.index(location);
        self.board[index] = value;
    }

    /// # Panics
    ///
    /// Panics if `location` does not map into the board.
    #[must_use]
    pub fn is_cell_empty(&self, location: Coord) -> bool {
        self.cell(location) == 0
    }

    /// Returns `true` if `location` lies on the board.
    #[must_use]
    pub fn validate_coord(&self, location: Coord) -> bool {
        usize::try_from(location.row).is_ok_and(|row| row < self.rows)
            && usize::try_from(location.col).is_ok_and(|col| col < self.cols)
    }

    /// Returns `true` if every block of the current piece lies on the board.
    #[must_use]
    pub fn piece_in_bounds(&self) -> bool {
        self.piece
            .block_coords()
            .iter()
            .all(|&c| self.validate_coord(c))
    }

    /// Block coordinates of the current piece's shape at `position`.
    #[must_use]
    pub fn shape_coords_at_position(&self, position: Position) -> [Coord; 4] {
        shape_coords(self.piece.shape(), position)
    }

    /// Returns `true` if the current shape fits at `position`.
    ///
    /// Every block must be on the board and on an empty cell, and the blocks
    /// must not span more than four columns.
    #[must_use]
    pub fn is_position_valid(&self, position: Position) -> bool {
        self.are_blocks_valid(&self.shape_coords_at_position(position))
    }

    fn are_blocks_valid(&self, blocks: &[Coord]) -> bool {
        let Some(first) = blocks.first() else {
            return true;
        };
        let mut min_col = first.col;
        let mut max_col = first.col;

        blocks.iter().all(|&c| {
            min_col = min_col.min(c.col);
            max_col = max_col.max(c.col);
            self.validate_coord(c)
                && self.is_cell_empty(c)
                && max_col - min_col <= MAX_COLUMN_SPREAD
        })
    }

    fn check_move(&self, mv: Move) -> Result<(), IllegalMoveError> {
        if self.is_game_over || self.is_paused || !self.piece.is_active() {
            return Err(IllegalMoveError::NotInPlay);
        }
        if mv.row < 0 {
            return Err(IllegalMoveError::Upward);
        }
        if !self.is_position_valid(self.piece.position() + mv) {
            return Err(IllegalMoveError::Blocked);
        }
        Ok(())
    }

    /// Returns `true` if the falling piece may end up at its position plus `mv`.
    ///
    /// The game must be running and unpaused with an active piece, the move
    /// must not go upward, and the resulting position must be valid. Only the
    /// destination is checked, not the path to it.
    #[must_use]
    pub fn can_piece_move(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// Resolves a rotation against the board, kicking sideways if needed.
    ///
    /// Returns `rotation` itself if it is legal in place. Otherwise tries the
    /// rotation combined with one column left, one right, two left and two
    /// right, in that order, and returns the first legal combination. Returns
    /// [`Move::STAND`] if none is legal or if `rotation` is not
    /// [`Move::CLOCKWISE`] or [`Move::COUNTERCLOCKWISE`].
    #[must_use]
    pub fn validate_rotation(&self, rotation: Move) -> Move {
        if !rotation.is_rotation() {
            return Move::STAND;
        }
        if self.can_piece_move(rotation) {
            return rotation;
        }

        let kicks: ArrayVec<Move, { 2 * MAX_KICK as usize }> = (1..=MAX_KICK)
            .flat_map(|offset| {
                [
                    rotation + Move::LEFT.scaled(offset),
                    rotation + Move::RIGHT.scaled(offset),
                ]
            })
            .collect();
        kicks
            .into_iter()
            .find(|&kick| self.can_piece_move(kick))
            .unwrap_or(Move::STAND)
    }

    /// Applies `mv` to the falling piece if [`can_piece_move`](Self::can_piece_move) allows it.
    pub fn try_move_piece(&mut self, mv: Move) -> Result<(), IllegalMoveError> {
        self.check_move(mv)?;
        self.piece.set_position(self.piece.position() + mv);
        Ok(())
    }

    /// Rotates the falling piece, kicking it sideways if needed.
    ///
    /// Returns the move that was applied, as resolved by
    /// [`validate_rotation`](Self::validate_rotation).
    pub fn try_rotate_piece(&mut self, rotation: Move) -> Result<Move, IllegalMoveError> {
        self.check_move(Move::STAND)?;
        let resolved = self.validate_rotation(rotation);
        if resolved.is_stand() {
            return Err(IllegalMoveError::RotationBlocked);
        }
        self.piece.set_position(self.piece.position() + resolved);
        Ok(resolved)
    }

    /// Moves the falling piece down as far as it goes and returns the number of
    /// rows it travelled. The piece is not placed.
    pub fn hard_drop_piece(&mut self) -> usize {
        let mut rows = 0;
        while self.try_move_piece(Move::DOWN).is_ok() {
            rows += 1;
        }
        rows
    }

    /// Returns where the falling piece would come to rest if dropped now.
    ///
    /// Returns `None` if there is no active piece.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        if !self.piece.is_active() {
            return None;
        }
        let mut ghost = self.piece;
        while self.is_position_valid(ghost.position() + Move::DOWN) {
            ghost.set_position(ghost.position() + Move::DOWN);
        }
        Some(ghost)
    }

    fn is_row_full(row: &[u8]) -> bool {
        row.iter().all(|&cell| cell != 0)
    }

    /// Returns the indices of full rows, in ascending order.
    #[must_use]
    pub fn full_rows(&self) -> Vec<usize> {
        self.board_rows()
            .enumerate()
            .filter(|(_, row)| Self::is_row_full(row))
            .map(|(index, _)| index)
            .collect()
    }

    /// Removes the given rows and shifts the rows above them down.
    ///
    /// Emptied rows are inserted at the top so the board keeps its size.
    /// Indices outside the board and duplicates are ignored. Returns the number
    /// of rows removed.
    pub fn collapse_rows(&mut self, rows: &[usize]) -> usize {
        let mut removed = vec![false; self.rows];
        for &row in rows {
            if let Some(flag) = removed.get_mut(row) {
                *flag = true;
            }
        }

        let cols = self.cols;
        let mut count = 0;
        for row in (0..self.rows).rev() {
            if removed[row] {
                count += 1;
                continue;
            }
            if count > 0 {
                self.board
                    .copy_within(row * cols..(row + 1) * cols, (row + count) * cols);
            }
        }
        self.board[..count * cols].fill(0);
        count
    }

    /// Returns `true` if the active piece sits on any placed block.
    ///
    /// Right after [`reset_piece`](Self::reset_piece) this means the spawn is
    /// blocked and the game is over.
    #[must_use]
    pub fn piece_overlaps_blocks(&self) -> bool {
        self.piece.is_active() && self.piece.intersects(self)
    }

    /// Writes the active piece into the board and deactivates it.
    ///
    /// Does nothing if the piece is already inactive.
    pub fn place_piece(&mut self) {
        if !self.piece.is_active() {
            return;
        }
        let value = self.piece.shape().value();
        for coord in self.piece.block_coords() {
            self.set_cell(coord, value);
        }
        self.piece.disable();
        self.num_pieces_dropped += 1;
        self.dist[self.piece.shape().index()] += 1;
    }

    /// Spawns the next shape from the queue at the entry anchor.
    pub fn reset_piece(&mut self) {
        self.piece.reset(self.entry, self.next_shapes.poll());
    }

    /// Discards queued shapes until `shape` is next.
    ///
    /// Never returns if the queue's policy cannot produce `shape`; both built-in
    /// policies produce every shape.
    pub fn set_next_shape(&mut self, shape: Shape) {
        while self.next_shapes.peek() != shape {
            self.next_shapes.poll();
        }
    }
}

impl Occupancy for TetrisState {
    fn is_occupied(&self, coord: Coord) -> bool {
        self.validate_coord(coord) && !self.is_cell_empty(coord)
    }
}
