use crate::{ConfigError, Coord, Position, QueuePolicy, Shape, ShapeSeed, shape_coords};

/// Number of lines a player must clear to advance a level.
///
/// Either a fixed count or a function of the current level.
///
/// ```
/// use blockfall_engine::LinesPerLevel;
///
/// assert_eq!(LinesPerLevel::Constant(10).evaluate(7), 10);
/// assert_eq!(LinesPerLevel::Function(|level| 5 + level).evaluate(7), 12);
/// ```
#[derive(Debug, Clone, Copy)]
pub enum LinesPerLevel {
    Constant(u32),
    Function(fn(u32) -> u32),
}

impl Default for LinesPerLevel {
    fn default() -> Self {
        Self::Constant(TetrisConfig::DEFAULT_LINES_PER_LEVEL)
    }
}

impl LinesPerLevel {
    #[must_use]
    pub fn evaluate(self, level: u32) -> u32 {
        match self {
            Self::Constant(n) => n,
            Self::Function(f) => f(level),
        }
    }
}

impl From<u32> for LinesPerLevel {
    fn from(n: u32) -> Self {
        Self::Constant(n)
    }
}

/// Column where pieces spawn: the center column, or just left of center for an
/// even number of columns.
///
/// ```
/// use blockfall_engine::calc_entry_column;
///
/// assert_eq!(calc_entry_column(10), 4);
/// assert_eq!(calc_entry_column(11), 5);
/// ```
#[must_use]
pub const fn calc_entry_column(cols: usize) -> usize {
    (cols / 2).saturating_sub(if cols % 2 == 0 { 1 } else { 0 })
}

/// Construction parameters for a [`TetrisState`](crate::TetrisState).
///
/// # Example
///
/// ```
/// use blockfall_engine::{Coord, LinesPerLevel, QueuePolicy, TetrisConfig, TetrisState};
///
/// let config = TetrisConfig::new(4, 4)
///     .with_entry(Coord::new(1, 1))
///     .with_lines_per_level(LinesPerLevel::Function(|level| 10 + 2 * level))
///     .with_queue_policy(QueuePolicy::Uniform);
/// let state = TetrisState::new(config).unwrap();
/// assert_eq!(state.cells().len(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct TetrisConfig {
    pub rows: usize,
    pub cols: usize,
    /// Spawn anchor; `None` means row 1 of [`calc_entry_column`].
    pub entry: Option<Coord>,
    pub lines_per_level: LinesPerLevel,
    pub queue_policy: QueuePolicy,
    /// Queue seed; `None` draws a random one.
    pub seed: Option<ShapeSeed>,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NUM_ROWS, Self::DEFAULT_NUM_COLS)
    }
}

impl TetrisConfig {
    pub const DEFAULT_NUM_ROWS: usize = 20;
    pub const DEFAULT_NUM_COLS: usize = 10;
    pub const DEFAULT_LINES_PER_LEVEL: u32 = 10;
    pub const DEFAULT_ENTRY_ROW: i32 = 1;
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const DEFAULT_ENTRY: Coord = Coord::new(
        Self::DEFAULT_ENTRY_ROW,
        calc_entry_column(Self::DEFAULT_NUM_COLS) as i32,
    );

    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entry: None,
            lines_per_level: LinesPerLevel::default(),
            queue_policy: QueuePolicy::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_entry(mut self, entry: Coord) -> Self {
        self.entry = Some(entry);
        self
    }

    #[must_use]
    pub fn with_lines_per_level(mut self, lines_per_level: impl Into<LinesPerLevel>) -> Self {
        self.lines_per_level = lines_per_level.into();
        self
    }

    #[must_use]
    pub fn with_queue_policy(mut self, queue_policy: QueuePolicy) -> Self {
        self.queue_policy = queue_policy;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: ShapeSeed) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the dimensions and resolves the entry anchor.
    ///
    /// Every shape must fit on the board in its spawn orientation at the
    /// entry anchor.
    pub(crate) fn resolve_entry(&self) -> Result<Coord, ConfigError> {
        let (rows, cols) = (self.rows, self.cols);
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyBoard { rows, cols });
        }
        let too_large = ConfigError::BoardTooLarge { rows, cols };
        let max_row = i32::try_from(rows).map_err(|_| too_large)?;
        let max_col = i32::try_from(cols).map_err(|_| too_large)?;
        rows.checked_mul(cols).ok_or(too_large)?;

        let entry = match self.entry {
            Some(entry) => entry,
            None => {
                let col = i32::try_from(calc_entry_column(cols)).map_err(|_| too_large)?;
                Coord::new(Self::DEFAULT_ENTRY_ROW, col)
            }
        };
        if !(0..max_row).contains(&entry.row) || !(0..max_col).contains(&entry.col) {
            return Err(ConfigError::EntryOutOfBounds { entry, rows, cols });
        }
        let on_board = |c: Coord| (0..max_row).contains(&c.row) && (0..max_col).contains(&c.col);
        for shape in Shape::ALL {
            if !shape_coords(shape, Position::new(entry))
                .into_iter()
                .all(on_board)
            {
                return Err(ConfigError::SpawnOutOfBounds {
                    shape,
                    entry,
                    rows,
                    cols,
                });
            }
        }
        Ok(entry)
    }
}
