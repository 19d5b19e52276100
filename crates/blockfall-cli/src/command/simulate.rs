use std::path::PathBuf;

use crate::{driver, util};

use super::BoardArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(super) board: BoardArg,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u64,
    /// Stop a game after this many pieces
    #[arg(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        board,
        games,
        max_pieces,
        output,
    } = arg;
    let settings = board.settings();

    let mut records = Vec::new();
    for index in 0..*games {
        let seed = board.seed_for(index);
        let (_, record) = driver::play_game(settings, seed, *max_pieces)?;
        eprintln!(
            "Game {}/{games}: seed {seed}, score {}, level {}, lines {}, pieces {}{}",
            index + 1,
            record.score,
            record.level,
            record.lines_cleared,
            record.pieces,
            if record.game_over { "" } else { " (limit)" },
        );
        records.push(record);
    }

    if !records.is_empty() {
        let total: u64 = records.iter().map(|r| r.score).sum();
        eprintln!(
            "Average score over {} games: {}",
            records.len(),
            total / records.len() as u64
        );
    }

    util::save_records(&records, output.as_deref())?;
    Ok(())
}
