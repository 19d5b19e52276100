use std::path::PathBuf;

use anyhow::Context as _;

use crate::{driver, render, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Records file written by `simulate`
    #[arg(long)]
    input: PathBuf,
    /// Print the final board of each game
    #[arg(long)]
    show_board: bool,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let records = util::load_records(&arg.input)?;
    eprintln!("Loaded {} games from {}", records.len(), arg.input.display());

    for (i, record) in records.iter().enumerate() {
        let state = driver::replay(record)
            .with_context(|| format!("Game {} (seed {}) failed to replay", i + 1, record.seed))?;
        eprintln!(
            "Game {}: {} placements verified, score {}",
            i + 1,
            record.placements.len(),
            record.score
        );
        if arg.show_board {
            print!("{}", render::render_board(&state));
            println!("{}", render::render_status(&state));
        }
    }
    Ok(())
}
