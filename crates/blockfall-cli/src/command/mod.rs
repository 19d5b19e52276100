use blockfall_engine::{QueuePolicy, ShapeSeed, TetrisConfig};
use clap::{Parser, Subcommand};

use crate::driver::GameSettings;

use self::{replay::ReplayArg, show::ShowArg, simulate::SimulateArg};

mod replay;
mod show;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play games with the greedy driver and write JSON records
    Simulate(#[clap(flatten)] SimulateArg),
    /// Play a few pieces and print the board
    Show(#[clap(flatten)] ShowArg),
    /// Re-play recorded games and verify their results
    Replay(#[clap(flatten)] ReplayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Show(ShowArg::default())) {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Show(arg) => show::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum PolicyArg {
    #[default]
    SevenBag,
    Uniform,
}

impl From<PolicyArg> for QueuePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::SevenBag => QueuePolicy::SevenBag,
            PolicyArg::Uniform => QueuePolicy::Uniform,
        }
    }
}

fn parse_seed(s: &str) -> Result<ShapeSeed, String> {
    ShapeSeed::from_hex(s).ok_or_else(|| format!("invalid hex seed: {s}"))
}

/// Board options shared by the commands that start new games.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BoardArg {
    /// Number of board rows
    #[arg(long, default_value_t = TetrisConfig::DEFAULT_NUM_ROWS)]
    rows: usize,
    /// Number of board columns
    #[arg(long, default_value_t = TetrisConfig::DEFAULT_NUM_COLS)]
    cols: usize,
    /// Lines to clear per level
    #[arg(long, default_value_t = TetrisConfig::DEFAULT_LINES_PER_LEVEL)]
    lines_per_level: u32,
    /// Shape queue policy
    #[arg(long, value_enum, default_value_t = PolicyArg::SevenBag)]
    policy: PolicyArg,
    /// Seed for the shape queue as hex (random if omitted)
    #[arg(long, value_parser = parse_seed)]
    seed: Option<ShapeSeed>,
}

impl Default for BoardArg {
    fn default() -> Self {
        Self {
            rows: TetrisConfig::DEFAULT_NUM_ROWS,
            cols: TetrisConfig::DEFAULT_NUM_COLS,
            lines_per_level: TetrisConfig::DEFAULT_LINES_PER_LEVEL,
            policy: PolicyArg::default(),
            seed: None,
        }
    }
}

impl BoardArg {
    fn settings(&self) -> GameSettings {
        GameSettings {
            rows: self.rows,
            cols: self.cols,
            policy: self.policy.into(),
            lines_per_level: self.lines_per_level,
        }
    }

    /// Seed for game `index`: consecutive seeds from `--seed`, otherwise random.
    fn seed_for(&self, index: u64) -> ShapeSeed {
        match self.seed {
            Some(seed) => {
                let base = u128::from_be_bytes(seed.to_bytes());
                ShapeSeed::from_bytes(base.wrapping_add(u128::from(index)).to_be_bytes())
            }
            None => rand::random(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_args() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "simulate",
            "--rows",
            "12",
            "--policy",
            "uniform",
            "--seed",
            "ff",
        ])
        .unwrap();
        let Some(Mode::Simulate(arg)) = args.mode else {
            panic!("expected simulate");
        };
        let settings = arg.board.settings();
        assert_eq!(settings.rows, 12);
        assert_eq!(settings.cols, 10);
        assert_eq!(settings.policy, QueuePolicy::Uniform);
        assert_eq!(arg.board.seed_for(1), ShapeSeed::from_hex("100").unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_seed() {
        let result = CommandArgs::try_parse_from(["blockfall", "show", "--seed", "xyz"]);
        assert!(result.is_err());
    }
}
