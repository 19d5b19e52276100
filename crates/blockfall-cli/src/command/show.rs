use anyhow::Context as _;
use blockfall_engine::Shape;

use crate::{driver, render};

use super::BoardArg;

fn parse_shapes(s: &str) -> Result<Vec<Shape>, String> {
    s.chars()
        .map(|c| Shape::from_char(c).ok_or_else(|| format!("unknown shape: {c}")))
        .collect()
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ShowArg {
    #[clap(flatten)]
    board: BoardArg,
    /// Number of pieces to place
    #[arg(long, default_value_t = 10)]
    pieces: usize,
    /// Shape letters to force as upcoming shapes, cyclically (e.g. "ITO")
    #[arg(long)]
    shapes: Option<String>,
}

pub(crate) fn run(arg: &ShowArg) -> anyhow::Result<()> {
    let seed = arg.board.seed_for(0);
    let shapes = match &arg.shapes {
        Some(s) => parse_shapes(s).map_err(anyhow::Error::msg)?,
        None => vec![],
    };
    let state = driver::play_shapes(arg.board.settings(), seed, &shapes, arg.pieces)
        .with_context(|| format!("Failed to play {} pieces", arg.pieces))?;

    println!("seed {seed}");
    print!("{}", render::render_board(&state));
    println!("{}", render::render_status(&state));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shapes() {
        assert_eq!(
            parse_shapes("ITo").unwrap_err(),
            "unknown shape: o".to_string()
        );
        assert_eq!(parse_shapes("SZ").unwrap(), vec![Shape::S, Shape::Z]);
    }
}
