mod command;
mod driver;
mod render;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
