mod cli;
mod desktop;
mod logging;
mod tui;

fn main() -> anyhow::Result<()> {
    cli::run()
}
