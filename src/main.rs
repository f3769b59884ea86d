use anyhow::Result;
use clap::Parser;
use drukbank::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
