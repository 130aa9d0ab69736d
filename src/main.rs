use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = passgen::cli::Cli::parse();
    cli.run()
}
