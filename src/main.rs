use clap::Parser;
use polarmill::cli::{run, Cli};
use polarmill::init_logging;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;

    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{}", output);

    Ok(())
}
