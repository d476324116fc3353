use anyhow::Result;
use clap::Parser;

use jsonconv::cli::{self, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(err) = cli::run(args) {
        cli::handle_error(&err);
        std::process::exit(1);
    }

    Ok(())
}
