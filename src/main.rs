//! snipvault - personal code snippet repository
//!
//! Command-line entry point. Parses arguments, loads configuration, installs
//! the file logger and hands off to the CLI commands.

use clap::Parser;
use color_eyre::Result;
use snipvault::cli::{self, Cli};
use snipvault::{Config, logging};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    let config = Config::load(args.config.as_deref(), args.data_dir.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{:#}", e))?;

    logging::init(&config);

    if let Err(err) = cli::execute(&args, &config) {
        cli::print_error(&err);
        std::process::exit(1);
    }

    Ok(())
}
