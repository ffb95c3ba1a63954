mod api;
mod cli;
mod config;
mod dialogs;
mod logging;

use anyhow::Result;
use clap::Parser; // needed for Cli::parse()
use std::sync::Arc;
use tokio::runtime::Runtime;

use cli::commands::run_cli;
use cli::opts::Cli;
use config::AppConfig;

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init();

    // Resolved once; every command and the server share this value.
    let config = Arc::new(AppConfig::from_cli(&args));

    let rt = Runtime::new()?;
    rt.block_on(run_cli(args, config))
}
