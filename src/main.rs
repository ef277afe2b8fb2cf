use anyhow::Result;
use clap::Parser;
use log::info;

use gapminder_explorer::cli::Cli;
use gapminder_explorer::pipeline;

fn main() -> Result<()> {
    env_logger::init();

    let config = Cli::parse().into_config()?;
    info!("Configuration\n{}", config.summary());

    pipeline::run(&config)?;
    Ok(())
}
