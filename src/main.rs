mod api;
mod cli;
mod error;
mod filters;
mod matrix;
mod models;
mod query;
mod render;
mod summary;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting DriverLens - DriverLog status dashboard client");
    cli.execute().await?;

    Ok(())
}
