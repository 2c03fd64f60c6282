use anyhow::Context;
use clap::Parser;
use merra_catalog::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("merra-catalog failed")
}
