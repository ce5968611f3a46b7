use anyhow::Result;
use clap::Parser;

use grokview_app::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    grokview_app::run(Cli::parse()).await
}
