use buoy_charts::cli::{run, Cli};
use buoy_charts::error::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
