use clap::Parser;
use tracing_subscriber::EnvFilter;

use streamlens::cli::{self, Cli};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("streamlens=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(error) = cli::run(cli).await {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}
