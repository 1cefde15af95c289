//! hotel-cancel - command-line entry point

use clap::Parser;
use hotel_cancel::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotel_cancel=info".into()),
        )
        .init();

    run(Cli::parse())
}
