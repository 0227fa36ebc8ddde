//! SeeTest Cloud command-line client
//!
//! # Usage
//!
//! ```bash
//! export SEETEST_URL=https://cloud.example.com
//! export SEETEST_TOKEN=eyJ...
//!
//! # Names of available iOS devices in one lab
//! seetest available --location Bangalore --os ios
//!
//! # Sorted table of every device
//! seetest overview
//!
//! # Reserve two devices for the morning
//! seetest reserve 12 14 --start 2024-05-01-09-00-00 --end 2024-05-01-12-00-00
//! ```

mod args;
mod commands;
mod output;

use args::Cli;
use clap::Parser;
use seetest_cloud::CloudClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .init();

    if let Err(e) = run(cli).await {
        output::print_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = commands::resolve_config(&cli.connection)?;
    let client = CloudClient::new(&config)?;
    commands::run(cli.command, &client, cli.json).await
}
