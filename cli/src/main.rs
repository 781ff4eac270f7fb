//! `storefront` binary: reads the startup configuration once, picks the
//! backend, and runs one command.

mod app;
mod backend;
mod cli;
mod mock;
mod render;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    app::init_logging(args.verbose, args.quiet);

    let config = args.config();
    tracing::debug!(?config, "startup configuration");
    let api = Arc::new(backend::connect(&config));
    app::run(api, args.command).await
}
