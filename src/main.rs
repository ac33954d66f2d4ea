//! # herald
//!
//! Command line entry point.
//!
//! - `herald docs` prints the rendered event documentation of a sample publisher
//! - `herald demo` runs a scripted connect/handle/notify walkthrough
//!
//! Logs go to stderr and honour `RUST_LOG`; command output goes to stdout.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use herald::cli::{Cli, Commands};
use herald::commands;

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = match cli.command {
        Commands::Docs {
            publisher,
            style,
            config,
            json,
        } => {
            let config = commands::resolve_config(config.as_deref(), style)?;
            info!(?publisher, style = %config.style, json, "Rendering docs");
            commands::docs(publisher, &config, json)?
        }
        Commands::Demo => commands::demo()?,
    };

    println!("{output}");
    Ok(())
}

/// Initialize tracing subscriber.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
