//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use herald_docs::DocStyle;

/// herald - declared events with shape-checked listeners
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(version)]
#[command(about = "Declared events with shape-checked listeners")]
#[command(
    long_about = "herald renders the event documentation of the bundled sample publishers and runs a scripted dispatch walkthrough."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the documentation of a sample publisher
    Docs {
        /// Publisher to document
        #[arg(short, long, value_enum, default_value_t = Sample::Thermostat)]
        publisher: Sample,

        /// Layout of the events block (pretty, sphinx)
        #[arg(short, long)]
        style: Option<DocStyle>,

        /// TOML file with layout settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the collected event entries as JSON instead
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run a scripted connect/handle/notify walkthrough
    Demo,
}

/// Sample publishers shipped with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sample {
    Thermostat,
    Smart,
}
