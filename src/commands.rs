//! Command handlers behind the `herald` subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use herald_docs::{collect, document, DocStyle, DocsConfig};
use herald_events::Publisher;
use tracing::info;

use crate::cli::Sample;
use crate::demo::{self, SmartThermostat, Thermostat};

/// Resolve layout settings: defaults, then `config`, then environment, then `style`.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or an override is invalid.
pub fn resolve_config(config: Option<&Path>, style: Option<DocStyle>) -> Result<DocsConfig> {
    let mut resolved = match config {
        Some(path) => DocsConfig::load(path)
            .with_context(|| format!("Failed to load docs config {}", path.display()))?,
        None => DocsConfig::default(),
    };
    resolved
        .apply_env_vars()
        .context("Invalid HERALD_DOCS_* environment override")?;
    if let Some(style) = style {
        resolved.style = style;
    }
    Ok(resolved)
}

/// Render the documentation of `sample`, as text or as JSON entries.
///
/// # Errors
///
/// Returns an error if JSON serialization fails or the publisher has no description.
pub fn docs(sample: Sample, config: &DocsConfig, json: bool) -> Result<String> {
    match sample {
        Sample::Thermostat => render::<Thermostat>(config, json),
        Sample::Smart => render::<SmartThermostat>(config, json),
    }
}

fn render<P: Publisher>(config: &DocsConfig, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(&collect::<P>())
            .context("Failed to serialize event entries");
    }
    document::<P>(config)
        .with_context(|| format!("{} has no description", std::any::type_name::<P>()))
}

/// Run the scripted walkthrough and return its transcript.
///
/// # Errors
///
/// Returns an error if any dispatch step fails.
pub fn demo() -> Result<String> {
    let transcript = demo::run().context("Demo walkthrough failed")?;
    info!(lines = transcript.len(), "Demo finished");
    Ok(transcript.join("\n"))
}
