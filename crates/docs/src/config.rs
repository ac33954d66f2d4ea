//! Documentation layout settings
//!
//! # Hierarchy
//!
//! Settings are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. A TOML file passed to [`DocsConfig::load`]
//! 3. Environment variables: `HERALD_DOCS_*`
//! 4. CLI flags
//!
//! # Example Config
//!
//! ```toml
//! style = "sphinx"
//! heading = "Signals"
//! width = 80
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Layout used for the events block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStyle {
    #[default]
    Pretty,
    Sphinx,
}

impl DocStyle {
    /// Style name as written in config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Sphinx => "sphinx",
        }
    }
}

impl fmt::Display for DocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "sphinx" => Ok(Self::Sphinx),
            other => Err(Error::invalid_config(format!(
                "unknown style '{other}' (expected 'pretty' or 'sphinx')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    pub style: DocStyle,
    pub heading: String,
    pub width: usize,
    pub indent: usize,
    pub placeholder: String,
    pub empty: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            style: DocStyle::Pretty,
            heading: "Events".to_string(),
            width: 72,
            indent: 4,
            placeholder: "{events}".to_string(),
            empty: "None defined.".to_string(),
        }
    }
}

impl DocsConfig {
    /// Parse settings from TOML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed or a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML is malformed
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), style = %config.style, "Loaded docs config");
        Ok(config)
    }

    /// Apply `HERALD_DOCS_STYLE` and `HERALD_DOCS_WIDTH` from the environment.
    ///
    /// # Errors
    ///
    /// Returns error if a variable holds an invalid value.
    pub fn apply_env_vars(&mut self) -> Result<()> {
        self.apply_overrides(std::env::vars())
    }

    /// Apply `HERALD_DOCS_*` overrides from key/value pairs; other keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if an override holds an invalid value.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "HERALD_DOCS_STYLE" => self.style = value.parse()?,
                "HERALD_DOCS_WIDTH" => {
                    self.width = value.trim().parse().map_err(|e| {
                        Error::invalid_config(format!("HERALD_DOCS_WIDTH '{value}': {e}"))
                    })?;
                }
                _ => {}
            }
        }
        self.validate()
    }

    /// Check that the layout can be rendered.
    ///
    /// # Errors
    ///
    /// Returns error if the heading or placeholder is empty, or the width
    /// leaves no room for text after the deepest indentation.
    pub fn validate(&self) -> Result<()> {
        if self.heading.trim().is_empty() {
            return Err(Error::invalid_config("heading must not be empty"));
        }
        if self.placeholder.trim().is_empty() {
            return Err(Error::invalid_config("placeholder must not be empty"));
        }
        if self.width <= self.indent.saturating_mul(2) {
            return Err(Error::invalid_config(format!(
                "width {} must exceed twice the indent ({})",
                self.width, self.indent
            )));
        }
        Ok(())
    }
}
