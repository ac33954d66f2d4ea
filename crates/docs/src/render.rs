//! Event documentation entries and the formatters that lay them out.

use herald_events::{Publisher, Registry};
use serde::Serialize;

use crate::config::{DocStyle, DocsConfig};
use crate::text::fill_text;

/// Documentation of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDoc {
    pub name: String,
    /// Rendered parameter list, e.g. `first, second=null, *rest`.
    pub parameters: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub declared_by: String,
}

impl EventDoc {
    /// Entry title: the name, followed by ` : parameters` when there are any.
    pub fn title(&self) -> String {
        if self.parameters.is_empty() {
            self.name.clone()
        } else {
            format!("{} : {}", self.name, self.parameters)
        }
    }
}

/// Documentation entries of every event visible on `P`, in registry order.
pub fn collect<P: Publisher>() -> Vec<EventDoc> {
    Registry::<P>::of()
        .iter()
        .map(|decl| EventDoc {
            name: decl.name().to_string(),
            parameters: decl.signature().to_string(),
            description: decl.doc().map(crate::text::clean),
            declared_by: decl.declared_by().to_string(),
        })
        .collect()
}

/// Lays out a block of event documentation.
pub trait Formatter {
    /// Render `events` as a block of lines joined with `\n`, without a
    /// trailing newline.
    fn render(&self, events: &[EventDoc], config: &DocsConfig) -> String;
}

/// Section-style layout:
///
/// ```text
/// Events
/// ------
/// on_normal_args : first, second
///     This event takes two normal arguments.
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyFormatter;

impl Formatter for PrettyFormatter {
    fn render(&self, events: &[EventDoc], config: &DocsConfig) -> String {
        let mut lines = vec![
            config.heading.clone(),
            "-".repeat(config.heading.chars().count()),
        ];

        if events.is_empty() {
            lines.push(config.empty.clone());
        }
        for (i, event) in events.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(event.title());
            if let Some(description) = &event.description {
                lines.extend(fill_text(description, config.width, config.indent));
            }
        }

        lines.join("\n")
    }
}

/// Field-list layout for reStructuredText tooling:
///
/// ```text
/// :events:
///     **on_normal_args** : first, second
///         This event takes two normal arguments.
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SphinxFormatter;

impl Formatter for SphinxFormatter {
    fn render(&self, events: &[EventDoc], config: &DocsConfig) -> String {
        let entry_indent = " ".repeat(config.indent);
        let mut lines = vec![format!(":{}:", config.heading.to_lowercase())];

        if events.is_empty() {
            lines.push(format!("{entry_indent}{}", config.empty));
        }
        for (i, event) in events.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            let title = if event.parameters.is_empty() {
                format!("{entry_indent}**{}**", event.name)
            } else {
                format!("{entry_indent}**{}** : {}", event.name, event.parameters)
            };
            lines.push(title);
            if let Some(description) = &event.description {
                lines.extend(fill_text(
                    description,
                    config.width,
                    config.indent.saturating_mul(2),
                ));
            }
        }

        lines.join("\n")
    }
}

impl DocStyle {
    /// Formatter implementing this style.
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            Self::Pretty => Box::new(PrettyFormatter),
            Self::Sphinx => Box::new(SphinxFormatter),
        }
    }
}
