//! Text helpers: indentation cleanup, paragraph filling and placeholder
//! substitution.

use itertools::Itertools;

use crate::config::DocsConfig;
use crate::render::{EventDoc, Formatter};

/// Strip surrounding blank lines and the common indentation of `text`.
///
/// The first line is only stripped of its leading whitespace, so text that
/// starts right after an opening quote lines up with the rest. Trailing
/// whitespace inside lines is kept.
pub fn clean(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().map(str::trim_start).unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    let margin = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len().saturating_sub(line.trim_start().len()))
        .min()
        .unwrap_or(0);

    let dedented = std::iter::once(first).chain(rest.iter().copied().map(|line| {
        if line.trim().is_empty() {
            ""
        } else {
            line.get(margin..).unwrap_or(line)
        }
    }));

    let lines: Vec<&str> = dedented.collect();
    let start = lines.iter().position(|line| !line.is_empty());
    let end = lines.iter().rposition(|line| !line.is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines.get(start..=end).unwrap_or_default().join("\n"),
        _ => String::new(),
    }
}

/// Split cleaned text into paragraphs, each folded onto a single line.
///
/// Lines of a paragraph are trimmed and joined with one space; spacing
/// inside a line is preserved.
pub fn paragraphs(text: &str) -> Vec<String> {
    clean(text)
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .split(|line| line.is_empty())
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Fill one paragraph to `width` columns, every line indented by `indent`.
///
/// Whitespace between words is kept as written, except at line breaks.
/// A word longer than the available room gets a line of its own.
pub fn fill(paragraph: &str, width: usize, indent: usize) -> Vec<String> {
    let prefix = " ".repeat(indent);
    let chunks = paragraph.chars().chunk_by(|c| c.is_whitespace());
    let runs: Vec<(bool, String)> = chunks
        .into_iter()
        .map(|(blank, run)| (blank, run.collect()))
        .collect();

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut gap = "";
    for (blank, run) in &runs {
        if *blank {
            gap = run.as_str();
            continue;
        }
        if line.is_empty() {
            line = format!("{prefix}{run}");
        } else {
            let needed = line
                .chars()
                .count()
                .saturating_add(gap.chars().count())
                .saturating_add(run.chars().count());
            if needed > width {
                lines.push(std::mem::replace(&mut line, format!("{prefix}{run}")));
            } else {
                line.push_str(gap);
                line.push_str(run);
            }
        }
        gap = "";
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Fill every paragraph of `text`, separating paragraphs with a blank line.
pub fn fill_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    paragraphs(text)
        .iter()
        .map(|paragraph| fill(paragraph, width, indent))
        .collect::<Vec<_>>()
        .join(&String::new())
}

/// Replace placeholder lines of `text` with the rendered events block.
///
/// A placeholder line is one holding nothing but `config.placeholder`; the
/// block takes over its indentation. Text without a placeholder comes back
/// cleaned and otherwise unchanged.
pub fn render_description(text: &str, events: &[EventDoc], config: &DocsConfig) -> String {
    render_description_with(text, events, config, &*config.style.formatter())
}

/// Like [`render_description`], with an explicit formatter.
pub fn render_description_with(
    text: &str,
    events: &[EventDoc],
    config: &DocsConfig,
    formatter: &dyn Formatter,
) -> String {
    let cleaned = clean(text);
    if !cleaned
        .lines()
        .any(|line| line.trim() == config.placeholder)
    {
        return cleaned;
    }

    let block = formatter.render(events, config);
    cleaned
        .lines()
        .map(|line| {
            if line.trim() == config.placeholder {
                let indentation = line.get(..line.len().saturating_sub(line.trim_start().len()));
                let indentation = indentation.unwrap_or_default();
                block
                    .lines()
                    .map(|rendered| {
                        if rendered.is_empty() {
                            String::new()
                        } else {
                            format!("{indentation}{rendered}")
                        }
                    })
                    .join("\n")
            } else {
                line.to_string()
            }
        })
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_margin_and_blank_edges() {
        let text = " \n    First line.\n      indented\n\n    Last line.  \n    ";
        assert_eq!(clean(text), "First line.\n  indented\n\nLast line.  ");
    }

    #[test]
    fn test_clean_first_line_inline() {
        assert_eq!(clean(" Called when it happens. "), "Called when it happens. ");
        assert_eq!(clean(""), "");
        assert_eq!(clean("\n   \n"), "");
    }

    #[test]
    fn test_paragraphs_join_lines() {
        let text = " Called when it happens.  Line wrapping \n        should work.\n\n        Second one. ";
        assert_eq!(
            paragraphs(text),
            vec![
                "Called when it happens.  Line wrapping should work.".to_string(),
                "Second one.".to_string(),
            ]
        );
    }

    #[test]
    fn test_fill_keeps_double_spaces_and_breaks_at_width() {
        let paragraph = "Called when the second kind of event happens.  Line wrapping should work and no weird spaces should be inserted.";
        assert_eq!(
            fill(paragraph, 72, 4),
            vec![
                "    Called when the second kind of event happens.  Line wrapping should",
                "    work and no weird spaces should be inserted.",
            ]
        );
    }

    #[test]
    fn test_fill_long_word_gets_own_line() {
        assert_eq!(
            fill("a supercalifragilistic b", 10, 2),
            vec!["  a", "  supercalifragilistic", "  b"]
        );
        assert!(fill("", 10, 2).is_empty());
    }

    #[test]
    fn test_fill_text_separates_paragraphs() {
        assert_eq!(fill_text("one\n\ntwo", 72, 4), vec!["    one", "", "    two"]);
    }

    #[test]
    fn test_description_without_placeholder_is_only_cleaned() {
        let text = "\n    Summary.\n\n    Details.\n    ";
        let rendered = render_description(text, &[], &DocsConfig::default());
        assert_eq!(rendered, "Summary.\n\nDetails.");
    }

    #[test]
    fn test_placeholder_keeps_indentation() {
        let text = "Summary.\n\n  {events}\n\nDetails.";
        let rendered = render_description(text, &[], &DocsConfig::default());
        assert_eq!(
            rendered,
            "Summary.\n\n  Events\n  ------\n  None defined.\n\nDetails."
        );
    }
}
