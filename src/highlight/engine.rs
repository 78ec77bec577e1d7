use std::collections::HashMap;
use std::path::Path;

use ratatui::style::Style;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter};

use super::languages::{configuration, detect_language, LANGUAGE_NAMES};
use super::theme::{highlight_names_vec, style_for_highlight};

/// A styled byte range within one line.
#[derive(Debug, Clone)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

pub struct HighlightEngine {
    configs: HashMap<&'static str, HighlightConfiguration>,
}

impl HighlightEngine {
    pub fn new() -> Self {
        let highlight_names = highlight_names_vec();
        let mut configs = HashMap::new();
        for &name in LANGUAGE_NAMES {
            if let Some(config) = configuration(name, &highlight_names) {
                configs.insert(name, config);
            }
        }
        Self { configs }
    }

    /// Tokenize `content` and return spans per 0-based line.
    /// None when the file's language is not recognized.
    pub fn highlight_lines(&self, path: &Path, content: &str) -> Option<Vec<Vec<HighlightSpan>>> {
        let lang = detect_language(path)?;
        let config = self.configs.get(lang)?;

        let mut highlighter = Highlighter::new();
        let events = highlighter
            .highlight(config, content.as_bytes(), None, |_| None)
            .ok()?;

        let lines: Vec<&str> = content.split('\n').collect();
        let mut result: Vec<Vec<HighlightSpan>> = vec![Vec::new(); lines.len()];
        let mut current_style = Style::default();

        for event in events {
            match event.ok()? {
                HighlightEvent::Source { start, end } => {
                    push_spans(&lines, &mut result, start, end, current_style);
                }
                HighlightEvent::HighlightStart(highlight) => {
                    current_style = style_for_highlight(highlight.0);
                }
                HighlightEvent::HighlightEnd => {
                    current_style = Style::default();
                }
            }
        }

        Some(result)
    }
}

/// Distribute a styled byte range over the lines it crosses.
fn push_spans(
    lines: &[&str],
    result: &mut [Vec<HighlightSpan>],
    start: usize,
    end: usize,
    style: Style,
) {
    if start >= end {
        return;
    }

    let mut line_start = 0;
    for (idx, line) in lines.iter().enumerate() {
        let line_end = line_start + line.len();

        if start < line_end + 1 && end > line_start {
            let span_start = start.saturating_sub(line_start).min(line.len());
            let span_end = (end - line_start).min(line.len());
            if span_start < span_end && idx < result.len() {
                result[idx].push(HighlightSpan {
                    start: span_start,
                    end: span_end,
                    style,
                });
            }
        }

        if line_start > end {
            break;
        }
        // +1 for the newline separator
        line_start = line_end + 1;
    }
}
