use std::ops::Range;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use similar::{DiffOp, TextDiff};

use crate::git::types::FileDelta;
use crate::highlight::HighlightSpan;
use crate::rows::{DiffRow, RowLine};
use crate::state::{AppState, FocusPanel};
use crate::theme::Theme;

use super::Component;

const GUTTER_WIDTH: usize = 5;

pub struct DiffView;

impl Component for DiffView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let is_focused = state.focus == FocusPanel::DiffView;
        let theme = &state.theme;

        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let Some(delta) = state.diff.selected_delta() else {
            let block = Block::default()
                .title(" Diff ")
                .borders(Borders::ALL)
                .border_style(border_style);
            let content = if state.diff.loading {
                " Loading..."
            } else if state.diff.deltas.is_empty() {
                " No changes detected"
            } else {
                " Select a file to view diff"
            };
            let paragraph = Paragraph::new(content)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let title = format_title(delta);

        if delta.binary {
            let block = Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style);
            let msg = Paragraph::new(" Binary file differs")
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let outer_block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = outer_block.inner(area);
        frame.render_widget(outer_block, area);

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        let rows = state.diff.rows();
        let height = inner.height as usize;
        let scroll = state.diff.scroll_offset;

        let mut left: Vec<Line> = Vec::with_capacity(height);
        let mut right: Vec<Line> = Vec::with_capacity(height);

        for (display_row, row) in rows.iter().enumerate().skip(scroll).take(height) {
            let cursor = is_focused && display_row == state.diff.cursor_row;
            match row {
                DiffRow::HunkHeader { content, hunk } => {
                    let hovered = state.diff.hovered_hunk == Some(*hunk);
                    let line = hunk_header_line(content, hovered, theme);
                    left.push(line.clone());
                    right.push(line);
                }
                DiffRow::Context {
                    content,
                    old_lineno,
                    new_lineno,
                    ..
                } => {
                    left.push(side_line(
                        content,
                        Some(*old_lineno),
                        SideKind::Context,
                        false,
                        cursor,
                        &[],
                        highlight_for(&state.diff.old_highlights, *old_lineno),
                        theme,
                    ));
                    right.push(side_line(
                        content,
                        Some(*new_lineno),
                        SideKind::Context,
                        false,
                        cursor,
                        &[],
                        highlight_for(&state.diff.new_highlights, *new_lineno),
                        theme,
                    ));
                }
                DiffRow::Deleted(line) => {
                    left.push(removed_line(line, cursor, &[], state, theme));
                    right.push(blank_line(theme));
                }
                DiffRow::Added(line) => {
                    left.push(blank_line(theme));
                    right.push(added_line(line, cursor, &[], state, theme));
                }
                DiffRow::Modified {
                    deleted,
                    added,
                    display_diff,
                } => {
                    let (del_ranges, add_ranges) = if *display_diff {
                        changed_ranges(&deleted.content, &added.content)
                    } else {
                        (Vec::new(), Vec::new())
                    };
                    left.push(removed_line(deleted, cursor, &del_ranges, state, theme));
                    right.push(added_line(added, cursor, &add_ranges, state, theme));
                }
            }
        }

        frame.render_widget(Paragraph::new(left), halves[0]);
        frame.render_widget(Paragraph::new(right), halves[1]);
    }
}

fn format_title(delta: &FileDelta) -> String {
    let path_display = delta.path.to_string_lossy();
    match &delta.old_path {
        Some(old_path) if *old_path != delta.path => {
            format!(" {} \u{2192} {} ", old_path.to_string_lossy(), path_display)
        }
        _ => format!(" {path_display} "),
    }
}

fn highlight_for(highlights: &[Vec<HighlightSpan>], lineno: u32) -> &[HighlightSpan] {
    lineno
        .checked_sub(1)
        .and_then(|i| highlights.get(i as usize))
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}

#[derive(Clone, Copy, PartialEq)]
enum SideKind {
    Context,
    Added,
    Deleted,
}

fn removed_line<'a>(
    line: &RowLine,
    cursor: bool,
    emphasis: &[Range<usize>],
    state: &AppState,
    theme: &Theme,
) -> Line<'a> {
    side_line(
        &line.content,
        Some(line.lineno),
        SideKind::Deleted,
        line.selected,
        cursor,
        emphasis,
        highlight_for(&state.diff.old_highlights, line.lineno),
        theme,
    )
}

fn added_line<'a>(
    line: &RowLine,
    cursor: bool,
    emphasis: &[Range<usize>],
    state: &AppState,
    theme: &Theme,
) -> Line<'a> {
    side_line(
        &line.content,
        Some(line.lineno),
        SideKind::Added,
        line.selected,
        cursor,
        emphasis,
        highlight_for(&state.diff.new_highlights, line.lineno),
        theme,
    )
}

fn blank_line<'a>(theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        " ".repeat(GUTTER_WIDTH + 1),
        Style::default().fg(theme.text_muted),
    ))
}

fn hunk_header_line<'a>(content: &str, hovered: bool, theme: &Theme) -> Line<'a> {
    let mut style = Style::default().fg(theme.hunk_header_fg);
    if hovered {
        style = style.bg(theme.hunk_header_hover_bg).add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(" ".repeat(GUTTER_WIDTH), style),
        Span::styled(format!(" {content}"), style),
    ])
}

/// Compose one half of a data row: gutter line number, then the content
/// with syntax spans, diff background, selection and intra-line emphasis.
#[allow(clippy::too_many_arguments)]
fn side_line<'a>(
    content: &str,
    lineno: Option<u32>,
    kind: SideKind,
    selected: bool,
    cursor: bool,
    emphasis: &[Range<usize>],
    syntax: &[HighlightSpan],
    theme: &Theme,
) -> Line<'a> {
    let (base_fg, row_bg, emphasis_bg) = match kind {
        SideKind::Context => (theme.diff_context_fg, None, None),
        SideKind::Added => (
            theme.diff_add_fg,
            Some(theme.diff_add_bg),
            Some(theme.diff_add_emphasis_bg),
        ),
        SideKind::Deleted => (
            theme.diff_del_fg,
            Some(theme.diff_del_bg),
            Some(theme.diff_del_emphasis_bg),
        ),
    };
    let row_bg = if selected {
        Some(theme.line_selected_bg)
    } else {
        row_bg
    };

    let gutter_text = match lineno {
        Some(n) => format!("{n:>width$}", width = GUTTER_WIDTH),
        None => " ".repeat(GUTTER_WIDTH),
    };
    let gutter_style = if cursor {
        Style::default().fg(Color::Black).bg(theme.accent)
    } else if selected {
        Style::default().fg(theme.text).bg(theme.line_selected_bg)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let mut spans = vec![Span::styled(gutter_text, gutter_style)];
    let marker = match kind {
        SideKind::Added => "+",
        SideKind::Deleted => "-",
        SideKind::Context => " ",
    };
    spans.push(Span::styled(
        marker.to_string(),
        apply_bg(Style::default().fg(base_fg), row_bg),
    ));
    spans.extend(content_spans(
        content, base_fg, row_bg, emphasis_bg, emphasis, syntax,
    ));
    Line::from(spans)
}

fn apply_bg(style: Style, bg: Option<Color>) -> Style {
    match bg {
        Some(color) => style.bg(color),
        None => style,
    }
}

/// Split content into styled spans. Styles are resolved per byte run:
/// syntax color wins the foreground, emphasis wins the background.
fn content_spans<'a>(
    content: &str,
    base_fg: Color,
    row_bg: Option<Color>,
    emphasis_bg: Option<Color>,
    emphasis: &[Range<usize>],
    syntax: &[HighlightSpan],
) -> Vec<Span<'a>> {
    let mut spans: Vec<Span> = Vec::new();
    let mut run = String::new();
    let mut run_style: Option<Style> = None;

    for (byte_idx, c) in content.char_indices() {
        let fg = syntax
            .iter()
            .find(|s| s.start <= byte_idx && byte_idx < s.end)
            .and_then(|s| s.style.fg)
            .unwrap_or(base_fg);
        let emphasized = emphasis.iter().any(|r| r.contains(&byte_idx));
        let bg = if emphasized { emphasis_bg.or(row_bg) } else { row_bg };
        let style = apply_bg(Style::default().fg(fg), bg);

        match run_style {
            Some(prev) if prev == style => run.push(c),
            Some(prev) => {
                spans.push(Span::styled(std::mem::take(&mut run), prev));
                run.push(c);
                run_style = Some(style);
            }
            None => {
                run.push(c);
                run_style = Some(style);
            }
        }
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }
    spans
}

/// Byte ranges that differ between the two sides of a balanced modified
/// pair, for intra-line emphasis.
pub fn changed_ranges(old: &str, new: &str) -> (Vec<Range<usize>>, Vec<Range<usize>>) {
    let diff = TextDiff::from_chars(old, new);
    let old_chars: Vec<usize> = old.char_indices().map(|(i, _)| i).collect();
    let new_chars: Vec<usize> = new.char_indices().map(|(i, _)| i).collect();

    let byte_range = |chars: &[usize], text: &str, range: Range<usize>| -> Range<usize> {
        let start = chars.get(range.start).copied().unwrap_or(text.len());
        let end = chars.get(range.end).copied().unwrap_or(text.len());
        start..end
    };

    let mut old_ranges = Vec::new();
    let mut new_ranges = Vec::new();
    for op in diff.ops() {
        match *op {
            DiffOp::Delete {
                old_index, old_len, ..
            } => old_ranges.push(byte_range(&old_chars, old, old_index..old_index + old_len)),
            DiffOp::Insert {
                new_index, new_len, ..
            } => new_ranges.push(byte_range(&new_chars, new, new_index..new_index + new_len)),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                old_ranges.push(byte_range(&old_chars, old, old_index..old_index + old_len));
                new_ranges.push(byte_range(&new_chars, new, new_index..new_index + new_len));
            }
            DiffOp::Equal { .. } => {}
        }
    }
    (old_ranges, new_ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_ranges_isolate_the_edit() {
        let (old, new) = changed_ranges("let x = 1;", "let x = 2;");
        assert_eq!(old, vec![8..9]);
        assert_eq!(new, vec![8..9]);
    }

    #[test]
    fn identical_lines_have_no_ranges() {
        let (old, new) = changed_ranges("same", "same");
        assert!(old.is_empty());
        assert!(new.is_empty());
    }
}
