use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::{AppState, FocusPanel};

use super::Component;

pub struct FileList;

impl Component for FileList {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let is_focused = state.focus == FocusPanel::FileList;
        let theme = &state.theme;

        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let total = state.files.entries.len();
        let block = Block::default()
            .title(format!(" Files ({total}) "))
            .borders(Borders::ALL)
            .border_style(border_style);

        if state.files.entries.is_empty() {
            let msg = if state.diff.loading {
                " Loading..."
            } else {
                " No changes"
            };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;
        let max_display_width = inner_width.saturating_sub(3); // "▶ " prefix
        let selected = state.files.selected;

        let scroll = if selected >= inner_height {
            selected - inner_height + 1
        } else {
            0
        };

        let lines: Vec<Line> = state
            .files
            .entries
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_height)
            .map(|(idx, entry)| {
                let is_selected = idx == selected;
                let is_active = state.diff.selected_file == Some(entry.delta_index);

                let style = if is_selected {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                        .bg(theme.selection_bg)
                } else if is_active {
                    Style::default().fg(theme.text).bg(theme.surface)
                } else {
                    Style::default().fg(theme.text)
                };

                let prefix = if is_selected { "\u{25b6}" } else { " " };

                // Truncate from the left so the filename stays visible
                let char_count = entry.display.chars().count();
                let display = if char_count > max_display_width && max_display_width > 1 {
                    let skip = char_count - (max_display_width - 1);
                    let truncated: String = entry.display.chars().skip(skip).collect();
                    format!("\u{2026}{truncated}")
                } else {
                    entry.display.clone()
                };

                Line::from(vec![
                    Span::styled(format!("{prefix} "), style),
                    Span::styled(display, style),
                ])
            })
            .collect();

        let scroll_info = if total > inner_height {
            format!(" {}/{} ", selected + 1, total)
        } else {
            String::new()
        };

        let block = block.title_bottom(Line::from(scroll_info).right_aligned());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
