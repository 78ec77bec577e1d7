use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::state::AppState;

/// Popup list of actions anchored near the pointer position.
pub fn render_context_menu(frame: &mut Frame, state: &AppState) {
    let menu = &state.context_menu;
    if menu.items.is_empty() {
        return;
    }
    let theme = &state.theme;
    let area = frame.area();

    let width = menu
        .items
        .iter()
        .map(|i| i.label.chars().count() as u16 + 4)
        .max()
        .unwrap_or(20)
        .min(area.width.saturating_sub(2));
    let height = (menu.items.len() as u16 + 2).min(area.height.saturating_sub(2));

    // Keep the popup on screen, flipping above the anchor when needed
    let (anchor_x, anchor_y) = menu.anchor;
    let x = anchor_x.min(area.width.saturating_sub(width));
    let y = if anchor_y + height <= area.height {
        anchor_y
    } else {
        anchor_y.saturating_sub(height)
    };
    let menu_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, menu_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(menu_area);
    frame.render_widget(block, menu_area);

    let lines: Vec<Line> = menu
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let style = if idx == menu.selected {
                Style::default()
                    .fg(theme.accent)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(Span::styled(format!(" {} ", item.label), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
