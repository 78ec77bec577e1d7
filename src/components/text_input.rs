use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render a single-line text input with a visible cursor, scrolling
/// horizontally so the cursor always stays inside the area.
pub fn render_text_input(
    frame: &mut Frame,
    area: Rect,
    text: &str,
    cursor_char: usize,
    style: Style,
    show_cursor: bool,
) {
    if area.width < 3 || area.height == 0 {
        return;
    }
    // 1 char left padding, 1 char cursor slack on the right
    let inner_width = (area.width as usize).saturating_sub(2);
    if inner_width == 0 {
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let cursor_char = cursor_char.min(chars.len());
    let skip = cursor_char.saturating_sub(inner_width.saturating_sub(1));

    let before: String = chars[skip..cursor_char].iter().collect();
    let at: Option<char> = chars.get(cursor_char).copied();
    let after: String = chars
        .iter()
        .skip(cursor_char + 1)
        .take(inner_width.saturating_sub(before.chars().count() + 1))
        .collect();

    let mut spans = vec![Span::raw(" "), Span::styled(before, style)];
    if show_cursor {
        spans.push(Span::styled(
            at.map(String::from).unwrap_or_else(|| " ".to_string()),
            style.add_modifier(Modifier::REVERSED),
        ));
    } else if let Some(c) = at {
        spans.push(Span::styled(String::from(c), style));
    }
    spans.push(Span::styled(after, style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
