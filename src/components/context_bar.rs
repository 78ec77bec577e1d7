use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::AppState;

use super::Component;

pub struct ContextBar;

impl Component for ContextBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let ws_label = if state.diff.options.ignore_whitespace {
            "[ws:off]"
        } else {
            "[ws:on]"
        };

        let mut spans = vec![
            Span::styled(
                " stagediff ",
                Style::default().fg(Color::Black).bg(theme.accent),
            ),
            Span::raw("  "),
            Span::styled(
                &state.target_label,
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" \u{2192} ", Style::default().fg(theme.text_muted)),
            Span::styled(
                "working tree",
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(ws_label, Style::default().fg(theme.text_muted)),
        ];

        if state.read_only {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                "[read-only]",
                Style::default().fg(theme.warning),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
