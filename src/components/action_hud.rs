use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::{AppState, FocusPanel};

use super::Component;

pub struct ActionHud;

impl Component for ActionHud {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;

        // A status message preempts the key hints until it expires
        if let Some((ref msg, is_error)) = state.status_message {
            let color = if is_error { theme.error } else { theme.success };
            let bar = Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(msg.as_str(), Style::default().fg(color)),
            ]))
            .style(Style::default().bg(theme.surface));
            frame.render_widget(bar, area);
            return;
        }

        let bindings: &[(&str, &str)] = if state.diff.drag.is_dragging() {
            &[
                ("j/k", "extend"),
                ("Enter", "apply"),
                ("Esc", "cancel"),
            ]
        } else if state.read_only {
            &[("q", "quit"), ("j/k", "nav"), ("c", "clone"), ("w", "ws")]
        } else if state.focus == FocusPanel::DiffView {
            &[
                ("q", "quit"),
                ("j/k", "scroll"),
                ("v/drag", "select"),
                ("s", "stage"),
                ("u", "unstage"),
                ("x", "clear"),
                ("right-click", "menu"),
                ("c", "clone"),
                ("w", "ws"),
                ("h", "files"),
            ]
        } else {
            &[
                ("q", "quit"),
                ("j/k", "nav"),
                ("Enter", "diff"),
                ("s", "stage file"),
                ("u", "unstage"),
                ("c", "clone"),
                ("w", "ws"),
                ("R", "refresh"),
            ]
        };

        let mut spans = Vec::new();
        spans.push(Span::raw(" "));
        for (i, (key, desc)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                (*desc).to_string(),
                Style::default().fg(theme.text_muted),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
