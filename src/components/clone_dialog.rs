use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::state::clone_state::CloneField;
use crate::state::AppState;

use super::text_input::render_text_input;

pub fn render_clone_dialog(frame: &mut Frame, state: &AppState) {
    let dialog = &state.clone_dialog;
    let theme = &state.theme;
    let area = frame.area();
    let dialog_width = 64.min(area.width.saturating_sub(4));
    let dialog_height = 11.min(area.height.saturating_sub(4));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Clone Repository ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // url label
            Constraint::Length(1), // url input
            Constraint::Length(1), // directory label
            Constraint::Length(1), // directory input
            Constraint::Length(1), // blank
            Constraint::Length(1), // account / status line
            Constraint::Length(1), // error line
            Constraint::Length(1), // blank
            Constraint::Length(1), // key hints
        ])
        .split(inner);

    let label_style = Style::default().fg(theme.text_muted);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(" Repository URL", label_style))),
        rows[0],
    );
    render_text_input(
        frame,
        rows[1],
        dialog.url.text(),
        dialog.url.cursor_char_index(),
        field_style(state, CloneField::Url),
        dialog.focus == Some(CloneField::Url),
    );

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(" Destination", label_style))),
        rows[2],
    );
    render_text_input(
        frame,
        rows[3],
        dialog.directory.text(),
        dialog.directory.cursor_char_index(),
        field_style(state, CloneField::Directory),
        dialog.focus == Some(CloneField::Directory),
    );

    // Account match or clone progress
    let status = if dialog.cloning {
        Line::from(Span::styled(
            " Cloning...",
            Style::default().fg(theme.warning),
        ))
    } else if let Some(ref login) = dialog.resolved_login {
        Line::from(vec![
            Span::styled(" account: ", label_style),
            Span::styled(
                login.as_str(),
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(Span::styled(" account: anonymous", label_style))
    };
    frame.render_widget(Paragraph::new(status), rows[5]);

    if let Some(ref error) = dialog.error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {}", error.message()),
                Style::default().fg(theme.error),
            ))),
            rows[6],
        );
    }

    let submit_style = if dialog.can_submit() {
        Style::default()
            .fg(theme.success)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let hints = Line::from(vec![
        Span::styled(" [Enter]", submit_style),
        Span::styled("clone  ", label_style),
        Span::styled(
            "[Tab]",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("field  ", label_style),
        Span::styled(
            "[Esc]",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("cancel", label_style),
    ]);
    frame.render_widget(Paragraph::new(hints), rows[8]);
}

fn field_style(state: &AppState, field: CloneField) -> Style {
    if state.clone_dialog.focus == Some(field) {
        Style::default().fg(state.theme.text)
    } else {
        Style::default().fg(state.theme.text_muted)
    }
}
