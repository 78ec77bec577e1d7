pub mod action_hud;
pub mod clone_dialog;
pub mod context_bar;
pub mod context_menu;
pub mod diff_view;
pub mod discard_confirm;
pub mod file_list;
pub mod text_input;

use ratatui::{layout::Rect, Frame};

use crate::state::AppState;

/// Trait for renderable TUI components.
pub trait Component {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);
}
