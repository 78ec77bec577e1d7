use crate::state::selection::LineSelection;
use crate::theme::Theme;

use super::{CloneDialogState, DiffState, FileListState, ViewOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    FileList,
    DiffView,
}

/// A command behind a context-menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    DiscardLine(usize),
    DiscardHunk(usize),
    StageSelection,
    ClearSelection,
}

#[derive(Debug, Clone)]
pub struct ContextMenuItem {
    pub label: String,
    pub command: MenuCommand,
}

/// Popup menu of (label, command) pairs anchored at a screen position.
#[derive(Debug, Default)]
pub struct ContextMenuState {
    pub open: bool,
    pub selected: usize,
    pub items: Vec<ContextMenuItem>,
    pub anchor: (u16, u16),
}

impl ContextMenuState {
    pub fn open_at(&mut self, anchor: (u16, u16), items: Vec<ContextMenuItem>) {
        self.open = true;
        self.selected = 0;
        self.items = items;
        self.anchor = anchor;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.items.clear();
    }

    pub fn selected_command(&self) -> Option<MenuCommand> {
        self.items.get(self.selected).map(|i| i.command)
    }
}

/// A discard waiting for the user's confirmation.
#[derive(Debug, Clone)]
pub struct PendingDiscard {
    pub file: usize,
    pub selection: LineSelection,
}

pub struct AppState {
    pub focus: FocusPanel,
    pub diff: DiffState,
    pub files: FileListState,
    pub clone_dialog: CloneDialogState,
    pub context_menu: ContextMenuState,
    pub pending_discard: Option<PendingDiscard>,
    pub should_quit: bool,
    pub status_message: Option<(String, bool)>, // (message, is_error)
    pub target_label: String,
    /// True when viewing anything but the working tree; selection and
    /// discard requests are dropped in this mode.
    pub read_only: bool,
    pub theme: Theme,
}

impl AppState {
    pub fn new(options: ViewOptions, theme: Theme) -> Self {
        Self {
            focus: FocusPanel::FileList,
            diff: DiffState::new(options),
            files: FileListState::new(),
            clone_dialog: CloneDialogState::default(),
            context_menu: ContextMenuState::default(),
            pending_discard: None,
            should_quit: false,
            status_message: None,
            target_label: String::new(),
            read_only: false,
            theme,
        }
    }
}
