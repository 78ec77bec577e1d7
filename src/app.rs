use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::cell::Cell;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::action::Action;
use crate::components::action_hud::ActionHud;
use crate::components::clone_dialog::render_clone_dialog;
use crate::components::context_bar::ContextBar;
use crate::components::context_menu::render_context_menu;
use crate::components::diff_view::DiffView;
use crate::components::discard_confirm::render_discard_confirm;
use crate::components::file_list::FileList;
use crate::components::Component;
use crate::config::{self, StagediffConfig};
use crate::event::{map_key_to_action, Event, EventReader, KeyContext};
use crate::git::patch::format_patch;
use crate::git::remote::{resolve_account, CloneUrlResolver, KnownHostResolver};
use crate::git::types::ComparisonTarget;
use crate::git::url::parse_repository_url;
use crate::git::GitCli;
use crate::rows::{run_containing, run_starting_at, DiffRow};
use crate::state::app_state::{ContextMenuItem, MenuCommand, PendingDiscard};
use crate::state::clone_state::CloneDialogError;
use crate::state::selection::{
    is_line_selected, step, DragEvent, DragState, LineSelection, SelectionIntent,
};
use crate::state::{AppState, FocusPanel, ViewOptions};
use crate::tui::Tui;
use crate::workers::{
    CloneRequest, CloneWorker, DiffRequest, DiffWorker, HighlightRequest, HighlightWorker,
    PathProbe, ProbeRequest,
};

/// An opened repository and the workers bound to it.
struct RepoSession {
    worker: DiffWorker,
    git: GitCli,
}

impl RepoSession {
    fn new(path: PathBuf) -> Self {
        let git = GitCli::new(&path);
        let worker = DiffWorker::new(path);
        Self { worker, git }
    }
}

pub struct App {
    state: AppState,
    session: Option<RepoSession>,
    target: ComparisonTarget,
    diff_generation: u64,
    highlight_generation: u64,
    probe: PathProbe,
    highlighter: HighlightWorker,
    cloner: CloneWorker,
    config: StagediffConfig,
    url_resolver: KnownHostResolver,
    status_clear_countdown: u32,
    file_list_area: Cell<Rect>,
    diff_area: Cell<Rect>,
    /// Column the active drag started in; later rows resolve their
    /// selection key against the same side.
    drag_prefers_old: bool,
}

impl App {
    pub fn new(
        options: ViewOptions,
        target: ComparisonTarget,
        repo_path: Option<PathBuf>,
        config: StagediffConfig,
        clone_url: Option<String>,
    ) -> Self {
        let theme = config.theme.clone();
        let mut state = AppState::new(options, theme);
        state.target_label = target.label();
        state.read_only = !target.is_workdir();

        let mut app = Self {
            state,
            session: repo_path.map(RepoSession::new),
            target,
            diff_generation: 0,
            highlight_generation: 0,
            probe: PathProbe::new(),
            highlighter: HighlightWorker::new(),
            cloner: CloneWorker::new(),
            config,
            url_resolver: KnownHostResolver,
            status_clear_countdown: 0,
            file_list_area: Cell::new(Rect::default()),
            diff_area: Cell::new(Rect::default()),
            drag_prefers_old: false,
        };

        if let Some(url) = clone_url {
            app.state
                .clone_dialog
                .open_dialog((!url.is_empty()).then_some(url.as_str()));
            app.after_clone_edit(true);
        }
        app
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        if self.session.is_some() {
            self.request_diff();
        }

        let mut events = EventReader::new(Duration::from_millis(50));

        let context_bar = ContextBar;
        let file_list = FileList;
        let diff_view = DiffView;
        let action_hud = ActionHud;

        loop {
            self.poll_diff_results();
            self.poll_highlight_results();
            self.poll_probe_results();
            self.poll_clone_results();

            let term_size = terminal.size()?;
            self.state.diff.viewport_height = term_size.height.saturating_sub(4) as usize;

            terminal.draw(|frame| {
                let outer = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Min(3),
                        Constraint::Length(1),
                    ])
                    .split(frame.area());

                context_bar.render(frame, outer[0], &self.state);

                let main = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
                    .split(outer[1]);

                self.file_list_area.set(main[0]);
                self.diff_area.set(main[1]);
                file_list.render(frame, main[0], &self.state);
                diff_view.render(frame, main[1], &self.state);

                action_hud.render(frame, outer[2], &self.state);

                // Modal overlays, in priority order
                if self.state.clone_dialog.open {
                    render_clone_dialog(frame, &self.state);
                }
                if self.state.context_menu.open {
                    render_context_menu(frame, &self.state);
                }
                if self.state.pending_discard.is_some() {
                    render_discard_confirm(frame, &self.state);
                }
            })?;

            // Wait for at least one event, then drain everything pending
            // so buffered scroll events don't lag the UI.
            let first = events.next().await;
            let mut pending = Vec::new();
            if let Some(ev) = first {
                pending.push(ev);
            }
            while let Some(ev) = events.try_next() {
                pending.push(ev);
            }

            // Coalesce consecutive scrolls into net movement
            let mut scroll_delta: i32 = 0;
            let mut actions: Vec<Action> = Vec::new();

            for event in pending {
                let ctx = KeyContext {
                    focus: self.state.focus,
                    clone_dialog_open: self.state.clone_dialog.open,
                    discard_confirm_open: self.state.pending_discard.is_some(),
                    context_menu_open: self.state.context_menu.open,
                    selecting: self.state.diff.drag.is_dragging(),
                    read_only: self.state.read_only,
                };
                let action = match event {
                    Event::Key(key) => map_key_to_action(key, &ctx),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize => Some(Action::Resize),
                    Event::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    match action {
                        Action::ScrollUp => scroll_delta -= 1,
                        Action::ScrollDown => scroll_delta += 1,
                        other => actions.push(other),
                    }
                }
            }

            if scroll_delta < 0 {
                for _ in 0..(-scroll_delta) {
                    self.update(Action::ScrollUp);
                }
            } else {
                for _ in 0..scroll_delta {
                    self.update(Action::ScrollDown);
                }
            }

            for action in actions {
                self.update(action);
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn request_diff(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.diff_generation += 1;
        self.state.diff.loading = true;
        session.worker.request(DiffRequest {
            generation: self.diff_generation,
            target: self.target.clone(),
            options: self.state.diff.options.clone(),
        });
    }

    /// Kick off tokenization for the displayed file. The bumped generation
    /// is the snapshot: any result carrying an older one is stale.
    fn request_highlight(&mut self) {
        self.highlight_generation += 1;
        let Some(delta) = self.state.diff.selected_delta() else {
            self.state.diff.old_highlights.clear();
            self.state.diff.new_highlights.clear();
            return;
        };
        self.highlighter.request(HighlightRequest {
            generation: self.highlight_generation,
            delta: delta.clone(),
        });
    }

    fn poll_diff_results(&mut self) {
        let mut results = Vec::new();
        if let Some(session) = self.session.as_mut() {
            while let Some(result) = session.worker.try_recv() {
                results.push(result);
            }
        }
        let mut applied = false;
        for result in results {
            if result.generation < self.diff_generation {
                continue;
            }
            self.state.diff.loading = false;
            match result.deltas {
                Ok(deltas) => {
                    self.state.files.update_from_deltas(&deltas);
                    self.state.diff.apply_deltas(deltas);
                    if self.state.diff.selected_file.is_none() && !self.state.diff.deltas.is_empty()
                    {
                        self.state.diff.selected_file = Some(0);
                    }
                    applied = true;
                }
                Err(e) => {
                    self.state.diff.apply_deltas(Vec::new());
                    self.state.files.update_from_deltas(&[]);
                    self.set_status(format!("Diff failed: {e}"), true);
                }
            }
        }
        if applied {
            self.request_highlight();
        }
    }

    fn poll_highlight_results(&mut self) {
        while let Some(result) = self.highlighter.try_recv() {
            // Inputs changed since this run was issued; keep prior tokens
            if result.generation != self.highlight_generation {
                continue;
            }
            self.state.diff.old_highlights = result.old;
            self.state.diff.new_highlights = result.new;
        }
    }

    fn poll_probe_results(&mut self) {
        while let Some(result) = self.probe.try_recv() {
            self.state
                .clone_dialog
                .apply_probe_result(result.generation, result.exists);
        }
    }

    fn poll_clone_results(&mut self) {
        while let Some(outcome) = self.cloner.try_recv() {
            self.state.clone_dialog.cloning = false;
            match outcome.result {
                Ok(()) => {
                    self.state.clone_dialog.close();
                    self.set_status(format!("Cloned into {}", outcome.dest.display()), false);
                    self.open_repo(outcome.dest);
                }
                Err(e) => {
                    self.state.clone_dialog.error = Some(CloneDialogError::Other(e));
                }
            }
        }
    }

    /// Switch the app to a freshly cloned repository.
    fn open_repo(&mut self, path: PathBuf) {
        self.session = Some(RepoSession::new(path));
        self.target = ComparisonTarget::WorkdirVsHead;
        self.state.target_label = self.target.label();
        self.state.read_only = false;
        self.state.diff.apply_deltas(Vec::new());
        self.state.files.update_from_deltas(&[]);
        self.state.diff.selected_file = None;
        self.request_diff();
    }

    fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.state.should_quit = true;
            }
            Action::Tick => {
                if self.status_clear_countdown > 0 {
                    self.status_clear_countdown -= 1;
                    if self.status_clear_countdown == 0 {
                        self.state.status_message = None;
                    }
                }
            }
            Action::Resize => {}

            Action::FileUp => {
                self.state.files.select_up();
                self.sync_selected_file();
            }
            Action::FileDown => {
                self.state.files.select_down();
                self.sync_selected_file();
            }
            Action::FileTop => {
                self.state.files.selected = 0;
                self.sync_selected_file();
            }
            Action::FileBottom => {
                let len = self.state.files.entries.len();
                if len > 0 {
                    self.state.files.selected = len - 1;
                }
                self.sync_selected_file();
            }
            Action::SelectFile(idx) => {
                if let Some(pos) = self
                    .state
                    .files
                    .entries
                    .iter()
                    .position(|e| e.delta_index == idx)
                {
                    self.state.files.selected = pos;
                }
                self.sync_selected_file();
                self.state.focus = FocusPanel::FileList;
            }

            Action::FocusFileList => {
                self.state.focus = FocusPanel::FileList;
            }
            Action::FocusDiffView => {
                self.state.focus = FocusPanel::DiffView;
                let vh = self.state.diff.viewport_height;
                let scroll = self.state.diff.scroll_offset;
                if self.state.diff.cursor_row < scroll || self.state.diff.cursor_row >= scroll + vh
                {
                    self.state.diff.cursor_row = scroll;
                }
            }

            Action::ScrollUp => {
                self.state.diff.cursor_row = self.state.diff.cursor_row.saturating_sub(1);
                if self.state.diff.cursor_row < self.state.diff.scroll_offset {
                    self.state.diff.scroll_offset = self.state.diff.cursor_row;
                }
            }
            Action::ScrollDown => {
                let max = self.state.diff.rows().len().saturating_sub(1);
                if self.state.diff.cursor_row < max {
                    self.state.diff.cursor_row += 1;
                }
                let vh = self.state.diff.viewport_height;
                if self.state.diff.cursor_row >= self.state.diff.scroll_offset + vh {
                    self.state.diff.scroll_offset = self.state.diff.cursor_row - vh + 1;
                }
            }
            Action::ScrollPageUp => {
                let vh = self.state.diff.viewport_height;
                self.state.diff.cursor_row = self.state.diff.cursor_row.saturating_sub(vh);
                self.state.diff.scroll_offset = self.state.diff.scroll_offset.saturating_sub(vh);
            }
            Action::ScrollPageDown => {
                let vh = self.state.diff.viewport_height;
                let max = self.state.diff.rows().len().saturating_sub(1);
                self.state.diff.cursor_row = (self.state.diff.cursor_row + vh).min(max);
                if self.state.diff.cursor_row >= self.state.diff.scroll_offset + vh {
                    self.state.diff.scroll_offset = self.state.diff.cursor_row - vh + 1;
                }
            }
            Action::ScrollToTop => {
                self.state.diff.cursor_row = 0;
                self.state.diff.scroll_offset = 0;
            }
            Action::ScrollToBottom => {
                let max = self.state.diff.rows().len().saturating_sub(1);
                self.state.diff.cursor_row = max;
                let vh = self.state.diff.viewport_height;
                self.state.diff.scroll_offset = max.saturating_sub(vh.saturating_sub(1));
            }

            Action::ToggleWhitespace => {
                self.state.diff.options.ignore_whitespace =
                    !self.state.diff.options.ignore_whitespace;
                self.request_diff();
            }
            Action::RefreshDiff => {
                self.request_diff();
            }

            // Pointer selection gesture
            Action::DragBegin { row } => {
                if self.state.read_only {
                    return;
                }
                let Some(index) = self.index_for_row(row, self.drag_prefers_old) else {
                    return;
                };
                let selection = self.state.diff.current_selection();
                let intent = if is_line_selected(&selection, None, index) {
                    SelectionIntent::Deselect
                } else {
                    SelectionIntent::Select
                };
                let (next, _) = step(self.state.diff.drag, DragEvent::Begin { line: index, intent });
                self.state.diff.drag = next;
                // Hover affordances are suppressed for the whole drag
                self.state.diff.hovered_hunk = None;
                self.state.focus = FocusPanel::DiffView;
                self.state.diff.cursor_row = row;
            }
            Action::DragMove { row } => {
                if !self.state.diff.drag.is_dragging() {
                    return;
                }
                let Some(index) = self.index_for_row(row, self.drag_prefers_old) else {
                    return;
                };
                let (next, _) = step(self.state.diff.drag, DragEvent::MoveTo { line: index });
                self.state.diff.drag = next;
                self.state.diff.cursor_row = row;
            }
            Action::DragRelease | Action::ApplySelection => {
                let (next, edit) = step(self.state.diff.drag, DragEvent::Release);
                self.state.diff.drag = next;
                // Without a writable target the transient range just dissolves
                if let Some(edit) = edit {
                    if !self.state.read_only {
                        let selection = self.state.diff.current_selection().apply(&edit);
                        self.state.diff.set_current_selection(selection);
                    }
                }
            }
            Action::CancelSelection => {
                self.state.diff.drag = DragState::Idle;
            }
            Action::Hover { row } => {
                if self.state.diff.drag.is_dragging() {
                    return;
                }
                self.state.diff.hovered_hunk = row.and_then(|r| {
                    match self.state.diff.rows().get(r) {
                        Some(DiffRow::HunkHeader { hunk, .. }) => Some(*hunk),
                        _ => None,
                    }
                });
            }

            // Keyboard gesture over the same state machine
            Action::EnterSelectMode => {
                if self.state.read_only {
                    return;
                }
                let row = self.state.diff.cursor_row;
                self.update(Action::DragBegin { row });
            }
            Action::ExtendSelectionUp => {
                let row = self.state.diff.cursor_row.saturating_sub(1);
                if row < self.state.diff.scroll_offset {
                    self.state.diff.scroll_offset = row;
                }
                self.update(Action::DragMove { row });
            }
            Action::ExtendSelectionDown => {
                let max = self.state.diff.rows().len().saturating_sub(1);
                let row = (self.state.diff.cursor_row + 1).min(max);
                let vh = self.state.diff.viewport_height;
                if row >= self.state.diff.scroll_offset + vh {
                    self.state.diff.scroll_offset = row - vh + 1;
                }
                self.update(Action::DragMove { row });
            }
            Action::ClearSelection => {
                if !self.state.read_only {
                    self.state.diff.set_current_selection(LineSelection::none());
                }
            }

            Action::StageSelection => {
                self.stage_selection();
            }
            Action::StageFile => {
                let Some(path) = self.selected_file_path() else {
                    return;
                };
                let result = self.session.as_ref().map(|s| s.git.stage_file(&path));
                match result {
                    Some(Ok(())) => {
                        self.set_status(format!("Staged: {}", path.display()), false);
                        self.request_diff();
                    }
                    Some(Err(e)) => self.set_status(format!("Stage failed: {e}"), true),
                    None => {}
                }
            }
            Action::UnstageFile => {
                let Some(path) = self.selected_file_path() else {
                    return;
                };
                let result = self.session.as_ref().map(|s| s.git.unstage_file(&path));
                match result {
                    Some(Ok(())) => {
                        self.set_status(format!("Unstaged: {}", path.display()), false);
                        self.request_diff();
                    }
                    Some(Err(e)) => self.set_status(format!("Unstage failed: {e}"), true),
                    None => {}
                }
            }

            // Context menu
            Action::OpenContextMenu { row, column, line } => {
                if self.state.read_only {
                    return;
                }
                let items = self.menu_items_for_row(row);
                if items.is_empty() {
                    return;
                }
                self.state.context_menu.open_at((column, line), items);
            }
            Action::MenuUp => {
                self.state.context_menu.selected =
                    self.state.context_menu.selected.saturating_sub(1);
            }
            Action::MenuDown => {
                let len = self.state.context_menu.items.len();
                if len > 0 {
                    self.state.context_menu.selected =
                        (self.state.context_menu.selected + 1).min(len - 1);
                }
            }
            Action::MenuConfirm => {
                let command = self.state.context_menu.selected_command();
                self.state.context_menu.close();
                if let Some(command) = command {
                    self.run_menu_command(command);
                }
            }
            Action::MenuCancel => {
                self.state.context_menu.close();
            }

            Action::ConfirmDiscard => {
                self.apply_pending_discard();
            }
            Action::CancelDiscard => {
                self.state.pending_discard = None;
            }

            // Clone dialog
            Action::OpenCloneDialog => {
                self.state.clone_dialog.open_dialog(None);
            }
            Action::CancelClone => {
                self.state.clone_dialog.close();
            }
            Action::ConfirmClone => {
                self.submit_clone();
            }
            Action::CloneChar(c) => {
                if let Some(input) = self.state.clone_dialog.focused_input() {
                    input.insert_char(c);
                }
                self.after_clone_edit(self.clone_focus_is_url());
            }
            Action::CloneBackspace => {
                if let Some(input) = self.state.clone_dialog.focused_input() {
                    input.delete_back();
                }
                self.after_clone_edit(self.clone_focus_is_url());
            }
            Action::CloneDeleteWord => {
                if let Some(input) = self.state.clone_dialog.focused_input() {
                    input.delete_word_back();
                }
                self.after_clone_edit(self.clone_focus_is_url());
            }
            Action::CloneSwitchField => {
                self.state.clone_dialog.toggle_focus();
            }
            Action::CloneCursorLeft => {
                if let Some(input) = self.state.clone_dialog.focused_input() {
                    input.move_left();
                }
            }
            Action::CloneCursorRight => {
                if let Some(input) = self.state.clone_dialog.focused_input() {
                    input.move_right();
                }
            }
            Action::CloneCursorHome => {
                if let Some(input) = self.state.clone_dialog.focused_input() {
                    input.move_home();
                }
            }
            Action::CloneCursorEnd => {
                if let Some(input) = self.state.clone_dialog.focused_input() {
                    input.move_end();
                }
            }
        }
    }

    fn sync_selected_file(&mut self) {
        let next = self.state.files.selected_delta_index();
        if next != self.state.diff.selected_file {
            self.state.diff.selected_file = next;
            self.state.diff.scroll_offset = 0;
            self.state.diff.cursor_row = 0;
            self.state.diff.drag = DragState::Idle;
            self.request_highlight();
        }
    }

    fn selected_file_path(&self) -> Option<PathBuf> {
        self.state.diff.selected_delta().map(|d| d.path.clone())
    }

    fn clone_focus_is_url(&self) -> bool {
        self.state.clone_dialog.focus == Some(crate::state::clone_state::CloneField::Url)
    }

    /// Re-derive dialog state after a URL or directory edit and fire an
    /// existence probe for the (possibly new) destination.
    fn after_clone_edit(&mut self, url_edited: bool) {
        if url_edited {
            let url = self.state.clone_dialog.url.text().to_string();
            self.state.clone_dialog.resolved_login =
                resolve_account(&url, &self.config.accounts).map(|a| a.login.clone());
            let default_dir = config::default_clone_dir(&self.config);
            if let Some(path) = self.state.clone_dialog.sync_directory_from_url(&default_dir) {
                self.probe_destination(path);
            }
        } else {
            self.state.clone_dialog.mark_directory_edited();
            let text = self.state.clone_dialog.directory.text().to_string();
            if !text.is_empty() {
                self.probe_destination(PathBuf::from(text));
            }
        }
    }

    fn probe_destination(&mut self, path: PathBuf) {
        let generation = self.state.clone_dialog.next_probe_generation();
        self.probe.request(ProbeRequest { generation, path });
    }

    fn submit_clone(&mut self) {
        if !self.state.clone_dialog.can_submit() {
            return;
        }
        let typed_url = self.state.clone_dialog.url.text().trim().to_string();
        let dest = PathBuf::from(self.state.clone_dialog.directory.text().trim());

        // Account resolution failure just means an anonymous clone
        let account = resolve_account(&typed_url, &self.config.accounts);
        let url = match parse_repository_url(&typed_url) {
            Some(id) => match self.url_resolver.resolve(account, &id) {
                Ok(Some(canonical)) => canonical,
                Ok(None) => typed_url,
                Err(e) => {
                    self.state.clone_dialog.error =
                        Some(CloneDialogError::Other(format!("Clone failed: {e}")));
                    return;
                }
            },
            None => typed_url,
        };

        // Remember the directory as soon as the request goes out
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.config.default_clone_dir = Some(parent.to_path_buf());
            config::save_default_clone_dir(parent);
        }

        self.state.clone_dialog.error = None;
        self.state.clone_dialog.cloning = true;
        self.cloner.request(CloneRequest { url, dest });
    }

    fn stage_selection(&mut self) {
        if self.session.is_none() {
            return;
        }
        let Some(delta) = self.state.diff.selected_delta() else {
            return;
        };
        let selection = self.state.diff.current_selection();
        if selection.is_empty() {
            self.set_status(
                "Nothing selected; press v or drag to select lines".to_string(),
                false,
            );
            return;
        }
        let Some(patch) = format_patch(delta, &selection) else {
            return;
        };
        let result = self.session.as_ref().map(|s| s.git.stage_patch(&patch));
        match result {
            Some(Ok(())) => {
                self.state.diff.set_current_selection(LineSelection::none());
                self.set_status("Staged selected lines".to_string(), false);
                self.request_diff();
            }
            Some(Err(e)) => self.set_status(format!("Stage failed: {e}"), true),
            None => {}
        }
    }

    /// Context-menu entries for a row. Data rows offer single-line and
    /// hunk-wide discards; hunk headers offer only the hunk discard.
    fn menu_items_for_row(&self, row: usize) -> Vec<ContextMenuItem> {
        let rows = self.state.diff.rows();
        let mut items = Vec::new();
        match rows.get(row) {
            Some(DiffRow::HunkHeader { hunk, .. }) => {
                if let Some(start) = self.first_changed_line_of_hunk(*hunk) {
                    items.push(ContextMenuItem {
                        label: "Discard hunk".to_string(),
                        command: MenuCommand::DiscardHunk(start),
                    });
                }
            }
            Some(r) => {
                if let Some(index) = r.primary_index() {
                    items.push(ContextMenuItem {
                        label: "Discard changed line".to_string(),
                        command: MenuCommand::DiscardLine(index),
                    });
                    items.push(ContextMenuItem {
                        label: "Discard hunk".to_string(),
                        command: MenuCommand::DiscardHunk(index),
                    });
                }
            }
            None => {}
        }
        if !self.state.diff.current_selection().is_empty() {
            items.push(ContextMenuItem {
                label: "Stage selected lines".to_string(),
                command: MenuCommand::StageSelection,
            });
            items.push(ContextMenuItem {
                label: "Clear selection".to_string(),
                command: MenuCommand::ClearSelection,
            });
        }
        items
    }

    fn first_changed_line_of_hunk(&self, hunk: usize) -> Option<usize> {
        let delta = self.state.diff.selected_delta()?;
        let hunk = delta.hunks.get(hunk)?;
        hunk.lines
            .iter()
            .find(|l| {
                matches!(
                    l.origin,
                    crate::git::types::LineOrigin::Addition | crate::git::types::LineOrigin::Deletion
                )
            })
            .map(|l| l.index)
    }

    /// Resolve a menu command into a discard request or selection edit.
    /// Discards are requests: they park in `pending_discard` until the
    /// confirmation dialog answers.
    fn run_menu_command(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::DiscardLine(index) => {
                self.queue_discard(LineSelection::single(index));
            }
            MenuCommand::DiscardHunk(index) => {
                let Some(delta) = self.state.diff.selected_delta() else {
                    return;
                };
                let range = run_starting_at(&delta.hunks, index)
                    .or_else(|| run_containing(&delta.hunks, index));
                if let Some((from, to)) = range {
                    self.queue_discard(LineSelection::none().with_range(from, to, true));
                }
            }
            MenuCommand::StageSelection => self.stage_selection(),
            MenuCommand::ClearSelection => self.update(Action::ClearSelection),
        }
    }

    fn queue_discard(&mut self, selection: LineSelection) {
        if self.state.read_only || self.session.is_none() {
            return;
        }
        let Some(file) = self.state.diff.selected_file else {
            return;
        };
        self.state.pending_discard = Some(PendingDiscard { file, selection });
    }

    fn apply_pending_discard(&mut self) {
        let Some(pending) = self.state.pending_discard.take() else {
            return;
        };
        let Some(patch) = self
            .state
            .diff
            .deltas
            .get(pending.file)
            .and_then(|delta| format_patch(delta, &pending.selection))
        else {
            return;
        };
        let result = self.session.as_ref().map(|s| s.git.discard_patch(&patch));
        match result {
            Some(Ok(())) => {
                self.set_status("Discarded selected changes".to_string(), false);
                self.request_diff();
            }
            Some(Err(e)) => self.set_status(format!("Discard failed: {e}"), true),
            None => {}
        }
    }

    /// Map a screen position inside the diff panel to a display row and
    /// the half of the split it falls in.
    fn row_at(&self, column: u16, line: u16) -> Option<(usize, bool)> {
        let area = self.diff_area.get();
        if area.width < 3 || area.height < 3 {
            return None;
        }
        let inner_x = area.x + 1;
        let inner_y = area.y + 1;
        let inner_w = area.width - 2;
        let inner_h = area.height - 2;
        if column < inner_x
            || column >= inner_x + inner_w
            || line < inner_y
            || line >= inner_y + inner_h
        {
            return None;
        }
        let row = self.state.diff.scroll_offset + (line - inner_y) as usize;
        if row >= self.state.diff.rows().len() {
            return None;
        }
        let in_old_half = column < inner_x + inner_w / 2;
        Some((row, in_old_half))
    }

    /// Clamp a pointer position to the nearest visible display row, so a
    /// drag keeps tracking when the pointer leaves the panel.
    fn clamped_row_at(&self, line: u16) -> Option<usize> {
        let area = self.diff_area.get();
        if area.height < 3 {
            return None;
        }
        let inner_y = area.y + 1;
        let inner_h = area.height - 2;
        let offset = line.saturating_sub(inner_y).min(inner_h - 1) as usize;
        let row = self.state.diff.scroll_offset + offset;
        let last = self.state.diff.rows().len().checked_sub(1)?;
        Some(row.min(last))
    }

    /// Selection key for a display row, preferring the side the gesture
    /// started in.
    fn index_for_row(&self, row: usize, prefer_old: bool) -> Option<usize> {
        let rows = self.state.diff.rows();
        let (old, new) = rows.get(row)?.indices();
        if prefer_old {
            old.or(new)
        } else {
            new.or(old)
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            MouseEventKind::Down(MouseButton::Left) => {
                if self.state.clone_dialog.open
                    || self.state.context_menu.open
                    || self.state.pending_discard.is_some()
                {
                    return None;
                }
                if let Some(idx) = self.file_entry_at(mouse.column, mouse.row) {
                    return Some(Action::SelectFile(idx));
                }
                let (row, in_old_half) = self.row_at(mouse.column, mouse.row)?;
                self.drag_prefers_old = in_old_half;
                Some(Action::DragBegin { row })
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let row = self.clamped_row_at(mouse.row)?;
                Some(Action::DragMove { row })
            }
            // Release arrives wherever the pointer ended up, including
            // outside the diff panel; the gesture still reconciles.
            MouseEventKind::Up(MouseButton::Left) => Some(Action::DragRelease),
            MouseEventKind::Down(MouseButton::Right) => {
                let (row, _) = self.row_at(mouse.column, mouse.row)?;
                Some(Action::OpenContextMenu {
                    row,
                    column: mouse.column,
                    line: mouse.row,
                })
            }
            MouseEventKind::Moved => {
                let row = self.row_at(mouse.column, mouse.row).map(|(r, _)| r);
                Some(Action::Hover { row })
            }
            _ => None,
        }
    }

    /// Map a click inside the file-list panel to a delta index.
    fn file_entry_at(&self, column: u16, line: u16) -> Option<usize> {
        let area = self.file_list_area.get();
        if column <= area.x
            || column >= area.x + area.width.saturating_sub(1)
            || line <= area.y
            || line >= area.y + area.height.saturating_sub(1)
        {
            return None;
        }
        let inner_height = area.height.saturating_sub(2) as usize;
        let selected = self.state.files.selected;
        let scroll = if selected >= inner_height {
            selected - inner_height + 1
        } else {
            0
        };
        let clicked = scroll + (line - area.y - 1) as usize;
        self.state
            .files
            .entries
            .get(clicked)
            .map(|e| e.delta_index)
    }

    fn set_status(&mut self, msg: String, is_error: bool) {
        self.state.status_message = Some((msg, is_error));
        // ~3 seconds at the 50ms tick rate
        self.status_clear_countdown = 60;
    }
}

/// Interpret the CLI target argument.
pub fn parse_target(input: Option<&str>) -> ComparisonTarget {
    match input {
        None | Some("") => ComparisonTarget::WorkdirVsHead,
        Some(s) => match git2::Oid::from_str(s) {
            Ok(oid) if s.len() == 40 => ComparisonTarget::Commit(oid),
            _ => ComparisonTarget::Branch(s.to_string()),
        },
    }
}
