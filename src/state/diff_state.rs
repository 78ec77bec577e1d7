use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::git::types::FileDelta;
use crate::highlight::HighlightSpan;
use crate::rows::{build_diff_rows, DiffRow, RowCache, RowCacheKey};

use super::selection::{DragState, LineSelection};

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub ignore_whitespace: bool,
}

pub struct DiffState {
    pub options: ViewOptions,
    pub deltas: Vec<FileDelta>,
    /// Bumped whenever a new diff result is applied; part of the row-cache
    /// identity and the staleness check for highlight results.
    pub diff_rev: u64,
    pub selected_file: Option<usize>,
    pub loading: bool,

    /// Per-file persisted line selections, keyed by path so they survive
    /// a diff refresh that reorders the file list.
    pub selections: HashMap<PathBuf, LineSelection>,
    pub selection_rev: u64,
    /// In-flight drag gesture, if any.
    pub drag: DragState,
    /// Hunk header under the mouse; cleared while dragging.
    pub hovered_hunk: Option<usize>,

    pub scroll_offset: usize,
    pub cursor_row: usize,
    pub viewport_height: usize,

    /// Per-line highlight spans for the old side, indexed by 0-based line number.
    pub old_highlights: Vec<Vec<HighlightSpan>>,
    /// Per-line highlight spans for the new side, indexed by 0-based line number.
    pub new_highlights: Vec<Vec<HighlightSpan>>,

    row_cache: RowCache,
}

impl DiffState {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            options,
            deltas: Vec::new(),
            diff_rev: 0,
            selected_file: None,
            loading: false,
            selections: HashMap::new(),
            selection_rev: 0,
            drag: DragState::Idle,
            hovered_hunk: None,
            scroll_offset: 0,
            cursor_row: 0,
            viewport_height: 20,
            old_highlights: Vec::new(),
            new_highlights: Vec::new(),
            row_cache: RowCache::default(),
        }
    }

    pub fn selected_delta(&self) -> Option<&FileDelta> {
        self.selected_file.and_then(|i| self.deltas.get(i))
    }

    /// Persisted selection for the currently displayed file.
    pub fn current_selection(&self) -> LineSelection {
        self.selected_delta()
            .and_then(|d| self.selections.get(&d.path))
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the displayed file's selection with a new value.
    pub fn set_current_selection(&mut self, selection: LineSelection) {
        let Some(path) = self.selected_delta().map(|d| d.path.clone()) else {
            return;
        };
        self.selections.insert(path, selection);
        self.selection_rev += 1;
    }

    /// Display rows for the selected file, rebuilt only when the diff,
    /// the persisted selection or the drag state changed.
    pub fn rows(&self) -> Rc<Vec<DiffRow>> {
        let Some(file) = self.selected_file else {
            return Rc::new(Vec::new());
        };
        let Some(delta) = self.deltas.get(file) else {
            return Rc::new(Vec::new());
        };
        let key = RowCacheKey {
            diff_rev: self.diff_rev,
            file,
            selection_rev: self.selection_rev,
            drag: self.drag.selection().copied(),
        };
        let selection = self.current_selection();
        let drag = self.drag.selection().copied();
        self.row_cache
            .rows(key, || build_diff_rows(&delta.hunks, &selection, drag.as_ref()))
    }

    /// Apply a freshly computed diff, dropping selections for files that
    /// no longer appear in it.
    pub fn apply_deltas(&mut self, deltas: Vec<FileDelta>) {
        self.selections
            .retain(|path, _| deltas.iter().any(|d| &d.path == path));
        self.deltas = deltas;
        self.diff_rev += 1;
        self.drag = DragState::Idle;
        self.row_cache.invalidate();
        if let Some(i) = self.selected_file {
            if i >= self.deltas.len() {
                self.selected_file = if self.deltas.is_empty() { None } else { Some(0) };
                self.scroll_offset = 0;
                self.cursor_row = 0;
            }
        }
    }
}
