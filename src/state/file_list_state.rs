use crate::git::types::FileDelta;

#[derive(Debug)]
pub struct FileEntry {
    pub display: String,
    pub delta_index: usize,
}

/// The changed-files panel on the left.
#[derive(Debug, Default)]
pub struct FileListState {
    pub selected: usize,
    pub entries: Vec<FileEntry>,
}

impl FileListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_from_deltas(&mut self, deltas: &[FileDelta]) {
        self.entries = deltas
            .iter()
            .enumerate()
            .map(|(i, d)| FileEntry {
                display: format!(
                    "{} [{}] +{} -{}",
                    d.path.to_string_lossy(),
                    d.status.label(),
                    d.additions,
                    d.deletions
                ),
                delta_index: i,
            })
            .collect();
        if !self.entries.is_empty() {
            self.selected = self.selected.min(self.entries.len() - 1);
        } else {
            self.selected = 0;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1).min(self.entries.len() - 1);
        }
    }

    pub fn selected_delta_index(&self) -> Option<usize> {
        self.entries.get(self.selected).map(|e| e.delta_index)
    }
}
