use std::path::{Path, PathBuf};

use crate::git::url::parse_repository_url;

use super::TextBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneField {
    Url,
    Directory,
}

/// Errors surfaced inline in the clone dialog. `DestinationExists` is a
/// named state because it also gates submission; everything else is a
/// message to display and move on from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneDialogError {
    DestinationExists,
    Other(String),
}

impl CloneDialogError {
    pub fn message(&self) -> String {
        match self {
            CloneDialogError::DestinationExists => {
                "destination already exists, pick another path".to_string()
            }
            CloneDialogError::Other(msg) => msg.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CloneDialogState {
    pub open: bool,
    pub url: TextBuffer,
    pub directory: TextBuffer,
    pub focus: Option<CloneField>,
    /// Once the user edits the directory by hand we stop deriving it
    /// from the URL.
    pub directory_edited: bool,
    /// Token for the in-flight existence probe; only a result carrying
    /// the latest token may land.
    pub probe_generation: u64,
    pub error: Option<CloneDialogError>,
    pub cloning: bool,
    /// Login of the account matched against the URL host, display only.
    pub resolved_login: Option<String>,
}

impl CloneDialogState {
    pub fn open_dialog(&mut self, prefill_url: Option<&str>) {
        *self = Self {
            open: true,
            focus: Some(CloneField::Url),
            ..Self::default()
        };
        if let Some(url) = prefill_url {
            self.url.set(url);
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn focused_input(&mut self) -> Option<&mut TextBuffer> {
        match self.focus? {
            CloneField::Url => Some(&mut self.url),
            CloneField::Directory => Some(&mut self.directory),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = Some(match self.focus {
            Some(CloneField::Url) => CloneField::Directory,
            _ => CloneField::Url,
        });
    }

    /// Re-derive the destination from the URL unless the user took over.
    /// Returns the new destination path when it changed, so the caller can
    /// fire an existence probe for it.
    pub fn sync_directory_from_url(&mut self, default_dir: &Path) -> Option<PathBuf> {
        if self.directory_edited {
            return None;
        }
        let derived = parse_repository_url(self.url.text())
            .map(|id| default_dir.join(id.name))
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        if derived == self.directory.text() {
            return None;
        }
        self.directory.set(&derived);
        (!derived.is_empty()).then(|| PathBuf::from(derived))
    }

    /// Hand-editing the directory pins it and invalidates any
    /// destination-exists verdict for the previous value.
    pub fn mark_directory_edited(&mut self) {
        self.directory_edited = true;
        if self.error == Some(CloneDialogError::DestinationExists) {
            self.error = None;
        }
    }

    /// Bump the probe token for a new path check.
    pub fn next_probe_generation(&mut self) -> u64 {
        self.probe_generation += 1;
        self.probe_generation
    }

    /// Fold a probe result in; stale generations are dropped untouched.
    pub fn apply_probe_result(&mut self, generation: u64, exists: bool) {
        if generation != self.probe_generation {
            return;
        }
        if exists {
            self.error = Some(CloneDialogError::DestinationExists);
        } else if self.error == Some(CloneDialogError::DestinationExists) {
            self.error = None;
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.cloning
            && !self.url.text().trim().is_empty()
            && !self.directory.text().trim().is_empty()
            && self.error != Some(CloneDialogError::DestinationExists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_follows_url_until_edited() {
        let mut dialog = CloneDialogState::default();
        dialog.open_dialog(None);
        dialog.url.set("https://github.com/rust-lang/cargo");

        let derived = dialog.sync_directory_from_url(Path::new("/home/me/src"));
        assert_eq!(derived, Some(PathBuf::from("/home/me/src/cargo")));
        assert_eq!(dialog.directory.text(), "/home/me/src/cargo");

        dialog.mark_directory_edited();
        dialog.url.set("https://github.com/rust-lang/rustup");
        assert_eq!(dialog.sync_directory_from_url(Path::new("/home/me/src")), None);
        assert_eq!(dialog.directory.text(), "/home/me/src/cargo");
    }

    #[test]
    fn unparseable_url_clears_derived_directory() {
        let mut dialog = CloneDialogState::default();
        dialog.open_dialog(None);
        dialog.url.set("https://github.com/rust-lang/cargo");
        dialog.sync_directory_from_url(Path::new("/src"));
        dialog.url.set("nonsense");
        assert_eq!(dialog.sync_directory_from_url(Path::new("/src")), None);
        assert_eq!(dialog.directory.text(), "");
    }

    #[test]
    fn stale_probe_results_never_land() {
        let mut dialog = CloneDialogState::default();
        dialog.open_dialog(None);
        let old = dialog.next_probe_generation();
        let new = dialog.next_probe_generation();

        // The older probe answers last, out of order
        dialog.apply_probe_result(new, false);
        dialog.apply_probe_result(old, true);
        assert_eq!(dialog.error, None);
    }

    #[test]
    fn destination_exists_blocks_submission_until_path_changes() {
        let mut dialog = CloneDialogState::default();
        dialog.open_dialog(None);
        dialog.url.set("https://github.com/a/b");
        dialog.directory.set("/tmp/b");

        let generation = dialog.next_probe_generation();
        dialog.apply_probe_result(generation, true);
        assert_eq!(dialog.error, Some(CloneDialogError::DestinationExists));
        assert!(!dialog.can_submit());

        dialog.mark_directory_edited();
        assert_eq!(dialog.error, None);
        assert!(dialog.can_submit());
    }

    #[test]
    fn submission_requires_both_fields() {
        let mut dialog = CloneDialogState::default();
        dialog.open_dialog(Some("https://github.com/a/b"));
        assert!(!dialog.can_submit());
        dialog.directory.set("/tmp/b");
        assert!(dialog.can_submit());
        dialog.cloning = true;
        assert!(!dialog.can_submit());
    }
}
