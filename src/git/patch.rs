use std::fmt::Write as _;

use super::types::{FileDelta, FileStatus, LineOrigin};
use crate::state::selection::LineSelection;

const NO_NEWLINE: &str = "\\ No newline at end of file";

/// Render the subset of `delta` covered by `selection` as a unified patch
/// suitable for `git apply`.
///
/// Selected additions and deletions are kept verbatim. An unselected
/// deletion describes a line the user wants to keep, so it is demoted to
/// context; an unselected addition is dropped entirely. Hunk headers are
/// recounted to match, and hunks with no selected lines are omitted.
///
/// Returns None when the selection covers nothing in this file.
pub fn format_patch(delta: &FileDelta, selection: &LineSelection) -> Option<String> {
    let mut body = String::new();
    let mut offset: i64 = 0;
    let mut any_selected = false;

    for hunk in &delta.hunks {
        let mut lines = String::new();
        let mut old_count: u32 = 0;
        let mut new_count: u32 = 0;
        let mut hunk_selected = false;

        for line in &hunk.lines {
            let rendered = match line.origin {
                LineOrigin::Context => {
                    old_count += 1;
                    new_count += 1;
                    Some(' ')
                }
                LineOrigin::Deletion => {
                    old_count += 1;
                    if selection.contains(line.index) {
                        hunk_selected = true;
                        Some('-')
                    } else {
                        new_count += 1;
                        Some(' ')
                    }
                }
                LineOrigin::Addition => {
                    if selection.contains(line.index) {
                        hunk_selected = true;
                        new_count += 1;
                        Some('+')
                    } else {
                        None
                    }
                }
                LineOrigin::HunkHeader => None,
            };

            if let Some(prefix) = rendered {
                let _ = writeln!(lines, "{}{}", prefix, line.content);
                if line.no_newline {
                    let _ = writeln!(lines, "{NO_NEWLINE}");
                }
            }
        }

        if !hunk_selected {
            continue;
        }
        any_selected = true;

        // Pure insertions anchor after old_start, pure removals before it
        let new_start = if new_count == 0 {
            (hunk.old_start as i64 + offset - 1).max(0) as u32
        } else if old_count == 0 {
            (hunk.old_start as i64 + offset + 1).max(0) as u32
        } else {
            (hunk.old_start as i64 + offset).max(0) as u32
        };
        let _ = writeln!(
            body,
            "@@ -{},{} +{},{} @@",
            hunk.old_start, old_count, new_start, new_count
        );
        body.push_str(&lines);
        offset += new_count as i64 - old_count as i64;
    }

    if !any_selected {
        return None;
    }

    let path = delta.path.to_string_lossy();
    let old_path = delta
        .old_path
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone().into_owned());

    let mut patch = String::new();
    match delta.status {
        FileStatus::Added | FileStatus::Untracked => {
            let _ = writeln!(patch, "--- /dev/null");
            let _ = writeln!(patch, "+++ b/{path}");
        }
        FileStatus::Deleted => {
            let _ = writeln!(patch, "--- a/{old_path}");
            let _ = writeln!(patch, "+++ /dev/null");
        }
        _ => {
            let _ = writeln!(patch, "--- a/{old_path}");
            let _ = writeln!(patch, "+++ b/{path}");
        }
    }
    patch.push_str(&body);
    Some(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::types::{DiffHunk, DiffLine};
    use std::path::PathBuf;

    fn line(
        origin: LineOrigin,
        index: usize,
        old: Option<u32>,
        new: Option<u32>,
        content: &str,
    ) -> DiffLine {
        DiffLine {
            origin,
            index,
            old_lineno: old,
            new_lineno: new,
            content: content.to_string(),
            no_newline: false,
        }
    }

    /// @@ -1,3 +1,4 @@ with indices: header 0, then
    /// 1 ctx "a", 2 del "b", 3 add "B", 4 ctx "c", 5 add "d"
    fn modified_delta() -> FileDelta {
        FileDelta {
            path: PathBuf::from("src/lib.rs"),
            old_path: None,
            status: FileStatus::Modified,
            hunks: vec![DiffHunk {
                header: "@@ -1,3 +1,4 @@".to_string(),
                start_index: 0,
                old_start: 1,
                old_lines: 3,
                new_start: 1,
                new_lines: 4,
                lines: vec![
                    line(LineOrigin::Context, 1, Some(1), Some(1), "a"),
                    line(LineOrigin::Deletion, 2, Some(2), None, "b"),
                    line(LineOrigin::Addition, 3, None, Some(2), "B"),
                    line(LineOrigin::Context, 4, Some(3), Some(3), "c"),
                    line(LineOrigin::Addition, 5, None, Some(4), "d"),
                ],
            }],
            additions: 2,
            deletions: 1,
            binary: false,
        }
    }

    #[test]
    fn full_selection_reproduces_hunk() {
        let delta = modified_delta();
        let selection = LineSelection::none().with_range(2, 5, true);
        let patch = format_patch(&delta, &selection).unwrap();
        assert_eq!(
            patch,
            "--- a/src/lib.rs\n\
             +++ b/src/lib.rs\n\
             @@ -1,3 +1,4 @@\n a\n-b\n+B\n c\n+d\n"
        );
    }

    #[test]
    fn unselected_deletion_becomes_context() {
        let delta = modified_delta();
        let selection = LineSelection::single(5);
        let patch = format_patch(&delta, &selection).unwrap();
        assert_eq!(
            patch,
            "--- a/src/lib.rs\n\
             +++ b/src/lib.rs\n\
             @@ -1,3 +1,4 @@\n a\n b\n c\n+d\n"
        );
    }

    #[test]
    fn unselected_addition_is_dropped() {
        let delta = modified_delta();
        let selection = LineSelection::single(2);
        let patch = format_patch(&delta, &selection).unwrap();
        assert_eq!(
            patch,
            "--- a/src/lib.rs\n\
             +++ b/src/lib.rs\n\
             @@ -1,3 +1,2 @@\n a\n-b\n c\n"
        );
    }

    #[test]
    fn empty_selection_yields_no_patch() {
        let delta = modified_delta();
        assert!(format_patch(&delta, &LineSelection::none()).is_none());
    }

    #[test]
    fn later_hunks_shift_by_earlier_line_delta() {
        let mut delta = modified_delta();
        delta.hunks.push(DiffHunk {
            header: "@@ -10,2 +11,2 @@".to_string(),
            start_index: 6,
            old_start: 10,
            old_lines: 2,
            new_start: 11,
            new_lines: 2,
            lines: vec![
                line(LineOrigin::Context, 7, Some(10), Some(11), "x"),
                line(LineOrigin::Addition, 8, None, Some(12), "y"),
            ],
        });
        // First hunk contributes +1 line, so the second starts at 11
        let selection = LineSelection::none()
            .with_range(2, 5, true)
            .with_range(8, 8, true);
        let patch = format_patch(&delta, &selection).unwrap();
        assert!(patch.contains("@@ -10,1 +11,2 @@"));
    }

    #[test]
    fn new_file_patch_uses_dev_null() {
        let delta = FileDelta {
            path: PathBuf::from("notes.txt"),
            old_path: None,
            status: FileStatus::Untracked,
            hunks: vec![DiffHunk {
                header: "@@ -0,0 +1,1 @@".to_string(),
                start_index: 0,
                old_start: 0,
                old_lines: 0,
                new_start: 1,
                new_lines: 1,
                lines: vec![line(LineOrigin::Addition, 1, None, Some(1), "hello")],
            }],
            additions: 1,
            deletions: 0,
            binary: false,
        };
        let patch = format_patch(&delta, &LineSelection::single(1)).unwrap();
        assert_eq!(
            patch,
            "--- /dev/null\n+++ b/notes.txt\n@@ -0,0 +1,1 @@\n+hello\n"
        );
    }
}
