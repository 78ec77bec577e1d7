//! Turns a file's diff hunks into the row sequence the side-by-side view
//! renders: context rows span both columns, consecutive runs of deletions
//! and additions are paired positionally into modified rows.

use std::cell::RefCell;

use crate::git::types::{DiffHunk, LineOrigin};
use crate::state::selection::{is_line_selected, DragSelection, LineSelection};

/// One data-bearing cell of a display row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLine {
    pub content: String,
    /// Diff-relative line index; the key selections are recorded against.
    pub index: usize,
    /// File-relative line number shown in the gutter.
    pub lineno: u32,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffRow {
    HunkHeader {
        content: String,
        /// Index of the owning hunk within the delta.
        hunk: usize,
    },
    Context {
        content: String,
        index: usize,
        old_lineno: u32,
        new_lineno: u32,
    },
    Added(RowLine),
    Deleted(RowLine),
    Modified {
        deleted: RowLine,
        added: RowLine,
        /// Whether the paired lines came from a balanced run, making
        /// character-level emphasis between them meaningful.
        display_diff: bool,
    },
}

impl DiffRow {
    /// Selection key(s) carried by this row, if any.
    pub fn indices(&self) -> (Option<usize>, Option<usize>) {
        match self {
            DiffRow::HunkHeader { .. } => (None, None),
            DiffRow::Context { .. } => (None, None),
            DiffRow::Added(l) => (None, Some(l.index)),
            DiffRow::Deleted(l) => (Some(l.index), None),
            DiffRow::Modified { deleted, added, .. } => (Some(deleted.index), Some(added.index)),
        }
    }

    /// The selection key used when a gesture starts on this row: the
    /// deleted side wins for modified rows.
    pub fn primary_index(&self) -> Option<usize> {
        let (old, new) = self.indices();
        old.or(new)
    }
}

/// Build the display rows for one file.
///
/// Pure in all three inputs: the same hunks, persisted selection and
/// transient drag always yield the same rows.
pub fn build_diff_rows(
    hunks: &[DiffHunk],
    selection: &LineSelection,
    drag: Option<&DragSelection>,
) -> Vec<DiffRow> {
    let mut rows = Vec::new();

    for (hunk_idx, hunk) in hunks.iter().enumerate() {
        rows.push(DiffRow::HunkHeader {
            content: hunk.header.clone(),
            hunk: hunk_idx,
        });

        let mut pending_dels: Vec<RowLine> = Vec::new();
        let mut pending_adds: Vec<RowLine> = Vec::new();

        for line in &hunk.lines {
            match line.origin {
                LineOrigin::Context => {
                    flush_run(&mut rows, &mut pending_dels, &mut pending_adds);
                    let old_lineno = line
                        .old_lineno
                        .expect("context line is missing its old line number");
                    let new_lineno = line
                        .new_lineno
                        .expect("context line is missing its new line number");
                    rows.push(DiffRow::Context {
                        content: line.content.clone(),
                        index: line.index,
                        old_lineno,
                        new_lineno,
                    });
                }
                LineOrigin::Deletion => {
                    pending_dels.push(RowLine {
                        content: line.content.clone(),
                        index: line.index,
                        lineno: line.old_lineno.unwrap_or(0),
                        selected: is_line_selected(selection, drag, line.index),
                    });
                }
                LineOrigin::Addition => {
                    pending_adds.push(RowLine {
                        content: line.content.clone(),
                        index: line.index,
                        lineno: line.new_lineno.unwrap_or(0),
                        selected: is_line_selected(selection, drag, line.index),
                    });
                }
                LineOrigin::HunkHeader => {
                    unreachable!("hunk header encountered inside a hunk body")
                }
            }
        }
        flush_run(&mut rows, &mut pending_dels, &mut pending_adds);
    }

    rows
}

/// Pair the accumulated deletion/addition run positionally and emit it.
fn flush_run(rows: &mut Vec<DiffRow>, dels: &mut Vec<RowLine>, adds: &mut Vec<RowLine>) {
    if dels.is_empty() && adds.is_empty() {
        return;
    }
    let display_diff = !dels.is_empty() && dels.len() == adds.len();

    let mut del_iter = dels.drain(..);
    let mut add_iter = adds.drain(..);
    loop {
        match (del_iter.next(), add_iter.next()) {
            (Some(deleted), Some(added)) => rows.push(DiffRow::Modified {
                deleted,
                added,
                display_diff,
            }),
            (Some(deleted), None) => rows.push(DiffRow::Deleted(deleted)),
            (None, Some(added)) => rows.push(DiffRow::Added(added)),
            (None, None) => break,
        }
    }
}

/// Bounds of the contiguous addition/deletion run that starts at `start`,
/// as inclusive diff-relative indices. Used to resolve a hunk-wide discard
/// down to the exact lines it covers.
pub fn run_starting_at(hunks: &[DiffHunk], start: usize) -> Option<(usize, usize)> {
    for hunk in hunks {
        let mut run_start: Option<usize> = None;
        let mut run_end: usize = 0;
        for line in &hunk.lines {
            match line.origin {
                LineOrigin::Addition | LineOrigin::Deletion => {
                    if run_start.is_none() {
                        run_start = Some(line.index);
                    }
                    run_end = line.index;
                }
                _ => {
                    if let Some(s) = run_start.take() {
                        if s == start {
                            return Some((s, run_end));
                        }
                    }
                }
            }
        }
        if let Some(s) = run_start {
            if s == start {
                return Some((s, run_end));
            }
        }
    }
    None
}

/// The contiguous run containing `index`, regardless of where it starts.
pub fn run_containing(hunks: &[DiffHunk], index: usize) -> Option<(usize, usize)> {
    for hunk in hunks {
        let mut run_start: Option<usize> = None;
        let mut run_end: usize = 0;
        for line in &hunk.lines {
            match line.origin {
                LineOrigin::Addition | LineOrigin::Deletion => {
                    if run_start.is_none() {
                        run_start = Some(line.index);
                    }
                    run_end = line.index;
                }
                _ => {
                    if let Some(s) = run_start.take() {
                        if s <= index && index <= run_end {
                            return Some((s, run_end));
                        }
                    }
                }
            }
        }
        if let Some(s) = run_start {
            if s <= index && index <= run_end {
                return Some((s, run_end));
            }
        }
    }
    None
}

/// Identity of the inputs a cached row build was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCacheKey {
    pub diff_rev: u64,
    pub file: usize,
    pub selection_rev: u64,
    pub drag: Option<DragSelection>,
}

/// Memoized row build. Purely a render-cost optimization: a miss rebuilds
/// from scratch, so correctness never depends on the key staying fresh.
#[derive(Default)]
pub struct RowCache {
    inner: RefCell<Option<(RowCacheKey, std::rc::Rc<Vec<DiffRow>>)>>,
}

impl RowCache {
    pub fn rows(
        &self,
        key: RowCacheKey,
        build: impl FnOnce() -> Vec<DiffRow>,
    ) -> std::rc::Rc<Vec<DiffRow>> {
        let mut slot = self.inner.borrow_mut();
        if let Some((cached_key, rows)) = slot.as_ref() {
            if *cached_key == key {
                return rows.clone();
            }
        }
        let rows = std::rc::Rc::new(build());
        *slot = Some((key, rows.clone()));
        rows
    }

    pub fn invalidate(&self) {
        *self.inner.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::types::DiffLine;
    use crate::state::selection::SelectionIntent;

    struct HunkBuilder {
        header: String,
        start_index: usize,
        next_index: usize,
        old: u32,
        new: u32,
        lines: Vec<DiffLine>,
    }

    impl HunkBuilder {
        fn new(start_index: usize, old_start: u32, new_start: u32) -> Self {
            Self {
                header: format!("@@ -{old_start} +{new_start} @@"),
                start_index,
                next_index: start_index + 1,
                old: old_start,
                new: new_start,
                lines: Vec::new(),
            }
        }

        fn ctx(mut self, content: &str) -> Self {
            self.lines.push(DiffLine {
                origin: LineOrigin::Context,
                index: self.next_index,
                old_lineno: Some(self.old),
                new_lineno: Some(self.new),
                content: content.to_string(),
                no_newline: false,
            });
            self.next_index += 1;
            self.old += 1;
            self.new += 1;
            self
        }

        fn del(mut self, content: &str) -> Self {
            self.lines.push(DiffLine {
                origin: LineOrigin::Deletion,
                index: self.next_index,
                old_lineno: Some(self.old),
                new_lineno: None,
                content: content.to_string(),
                no_newline: false,
            });
            self.next_index += 1;
            self.old += 1;
            self
        }

        fn add(mut self, content: &str) -> Self {
            self.lines.push(DiffLine {
                origin: LineOrigin::Addition,
                index: self.next_index,
                old_lineno: None,
                new_lineno: Some(self.new),
                content: content.to_string(),
                no_newline: false,
            });
            self.next_index += 1;
            self.new += 1;
            self
        }

        fn build(self) -> DiffHunk {
            DiffHunk {
                header: self.header,
                start_index: self.start_index,
                old_start: 0,
                old_lines: 0,
                new_start: 0,
                new_lines: 0,
                lines: self.lines,
            }
        }
    }

    fn data_line_count(rows: &[DiffRow]) -> usize {
        rows.iter()
            .map(|r| match r {
                DiffRow::Added(_) | DiffRow::Deleted(_) => 1,
                DiffRow::Modified { .. } => 2,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn balanced_run_pairs_into_modified_with_emphasis() {
        let hunks = vec![HunkBuilder::new(0, 1, 1)
            .ctx("fn main() {")
            .del("    old();")
            .del("    older();")
            .add("    new();")
            .add("    newer();")
            .ctx("}")
            .build()];
        let rows = build_diff_rows(&hunks, &LineSelection::none(), None);

        let modified: Vec<_> = rows
            .iter()
            .filter_map(|r| match r {
                DiffRow::Modified { display_diff, .. } => Some(*display_diff),
                _ => None,
            })
            .collect();
        assert_eq!(modified, vec![true, true]);
    }

    #[test]
    fn unbalanced_run_pairs_without_emphasis() {
        let hunks = vec![HunkBuilder::new(0, 1, 1)
            .del("gone")
            .add("one")
            .add("two")
            .build()];
        let rows = build_diff_rows(&hunks, &LineSelection::none(), None);

        match &rows[1] {
            DiffRow::Modified { display_diff, .. } => assert!(!display_diff),
            other => panic!("expected modified row, got {other:?}"),
        }
        match &rows[2] {
            DiffRow::Added(l) => assert_eq!(l.content, "two"),
            other => panic!("expected added row, got {other:?}"),
        }
    }

    #[test]
    fn no_line_is_dropped_or_duplicated() {
        let hunks = vec![
            HunkBuilder::new(0, 1, 1)
                .ctx("a")
                .del("b")
                .add("B")
                .add("extra")
                .ctx("c")
                .del("tail")
                .build(),
            HunkBuilder::new(7, 20, 21).add("lone").build(),
        ];
        let input_changes: usize = hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.origin != LineOrigin::Context)
            .count();

        let rows = build_diff_rows(&hunks, &LineSelection::none(), None);
        assert_eq!(data_line_count(&rows), input_changes);
    }

    #[test]
    fn context_rows_carry_both_line_numbers() {
        let hunks = vec![HunkBuilder::new(0, 41, 43).ctx("unchanged").build()];
        let rows = build_diff_rows(&hunks, &LineSelection::none(), None);
        match &rows[1] {
            DiffRow::Context {
                old_lineno,
                new_lineno,
                ..
            } => {
                assert_eq!(*old_lineno, 41);
                assert_eq!(*new_lineno, 43);
            }
            other => panic!("expected context row, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "context line is missing")]
    fn context_without_line_numbers_is_fatal() {
        let mut hunk = HunkBuilder::new(0, 1, 1).ctx("x").build();
        hunk.lines[0].new_lineno = None;
        build_diff_rows(&[hunk], &LineSelection::none(), None);
    }

    #[test]
    fn building_twice_yields_identical_rows() {
        let hunks = vec![HunkBuilder::new(0, 1, 1)
            .ctx("a")
            .del("b")
            .add("B")
            .build()];
        let selection = LineSelection::single(2);
        let drag = DragSelection::new(3, SelectionIntent::Select);
        let first = build_diff_rows(&hunks, &selection, Some(&drag));
        let second = build_diff_rows(&hunks, &selection, Some(&drag));
        assert_eq!(first, second);
    }

    #[test]
    fn rows_reflect_persisted_and_transient_selection() {
        let hunks = vec![HunkBuilder::new(0, 1, 1)
            .del("b") // index 1
            .add("B") // index 2
            .add("d") // index 3
            .build()];
        let selection = LineSelection::single(1);
        let drag = DragSelection::new(3, SelectionIntent::Select);

        let rows = build_diff_rows(&hunks, &selection, Some(&drag));
        match &rows[1] {
            DiffRow::Modified { deleted, added, .. } => {
                assert!(deleted.selected);
                assert!(!added.selected);
            }
            other => panic!("expected modified row, got {other:?}"),
        }
        match &rows[2] {
            DiffRow::Added(l) => assert!(l.selected),
            other => panic!("expected added row, got {other:?}"),
        }
    }

    #[test]
    fn run_lookup_by_start_and_by_member() {
        let hunks = vec![HunkBuilder::new(0, 1, 1)
            .ctx("a") // 1
            .del("b") // 2
            .add("B") // 3
            .ctx("c") // 4
            .add("d") // 5
            .build()];

        assert_eq!(run_starting_at(&hunks, 2), Some((2, 3)));
        assert_eq!(run_starting_at(&hunks, 3), None); // not a run start
        assert_eq!(run_starting_at(&hunks, 5), Some((5, 5)));

        assert_eq!(run_containing(&hunks, 3), Some((2, 3)));
        assert_eq!(run_containing(&hunks, 4), None); // context
    }

    #[test]
    fn cache_returns_same_rows_for_same_key() {
        let hunks = vec![HunkBuilder::new(0, 1, 1).add("x").build()];
        let cache = RowCache::default();
        let key = RowCacheKey {
            diff_rev: 1,
            file: 0,
            selection_rev: 0,
            drag: None,
        };

        let mut builds = 0;
        let first = cache.rows(key.clone(), || {
            builds += 1;
            build_diff_rows(&hunks, &LineSelection::none(), None)
        });
        let second = cache.rows(key, || {
            builds += 1;
            build_diff_rows(&hunks, &LineSelection::none(), None)
        });
        assert_eq!(builds, 1);
        assert!(std::rc::Rc::ptr_eq(&first, &second));
    }
}
