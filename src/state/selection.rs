//! Per-file line selection: the durable set of selected diff lines plus the
//! in-flight drag gesture that edits it.

use std::collections::BTreeSet;

/// Durable record of which diff-relative line indices in one file are
/// selected for inclusion. An immutable value: every mutation returns a
/// new selection, so a stale clone can never observe a half-applied edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineSelection {
    selected: BTreeSet<usize>,
}

impl LineSelection {
    pub fn none() -> Self {
        Self::default()
    }

    /// Selection that covers exactly one line.
    pub fn single(index: usize) -> Self {
        Self::none().with_range(index, index, true)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn with_range(&self, from: usize, to: usize, selected: bool) -> Self {
        let mut next = self.selected.clone();
        for index in from..=to {
            if selected {
                next.insert(index);
            } else {
                next.remove(&index);
            }
        }
        Self { selected: next }
    }

    pub fn apply(&self, edit: &SelectionEdit) -> Self {
        self.with_range(edit.from, edit.to, edit.selected)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }
}

/// Whether a drag adds lines to the selection or removes them. Chosen once
/// at gesture start: dragging from a selected line deselects, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIntent {
    Select,
    Deselect,
}

/// The transient range of an in-progress drag. `anchor` is fixed at gesture
/// start; `current` follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSelection {
    pub anchor: usize,
    pub current: usize,
    pub intent: SelectionIntent,
}

impl DragSelection {
    pub fn new(line: usize, intent: SelectionIntent) -> Self {
        Self {
            anchor: line,
            current: line,
            intent,
        }
    }

    pub fn with_current(self, line: usize) -> Self {
        Self {
            current: line,
            ..self
        }
    }

    /// Inclusive (from, to) bounds regardless of drag direction.
    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.current {
            (self.anchor, self.current)
        } else {
            (self.current, self.anchor)
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        let (from, to) = self.range();
        index >= from && index <= to
    }
}

/// What a line displays as while a drag is (possibly) in flight:
/// a selecting drag previews as union, a deselecting drag as subtraction.
pub fn is_line_selected(
    persisted: &LineSelection,
    drag: Option<&DragSelection>,
    index: usize,
) -> bool {
    match drag {
        None => persisted.contains(index),
        Some(d) => match d.intent {
            SelectionIntent::Select => persisted.contains(index) || d.contains(index),
            SelectionIntent::Deselect => persisted.contains(index) && !d.contains(index),
        },
    }
}

/// Drag gesture state machine, passed by value through a pure reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSelection),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    pub fn selection(&self) -> Option<&DragSelection> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(d) => Some(d),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Begin {
        line: usize,
        intent: SelectionIntent,
    },
    MoveTo {
        line: usize,
    },
    /// Pointer released. Also used for cancellation: the caller simply
    /// drops the emitted edit instead of applying it.
    Release,
}

/// One range update to fold into the persisted selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEdit {
    pub from: usize,
    pub to: usize,
    pub selected: bool,
}

/// Advance the drag state machine. The only transition that produces an
/// edit is `Dragging --Release--> Idle`, so a gesture reconciles exactly
/// once no matter how many release events stray in.
pub fn step(state: DragState, event: DragEvent) -> (DragState, Option<SelectionEdit>) {
    match (state, event) {
        (DragState::Idle, DragEvent::Begin { line, intent }) => {
            (DragState::Dragging(DragSelection::new(line, intent)), None)
        }
        (DragState::Dragging(drag), DragEvent::MoveTo { line }) => {
            (DragState::Dragging(drag.with_current(line)), None)
        }
        (DragState::Dragging(drag), DragEvent::Release) => {
            let (from, to) = drag.range();
            let edit = SelectionEdit {
                from,
                to,
                selected: drag.intent == SelectionIntent::Select,
            };
            (DragState::Idle, Some(edit))
        }
        (state, _) => (state, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(state: DragState, events: &[DragEvent]) -> (DragState, Option<SelectionEdit>) {
        let mut state = state;
        let mut last_edit = None;
        for &event in events {
            let (next, edit) = step(state, event);
            state = next;
            if edit.is_some() {
                last_edit = edit;
            }
        }
        (state, last_edit)
    }

    #[test]
    fn select_drag_adds_range_on_release() {
        let persisted = LineSelection::single(10);
        let (state, edit) = drag(
            DragState::Idle,
            &[
                DragEvent::Begin {
                    line: 3,
                    intent: SelectionIntent::Select,
                },
                DragEvent::MoveTo { line: 7 },
                DragEvent::MoveTo { line: 5 },
                DragEvent::Release,
            ],
        );
        assert_eq!(state, DragState::Idle);
        let next = persisted.apply(&edit.unwrap());
        let selected: Vec<usize> = next.indices().collect();
        assert_eq!(selected, vec![3, 4, 5, 10]);
    }

    #[test]
    fn drag_direction_does_not_matter() {
        let forward = drag(
            DragState::Idle,
            &[
                DragEvent::Begin {
                    line: 3,
                    intent: SelectionIntent::Select,
                },
                DragEvent::MoveTo { line: 7 },
                DragEvent::Release,
            ],
        )
        .1;
        let backward = drag(
            DragState::Idle,
            &[
                DragEvent::Begin {
                    line: 7,
                    intent: SelectionIntent::Select,
                },
                DragEvent::MoveTo { line: 3 },
                DragEvent::Release,
            ],
        )
        .1;
        assert_eq!(forward, backward);
    }

    #[test]
    fn deselect_drag_removes_range() {
        let persisted = LineSelection::none().with_range(1, 9, true);
        let (_, edit) = drag(
            DragState::Idle,
            &[
                DragEvent::Begin {
                    line: 4,
                    intent: SelectionIntent::Deselect,
                },
                DragEvent::MoveTo { line: 6 },
                DragEvent::Release,
            ],
        );
        let next = persisted.apply(&edit.unwrap());
        let selected: Vec<usize> = next.indices().collect();
        assert_eq!(selected, vec![1, 2, 3, 7, 8, 9]);
    }

    #[test]
    fn release_without_drag_is_a_no_op() {
        let (state, edit) = step(DragState::Idle, DragEvent::Release);
        assert_eq!(state, DragState::Idle);
        assert!(edit.is_none());
    }

    #[test]
    fn one_edit_per_gesture() {
        let (state, edit) = step(
            DragState::Dragging(DragSelection::new(2, SelectionIntent::Select)),
            DragEvent::Release,
        );
        assert!(edit.is_some());
        // A stray second release finds the machine idle again
        let (_, second) = step(state, DragEvent::Release);
        assert!(second.is_none());
    }

    #[test]
    fn preview_matches_intent_during_drag() {
        let persisted = LineSelection::none().with_range(5, 8, true);

        let selecting = DragSelection::new(2, SelectionIntent::Select).with_current(6);
        assert!(is_line_selected(&persisted, Some(&selecting), 3)); // in drag only
        assert!(is_line_selected(&persisted, Some(&selecting), 7)); // persisted only
        assert!(!is_line_selected(&persisted, Some(&selecting), 9));

        let deselecting = DragSelection::new(6, SelectionIntent::Deselect).with_current(8);
        assert!(is_line_selected(&persisted, Some(&deselecting), 5));
        assert!(!is_line_selected(&persisted, Some(&deselecting), 6));
        assert!(!is_line_selected(&persisted, Some(&deselecting), 2));
    }

    #[test]
    fn selection_values_are_immutable() {
        let base = LineSelection::single(1);
        let grown = base.with_range(2, 4, true);
        assert!(!base.contains(2));
        assert!(grown.contains(2));
        assert!(grown.contains(1));
    }
}
