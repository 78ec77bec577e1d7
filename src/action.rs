/// Central action enum — all state mutations flow through here.
#[derive(Debug, Clone)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Resize,

    // File list
    FileUp,
    FileDown,
    FileTop,
    FileBottom,
    SelectFile(usize),

    // Focus
    FocusFileList,
    FocusDiffView,

    // Diff view
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToTop,
    ScrollToBottom,
    ToggleWhitespace,
    RefreshDiff,

    // Line selection — pointer gesture
    DragBegin { row: usize },
    DragMove { row: usize },
    DragRelease,
    Hover { row: Option<usize> },

    // Line selection — keyboard gesture over the same state machine
    EnterSelectMode,
    ExtendSelectionUp,
    ExtendSelectionDown,
    ApplySelection,
    CancelSelection,
    ClearSelection,

    // Staging
    StageSelection,
    StageFile,
    UnstageFile,

    // Context menu
    OpenContextMenu { row: usize, column: u16, line: u16 },
    MenuUp,
    MenuDown,
    MenuConfirm,
    MenuCancel,

    // Discard confirmation
    ConfirmDiscard,
    CancelDiscard,

    // Clone dialog
    OpenCloneDialog,
    CancelClone,
    ConfirmClone,
    CloneChar(char),
    CloneBackspace,
    CloneDeleteWord,
    CloneSwitchField,
    CloneCursorLeft,
    CloneCursorRight,
    CloneCursorHome,
    CloneCursorEnd,
}
