use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers, MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::state::FocusPanel;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                match reader.next().await {
                    Some(Ok(CrosstermEvent::Key(key))) => {
                        if event_tx.send(Event::Key(key)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => {
                        if event_tx.send(Event::Mouse(mouse)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(CrosstermEvent::Resize(_, _))) => {
                        if event_tx.send(Event::Resize).is_err() {
                            break;
                        }
                    }
                    Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        });

        let tick_tx = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// All context needed to map a key event to an action.
pub struct KeyContext {
    pub focus: FocusPanel,
    pub clone_dialog_open: bool,
    pub discard_confirm_open: bool,
    pub context_menu_open: bool,
    pub selecting: bool,
    pub read_only: bool,
}

/// Map a key event to an action based on current app context.
pub fn map_key_to_action(key: KeyEvent, ctx: &KeyContext) -> Option<Action> {
    // Priority 0: Ctrl-C always quits, even inside modals
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // Priority 1: discard confirmation
    if ctx.discard_confirm_open {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('y') => Some(Action::ConfirmDiscard),
            KeyCode::Esc | KeyCode::Char('n') => Some(Action::CancelDiscard),
            _ => None,
        };
    }

    // Priority 2: clone dialog captures nearly everything
    if ctx.clone_dialog_open {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('w') => Some(Action::CloneDeleteWord),
                KeyCode::Char('a') => Some(Action::CloneCursorHome),
                KeyCode::Char('e') => Some(Action::CloneCursorEnd),
                _ => None,
            };
        }
        return match key.code {
            KeyCode::Esc => Some(Action::CancelClone),
            KeyCode::Enter => Some(Action::ConfirmClone),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::CloneSwitchField),
            KeyCode::Backspace => Some(Action::CloneBackspace),
            KeyCode::Left => Some(Action::CloneCursorLeft),
            KeyCode::Right => Some(Action::CloneCursorRight),
            KeyCode::Home => Some(Action::CloneCursorHome),
            KeyCode::End => Some(Action::CloneCursorEnd),
            KeyCode::Char(c) => Some(Action::CloneChar(c)),
            _ => None,
        };
    }

    // Priority 3: context menu
    if ctx.context_menu_open {
        return match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MenuUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MenuDown),
            KeyCode::Enter => Some(Action::MenuConfirm),
            KeyCode::Esc => Some(Action::MenuCancel),
            _ => None,
        };
    }

    // Priority 4: global bindings
    match key.code {
        KeyCode::Char('q') if !ctx.selecting => return Some(Action::Quit),
        KeyCode::Char('c') if !ctx.selecting => return Some(Action::OpenCloneDialog),
        KeyCode::Char('w') if !ctx.selecting => return Some(Action::ToggleWhitespace),
        KeyCode::Char('R') => return Some(Action::RefreshDiff),
        _ => {}
    }

    // Priority 5: keyboard selection gesture in the diff view
    if ctx.selecting && ctx.focus == FocusPanel::DiffView {
        return match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ExtendSelectionUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ExtendSelectionDown),
            KeyCode::Enter | KeyCode::Char('v') => Some(Action::ApplySelection),
            KeyCode::Esc => Some(Action::CancelSelection),
            _ => None,
        };
    }

    // Priority 6: focus-dependent bindings
    match ctx.focus {
        FocusPanel::FileList => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::FileUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::FileDown),
            KeyCode::Char('g') => Some(Action::FileTop),
            KeyCode::Char('G') => Some(Action::FileBottom),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => Some(Action::FocusDiffView),
            KeyCode::Char('s') => Some(Action::StageFile),
            KeyCode::Char('u') => Some(Action::UnstageFile),
            _ => None,
        },
        FocusPanel::DiffView => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::PageUp => Some(Action::ScrollPageUp),
            KeyCode::PageDown => Some(Action::ScrollPageDown),
            KeyCode::Char('g') => Some(Action::ScrollToTop),
            KeyCode::Char('G') => Some(Action::ScrollToBottom),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::FocusFileList),
            KeyCode::Char('v') if !ctx.read_only => Some(Action::EnterSelectMode),
            KeyCode::Char('s') if !ctx.read_only => Some(Action::StageSelection),
            KeyCode::Char('u') if !ctx.read_only => Some(Action::UnstageFile),
            KeyCode::Char('x') if !ctx.read_only => Some(Action::ClearSelection),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn ctx() -> KeyContext {
        KeyContext {
            focus: FocusPanel::DiffView,
            clone_dialog_open: false,
            discard_confirm_open: false,
            context_menu_open: false,
            selecting: false,
            read_only: false,
        }
    }

    #[test]
    fn clone_dialog_captures_printable_keys() {
        let ctx = KeyContext {
            clone_dialog_open: true,
            ..ctx()
        };
        assert!(matches!(
            map_key_to_action(key(KeyCode::Char('q')), &ctx),
            Some(Action::CloneChar('q'))
        ));
        assert!(matches!(
            map_key_to_action(key(KeyCode::Esc), &ctx),
            Some(Action::CancelClone)
        ));
    }

    #[test]
    fn read_only_view_has_no_selection_bindings() {
        let ctx = KeyContext {
            read_only: true,
            ..ctx()
        };
        assert!(map_key_to_action(key(KeyCode::Char('v')), &ctx).is_none());
        assert!(map_key_to_action(key(KeyCode::Char('s')), &ctx).is_none());
    }

    #[test]
    fn discard_confirm_outranks_globals() {
        let ctx = KeyContext {
            discard_confirm_open: true,
            ..ctx()
        };
        assert!(matches!(
            map_key_to_action(key(KeyCode::Char('q')), &ctx),
            None
        ));
        assert!(matches!(
            map_key_to_action(key(KeyCode::Char('y')), &ctx),
            Some(Action::ConfirmDiscard)
        ));
    }
}
