use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::app::actions::Action;
use crate::state::{State, Visibility};

const SCROLL_PAGE_AMOUNT: usize = 10;

/// Map a terminal event to an action. `None` means the user closed the window.
pub fn handle_event(event: &Event, state: &State, visibility: Visibility) -> Option<Action> {
    match event {
        Event::Key(key) => {
            if key.kind == KeyEventKind::Release {
                return Some(Action::None);
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            // Ctrl+C terminates even while hidden, like an interrupt would.
            if ctrl && key.code == KeyCode::Char('c') {
                return None;
            }
            if visibility == Visibility::Hidden {
                return Some(Action::None);
            }

            if ctrl {
                let action = match key.code {
                    KeyCode::Char('q') => return None,
                    KeyCode::Char('o') => Action::OpenWatchPrompt,
                    KeyCode::Char('w') => Action::CloseTab,
                    KeyCode::Char('k') => Action::Inspect,
                    KeyCode::Char('g') => Action::FullGc,
                    KeyCode::Char('l') => Action::ClearHistory,
                    KeyCode::Char('a') => Action::CursorHome,
                    KeyCode::Char('e') => Action::CursorEnd,
                    _ => Action::None,
                };
                return Some(action);
            }

            let prompting = state.is_prompting();
            let action = match key.code {
                KeyCode::Esc if prompting => Action::CancelPrompt,
                KeyCode::Esc => Action::Hide,
                KeyCode::Enter => Action::Submit,
                KeyCode::Up => Action::HistoryPrev,
                KeyCode::Down => Action::HistoryNext,
                KeyCode::Tab => Action::NextTab,
                KeyCode::BackTab => Action::PrevTab,
                KeyCode::PageUp => Action::ScrollUp(SCROLL_PAGE_AMOUNT),
                KeyCode::PageDown => Action::ScrollDown(SCROLL_PAGE_AMOUNT),
                KeyCode::Left => Action::CursorLeft,
                KeyCode::Right => Action::CursorRight,
                KeyCode::Home => Action::CursorHome,
                KeyCode::End => Action::CursorEnd,
                KeyCode::Backspace => Action::Backspace,
                KeyCode::Delete => Action::Delete,
                KeyCode::Char(c) => Action::InsertChar(c),
                _ => Action::None,
            };
            Some(action)
        }
        Event::Paste(text) if visibility != Visibility::Hidden => Some(Action::PasteText(text.clone())),
        Event::FocusLost => Some(Action::Minimized(true)),
        Event::FocusGained => Some(Action::Minimized(false)),
        _ => Some(Action::None),
    }
}
