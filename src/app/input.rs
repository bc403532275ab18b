use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::Command;

use super::App;

/// Result of handling a key: Quit the app, or key was consumed (needs render).
/// None means the key was not handled.
pub enum InputResult {
    Quit,
    Consumed,
}

/// Handle a key event. Returns Some(Quit) to exit, Some(Consumed) if key was
/// handled and a render is needed, None if the key was not handled.
pub fn handle_key(app: &mut App, key_event: KeyEvent) -> Option<InputResult> {
    let KeyEvent { code, modifiers, .. } = key_event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputResult::Quit);
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(InputResult::Quit),
        KeyCode::Char('s') | KeyCode::Char('S') => {
            // The precondition lives here, not inside the command: start is a
            // no-op while already active or while disconnected.
            if app.controller.can_start() && !app.commands.in_progress() {
                app.commands.request(Command::Start);
            }
            Some(InputResult::Consumed)
        }
        KeyCode::Char('x') | KeyCode::Char('X') => {
            if app.controller.can_stop() && !app.commands.in_progress() {
                app.commands.request(Command::Stop);
            }
            Some(InputResult::Consumed)
        }
        _ => None,
    }
}
