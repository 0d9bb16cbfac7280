use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPage,
    PrevPage,
    /// Digit shortcut: jump to the tab at this index
    JumpToTab(usize),
    /// Left button went down at a cell (tap on a label, or start of a drag)
    Press { column: u16, row: u16 },
    /// Left button moved while held
    Drag { column: u16 },
    /// Left button released
    Release,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    // Digits 1..N select a tab directly
    if let (KeyCode::Char(c), KeyModifiers::NONE) = (key.code, key.modifiers) {
        if let Some(digit) = c.to_digit(10) {
            let index = digit as usize;
            if index >= 1 && index <= app.tabs.len() {
                return Action::JumpToTab(index - 1);
            }
        }
    }

    // Terminals disagree on whether uppercase letters carry SHIFT
    let binding = match key.code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => KeyBinding::shift(key.code),
        _ => KeyBinding::new(key.code, key.modifiers),
    };

    keymap.get(&binding).copied().unwrap_or(Action::None)
}

/// Handle a mouse event and return the corresponding action
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::Press {
            column: mouse.column,
            row: mouse.row,
        },
        MouseEventKind::Drag(MouseButton::Left) => Action::Drag {
            column: mouse.column,
        },
        MouseEventKind::Up(MouseButton::Left) => Action::Release,
        MouseEventKind::ScrollRight => Action::NextPage,
        MouseEventKind::ScrollLeft => Action::PrevPage,
        _ => Action::None,
    }
}
