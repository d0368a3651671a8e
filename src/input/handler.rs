use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;
use crate::host::HostEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Direction(Direction),
    Restart,
    Exit,
    None,
}

impl KeyAction {
    pub fn into_host_event(self) -> Option<HostEvent> {
        match self {
            KeyAction::Direction(direction) => Some(HostEvent::Direction(direction)),
            KeyAction::Restart => Some(HostEvent::Restart),
            KeyAction::Exit => Some(HostEvent::Exit),
            KeyAction::None => None,
        }
    }
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Exit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Direction(Direction::Up),
            KeyCode::Down => KeyAction::Direction(Direction::Down),
            KeyCode::Left => KeyAction::Direction(Direction::Left),
            KeyCode::Right => KeyAction::Direction(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Direction(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Direction(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Direction(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Direction(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Exit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
