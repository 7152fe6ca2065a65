//! Keyboard input mapping
//!
//! Terminal key repeat already provides auto-shift, so each press maps
//! to exactly one command.

use blockdrop::settings::Settings;
use blockdrop::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

/// What a key press asks the frontend to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(Action),
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    warn!("ignoring unknown key binding {:?}", s);
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            restart: Self::parse_keys(&settings.keys.restart),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

pub struct InputHandler {
    bindings: KeyBindings,
}

impl InputHandler {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
        }
    }

    /// Map a key press to a command
    pub fn key_down(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        let b = &self.bindings;

        let action = if b.move_left.contains(&code) {
            Action::MoveLeft
        } else if b.move_right.contains(&code) {
            Action::MoveRight
        } else if b.soft_drop.contains(&code) {
            Action::SoftDrop
        } else if b.rotate.contains(&code) {
            Action::Rotate
        } else if b.restart.contains(&code) {
            Action::Reset
        } else if b.quit.contains(&code) {
            return Some(Command::Quit);
        } else {
            return None;
        };

        Some(Command::Game(action))
    }

    /// Map a key press on the game-over screen: quit keys still quit,
    /// anything else starts a new game
    pub fn game_over_key(&self, key: KeyEvent) -> Command {
        match self.key_down(key) {
            Some(Command::Quit) => Command::Quit,
            _ => Command::Game(Action::Reset),
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default(),
        }
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
