//! Input event types and key binding matching.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Simplified key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        }
    }
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        Self {
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            shift: mods.contains(KeyModifiers::SHIFT),
        }
    }
}

/// A processed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            key: Key::from(event.code),
            modifiers: Modifiers::from(event.modifiers),
        }
    }
}

impl InputEvent {
    /// Get the character if this is a plain character input.
    pub fn char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt => Some(c),
            _ => None,
        }
    }

    /// Check if this matches a key binding string (e.g., "Ctrl+q", "Enter").
    ///
    /// Shift is ignored for character bindings, since terminals report it
    /// for symbols such as `?` and `+`.
    pub fn matches(&self, binding: &str) -> bool {
        let mut expected_ctrl = false;
        let mut expected_alt = false;
        let mut expected_shift = false;
        let mut expected_key = binding;

        // a bare "+" binding is the plus key, not a separator
        if binding != "+" {
            for part in binding.split('+') {
                match part.to_lowercase().as_str() {
                    "ctrl" => expected_ctrl = true,
                    "alt" => expected_alt = true,
                    "shift" => expected_shift = true,
                    _ => expected_key = part,
                }
            }
        }

        let is_char_binding = expected_key.chars().count() == 1;
        if self.modifiers.ctrl != expected_ctrl
            || self.modifiers.alt != expected_alt
            || (!is_char_binding && self.modifiers.shift != expected_shift)
        {
            return false;
        }

        match expected_key.to_lowercase().as_str() {
            "enter" => self.key == Key::Enter,
            "esc" | "escape" => self.key == Key::Escape,
            "backspace" => self.key == Key::Backspace,
            "delete" | "del" => self.key == Key::Delete,
            "tab" => self.key == Key::Tab,
            "backtab" => self.key == Key::BackTab,
            "up" => self.key == Key::Up,
            "down" => self.key == Key::Down,
            "left" => self.key == Key::Left,
            "right" => self.key == Key::Right,
            "home" => self.key == Key::Home,
            "end" => self.key == Key::End,
            "pageup" => self.key == Key::PageUp,
            "pagedown" => self.key == Key::PageDown,
            s if s.starts_with('f') && s.len() > 1 && s.len() <= 3 => s[1..]
                .parse::<u8>()
                .is_ok_and(|n| self.key == Key::F(n)),
            _ if is_char_binding => expected_key.chars().next().is_some_and(|c| {
                self.key == Key::Char(c)
                    || self.key == Key::Char(c.to_ascii_lowercase())
                    || self.key == Key::Char(c.to_ascii_uppercase())
            }),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(code: KeyCode, modifiers: KeyModifiers) -> InputEvent {
        InputEvent::from(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_matches_plain_and_named_keys() {
        assert!(event(KeyCode::Char('q'), KeyModifiers::NONE).matches("q"));
        assert!(event(KeyCode::Char('Q'), KeyModifiers::SHIFT).matches("q"));
        assert!(event(KeyCode::Enter, KeyModifiers::NONE).matches("Enter"));
        assert!(event(KeyCode::Esc, KeyModifiers::NONE).matches("Esc"));
        assert!(event(KeyCode::Tab, KeyModifiers::NONE).matches("Tab"));
        assert!(event(KeyCode::F(5), KeyModifiers::NONE).matches("F5"));
        assert!(!event(KeyCode::Char('f'), KeyModifiers::NONE).matches("F5"));
    }

    #[test]
    fn test_matches_shifted_symbols() {
        assert!(event(KeyCode::Char('?'), KeyModifiers::SHIFT).matches("?"));
        assert!(event(KeyCode::Char('+'), KeyModifiers::SHIFT).matches("+"));
        assert!(event(KeyCode::Char('-'), KeyModifiers::NONE).matches("-"));
        assert!(!event(KeyCode::BackTab, KeyModifiers::SHIFT).matches("Tab"));
    }

    #[test]
    fn test_matches_modifiers() {
        assert!(event(KeyCode::Char('c'), KeyModifiers::CONTROL).matches("Ctrl+c"));
        assert!(!event(KeyCode::Char('c'), KeyModifiers::NONE).matches("Ctrl+c"));
        assert!(!event(KeyCode::Char('c'), KeyModifiers::CONTROL).matches("c"));
    }

    #[test]
    fn test_char_ignores_control_chords() {
        assert_eq!(event(KeyCode::Char('美'), KeyModifiers::NONE).char(), Some('美'));
        assert_eq!(event(KeyCode::Char('c'), KeyModifiers::CONTROL).char(), None);
        assert_eq!(event(KeyCode::Enter, KeyModifiers::NONE).char(), None);
    }
}
