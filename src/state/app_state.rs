//! Application-level state.

use super::Notification;

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Markets,
    MarketDetail,
    Traders,
    TraderDetail,
    Following,
}

impl View {
    /// The list view a detail view returns to.
    pub fn parent(self) -> Self {
        match self {
            Self::MarketDetail => Self::Markets,
            Self::TraderDetail => Self::Traders,
            other => other,
        }
    }

    /// Tab highlighted in the tab bar.
    pub fn tab(self) -> Self {
        self.parent()
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    /// Typing a wallet address to connect.
    Wallet,
    /// Editing the selected follow's per-trade cap.
    MaxPerTrade,
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    /// Current error message.
    pub error: Option<String>,
    /// Whether the app is loading data.
    pub loading: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Current search input.
    pub input_buffer: String,
    /// Cursor position in input buffer, in characters.
    pub cursor_position: usize,
}

impl AppState {
    /// Check if in an input mode.
    pub fn is_editing(&self) -> bool {
        self.input_mode != InputMode::Normal
    }

    /// Clear the input buffer.
    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    /// Add a character at the cursor.
    pub fn push_char(&mut self, c: char) {
        let byte_index = self.byte_index();
        self.input_buffer.insert(byte_index, c);
        self.cursor_position += 1;
    }

    /// Remove the character before the cursor.
    pub fn pop_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let byte_index = self.byte_index();
            self.input_buffer.remove(byte_index);
        }
    }

    /// Move cursor left.
    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn cursor_right(&mut self) {
        if self.cursor_position < self.input_buffer.chars().count() {
            self.cursor_position += 1;
        }
    }

    fn byte_index(&self) -> usize {
        self.input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_buffer_handles_multibyte() {
        let mut app = AppState::default();
        for c in "美国x".chars() {
            app.push_char(c);
        }
        app.cursor_left();
        app.pop_char();
        assert_eq!(app.input_buffer, "美x");
        assert_eq!(app.cursor_position, 1);

        app.cursor_right();
        app.cursor_right();
        assert_eq!(app.cursor_position, 2);

        app.clear_input();
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn test_detail_parent() {
        assert_eq!(View::MarketDetail.parent(), View::Markets);
        assert_eq!(View::TraderDetail.tab(), View::Traders);
        assert_eq!(View::Following.parent(), View::Following);
    }
}
