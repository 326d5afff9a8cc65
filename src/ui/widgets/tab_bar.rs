//! Tab bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::config::KeyBindings;
use crate::state::{Store, View};
use crate::ui::style::Palette;

/// Tab bar widget.
pub struct TabBar;

impl TabBar {
    /// Render the tab bar.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        store: &Store,
        keys: &KeyBindings,
        palette: &Palette,
    ) {
        let tabs = [
            (&keys.dashboard, "Dashboard", View::Dashboard),
            (&keys.markets, "Markets", View::Markets),
            (&keys.traders, "Traders", View::Traders),
            (&keys.following, "Following", View::Following),
        ];

        let active = store.app.current_view.tab();
        let mut spans = vec![Span::raw(" ")];

        for (key, name, view) in tabs {
            let name_style = if active == view {
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(palette.foreground)
            };

            spans.push(Span::styled(format!("[{}] ", key), palette.muted()));
            spans.push(Span::styled(name, name_style));
            spans.push(Span::raw("  "));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
