//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{Store, View};
use crate::ui::style::Palette;

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, palette: &Palette) {
        let wallet = if store.wallet.is_connected() {
            Span::styled(
                format!("● {}", store.wallet.label()),
                Style::default().fg(palette.success),
            )
        } else {
            Span::styled(
                format!("○ {}", store.wallet.label()),
                Style::default().fg(palette.muted),
            )
        };

        let view = Span::styled(
            format!(" {} ", view_title(store.app.current_view)),
            Style::default().fg(palette.warning),
        );

        let loading = if store.app.loading {
            Span::styled(
                " Loading... ",
                Style::default()
                    .fg(palette.warning)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let following = Span::styled(
            format!(" {} followed ", store.following.follows.len()),
            Style::default().fg(palette.foreground),
        );

        let help_hint = Span::styled(" Press ? for help ", palette.muted());

        let left_content = vec![
            Span::styled(
                " 📊 poli ",
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            wallet,
            Span::raw(" | "),
            view,
            Span::raw(" | "),
            following,
            loading,
        ];

        let status_line = Line::from(left_content);

        // Calculate padding for right-aligned help hint
        let left_width = status_line.width();
        let right_width = help_hint.width();
        let padding = (area.width as usize).saturating_sub(left_width + right_width);

        let mut full_line = status_line.spans;
        full_line.push(Span::raw(" ".repeat(padding)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(palette.selection));

        frame.render_widget(paragraph, area);
    }
}

fn view_title(view: View) -> &'static str {
    match view {
        View::Dashboard => "Dashboard",
        View::Markets => "Markets",
        View::MarketDetail => "Market detail",
        View::Traders => "Traders",
        View::TraderDetail => "Trader detail",
        View::Following => "Following",
    }
}
