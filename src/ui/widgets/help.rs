//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::config::KeyBindings;
use crate::ui::layout::centered_rect;
use crate::ui::style::Palette;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings, palette: &Palette) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let sections: [(&str, Vec<(String, &str)>); 4] = [
            (
                "Navigation",
                vec![
                    (format!("{}/↓", keys.down), "Move down"),
                    (format!("{}/↑", keys.up), "Move up"),
                    ("Home/End".to_string(), "First / last row"),
                    (keys.select.clone(), "Open detail"),
                    (keys.back.clone(), "Back / clear search"),
                ],
            ),
            (
                "Views",
                vec![
                    (keys.dashboard.clone(), "Dashboard"),
                    (keys.markets.clone(), "Markets"),
                    (keys.traders.clone(), "Traders"),
                    (keys.following.clone(), "Following"),
                ],
            ),
            (
                "Lists",
                vec![
                    (keys.next_filter.clone(), "Next category / tab / filter"),
                    (keys.next_sort.clone(), "Next sort key"),
                    (keys.sort_direction.clone(), "Flip sort direction"),
                    (keys.search.clone(), "Search markets"),
                ],
            ),
            (
                "Copy trading",
                vec![
                    (keys.follow.clone(), "Follow / unfollow trader"),
                    (keys.toggle_copy.clone(), "Pause / resume copying"),
                    (
                        format!("{}/{}", keys.ratio_up, keys.ratio_down),
                        "Copy ratio up / down",
                    ),
                    (keys.settings.clone(), "Follow settings"),
                    (keys.max_per_trade.clone(), "Edit max per trade"),
                    (keys.wallet.clone(), "Connect / disconnect wallet"),
                    (keys.refresh.clone(), "Refresh data"),
                    (keys.help.clone(), "Toggle help"),
                    (keys.quit.clone(), "Quit"),
                ],
            ),
        ];

        let mut help_text = Vec::new();
        for (title, entries) in sections {
            if !help_text.is_empty() {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                title,
                Style::default()
                    .fg(palette.warning)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, description) in entries {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {:<9}", key), Style::default().fg(palette.primary)),
                    Span::raw(description),
                ]));
            }
        }

        let help = Paragraph::new(help_text)
            .block(
                palette
                    .block("Help")
                    .border_style(Style::default().fg(palette.warning)),
            )
            .style(Style::default().fg(palette.foreground));

        frame.render_widget(help, popup_area);
    }
}
