//! Notification and input popups.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::state::{AppState, InputMode, Notification, NotificationLevel};
use crate::ui::style::Palette;

/// Render a notification popup.
pub fn render_notification(
    frame: &mut Frame,
    area: Rect,
    notification: &Notification,
    palette: &Palette,
) {
    frame.render_widget(Clear, area);

    let color = palette.notification(notification.level);
    let icon = match notification.level {
        NotificationLevel::Info => "ℹ",
        NotificationLevel::Success => "✓",
        NotificationLevel::Warning => "⚠",
        NotificationLevel::Error => "✗",
    };

    let content = Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        Span::raw(notification.message.as_str()),
    ]);

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(palette.foreground));

    frame.render_widget(paragraph, area);
}

/// Render an error popup.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str, palette: &Palette) {
    frame.render_widget(Clear, area);

    let content = Line::from(vec![
        Span::styled(
            "✗ Error: ",
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(error),
    ]);

    let paragraph = Paragraph::new(content)
        .block(
            palette
                .block("Esc to dismiss")
                .border_style(Style::default().fg(palette.error)),
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(palette.foreground));

    frame.render_widget(paragraph, area);
}

/// Render the search or wallet-address input line with a cursor.
pub fn render_input(frame: &mut Frame, area: Rect, app: &AppState, palette: &Palette) {
    let title = match app.input_mode {
        InputMode::Wallet => "Wallet address (Enter to connect, Esc to cancel)",
        InputMode::MaxPerTrade => "Max per trade in USD (Enter to save, Esc to cancel)",
        _ => "Search markets (Enter to apply, Esc to cancel)",
    };

    let paragraph = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(palette.foreground))
        .block(palette.block(title));
    frame.render_widget(paragraph, area);

    let typed: String = app.input_buffer.chars().take(app.cursor_position).collect();
    let offset = Line::from(typed).width() as u16;
    frame.set_cursor_position(Position::new(
        (area.x + 1 + offset).min(area.right().saturating_sub(2)),
        area.y + 1,
    ));
}
