//! TUI widgets.

mod dashboard;
mod following_list;
mod help;
mod market_detail;
mod market_list;
mod notifications;
mod status_bar;
mod tab_bar;
mod trader_detail;
mod trader_list;

pub use dashboard::DashboardView;
pub use following_list::FollowingList;
pub use help::HelpPanel;
pub use market_detail::MarketDetailView;
pub use market_list::MarketList;
pub use notifications::{render_error, render_input, render_notification};
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
pub use trader_detail::TraderDetailView;
pub use trader_list::TraderList;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use rust_decimal::Decimal;

use super::style::{Palette, tag_color};
use crate::state::TraderTag;

fn render_loading(frame: &mut Frame, area: Rect, palette: &Palette) {
    let loading = Line::from(Span::styled(
        "Loading...",
        Style::default()
            .fg(palette.warning)
            .add_modifier(Modifier::ITALIC),
    ));

    // Bottom right, inside the border
    if area.width < 17 || area.height < 3 {
        return;
    }
    let loading_area = Rect {
        x: area.x + area.width - 16,
        y: area.y + area.height - 2,
        width: 15,
        height: 1,
    };

    frame.render_widget(Paragraph::new(loading), loading_area);
}

/// A bordered box with a centered message, for empty and not-found states.
fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, message: &str, palette: &Palette) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(palette.foreground),
        )),
        Line::from(""),
        Line::from(Span::styled("Esc to go back", palette.muted())),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(palette.block(title));
    frame.render_widget(paragraph, area);
}

/// Tag emojis, optionally followed by their labels.
fn tag_spans<'a>(tags: impl IntoIterator<Item = TraderTag>, with_labels: bool) -> Vec<Span<'a>> {
    tags.into_iter()
        .map(|tag| {
            let text = if with_labels {
                format!("{} {} ", tag.emoji(), tag.label())
            } else {
                tag.emoji().to_string()
            };
            Span::styled(text, Style::default().fg(tag_color(tag)))
        })
        .collect()
}

/// Styled span colored by sign.
fn signed_span<'a>(text: String, value: Decimal, palette: &Palette) -> Span<'a> {
    Span::styled(text, Style::default().fg(palette.signed(value)))
}

/// Filter bar: each option label, the active one highlighted.
fn option_bar<'a>(
    prefix: &'a str,
    options: impl IntoIterator<Item = (String, bool)>,
    palette: &Palette,
) -> Line<'a> {
    let mut spans = vec![Span::styled(prefix, palette.muted())];
    for (label, active) in options {
        let style = if active {
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(palette.foreground)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}
