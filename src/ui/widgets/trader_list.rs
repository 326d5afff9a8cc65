//! Trader leaderboard widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use super::{option_bar, render_loading, render_placeholder, signed_span, tag_spans};
use crate::format;
use crate::state::{Store, TraderSort, TraderTab};
use crate::ui::style::Palette;

/// Trader leaderboard widget.
pub struct TraderList;

impl TraderList {
    /// Render the leaderboard.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, palette: &Palette) {
        let state = &store.traders;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Length(1), // Sort
                Constraint::Min(0),    // Table
            ])
            .split(area);

        let tabs = TraderTab::ALL.into_iter().map(|tab| {
            (
                format!("{} ({})", tab.label(), state.tab_count(tab)),
                tab == state.tab,
            )
        });
        frame.render_widget(Paragraph::new(option_bar(" ", tabs, palette)), chunks[0]);

        let mut sort_line = vec![Span::styled(" Sort:", palette.muted())];
        for sort in TraderSort::ALL {
            if sort == state.sort {
                sort_line.push(Span::styled(
                    format!(" {} {} ", sort.label(), state.direction.arrow()),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                sort_line.push(Span::styled(format!(" {} ", sort.label()), palette.muted()));
            }
        }
        frame.render_widget(Paragraph::new(Line::from(sort_line)), chunks[1]);

        let traders = state.visible_traders();
        if traders.is_empty() && !state.loading {
            render_placeholder(
                frame,
                chunks[2],
                "Traders (0)",
                "No traders on this tab",
                palette,
            );
            return;
        }

        let header = Row::new(
            [
                "", "Trader", "Tags", "Win rate", "7d", "ROI", "Profit", "Volume", "Trades", "Recent",
            ]
            .iter()
            .map(|h| Cell::from(*h).style(palette.header())),
        )
        .bottom_margin(1);

        let rows = traders.iter().map(|trader| {
            let followed = if store.following.is_following(&trader.address) {
                Cell::from("★").style(Style::default().fg(palette.warning))
            } else {
                Cell::from(" ")
            };
            let status = trader.recent_performance.status;

            Row::new(vec![
                followed,
                Cell::from(trader.short_address()),
                Cell::from(Line::from(tag_spans(trader.tags.iter().copied(), false))),
                Cell::from(format!("{}%", trader.win_rate.round_dp(1))),
                Cell::from(format!("{}%", trader.win_rate_7d.round_dp(1))).style(palette.muted()),
                Cell::from(signed_span(
                    format::format_signed_percent(trader.roi),
                    trader.roi,
                    palette,
                )),
                Cell::from(signed_span(
                    format::format_signed_usd(trader.total_profit),
                    trader.total_profit,
                    palette,
                )),
                Cell::from(format::format_usd(trader.total_volume)),
                Cell::from(trader.total_trades.to_string()),
                Cell::from(status.emoji()).style(Style::default().fg(palette.performance(status))),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(14),
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(11),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(6),
            ],
        )
        .header(header)
        .block(palette.block(format!(
            "Traders ({}/{})",
            traders.len(),
            state.traders.len()
        )))
        .row_highlight_style(palette.highlight())
        .highlight_symbol("▶ ");

        let mut table_state = TableState::default();
        table_state.select(state.selected_index);
        frame.render_stateful_widget(table, chunks[2], &mut table_state);

        if state.loading {
            render_loading(frame, chunks[2], palette);
        }
    }
}
