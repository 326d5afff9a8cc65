//! Following page: overview, follow table and the settings panel.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, Paragraph, Row, Table, TableState},
};

use rust_decimal::Decimal;

use super::{option_bar, render_placeholder, signed_span};
use crate::config::KeyBindings;
use crate::format;
use crate::state::{
    FollowFilter, FollowOverview, FollowedTrader, MAX_COPY_RATIO, MIN_COPY_RATIO, Performer, Store,
};
use crate::ui::layout::centered_rect;
use crate::ui::style::Palette;

/// Following page.
pub struct FollowingList;

impl FollowingList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        store: &Store,
        keys: &KeyBindings,
        palette: &Palette,
    ) {
        let state = &store.following;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Overview
                Constraint::Length(1), // Filters
                Constraint::Min(0),    // Table
            ])
            .split(area);

        render_overview(frame, chunks[0], &state.overview(), palette);

        let filters = FollowFilter::ALL.into_iter().map(|filter| {
            (
                format!("{} ({})", filter.label(), state.filter_count(filter)),
                filter == state.filter,
            )
        });
        frame.render_widget(
            Paragraph::new(option_bar(" Show:", filters, palette)),
            chunks[1],
        );

        let follows = state.visible();
        if follows.is_empty() {
            let message = if state.follows.is_empty() {
                format!(
                    "Not following anyone yet. Press {} on a trader to follow.",
                    keys.follow
                )
            } else {
                "No follows match this filter".to_string()
            };
            render_placeholder(frame, chunks[2], "Following (0)", &message, palette);
            return;
        }

        let header = Row::new(
            ["Trader", "Status", "Copy", "Max/trade", "Invested", "P&L", "Trades", "Last"]
                .iter()
                .map(|h| Cell::from(*h).style(palette.header())),
        )
        .bottom_margin(1);

        let rows = follows.iter().map(|follow| {
            let status = follow.status();
            Row::new(vec![
                Cell::from(format::short_address(&follow.address)),
                Cell::from(status.label()).style(Style::default().fg(palette.follow_status(status))),
                Cell::from(format!("{}%", follow.config.copy_ratio)),
                Cell::from(format::format_usd(follow.config.max_per_trade)),
                Cell::from(format::format_usd(follow.performance.total_invested)),
                Cell::from(signed_span(
                    format::format_signed_usd(follow.performance.total_pnl),
                    follow.performance.total_pnl,
                    palette,
                )),
                Cell::from(follow.performance.followed_trades.to_string()),
                Cell::from(format::format_date(follow.performance.last_follow_time)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(11),
                Constraint::Length(5),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(11),
                Constraint::Length(7),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(palette.block(format!(
            "Following ({}/{})",
            follows.len(),
            state.follows.len()
        )))
        .row_highlight_style(palette.highlight())
        .highlight_symbol("▶ ");

        let mut table_state = TableState::default();
        table_state.select(state.selected_index);
        frame.render_stateful_widget(table, chunks[2], &mut table_state);

        if state.show_settings
            && let Some(follow) = state.selected()
        {
            render_settings(frame, area, follow, keys, palette);
        }
    }
}

fn render_overview(frame: &mut Frame, area: Rect, overview: &FollowOverview, palette: &Palette) {
    let performer = |label: &'static str, p: &Option<Performer>| -> Vec<Span<'static>> {
        match p {
            Some(p) => vec![
                Span::styled(label, palette.muted()),
                Span::raw(format!("{} ", format::short_address(&p.address))),
                signed_span(format::format_signed_usd(p.pnl), p.pnl, palette),
            ],
            None => vec![Span::styled(label, palette.muted()), Span::raw("-")],
        }
    };

    let mut best_worst = performer("Best ", &overview.top_performer);
    best_worst.push(Span::raw("   "));
    best_worst.extend(performer("Worst ", &overview.worst_performer));

    let lines = vec![
        Line::from(vec![
            Span::raw(format!(
                "Following {} ({} active)   Invested {}   P&L ",
                overview.total_followed,
                overview.active_followed,
                format::format_usd(overview.total_invested)
            )),
            signed_span(
                format::format_signed_usd(overview.total_pnl),
                overview.total_pnl,
                palette,
            ),
        ]),
        Line::from(best_worst),
    ];
    frame.render_widget(Paragraph::new(lines).block(palette.block("Overview")), area);
}

fn render_settings(
    frame: &mut Frame,
    area: Rect,
    follow: &FollowedTrader,
    keys: &KeyBindings,
    palette: &Palette,
) {
    let popup = centered_rect(50, 40, area);
    frame.render_widget(Clear, popup);

    let config = &follow.config;
    let enabled = if config.enabled {
        Span::styled("On", Style::default().fg(palette.success))
    } else {
        Span::styled("Paused", palette.muted())
    };
    let key = |k: &str| Span::styled(format!("[{k}] "), Style::default().fg(palette.primary));

    let lines = vec![
        Line::from(Span::styled(
            follow.address.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![key(&keys.toggle_copy), Span::raw("Copying: "), enabled]),
        Line::from(vec![
            key(&format!("{}/{}", keys.ratio_up, keys.ratio_down)),
            Span::raw(format!(
                "Copy ratio: {}%  ({MIN_COPY_RATIO}-{MAX_COPY_RATIO})",
                config.copy_ratio
            )),
        ]),
        Line::from(vec![
            key(&keys.max_per_trade),
            Span::raw("Max per trade: "),
            Span::raw(format::format_usd(config.max_per_trade)),
        ]),
        Line::from(Span::styled(
            format!(
                "    A $1,000 trade copies as {}",
                format::format_usd(config.copy_size(Decimal::from(1000)))
            ),
            palette.muted(),
        )),
        Line::from(""),
        Line::from(vec![key(&keys.follow), Span::raw("Unfollow")]),
        Line::from(vec![key(&keys.settings), Span::raw("Close")]),
    ];

    let paragraph = Paragraph::new(lines).block(
        palette
            .block("Follow settings")
            .border_style(Style::default().fg(palette.accent)),
    );
    frame.render_widget(paragraph, popup);
}
