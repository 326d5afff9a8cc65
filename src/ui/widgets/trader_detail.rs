//! Trader profile page.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, Paragraph, Row, Table, Wrap},
};

use super::{render_loading, render_placeholder, signed_span, tag_spans};
use crate::format;
use crate::state::{PositionResult, Store, Trader, TraderDetail};
use crate::ui::style::Palette;

pub struct TraderDetailView;

impl TraderDetailView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, palette: &Palette) {
        let Some(trader) = store.traders.detail_trader() else {
            let address = store.traders.detail_address.as_deref().unwrap_or_default();
            render_placeholder(
                frame,
                area,
                "Trader not found",
                &format!("No trader with address {address}"),
                palette,
            );
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(rows[1]);

        let followed = store.following.get(&trader.address).is_some();
        render_profile(frame, top[0], trader, followed, palette);
        render_expertise(frame, top[1], trader, palette);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(bottom[0]);

        match store.traders.detail.as_ref() {
            Some(detail) => {
                render_trend(frame, side[0], detail, palette);
                render_review(frame, side[1], trader, palette);
                render_history(frame, bottom[1], detail, palette);
            }
            None => {
                render_review(frame, side[1], trader, palette);
                frame.render_widget(palette.block("Trade history"), bottom[1]);
                render_loading(frame, bottom[1], palette);
            }
        }
    }
}

fn render_profile(frame: &mut Frame, area: Rect, trader: &Trader, followed: bool, palette: &Palette) {
    let status = trader.recent_performance.status;
    let follow_label = if followed {
        Span::styled("★ Following", Style::default().fg(palette.warning))
    } else {
        Span::styled("Not followed", palette.muted())
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                trader.address.clone(),
                Style::default()
                    .fg(palette.foreground)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            follow_label,
        ]),
        Line::from(tag_spans(trader.tags.iter().copied(), true)),
        Line::from(vec![
            Span::raw(format!(
                "Win rate {}%  (7d {}%, 30d {}%)",
                trader.win_rate.round_dp(1),
                trader.win_rate_7d.round_dp(1),
                trader.win_rate_30d.round_dp(1),
            )),
        ]),
        Line::from(vec![
            Span::raw("ROI "),
            signed_span(format::format_signed_percent(trader.roi), trader.roi, palette),
            Span::raw("   Profit "),
            signed_span(
                format::format_signed_usd(trader.total_profit),
                trader.total_profit,
                palette,
            ),
            Span::raw(format!(
                "   Volume {}   Trades {}",
                format::format_usd(trader.total_volume),
                trader.total_trades
            )),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{} {}", status.emoji(), trader.recent_performance.message),
                Style::default().fg(palette.performance(status)),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "Joined {}   last active {}",
                format::format_date(trader.joined_at),
                format::format_date(trader.last_active)
            ),
            palette.muted(),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(palette.block(trader.short_address()));
    frame.render_widget(paragraph, area);
}

fn render_expertise(frame: &mut Frame, area: Rect, trader: &Trader, palette: &Palette) {
    let items: Vec<ListItem> = if trader.expertise.is_empty() {
        vec![ListItem::new(Span::styled("No category data", palette.muted()))]
    } else {
        trader
            .expertise
            .iter()
            .map(|e| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<10}", e.category)),
                    Span::styled(
                        format!("{:>6}%", e.win_rate.round_dp(1)),
                        Style::default().fg(palette.expertise(e.band())),
                    ),
                    Span::styled(format!("  {} trades", e.trades), palette.muted()),
                ]))
            })
            .collect()
    };
    frame.render_widget(List::new(items).block(palette.block("Expertise")), area);
}

fn render_trend(frame: &mut Frame, area: Rect, detail: &TraderDetail, palette: &Palette) {
    let values: Vec<_> = detail.win_rate_trend.iter().map(|p| p.win_rate).collect();
    let lines = vec![
        Line::from(Span::styled(
            format::sparkline(&values),
            Style::default().fg(palette.primary),
        )),
        Line::from(Span::styled(
            match (values.iter().min(), values.iter().max()) {
                (Some(lo), Some(hi)) => format!("{}% - {}%", lo.round(), hi.round()),
                _ => String::new(),
            },
            palette.muted(),
        )),
    ];
    let title = format!("Win rate, {} days", values.len());
    frame.render_widget(Paragraph::new(lines).block(palette.block(title)), area);
}

fn render_review(frame: &mut Frame, area: Rect, trader: &Trader, palette: &Palette) {
    let text = if trader.review.is_empty() {
        Line::from(Span::styled("No review yet", palette.muted()))
    } else {
        Line::from(trader.review.clone())
    };
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(palette.block("Review"));
    frame.render_widget(paragraph, area);
}

fn render_history(frame: &mut Frame, area: Rect, detail: &TraderDetail, palette: &Palette) {
    let header = Row::new(
        ["Market", "Trades", "Last", "P&L", "Result"]
            .iter()
            .map(|h| Cell::from(*h).style(palette.header())),
    )
    .bottom_margin(1);

    let rows = detail.history.iter().map(|market| {
        let last = market
            .trades
            .iter()
            .max_by_key(|t| t.timestamp)
            .map(|t| format!("{} {} @ {}", t.side, t.outcome, format::format_price(t.price)))
            .unwrap_or_default();
        let result = match market.result {
            PositionResult::Won => Cell::from("Won").style(Style::default().fg(palette.success)),
            PositionResult::Lost => Cell::from("Lost").style(Style::default().fg(palette.error)),
        };

        Row::new(vec![
            Cell::from(format::truncate(&market.market_title, 36)),
            Cell::from(market.trades.len().to_string()),
            Cell::from(last),
            Cell::from(signed_span(
                format::format_signed_usd(market.total_pnl),
                market.total_pnl,
                palette,
            )),
            result,
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Length(11),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(palette.block("Trade history"));
    frame.render_widget(table, area);
}
