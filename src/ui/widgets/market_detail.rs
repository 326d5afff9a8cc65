//! Market detail page.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Gauge, Paragraph, Row, Table, Wrap},
};
use rust_decimal::prelude::ToPrimitive;

use super::{render_loading, render_placeholder, signed_span, tag_spans};
use crate::format;
use crate::state::{Market, MarketDetail, Store, TradeSide};
use crate::ui::style::Palette;

/// Market detail page.
pub struct MarketDetailView;

impl MarketDetailView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, palette: &Palette) {
        let Some(market) = store.markets.detail_market() else {
            let slug = store.markets.detail_slug.as_deref().unwrap_or_default();
            render_placeholder(
                frame,
                area,
                "Market not found",
                &format!("No market with slug \"{slug}\""),
                palette,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // Summary
                Constraint::Length(4), // History
                Constraint::Length(3), // Buy pressure
                Constraint::Min(0),    // Positions and trades
            ])
            .split(area);

        render_summary(frame, chunks[0], market, palette);

        let Some(detail) = store.markets.detail.as_ref() else {
            frame.render_widget(palette.block("Price history"), chunks[1]);
            render_loading(frame, chunks[1], palette);
            return;
        };

        render_history(frame, chunks[1], detail, palette);
        render_pressure(frame, chunks[2], detail, palette);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[3]);
        render_positions(frame, bottom[0], detail, palette);
        render_trades(frame, bottom[1], detail, palette);
    }
}

fn render_summary(frame: &mut Frame, area: Rect, market: &Market, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(
            market.title.clone(),
            Style::default()
                .fg(palette.foreground)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} / {}", market.category, market.subcategory),
                Style::default().fg(palette.primary),
            ),
            Span::styled(format!("  {}", market.status), palette.muted()),
            Span::styled(
                format!("  ends {}", format::format_date(market.end_date)),
                palette.muted(),
            ),
        ]),
        Line::from(vec![
            Span::raw("YES "),
            Span::styled(
                format::format_price(market.yes_price),
                Style::default().fg(palette.success),
            ),
            Span::raw("   NO "),
            Span::styled(
                format::format_price(market.no_price),
                Style::default().fg(palette.error),
            ),
            Span::raw("   24h "),
            signed_span(
                format::format_change(market.price_change_24h),
                market.price_change_24h,
                palette,
            ),
        ]),
        Line::from(vec![
            Span::raw(format!(
                "Volume 24h {}   Liquidity ",
                format::format_usd(market.volume_24h)
            )),
            Span::styled(
                format!("{}/100", market.liquidity),
                Style::default().fg(palette.liquidity(market.liquidity_band())),
            ),
            Span::styled(
                format!("   7d {}", format::sparkline(&market.history_prices())),
                Style::default().fg(palette.primary),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(palette.block(&market.slug));
    frame.render_widget(paragraph, area);
}

fn render_history(frame: &mut Frame, area: Rect, detail: &MarketDetail, palette: &Palette) {
    let yes: Vec<_> = detail.price_history.iter().map(|p| p.yes_price).collect();
    let no: Vec<_> = detail.price_history.iter().map(|p| p.no_price).collect();
    let span_label = match (detail.price_history.first(), detail.price_history.last()) {
        (Some(first), Some(last)) => format!(
            "Price history {} → {}",
            format::format_date(first.timestamp),
            format::format_date(last.timestamp)
        ),
        _ => "Price history".to_string(),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("YES ", Style::default().fg(palette.success)),
            Span::styled(format::sparkline(&yes), Style::default().fg(palette.success)),
        ]),
        Line::from(vec![
            Span::styled("NO  ", Style::default().fg(palette.error)),
            Span::styled(format::sparkline(&no), Style::default().fg(palette.error)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(palette.block(span_label)), area);
}

fn render_pressure(frame: &mut Frame, area: Rect, detail: &MarketDetail, palette: &Palette) {
    let block = palette.block("Buy / sell pressure");
    let Some(pressure) = detail.buy_pressure() else {
        frame.render_widget(
            Paragraph::new(Span::styled("No recent trades", palette.muted())).block(block),
            area,
        );
        return;
    };

    let percent = pressure.round().to_u16().unwrap_or(0).min(100);
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(palette.success).bg(palette.error))
        .percent(percent)
        .label(format!("{percent}% buy / {}% sell", 100 - percent));
    frame.render_widget(gauge, area);
}

fn render_positions(frame: &mut Frame, area: Rect, detail: &MarketDetail, palette: &Palette) {
    let header = Row::new(
        ["Trader", "Side", "Amount", "Avg", "Unrealized"]
            .iter()
            .map(|h| Cell::from(*h).style(palette.header())),
    )
    .bottom_margin(1);

    let rows = detail.smart_money.iter().map(|position| {
        let mut trader = vec![Span::raw(format!("{} ", position.short_address))];
        trader.extend(tag_spans(position.tags.iter().copied(), false));

        Row::new(vec![
            Cell::from(Line::from(trader)),
            Cell::from(position.outcome.to_string()),
            Cell::from(format::format_usd(position.amount)),
            Cell::from(format::format_price(position.avg_price)),
            Cell::from(signed_span(
                format::format_signed_usd(position.unrealized_pnl),
                position.unrealized_pnl,
                palette,
            )),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(18),
            Constraint::Length(4),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(palette.block("Smart money positions"));
    frame.render_widget(table, area);
}

fn render_trades(frame: &mut Frame, area: Rect, detail: &MarketDetail, palette: &Palette) {
    let header = Row::new(
        ["Time", "Side", "Outcome", "Price", "Size", "Trader"]
            .iter()
            .map(|h| Cell::from(*h).style(palette.header())),
    )
    .bottom_margin(1);

    let now = detail
        .price_history
        .last()
        .map(|p| p.timestamp)
        .unwrap_or_else(chrono::Utc::now);

    let rows = detail.recent_trades.iter().map(|trade| {
        let side_color = match trade.side {
            TradeSide::Buy => palette.success,
            TradeSide::Sell => palette.error,
        };
        Row::new(vec![
            Cell::from(format::format_time_ago(trade.timestamp, now)),
            Cell::from(trade.side.to_string()).style(Style::default().fg(side_color)),
            Cell::from(trade.outcome.to_string()),
            Cell::from(format::format_price(trade.price)),
            Cell::from(format::format_number(trade.size)),
            Cell::from(format::short_address(&trade.trader)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Min(13),
        ],
    )
    .header(header)
    .block(palette.block(format!("Recent trades ({})", detail.recent_trades.len())));
    frame.render_widget(table, area);
}
