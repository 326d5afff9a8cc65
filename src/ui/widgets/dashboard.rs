//! Dashboard page: alert ticker, hot markets, leaderboards and sentiment.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, Paragraph, Row, Table},
};
use rust_decimal::Decimal;

use super::{render_loading, signed_span, tag_spans};
use crate::config::UiConfig;
use crate::format;
use crate::state::{AlertTarget, Store, hot_markets, reverse_indicators, top_smart_money};
use crate::ui::style::Palette;

pub struct DashboardView;

impl DashboardView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, ui: &UiConfig, palette: &Palette) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(store.dashboard.alerts.len().clamp(1, 5) as u16 + 2),
                Constraint::Percentage(45),
                Constraint::Min(0),
            ])
            .split(area);

        Self::render_alerts(frame, rows[0], store, palette);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[1]);
        Self::render_hot_markets(frame, middle[0], store, ui.hot_markets, palette);
        Self::render_sentiment(frame, middle[1], store, palette);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);
        Self::render_smart_money(frame, bottom[0], store, ui.top_traders, palette);
        Self::render_reverse(frame, bottom[1], store, ui.reverse_indicators, palette);

        if store.app.loading {
            render_loading(frame, area, palette);
        }
    }

    fn render_alerts(frame: &mut Frame, area: Rect, store: &Store, palette: &Palette) {
        let now = store.dashboard.as_of().unwrap_or_else(Utc::now);
        let items: Vec<ListItem> = if store.dashboard.alerts.is_empty() {
            vec![ListItem::new(Span::styled("No alerts", palette.muted()))]
        } else {
            store
                .dashboard
                .alerts
                .iter()
                .map(|alert| {
                    let target = match &alert.target {
                        AlertTarget::Market(slug) => slug.clone(),
                        AlertTarget::Trader(address) => format::short_address(address),
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{} ", alert.icon)),
                        Span::styled(
                            alert.message.clone(),
                            Style::default().fg(palette.foreground),
                        ),
                        Span::styled(format!("  {target}"), Style::default().fg(palette.primary)),
                        Span::styled(
                            format!("  {}", format::format_time_ago(alert.timestamp, now)),
                            palette.muted(),
                        ),
                    ]))
                })
                .collect()
        };

        frame.render_widget(List::new(items).block(palette.block("Alerts")), area);
    }

    fn render_hot_markets(frame: &mut Frame, area: Rect, store: &Store, n: usize, palette: &Palette) {
        let header = Row::new(
            ["Market", "Yes", "24h", "Volume"]
                .iter()
                .map(|h| Cell::from(*h).style(palette.header())),
        );

        let rows = hot_markets(&store.markets.markets, n).into_iter().map(|market| {
            Row::new(vec![
                Cell::from(format::truncate(&market.title, 40)),
                Cell::from(format::format_price(market.yes_price))
                    .style(Style::default().fg(palette.success)),
                Cell::from(signed_span(
                    format::format_change(market.price_change_24h),
                    market.price_change_24h,
                    palette,
                )),
                Cell::from(format::format_usd(market.volume_24h)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .block(palette.block("🔥 Hot markets"));
        frame.render_widget(table, area);
    }

    fn render_sentiment(frame: &mut Frame, area: Rect, store: &Store, palette: &Palette) {
        let block = palette.block("Sentiment");
        let Some(latest) = store.dashboard.latest_sentiment() else {
            frame.render_widget(
                Paragraph::new(Span::styled("No data", palette.muted())).block(block),
                area,
            );
            return;
        };

        let (mood, color) = if latest >= Decimal::from(60) {
            ("Greedy", palette.success)
        } else if latest <= Decimal::from(40) {
            ("Fearful", palette.error)
        } else {
            ("Neutral", palette.warning)
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{}", latest.round()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" / 100  {mood}"), Style::default().fg(color)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format::sparkline(&store.dashboard.sentiment_values()),
                Style::default().fg(palette.primary),
            )),
            Line::from(Span::styled(
                format!("last {} days", store.dashboard.sentiment.len()),
                palette.muted(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_smart_money(frame: &mut Frame, area: Rect, store: &Store, n: usize, palette: &Palette) {
        let header = Row::new(
            ["Trader", "Win rate", "ROI", "Profit"]
                .iter()
                .map(|h| Cell::from(*h).style(palette.header())),
        );

        let rows = top_smart_money(&store.traders.traders, n)
            .into_iter()
            .map(|trader| {
                let mut name = vec![Span::raw(format!("{} ", trader.short_address()))];
                name.extend(tag_spans(trader.tags.iter().copied(), false));
                Row::new(vec![
                    Cell::from(Line::from(name)),
                    Cell::from(format!("{}%", trader.win_rate.round_dp(1))),
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
                ])
            });

        let table = Table::new(
            rows,
            [
                Constraint::Min(18),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(11),
            ],
        )
        .header(header)
        .block(palette.block("🏆 Top smart money"));
        frame.render_widget(table, area);
    }

    fn render_reverse(frame: &mut Frame, area: Rect, store: &Store, n: usize, palette: &Palette) {
        let traders = reverse_indicators(&store.traders.traders, n);
        let items: Vec<ListItem> = if traders.is_empty() {
            vec![ListItem::new(Span::styled("None tracked", palette.muted()))]
        } else {
            traders
                .into_iter()
                .map(|trader| {
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::raw(trader.short_address()),
                            Span::styled(
                                format!("  win {}%", trader.win_rate.round_dp(1)),
                                Style::default().fg(palette.error),
                            ),
                        ]),
                        Line::from(Span::styled(
                            format!("  signal strength {}", trader.reverse_strength().round()),
                            palette.muted(),
                        )),
                    ])
                })
                .collect()
        };

        frame.render_widget(
            List::new(items).block(palette.block("🔴 Reverse indicators")),
            area,
        );
    }
}
