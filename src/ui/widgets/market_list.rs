//! Market list widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use super::{option_bar, render_loading, render_placeholder, signed_span};
use crate::format;
use crate::state::{MarketSort, MarketStatus, Store};
use crate::ui::style::Palette;

/// Market list widget.
pub struct MarketList;

impl MarketList {
    /// Render the market list.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, palette: &Palette) {
        let state = &store.markets;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Categories
                Constraint::Length(1), // Sort and search
                Constraint::Min(0),    // Table
            ])
            .split(area);

        let categories = state.categories().into_iter().map(|category| {
            let active = category == state.filter.category;
            (category.label().to_string(), active)
        });
        frame.render_widget(
            Paragraph::new(option_bar(" Category:", categories, palette)),
            chunks[0],
        );

        let mut sort_line = vec![Span::styled(" Sort:", palette.muted())];
        for sort in MarketSort::ALL {
            let label = if sort == state.sort {
                format!(" {} {} ", sort.label(), state.direction.arrow())
            } else {
                format!(" {} ", sort.label())
            };
            let style = if sort == state.sort {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                palette.muted()
            };
            sort_line.push(Span::styled(label, style));
        }
        if let Some(query) = &state.filter.query {
            sort_line.push(Span::styled("  Search: ", palette.muted()));
            sort_line.push(Span::styled(
                format!("\"{query}\""),
                Style::default().fg(palette.warning),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(sort_line)), chunks[1]);

        let markets = state.visible_markets();
        if markets.is_empty() && !state.loading {
            render_placeholder(
                frame,
                chunks[2],
                "Markets (0)",
                "No markets match the current filter",
                palette,
            );
            return;
        }

        let header_cells = [
            "Market", "Category", "Yes", "No", "24h", "Volume", "Liq.", "Ends",
        ]
        .iter()
        .map(|h| Cell::from(*h).style(palette.header()));
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows = markets.iter().map(|market| {
            let title_style = match market.status {
                MarketStatus::Active => Style::default().fg(palette.foreground),
                MarketStatus::Closed => palette.muted(),
            };
            let liquidity_color = palette.liquidity(market.liquidity_band());

            let cells = vec![
                Cell::from(format::truncate(&market.title, 48)).style(title_style),
                Cell::from(market.subcategory.clone()).style(Style::default().fg(palette.primary)),
                Cell::from(format::format_price(market.yes_price))
                    .style(Style::default().fg(palette.success)),
                Cell::from(format::format_price(market.no_price))
                    .style(Style::default().fg(palette.error)),
                Cell::from(signed_span(
                    format::format_change(market.price_change_24h),
                    market.price_change_24h,
                    palette,
                )),
                Cell::from(format::format_usd(market.volume_24h)),
                Cell::from(market.liquidity.to_string()).style(Style::default().fg(liquidity_color)),
                Cell::from(if market.is_active() {
                    format::format_date(market.end_date)
                } else {
                    market.status.to_string()
                }),
            ];

            Row::new(cells).height(1)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Length(5),
                Constraint::Length(11),
            ],
        )
        .header(header)
        .block(palette.block(format!(
            "Markets ({}/{})",
            markets.len(),
            state.markets.len()
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
