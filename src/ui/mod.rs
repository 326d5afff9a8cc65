//! UI rendering using ratatui.
//!
//! `Ui` owns everything rendering needs from the configuration and draws
//! one frame from a `Store`.

mod layout;
pub mod style;
mod widgets;

pub use layout::Layout;
pub use style::Palette;

use ratatui::Frame;

use crate::config::{Config, KeyBindings, UiConfig};
use crate::state::{Store, View};
use widgets::{
    DashboardView, FollowingList, HelpPanel, MarketDetailView, MarketList, StatusBar, TabBar,
    TraderDetailView, TraderList,
};

/// Main UI renderer.
pub struct Ui {
    palette: Palette,
    keys: KeyBindings,
    settings: UiConfig,
}

impl Ui {
    pub fn new(config: &Config) -> Self {
        Self {
            palette: Palette::from_theme(&config.theme),
            keys: config.keybindings.clone(),
            settings: config.ui.clone(),
        }
    }

    /// Render the entire UI.
    pub fn render(&self, frame: &mut Frame, store: &Store) {
        let palette = &self.palette;
        let layout = Layout::new(frame.area(), store.app.is_editing());

        if self.settings.show_status_bar {
            StatusBar::render(frame, layout.status_area, store, palette);
        }
        TabBar::render(frame, layout.tab_area, store, &self.keys, palette);

        let main = layout.main_area;
        match store.app.current_view {
            View::Dashboard => DashboardView::render(frame, main, store, &self.settings, palette),
            View::Markets => MarketList::render(frame, main, store, palette),
            View::MarketDetail => MarketDetailView::render(frame, main, store, palette),
            View::Traders => TraderList::render(frame, main, store, palette),
            View::TraderDetail => TraderDetailView::render(frame, main, store, palette),
            View::Following => FollowingList::render(frame, main, store, &self.keys, palette),
        }

        if let Some(input_area) = layout.input_area {
            widgets::render_input(frame, input_area, &store.app, palette);
        }

        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), &self.keys, palette);
        }

        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.notification_area, error, palette);
        } else if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification, palette);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample;
    use crate::state::Action;
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;

    fn loaded_store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut store = Store::new(tx);
        let snapshot = sample::snapshot();
        store.reduce(Action::MarketsLoaded(snapshot.markets));
        store.reduce(Action::TradersLoaded(snapshot.traders));
        store.reduce(Action::DashboardLoaded {
            alerts: snapshot.alerts,
            sentiment: snapshot.sentiment,
        });
        store
    }

    fn draw(store: &Store) -> String {
        let ui = Ui::new(&Config::default());
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| ui.render(frame, store)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_every_view() {
        let mut store = loaded_store();
        for view in [
            View::Dashboard,
            View::Markets,
            View::Traders,
            View::Following,
        ] {
            store.reduce(Action::SetView(view));
            let screen = draw(&store);
            assert!(screen.contains("Dashboard"), "tab bar missing for {view:?}");
        }
    }

    #[test]
    fn test_market_not_found() {
        let mut store = loaded_store();
        store.reduce(Action::OpenMarket("no-such-market".to_string()));
        let screen = draw(&store);
        assert!(screen.contains("Market not found"));
    }

    #[test]
    fn test_trader_not_found() {
        let mut store = loaded_store();
        store.reduce(Action::OpenTrader(
            "0x0000000000000000000000000000000000000000".to_string(),
        ));
        let screen = draw(&store);
        assert!(screen.contains("Trader not found"));
    }

    #[test]
    fn test_follow_settings_and_cap_input() {
        let mut store = loaded_store();
        let trader = store.traders.traders[0].clone();
        store.reduce(Action::Followed {
            address: trader.address.clone(),
            config: crate::state::FollowConfig::default(),
            performance: crate::state::FollowPerformance {
                total_invested: rust_decimal::Decimal::from(1000),
                total_pnl: rust_decimal::Decimal::from(50),
                followed_trades: 3,
                last_follow_time: sample::anchor(),
            },
        });
        store.reduce(Action::SetView(View::Following));
        store.reduce(Action::ToggleFollowSettings);
        assert!(draw(&store).contains("[m] Max per trade"));

        store.reduce(Action::SetInputMode(crate::state::InputMode::MaxPerTrade));
        assert!(draw(&store).contains("Max per trade in USD"));
    }

    #[test]
    fn test_help_overlay() {
        let mut store = loaded_store();
        store.reduce(Action::ToggleHelp);
        assert!(draw(&store).contains("Help"));
    }
}
