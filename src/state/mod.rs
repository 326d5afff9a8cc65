//! State management for poli.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. Every page owns its
//! filter and sort selection explicitly; list views are derived from those
//! selections through [`crate::projection`] on each render.

mod app_state;
mod dashboard_state;
mod following_state;
mod market_state;
mod trade_state;
pub(crate) mod trader_state;
mod wallet_state;

pub use app_state::{AppState, InputMode, View};
pub use dashboard_state::{
    Alert, AlertTarget, DashboardState, SentimentPoint, hot_markets, reverse_indicators,
    top_smart_money,
};
pub use following_state::{
    COPY_RATIO_STEP, FollowConfig, FollowFilter, FollowOverview, FollowPerformance, FollowStatus,
    FollowedTrader, FollowingState, MAX_COPY_RATIO, MIN_COPY_RATIO, Performer,
};
pub use market_state::{
    CategoryFilter, LiquidityBand, Market, MarketDetail, MarketFilter, MarketSort, MarketState,
    MarketStatus, OutcomePricePoint, PricePoint,
};
pub use trade_state::{
    MarketTradeHistory, Outcome, PositionResult, SmartMoneyPosition, Trade, TradeSide,
    buy_pressure,
};
pub use trader_state::{
    ExpertiseBand, Expertise, HasAnyTag, HasTag, PerformanceStatus, RecentPerformance, Trader,
    TraderDetail, TraderSort, TraderState, TraderTab, TraderTag, WinRatePoint, validate_address,
};
pub use wallet_state::WalletState;

use crate::error::Result;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    SetInputMode(InputMode),
    Back,

    // Data loading
    RefreshAll,
    SetLoading(bool),
    MarketsLoaded(Vec<Market>),
    TradersLoaded(Vec<Trader>),
    DashboardLoaded {
        alerts: Vec<Alert>,
        sentiment: Vec<SentimentPoint>,
    },

    // Market list
    CycleCategory,
    SetCategory(CategoryFilter),
    CycleMarketSort,
    SearchMarkets(String),
    ClearSearch,

    // Trader leaderboard
    CycleTraderTab,
    SetTraderTab(TraderTab),
    CycleTraderSort,

    /// Flip the sort direction of the current list view.
    ToggleSortDirection,

    // Detail pages
    OpenMarket(String),
    MarketDetailLoaded(MarketDetail),
    OpenTrader(String),
    TraderDetailLoaded(TraderDetail),

    // Following
    /// Ask the app to follow a trader; resolved into `Followed`.
    RequestFollow(String),
    Followed {
        address: String,
        config: FollowConfig,
        performance: FollowPerformance,
    },
    Unfollow(String),
    ToggleFollowEnabled(String),
    AdjustCopyRatio { address: String, steps: i32 },
    SetMaxPerTrade { address: String, max: Decimal },
    ToggleFollowSettings,
    CycleFollowFilter,

    // Wallet
    ConnectWallet(String),
    DisconnectWallet,

    // Text input
    InputChar(char),
    InputBackspace,
    CursorLeft,
    CursorRight,
    SubmitInput,
    CancelInput,

    // UI actions
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,

    // Error handling
    SetError(String),
    ClearError,

    // Quit
    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration_secs: 10,
        }
    }
}

/// Which entity the user is focused on, used by key handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Focus {
    pub market_slug: Option<String>,
    pub trader_address: Option<String>,
    pub trader_followed: bool,
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Dashboard panels.
    pub dashboard: DashboardState,
    /// Market list and detail.
    pub markets: MarketState,
    /// Trader leaderboard and detail.
    pub traders: TraderState,
    /// Copy-trading follows.
    pub following: FollowingState,
    /// Connected wallet.
    pub wallet: WalletState,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            app: AppState::default(),
            dashboard: DashboardState::default(),
            markets: MarketState::default(),
            traders: TraderState::default(),
            following: FollowingState::default(),
            wallet: WalletState::default(),
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// The market and trader the current view is focused on.
    pub fn focus(&self) -> Focus {
        let market_slug = match self.app.current_view {
            View::Markets => self.markets.selected_market().map(|m| m.slug.clone()),
            View::MarketDetail => self.markets.detail_slug.clone(),
            _ => None,
        };
        let trader_address = match self.app.current_view {
            View::Traders => self.traders.selected_trader().map(|t| t.address.clone()),
            View::TraderDetail => self.traders.detail_address.clone(),
            View::Following => self.following.selected().map(|f| f.address.clone()),
            _ => None,
        };
        let trader_followed = trader_address
            .as_deref()
            .is_some_and(|address| self.following.is_following(address));

        Focus {
            market_slug,
            trader_address,
            trader_followed,
        }
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::SetView(view) => self.app.current_view = view,
            Action::SetInputMode(mode) => {
                self.app.clear_input();
                // Editing starts from the current value
                let current = match mode {
                    InputMode::Search => self.markets.filter.query.clone(),
                    InputMode::MaxPerTrade => match self.following.selected() {
                        Some(follow) => Some(follow.config.max_per_trade.normalize().to_string()),
                        None => return,
                    },
                    InputMode::Normal | InputMode::Wallet => None,
                };
                for c in current.unwrap_or_default().chars() {
                    self.app.push_char(c);
                }
                self.app.input_mode = mode;
            }
            Action::Back => {
                if self.app.error.is_some() {
                    self.app.error = None;
                } else if self.app.show_help {
                    self.app.show_help = false;
                } else {
                    self.app.current_view = self.app.current_view.parent();
                }
            }

            // Data loading
            Action::RefreshAll => self.app.loading = true,
            Action::SetLoading(loading) => {
                self.app.loading = loading;
                self.markets.loading = loading;
                self.traders.loading = loading;
            }
            Action::MarketsLoaded(markets) => {
                self.markets.markets = markets;
                self.markets.loading = false;
                self.markets.last_updated = Some(chrono::Utc::now());
                self.markets.selected_index = first_index(self.markets.visible_count());
            }
            Action::TradersLoaded(traders) => {
                self.traders.traders = traders;
                self.traders.loading = false;
                self.traders.last_updated = Some(chrono::Utc::now());
                self.traders.selected_index = first_index(self.traders.visible_count());
            }
            Action::DashboardLoaded { alerts, sentiment } => {
                self.dashboard.alerts = alerts;
                self.dashboard.sentiment = sentiment;
            }

            // Market list
            Action::CycleCategory => self.markets.cycle_category(),
            Action::SetCategory(category) => {
                self.markets.filter.category = category;
                self.markets.selected_index = first_index(self.markets.visible_count());
            }
            Action::CycleMarketSort => self.markets.cycle_sort(),
            Action::SearchMarkets(query) => self.markets.set_query(Some(query)),
            Action::ClearSearch => self.markets.set_query(None),

            // Trader leaderboard
            Action::CycleTraderTab => self.traders.cycle_tab(),
            Action::SetTraderTab(tab) => {
                self.traders.tab = tab;
                self.traders.selected_index = first_index(self.traders.visible_count());
            }
            Action::CycleTraderSort => self.traders.cycle_sort(),
            Action::ToggleSortDirection => match self.app.current_view {
                View::Markets => self.markets.toggle_direction(),
                View::Traders => self.traders.toggle_direction(),
                _ => {}
            },

            // Detail pages
            Action::OpenMarket(slug) => {
                if self.markets.detail_slug.as_deref() != Some(slug.as_str()) {
                    self.markets.detail = None;
                }
                self.markets.detail_slug = Some(slug);
                self.app.current_view = View::MarketDetail;
            }
            Action::MarketDetailLoaded(detail) => {
                if self.markets.detail_slug.as_deref() == Some(detail.slug.as_str()) {
                    self.markets.detail = Some(detail);
                }
            }
            Action::OpenTrader(address) => {
                if self.traders.detail_address.as_deref() != Some(address.as_str()) {
                    self.traders.detail = None;
                }
                self.traders.detail_address = Some(address);
                self.app.current_view = View::TraderDetail;
            }
            Action::TraderDetailLoaded(detail) => {
                if self.traders.detail_address.as_deref() == Some(detail.address.as_str()) {
                    self.traders.detail = Some(detail);
                }
            }

            // Following
            Action::RequestFollow(_) => {}
            Action::Followed {
                address,
                config,
                performance,
            } => {
                let Some(trader) = self.traders.find_by_address(&address).cloned() else {
                    self.app.notification = Some(Notification::warning(format!(
                        "Unknown trader {}",
                        crate::format::short_address(&address)
                    )));
                    return;
                };
                if self.following.follow(&trader, config, performance) {
                    self.app.notification = Some(Notification::success(format!(
                        "Following {}",
                        trader.short_address()
                    )));
                }
            }
            Action::Unfollow(address) => {
                if self.following.unfollow(&address) {
                    self.app.notification = Some(Notification::info(format!(
                        "Unfollowed {}",
                        crate::format::short_address(&address)
                    )));
                }
            }
            Action::ToggleFollowEnabled(address) => {
                if let Some(enabled) = self.following.toggle_enabled(&address) {
                    let state = if enabled { "resumed" } else { "paused" };
                    self.app.notification = Some(Notification::info(format!("Copying {state}")));
                }
            }
            Action::AdjustCopyRatio { address, steps } => {
                self.following.adjust_ratio(&address, steps);
            }
            Action::SetMaxPerTrade { address, max } => {
                self.app.notification = Some(if max < Decimal::ZERO {
                    Notification::error("Max per trade cannot be negative")
                } else if self.following.set_max_per_trade(&address, max) {
                    Notification::info(format!(
                        "Max per trade set to {}",
                        crate::format::format_usd(max)
                    ))
                } else {
                    Notification::warning(format!(
                        "Not following {}",
                        crate::format::short_address(&address)
                    ))
                });
            }
            Action::ToggleFollowSettings => {
                self.following.show_settings = !self.following.show_settings;
            }
            Action::CycleFollowFilter => self.following.cycle_filter(),

            // Wallet
            Action::ConnectWallet(address) => match self.wallet.connect(&address) {
                Ok(()) => {
                    self.app.notification = Some(Notification::success(format!(
                        "Wallet connected: {}",
                        self.wallet.label()
                    )));
                }
                Err(e) => {
                    self.app.notification = Some(Notification::error(e.to_string()));
                }
            },
            Action::DisconnectWallet => {
                self.wallet.disconnect();
                self.app.notification = Some(Notification::info("Wallet disconnected"));
            }

            // Text input
            Action::InputChar(c) => self.app.push_char(c),
            Action::InputBackspace => self.app.pop_char(),
            Action::CursorLeft => self.app.cursor_left(),
            Action::CursorRight => self.app.cursor_right(),
            Action::SubmitInput => self.submit_input(),
            Action::CancelInput => {
                self.app.clear_input();
                self.app.input_mode = InputMode::Normal;
            }

            // UI actions
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::PageUp => self.scroll(-10),
            Action::PageDown => self.scroll(10),
            Action::GoToTop => self.go_to_top(),
            Action::GoToBottom => self.go_to_bottom(),
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => {
                self.app.notification = Some(notification);
            }
            Action::DismissNotification => {
                self.app.notification = None;
            }

            // Error handling
            Action::SetError(error) => {
                self.app.error = Some(error);
                self.app.loading = false;
            }
            Action::ClearError => {
                self.app.error = None;
            }

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
            }
        }
    }

    fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.app.input_buffer);
        self.app.cursor_position = 0;
        let mode = std::mem::take(&mut self.app.input_mode);

        match mode {
            InputMode::Search => {
                self.markets.set_query(Some(input));
                self.app.current_view = View::Markets;
            }
            InputMode::Wallet => self.reduce(Action::ConnectWallet(input)),
            InputMode::MaxPerTrade => {
                let Some(address) = self.following.selected().map(|f| f.address.clone()) else {
                    return;
                };
                match crate::format::parse_usd(&input) {
                    Some(max) => self.reduce(Action::SetMaxPerTrade { address, max }),
                    None => {
                        self.app.notification =
                            Some(Notification::error(format!("Not an amount: {input}")));
                    }
                }
            }
            InputMode::Normal => {}
        }
    }

    /// Length of the list shown by the current view, if it has one.
    fn list_len(&self) -> Option<usize> {
        match self.app.current_view {
            View::Markets => Some(self.markets.visible_count()),
            View::Traders => Some(self.traders.visible_count()),
            View::Following => Some(self.following.visible_count()),
            _ => None,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut Option<usize>> {
        match self.app.current_view {
            View::Markets => Some(&mut self.markets.selected_index),
            View::Traders => Some(&mut self.traders.selected_index),
            View::Following => Some(&mut self.following.selected_index),
            _ => None,
        }
    }

    fn scroll(&mut self, delta: i32) {
        let Some(len) = self.list_len() else {
            return;
        };
        let Some(selection) = self.selection_mut() else {
            return;
        };
        if len == 0 {
            *selection = None;
            return;
        }
        let current = selection.unwrap_or(0) as i32;
        let new_index = (current + delta).max(0) as usize;
        *selection = Some(new_index.min(len - 1));
    }

    fn go_to_top(&mut self) {
        let Some(len) = self.list_len() else {
            return;
        };
        if let Some(selection) = self.selection_mut() {
            *selection = first_index(len);
        }
    }

    fn go_to_bottom(&mut self) {
        let Some(len) = self.list_len() else {
            return;
        };
        if let Some(selection) = self.selection_mut() {
            *selection = len.checked_sub(1);
        }
    }
}

fn first_index(len: usize) -> Option<usize> {
    if len > 0 { Some(0) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::trader_state::tests::trader;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut store = Store::new(tx);
        store.reduce(Action::TradersLoaded(vec![
            trader(1, &[TraderTag::SmartMoney], dec!(70), dec!(10)),
            trader(2, &[TraderTag::SmartMoney], dec!(90), dec!(20)),
            trader(3, &[TraderTag::Whale], dec!(50), dec!(5)),
        ]));
        store
    }

    fn performance() -> FollowPerformance {
        FollowPerformance {
            total_invested: dec!(1000),
            total_pnl: dec!(50),
            followed_trades: 3,
            last_follow_time: Utc::now(),
        }
    }

    #[test]
    fn test_scroll_clamps_to_visible_list() {
        let mut store = store();
        store.reduce(Action::SetView(View::Traders));
        // smart-money tab shows two traders
        assert_eq!(store.traders.selected_index, Some(0));
        store.reduce(Action::PageDown);
        assert_eq!(store.traders.selected_index, Some(1));
        store.reduce(Action::ScrollUp);
        store.reduce(Action::ScrollUp);
        assert_eq!(store.traders.selected_index, Some(0));

        store.reduce(Action::SetTraderTab(TraderTab::All));
        store.reduce(Action::GoToBottom);
        assert_eq!(store.traders.selected_index, Some(2));
    }

    #[test]
    fn test_scroll_on_empty_list() {
        let mut store = store();
        store.reduce(Action::SetView(View::Markets));
        store.reduce(Action::ScrollDown);
        assert_eq!(store.markets.selected_index, None);
        store.reduce(Action::GoToBottom);
        assert_eq!(store.markets.selected_index, None);
    }

    #[test]
    fn test_focus_follows_selection() {
        let mut store = store();
        store.reduce(Action::SetView(View::Traders));
        let focus = store.focus();
        // highest win rate first
        assert_eq!(focus.trader_address, Some(store.traders.traders[1].address.clone()));
        assert!(!focus.trader_followed);
        assert!(focus.market_slug.is_none());
    }

    #[test]
    fn test_follow_and_unfollow() {
        let mut store = store();
        let address = store.traders.traders[0].address.clone();

        store.reduce(Action::Followed {
            address: address.clone(),
            config: FollowConfig::default(),
            performance: performance(),
        });
        assert!(store.following.is_following(&address));
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Success)
        );

        store.reduce(Action::AdjustCopyRatio {
            address: address.clone(),
            steps: 2,
        });
        assert_eq!(store.following.follows[0].config.copy_ratio, 40);

        store.reduce(Action::Unfollow(address.clone()));
        assert!(!store.following.is_following(&address));
    }

    #[test]
    fn test_follow_unknown_trader_warns() {
        let mut store = store();
        store.reduce(Action::Followed {
            address: format!("0x{:040x}", 99),
            config: FollowConfig::default(),
            performance: performance(),
        });
        assert!(store.following.follows.is_empty());
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Warning)
        );
    }

    #[test]
    fn test_search_input_flow() {
        let mut store = store();
        store.reduce(Action::SetInputMode(InputMode::Search));
        for c in "iran".chars() {
            store.reduce(Action::InputChar(c));
        }
        store.reduce(Action::SubmitInput);

        assert_eq!(store.app.input_mode, InputMode::Normal);
        assert_eq!(store.markets.filter.query.as_deref(), Some("iran"));
        assert_eq!(store.app.current_view, View::Markets);

        // reopening search starts from the current query
        store.reduce(Action::SetInputMode(InputMode::Search));
        assert_eq!(store.app.input_buffer, "iran");
        store.reduce(Action::CancelInput);
        assert_eq!(store.markets.filter.query.as_deref(), Some("iran"));
    }

    #[test]
    fn test_wallet_input_flow() {
        let mut store = store();
        store.reduce(Action::SetInputMode(InputMode::Wallet));
        for c in "0x742d35cc6634c0532925a3b844bc454e4438f44e".chars() {
            store.reduce(Action::InputChar(c));
        }
        store.reduce(Action::SubmitInput);
        assert!(store.wallet.is_connected());

        store.reduce(Action::DisconnectWallet);
        store.reduce(Action::ConnectWallet("garbage".to_string()));
        assert!(!store.wallet.is_connected());
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Error)
        );
    }

    fn following_one() -> (Store, String) {
        let mut store = store();
        let address = store.traders.traders[0].address.clone();
        store.reduce(Action::Followed {
            address: address.clone(),
            config: FollowConfig::default(),
            performance: performance(),
        });
        store.reduce(Action::SetView(View::Following));
        (store, address)
    }

    fn type_text(store: &mut Store, text: &str) {
        for c in text.chars() {
            store.reduce(Action::InputChar(c));
        }
    }

    #[test]
    fn test_max_per_trade_input_flow() {
        let (mut store, address) = following_one();

        store.reduce(Action::SetInputMode(InputMode::MaxPerTrade));
        assert_eq!(store.app.input_mode, InputMode::MaxPerTrade);
        assert_eq!(store.app.input_buffer, "1000");

        for _ in 0..4 {
            store.reduce(Action::InputBackspace);
        }
        type_text(&mut store, "$2,500");
        store.reduce(Action::SubmitInput);

        assert_eq!(store.app.input_mode, InputMode::Normal);
        let follow = store.following.get(&address).unwrap();
        assert_eq!(follow.config.max_per_trade, dec!(2500));
        assert_eq!(follow.config.copy_size(dec!(10000)), dec!(2500));
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Info)
        );
    }

    #[test]
    fn test_max_per_trade_rejects_bad_amounts() {
        let (mut store, address) = following_one();

        store.reduce(Action::SetInputMode(InputMode::MaxPerTrade));
        store.reduce(Action::InputChar('x'));
        store.reduce(Action::SubmitInput);
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Error)
        );

        store.reduce(Action::SetMaxPerTrade {
            address: address.clone(),
            max: dec!(-5),
        });
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Error)
        );
        assert_eq!(
            store.following.get(&address).unwrap().config.max_per_trade,
            dec!(1000)
        );

        store.reduce(Action::SetMaxPerTrade {
            address: format!("0x{:040x}", 99),
            max: dec!(10),
        });
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Warning)
        );
    }

    #[test]
    fn test_max_per_trade_needs_selection() {
        let mut store = store();
        store.reduce(Action::SetView(View::Following));
        store.reduce(Action::SetInputMode(InputMode::MaxPerTrade));
        assert_eq!(store.app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_open_detail_and_back() {
        let mut store = store();
        store.reduce(Action::OpenTrader("0xabc".to_string()));
        assert_eq!(store.app.current_view, View::TraderDetail);
        // unknown address renders the not-found fallback
        assert!(store.traders.detail_trader().is_none());

        store.reduce(Action::TraderDetailLoaded(TraderDetail {
            address: "0xother".to_string(),
            ..Default::default()
        }));
        assert!(store.traders.detail.is_none());

        store.reduce(Action::Back);
        assert_eq!(store.app.current_view, View::Traders);
    }

    #[test]
    fn test_back_dismisses_error_first() {
        let mut store = store();
        store.reduce(Action::SetView(View::TraderDetail));
        store.reduce(Action::SetError("data source timed out".to_string()));

        store.reduce(Action::Back);
        assert!(store.app.error.is_none());
        assert_eq!(store.app.current_view, View::TraderDetail);

        store.reduce(Action::Back);
        assert_eq!(store.app.current_view, View::Traders);
    }
}
