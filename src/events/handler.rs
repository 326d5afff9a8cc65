//! Event handler for processing input events.

use super::InputEvent;
use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, Focus, InputMode, Store, View};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Handles input events and produces actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// Poll timeout for terminal events.
    poll_timeout: Duration,
    /// Store reference for state-aware handling.
    store_snapshot: Option<StoreSnapshot>,
}

/// Snapshot of relevant store state for event handling.
#[derive(Debug, Clone, Default)]
struct StoreSnapshot {
    input_mode: InputMode,
    current_view: View,
    show_help: bool,
    has_query: bool,
    wallet_connected: bool,
    focus: Focus,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(keybindings: KeyBindings, tick_rate_ms: u64) -> Self {
        Self {
            keybindings,
            poll_timeout: Duration::from_millis(tick_rate_ms),
            store_snapshot: None,
        }
    }

    /// Update the store snapshot for state-aware event handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.store_snapshot = Some(StoreSnapshot {
            input_mode: store.app.input_mode,
            current_view: store.app.current_view,
            show_help: store.app.show_help,
            has_query: store.markets.filter.query.is_some(),
            wallet_connected: store.wallet.is_connected(),
            focus: store.focus(),
        });
    }

    /// Get the next action from user input.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                CrosstermEvent::Key(key) => return Ok(self.handle_key(key)),
                CrosstermEvent::Mouse(mouse) => return Ok(self.handle_mouse(mouse)),
                CrosstermEvent::Resize(_, _) => {
                    // Terminal will automatically redraw
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Handle a key event and return an optional action.
    fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let snapshot = self.store_snapshot.as_ref()?;

        match snapshot.input_mode {
            InputMode::Normal => self.handle_normal_mode(key, snapshot),
            InputMode::Search | InputMode::Wallet | InputMode::MaxPerTrade => {
                self.handle_input_mode(key)
            }
        }
    }

    /// Handle a mouse event and return an optional action.
    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    fn handle_normal_mode(&self, key: KeyEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let input = InputEvent::from(key);
        let keys = &self.keybindings;

        // Global shortcuts
        if input.matches(&keys.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&keys.help) {
            return Some(Action::ToggleHelp);
        }
        if snapshot.show_help {
            // Only dismissal keys while the overlay is up
            return input.matches(&keys.back).then_some(Action::ToggleHelp);
        }
        if input.matches(&keys.refresh) {
            return Some(Action::RefreshAll);
        }

        // View switching
        for (binding, view) in [
            (&keys.dashboard, View::Dashboard),
            (&keys.markets, View::Markets),
            (&keys.traders, View::Traders),
            (&keys.following, View::Following),
        ] {
            if input.matches(binding) {
                return Some(Action::SetView(view));
            }
        }

        // Navigation
        if input.matches(&keys.up) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&keys.down) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        match key.code {
            KeyCode::PageUp => return Some(Action::PageUp),
            KeyCode::PageDown => return Some(Action::PageDown),
            KeyCode::Home => return Some(Action::GoToTop),
            KeyCode::End => return Some(Action::GoToBottom),
            _ => {}
        }

        if input.matches(&keys.search) {
            return Some(Action::SetInputMode(InputMode::Search));
        }
        if input.matches(&keys.wallet) {
            return Some(if snapshot.wallet_connected {
                Action::DisconnectWallet
            } else {
                Action::SetInputMode(InputMode::Wallet)
            });
        }

        if input.matches(&keys.back) || key.code == KeyCode::Backspace {
            if snapshot.current_view == View::Markets && snapshot.has_query {
                return Some(Action::ClearSearch);
            }
            return Some(Action::Back);
        }

        // View-specific actions
        match snapshot.current_view {
            View::Markets => self.handle_markets_view(&input, snapshot),
            View::Traders => self.handle_traders_view(&input, snapshot),
            View::TraderDetail => self.handle_follow_toggle(&input, &snapshot.focus),
            View::Following => self.handle_following_view(&input, snapshot),
            View::Dashboard | View::MarketDetail => None,
        }
    }

    fn handle_markets_view(&self, input: &InputEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let keys = &self.keybindings;

        if input.matches(&keys.select) {
            return snapshot.focus.market_slug.clone().map(Action::OpenMarket);
        }
        if input.matches(&keys.next_filter) {
            return Some(Action::CycleCategory);
        }
        if input.matches(&keys.next_sort) {
            return Some(Action::CycleMarketSort);
        }
        if input.matches(&keys.sort_direction) {
            return Some(Action::ToggleSortDirection);
        }
        None
    }

    fn handle_traders_view(&self, input: &InputEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let keys = &self.keybindings;

        if input.matches(&keys.select) {
            return snapshot.focus.trader_address.clone().map(Action::OpenTrader);
        }
        if input.matches(&keys.next_filter) {
            return Some(Action::CycleTraderTab);
        }
        if input.matches(&keys.next_sort) {
            return Some(Action::CycleTraderSort);
        }
        if input.matches(&keys.sort_direction) {
            return Some(Action::ToggleSortDirection);
        }
        self.handle_follow_toggle(input, &snapshot.focus)
    }

    fn handle_following_view(
        &self,
        input: &InputEvent,
        snapshot: &StoreSnapshot,
    ) -> Option<Action> {
        let keys = &self.keybindings;

        if input.matches(&keys.next_filter) {
            return Some(Action::CycleFollowFilter);
        }
        if input.matches(&keys.settings) {
            return Some(Action::ToggleFollowSettings);
        }

        let address = snapshot.focus.trader_address.clone()?;
        if input.matches(&keys.select) {
            return Some(Action::OpenTrader(address));
        }
        if input.matches(&keys.toggle_copy) {
            return Some(Action::ToggleFollowEnabled(address));
        }
        if input.matches(&keys.ratio_up) {
            return Some(Action::AdjustCopyRatio { address, steps: 1 });
        }
        if input.matches(&keys.ratio_down) {
            return Some(Action::AdjustCopyRatio { address, steps: -1 });
        }
        if input.matches(&keys.max_per_trade) {
            return Some(Action::SetInputMode(InputMode::MaxPerTrade));
        }
        if input.matches(&keys.follow) {
            return Some(Action::Unfollow(address));
        }
        None
    }

    fn handle_follow_toggle(&self, input: &InputEvent, focus: &Focus) -> Option<Action> {
        if !input.matches(&self.keybindings.follow) {
            return None;
        }
        let address = focus.trader_address.clone()?;
        Some(if focus.trader_followed {
            Action::Unfollow(address)
        } else {
            Action::RequestFollow(address)
        })
    }

    fn handle_input_mode(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CancelInput),
            KeyCode::Enter => Some(Action::SubmitInput),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            _ => InputEvent::from(key).char().map(Action::InputChar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn handler(snapshot: StoreSnapshot) -> EventHandler {
        let mut handler = EventHandler::new(KeyBindings::default(), 100);
        handler.store_snapshot = Some(snapshot);
        handler
    }

    fn press(handler: &EventHandler, code: KeyCode) -> Option<Action> {
        handler.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    const ADDRESS: &str = "0x742d35cc6634c0532925a3b844bc454e4438f44e";

    fn traders_view(followed: bool) -> StoreSnapshot {
        StoreSnapshot {
            current_view: View::Traders,
            focus: Focus {
                market_slug: None,
                trader_address: Some(ADDRESS.to_string()),
                trader_followed: followed,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_no_snapshot_no_action() {
        let handler = EventHandler::new(KeyBindings::default(), 100);
        assert!(press(&handler, KeyCode::Char('q')).is_none());
    }

    #[test]
    fn test_global_keys() {
        let handler = handler(StoreSnapshot::default());
        assert!(matches!(press(&handler, KeyCode::Char('q')), Some(Action::Quit)));
        assert!(matches!(
            press(&handler, KeyCode::Char('3')),
            Some(Action::SetView(View::Traders))
        ));
        assert!(matches!(press(&handler, KeyCode::Char('j')), Some(Action::ScrollDown)));
        assert!(matches!(press(&handler, KeyCode::End), Some(Action::GoToBottom)));
        assert!(matches!(
            press(&handler, KeyCode::Char('w')),
            Some(Action::SetInputMode(InputMode::Wallet))
        ));
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let handler = handler(StoreSnapshot {
            show_help: true,
            ..Default::default()
        });
        assert!(press(&handler, KeyCode::Char('2')).is_none());
        assert!(matches!(press(&handler, KeyCode::Esc), Some(Action::ToggleHelp)));
    }

    #[test]
    fn test_follow_toggle_depends_on_focus() {
        let handler_unfollowed = handler(traders_view(false));
        assert!(matches!(
            press(&handler_unfollowed, KeyCode::Char('f')),
            Some(Action::RequestFollow(a)) if a == ADDRESS
        ));

        let handler_followed = handler(traders_view(true));
        assert!(matches!(
            press(&handler_followed, KeyCode::Char('f')),
            Some(Action::Unfollow(a)) if a == ADDRESS
        ));
    }

    #[test]
    fn test_traders_view_keys() {
        let handler = handler(traders_view(false));
        assert!(matches!(press(&handler, KeyCode::Tab), Some(Action::CycleTraderTab)));
        assert!(matches!(press(&handler, KeyCode::Char('s')), Some(Action::CycleTraderSort)));
        assert!(matches!(
            press(&handler, KeyCode::Enter),
            Some(Action::OpenTrader(a)) if a == ADDRESS
        ));
    }

    #[test]
    fn test_markets_back_clears_search_first() {
        let handler = handler(StoreSnapshot {
            current_view: View::Markets,
            has_query: true,
            ..Default::default()
        });
        assert!(matches!(press(&handler, KeyCode::Esc), Some(Action::ClearSearch)));
        // nothing selected, nothing to open
        assert!(press(&handler, KeyCode::Enter).is_none());
    }

    #[test]
    fn test_following_view_ratio_keys() {
        let handler = handler(StoreSnapshot {
            current_view: View::Following,
            focus: Focus {
                market_slug: None,
                trader_address: Some(ADDRESS.to_string()),
                trader_followed: true,
            },
            ..Default::default()
        });
        assert!(matches!(
            press(&handler, KeyCode::Char('+')),
            Some(Action::AdjustCopyRatio { steps: 1, .. })
        ));
        assert!(matches!(
            press(&handler, KeyCode::Char('-')),
            Some(Action::AdjustCopyRatio { steps: -1, .. })
        ));
        assert!(matches!(
            press(&handler, KeyCode::Char('e')),
            Some(Action::ToggleFollowEnabled(_))
        ));
        assert!(matches!(
            press(&handler, KeyCode::Char('m')),
            Some(Action::SetInputMode(InputMode::MaxPerTrade))
        ));
    }

    #[test]
    fn test_max_per_trade_needs_a_selected_follow() {
        let handler = handler(StoreSnapshot {
            current_view: View::Following,
            ..Default::default()
        });
        assert!(press(&handler, KeyCode::Char('m')).is_none());

        let editing = handler_in_mode(InputMode::MaxPerTrade);
        assert!(matches!(press(&editing, KeyCode::Char('5')), Some(Action::InputChar('5'))));
        assert!(matches!(press(&editing, KeyCode::Enter), Some(Action::SubmitInput)));
    }

    fn handler_in_mode(input_mode: InputMode) -> EventHandler {
        handler(StoreSnapshot {
            input_mode,
            ..Default::default()
        })
    }

    #[test]
    fn test_input_mode_keys() {
        let handler = handler_in_mode(InputMode::Search);
        assert!(matches!(press(&handler, KeyCode::Char('q')), Some(Action::InputChar('q'))));
        assert!(matches!(press(&handler, KeyCode::Enter), Some(Action::SubmitInput)));
        assert!(matches!(press(&handler, KeyCode::Esc), Some(Action::CancelInput)));
        assert!(matches!(press(&handler, KeyCode::Backspace), Some(Action::InputBackspace)));
    }
}
