//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, data loading and rendering.

use crate::config::{Config, DataConfig};
use crate::data::{self, DataSource, SnapshotSource};
use crate::error::Result;
use crate::events::EventHandler;
use crate::state::{Action, Notification, Store};
use crate::ui::Ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Open the configured data source: a snapshot file if one is set,
/// otherwise the built-in sample.
pub fn open_source(config: &DataConfig) -> Result<Arc<dyn DataSource>> {
    match &config.snapshot_path {
        Some(path) => Ok(Arc::new(SnapshotSource::from_file(path, config.seed)?)),
        None => {
            info!("Using built-in sample data (seed {})", config.seed);
            Ok(Arc::new(SnapshotSource::sample(config.seed)))
        }
    }
}

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application store.
    store: Store,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Where records come from.
    source: Arc<dyn DataSource>,
    /// Renderer.
    ui: Ui,
    /// Configuration.
    config: Config,
    /// Auto-dismissal clock for notifications.
    notification_timer: NotificationTimer,
}

/// Tracks how long the current notification has been on screen.
#[derive(Debug, Default)]
struct NotificationTimer {
    shown: Option<(Notification, Instant)>,
}

impl NotificationTimer {
    /// Whether `current` has outlived its duration at `now`. A different
    /// notification restarts the clock.
    fn expired(&mut self, current: Option<&Notification>, now: Instant) -> bool {
        let Some(current) = current else {
            self.shown = None;
            return false;
        };
        let since = match &self.shown {
            Some((shown, since)) if shown == current => *since,
            _ => {
                self.shown = Some((current.clone(), now));
                now
            }
        };
        let expired = now.duration_since(since) >= Duration::from_secs(current.duration_secs);
        if expired {
            self.shown = None;
        }
        expired
    }
}

impl App {
    /// Create a new application.
    pub async fn new(config: Config) -> Result<Self> {
        // Fail on a bad snapshot before touching the terminal
        let source = open_source(&config.data)?;

        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if config.ui.mouse_support {
            execute!(stdout, EnableMouseCapture)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let store = Store::new(action_tx);
        let event_handler = EventHandler::new(config.keybindings.clone(), config.ui.tick_rate_ms);
        let ui = Ui::new(&config);

        Ok(Self {
            terminal,
            store,
            event_handler,
            action_rx,
            source,
            ui,
            config,
            notification_timer: NotificationTimer::default(),
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        self.refresh_all().await?;
        self.follow_initial_traders().await?;

        if let Some(address) = self.config.wallet.address.clone() {
            self.store.dispatch(Action::ConnectWallet(address))?;
        }

        // Main event loop
        loop {
            self.expire_notification();

            // Update event handler with current state
            self.event_handler.update_store_snapshot(&self.store);

            // Render UI
            let ui = &self.ui;
            let store = &self.store;
            self.terminal.draw(|frame| ui.render(frame, store))?;

            // Handle events and actions
            tokio::select! {
                // Handle terminal events
                result = self.event_handler.next() => {
                    if let Some(action) = result? {
                        self.handle_action(action).await?;
                    }
                }

                // Handle actions from the channel
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await?;
                }
            }

            // Check if we should quit
            if self.store.app.should_quit {
                info!("Quitting");
                break;
            }
        }

        Ok(())
    }

    /// Handle an action.
    async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::RefreshAll => self.refresh_all().await?,
            Action::OpenMarket(slug) => {
                self.store.reduce(Action::OpenMarket(slug.clone()));
                self.load_market_detail(&slug).await?;
            }
            Action::OpenTrader(address) => {
                self.store.reduce(Action::OpenTrader(address.clone()));
                self.load_trader_detail(&address).await?;
            }
            Action::RequestFollow(address) => self.follow(&address).await?,
            action => self.store.reduce(action),
        }
        Ok(())
    }

    /// Reload every list page and dashboard panel.
    async fn refresh_all(&mut self) -> Result<()> {
        self.store.reduce(Action::SetLoading(true));

        let loaded = data::load_all(self.source.as_ref()).await;
        self.store.reduce(Action::SetLoading(false));

        let actions = self.recover(loaded)?.unwrap_or_default();
        for action in actions {
            self.store.reduce(action);
        }
        Ok(())
    }

    /// Follow the first traders of the leaderboard.
    async fn follow_initial_traders(&mut self) -> Result<()> {
        let traders = self.store.traders.traders.clone();
        let actions = data::initial_follows(
            self.source.as_ref(),
            &traders,
            self.config.data.initial_follows,
            &self.config.following,
        )
        .await?;
        for action in actions {
            self.store.reduce(action);
        }
        // No notification for startup follows
        self.store.reduce(Action::DismissNotification);
        Ok(())
    }

    async fn load_market_detail(&mut self, slug: &str) -> Result<()> {
        let detail = self.source.market_detail(slug).await;
        match self.recover(detail)? {
            Some(Some(detail)) => self.store.reduce(Action::MarketDetailLoaded(detail)),
            Some(None) => warn!("No market with slug {}", slug),
            None => {}
        }
        Ok(())
    }

    async fn load_trader_detail(&mut self, address: &str) -> Result<()> {
        let detail = self.source.trader_detail(address).await;
        match self.recover(detail)? {
            Some(Some(detail)) => self.store.reduce(Action::TraderDetailLoaded(detail)),
            Some(None) => warn!("No trader with address {}", address),
            None => {}
        }
        Ok(())
    }

    /// Fetch follow performance and record the follow with configured defaults.
    async fn follow(&mut self, address: &str) -> Result<()> {
        let performance = self.source.follow_performance(address).await;
        if let Some(performance) = self.recover(performance)? {
            self.store.reduce(Action::Followed {
                address: address.to_string(),
                config: self.config.following.follow_config(),
                performance,
            });
        }
        Ok(())
    }

    /// Surface recoverable errors in the UI; propagate the rest.
    fn recover<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() => {
                warn!("{}", e);
                self.store.reduce(Action::SetError(e.to_string()));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Dismiss the notification once its duration has passed.
    fn expire_notification(&mut self) {
        let current = self.store.app.notification.as_ref();
        if self.notification_timer.expired(current, Instant::now()) {
            self.store.reduce(Action::DismissNotification);
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_open_source_defaults_to_sample() {
        let source = open_source(&DataConfig::default()).unwrap();
        assert_eq!(source.markets().await.unwrap().len(), 8);
    }

    #[test]
    fn test_open_source_missing_file() {
        let config = DataConfig {
            snapshot_path: Some("/nonexistent/poli-snapshot.json".into()),
            ..DataConfig::default()
        };
        assert!(matches!(open_source(&config), Err(Error::Io(_))));
    }

    #[test]
    fn test_notification_expires_after_duration() {
        let mut timer = NotificationTimer::default();
        let start = Instant::now();
        let saved = Notification::success("Following 0x742d...f44e");

        assert!(!timer.expired(Some(&saved), start));
        assert!(!timer.expired(Some(&saved), start + Duration::from_secs(2)));
        assert!(timer.expired(Some(&saved), start + Duration::from_secs(3)));
        assert!(!timer.expired(None, start + Duration::from_secs(4)));
    }

    #[test]
    fn test_replacing_notification_restarts_clock() {
        let mut timer = NotificationTimer::default();
        let start = Instant::now();
        let first = Notification::info("Copying paused");
        let second = Notification::info("Copying resumed");

        assert!(!timer.expired(Some(&first), start));
        // replaced just before the first would have expired
        let replaced = start + Duration::from_millis(2900);
        assert!(!timer.expired(Some(&second), replaced));
        assert!(!timer.expired(Some(&second), start + Duration::from_secs(3)));
        assert!(timer.expired(Some(&second), replaced + Duration::from_secs(3)));
    }
}
