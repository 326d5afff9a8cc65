//! Configuration settings for poli.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::state::{FollowConfig, MAX_COPY_RATIO, MIN_COPY_RATIO};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
    /// Theme configuration.
    pub theme: ThemeConfig,
    /// Where records come from.
    pub data: DataConfig,
    /// Defaults for new follows.
    pub following: FollowingConfig,
    /// Wallet connection.
    pub wallet: WalletConfig,
}

impl Config {
    /// Load configuration from file, returning default if the file doesn't exist.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(default_path);

        let config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::config(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Reject values the UI cannot honor.
    pub fn validate(&self) -> crate::Result<()> {
        let ratio = self.following.copy_ratio;
        if !(MIN_COPY_RATIO..=MAX_COPY_RATIO).contains(&ratio) {
            return Err(crate::Error::config(format!(
                "following.copy_ratio {ratio} outside [{MIN_COPY_RATIO}, {MAX_COPY_RATIO}]"
            )));
        }
        if self.following.max_per_trade <= Decimal::ZERO {
            return Err(crate::Error::config(
                "following.max_per_trade must be positive",
            ));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(crate::Error::config("ui.tick_rate_ms must be positive"));
        }
        Ok(())
    }
}

fn default_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Enable mouse support.
    pub mouse_support: bool,
    /// Show status bar.
    pub show_status_bar: bool,
    /// Hot markets on the dashboard.
    pub hot_markets: usize,
    /// Smart-money traders on the dashboard.
    pub top_traders: usize,
    /// Reverse indicators on the dashboard.
    pub reverse_indicators: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            mouse_support: false,
            show_status_bar: true,
            hot_markets: 4,
            top_traders: 5,
            reverse_indicators: 2,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back.
    pub back: String,
    /// Refresh data.
    pub refresh: String,
    /// Switch to dashboard view.
    pub dashboard: String,
    /// Switch to markets view.
    pub markets: String,
    /// Switch to traders view.
    pub traders: String,
    /// Switch to following view.
    pub following: String,
    /// Cycle category, tab or follow filter.
    pub next_filter: String,
    /// Cycle sort key.
    pub next_sort: String,
    /// Flip sort direction.
    pub sort_direction: String,
    /// Open search.
    pub search: String,
    /// Follow or unfollow the focused trader.
    pub follow: String,
    /// Pause or resume copying.
    pub toggle_copy: String,
    /// Raise copy ratio.
    pub ratio_up: String,
    /// Lower copy ratio.
    pub ratio_down: String,
    /// Show follow settings.
    pub settings: String,
    /// Edit the per-trade cap of the selected follow.
    pub max_per_trade: String,
    /// Connect or disconnect the wallet.
    pub wallet: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            dashboard: "1".to_string(),
            markets: "2".to_string(),
            traders: "3".to_string(),
            following: "4".to_string(),
            next_filter: "Tab".to_string(),
            next_sort: "s".to_string(),
            sort_direction: "o".to_string(),
            search: "/".to_string(),
            follow: "f".to_string(),
            toggle_copy: "e".to_string(),
            ratio_up: "+".to_string(),
            ratio_down: "-".to_string(),
            settings: "c".to_string(),
            max_per_trade: "m".to_string(),
            wallet: "w".to_string(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Primary color (hex).
    pub primary: String,
    /// Accent color (hex).
    pub accent: String,
    /// Success/up color (hex).
    pub success: String,
    /// Warning color (hex).
    pub warning: String,
    /// Error/down color (hex).
    pub error: String,
    /// Foreground/text color (hex).
    pub foreground: String,
    /// Dimmed text color (hex).
    pub muted: String,
    /// Border color (hex).
    pub border: String,
    /// Selection/highlight color (hex).
    pub selection: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "#5c6bc0".to_string(),
            accent: "#ff7043".to_string(),
            success: "#66bb6a".to_string(),
            warning: "#ffa726".to_string(),
            error: "#ef5350".to_string(),
            foreground: "#cdd6f4".to_string(),
            muted: "#7f849c".to_string(),
            border: "#45475a".to_string(),
            selection: "#585b70".to_string(),
        }
    }
}

/// Data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Seed for derived detail figures.
    pub seed: u64,
    /// JSON snapshot to load instead of the built-in sample.
    pub snapshot_path: Option<PathBuf>,
    /// How many leaderboard traders start out followed.
    pub initial_follows: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            snapshot_path: None,
            initial_follows: 3,
        }
    }
}

/// Defaults applied to new follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowingConfig {
    /// Copy ratio in percent.
    pub copy_ratio: u8,
    /// Cap per copied trade, USD.
    pub max_per_trade: Decimal,
}

impl Default for FollowingConfig {
    fn default() -> Self {
        let defaults = FollowConfig::default();
        Self {
            copy_ratio: defaults.copy_ratio,
            max_per_trade: defaults.max_per_trade,
        }
    }
}

impl FollowingConfig {
    /// Config for a newly followed trader.
    pub fn follow_config(&self) -> FollowConfig {
        FollowConfig {
            enabled: true,
            copy_ratio: self.copy_ratio,
            max_per_trade: self.max_per_trade,
        }
    }
}

/// Wallet configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Address to connect at startup.
    pub address: Option<String>,
}
