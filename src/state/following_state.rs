//! Copy-trading follows and their performance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PerformanceStatus, Trader};
use crate::projection::{self, Selector};

/// Smallest copy ratio, in percent.
pub const MIN_COPY_RATIO: u8 = 10;
/// Largest copy ratio, in percent.
pub const MAX_COPY_RATIO: u8 = 100;
/// Step used when adjusting the copy ratio.
pub const COPY_RATIO_STEP: u8 = 5;

/// How a followed trader's positions are mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowConfig {
    /// Whether new trades are copied.
    pub enabled: bool,
    /// Share of the trader's size to copy, in percent.
    pub copy_ratio: u8,
    /// Cap on a single copied trade, in USD.
    pub max_per_trade: Decimal,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            copy_ratio: 30,
            max_per_trade: Decimal::from(1000),
        }
    }
}

impl FollowConfig {
    /// Move the copy ratio by `steps` increments, clamped to 10-100 and
    /// snapped to the step grid.
    pub fn adjust_ratio(&mut self, steps: i32) {
        let current = i32::from(self.copy_ratio);
        let target = current + steps * i32::from(COPY_RATIO_STEP);
        let snapped = (target / i32::from(COPY_RATIO_STEP)) * i32::from(COPY_RATIO_STEP);
        let clamped = snapped.clamp(i32::from(MIN_COPY_RATIO), i32::from(MAX_COPY_RATIO));
        self.copy_ratio = clamped as u8;
    }

    /// Size to copy for a trade of `trader_size` USD.
    pub fn copy_size(&self, trader_size: Decimal) -> Decimal {
        if !self.enabled {
            return Decimal::ZERO;
        }
        let scaled = trader_size * Decimal::from(self.copy_ratio) / Decimal::ONE_HUNDRED;
        scaled.min(self.max_per_trade)
    }
}

/// Results of copying one trader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowPerformance {
    pub total_invested: Decimal,
    pub total_pnl: Decimal,
    pub followed_trades: u32,
    pub last_follow_time: DateTime<Utc>,
}

/// Derived state of a follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowStatus {
    Active,
    Warning,
    Paused,
}

impl FollowStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "✅ Active",
            Self::Warning => "⚠️ Warning",
            Self::Paused => "⏸ Paused",
        }
    }
}

/// A trader the user copies.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowedTrader {
    pub address: String,
    pub config: FollowConfig,
    pub performance: FollowPerformance,
    /// Recent performance of the followed trader, captured on follow.
    pub trader_status: PerformanceStatus,
}

impl FollowedTrader {
    /// Paused when copying is disabled, otherwise derived from how the
    /// trader has performed lately.
    pub fn status(&self) -> FollowStatus {
        if !self.config.enabled {
            FollowStatus::Paused
        } else if self.trader_status == PerformanceStatus::Good {
            FollowStatus::Active
        } else {
            FollowStatus::Warning
        }
    }
}

/// Following page filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowFilter {
    #[default]
    All,
    Active,
    Warning,
    Paused,
}

impl FollowFilter {
    pub const ALL: [FollowFilter; 4] = [Self::All, Self::Active, Self::Warning, Self::Paused];

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Warning,
            Self::Warning => Self::Paused,
            Self::Paused => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Warning => "Warning",
            Self::Paused => "Paused",
        }
    }
}

impl Selector<FollowedTrader> for FollowFilter {
    fn matches(&self, follow: &FollowedTrader) -> bool {
        match self {
            Self::All => true,
            Self::Active => follow.status() == FollowStatus::Active,
            Self::Warning => follow.status() == FollowStatus::Warning,
            Self::Paused => follow.status() == FollowStatus::Paused,
        }
    }
}

/// A follow singled out in the overview.
#[derive(Debug, Clone, PartialEq)]
pub struct Performer {
    pub address: String,
    pub pnl: Decimal,
}

/// Totals across all follows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FollowOverview {
    pub total_followed: usize,
    pub active_followed: usize,
    pub total_invested: Decimal,
    pub total_pnl: Decimal,
    pub top_performer: Option<Performer>,
    pub worst_performer: Option<Performer>,
}

/// State for the following page.
#[derive(Debug, Default)]
pub struct FollowingState {
    /// Follows in the order they were added.
    pub follows: Vec<FollowedTrader>,
    pub filter: FollowFilter,
    pub selected_index: Option<usize>,
    /// Whether the settings panel of the selected follow is expanded.
    pub show_settings: bool,
}

impl FollowingState {
    pub fn is_following(&self, address: &str) -> bool {
        self.get(address).is_some()
    }

    pub fn get(&self, address: &str) -> Option<&FollowedTrader> {
        projection::find(&self.follows, |f| f.address.eq_ignore_ascii_case(address))
    }

    fn get_mut(&mut self, address: &str) -> Option<&mut FollowedTrader> {
        self.follows
            .iter_mut()
            .find(|f| f.address.eq_ignore_ascii_case(address))
    }

    /// Start following a trader. Returns false if already followed.
    pub fn follow(
        &mut self,
        trader: &Trader,
        config: FollowConfig,
        performance: FollowPerformance,
    ) -> bool {
        if self.is_following(&trader.address) {
            return false;
        }
        self.follows.push(FollowedTrader {
            address: trader.address.clone(),
            config,
            performance,
            trader_status: trader.recent_performance.status,
        });
        self.clamp_selection();
        true
    }

    /// Stop following a trader. Returns false if it was not followed.
    pub fn unfollow(&mut self, address: &str) -> bool {
        let before = self.follows.len();
        self.follows
            .retain(|f| !f.address.eq_ignore_ascii_case(address));
        let removed = self.follows.len() != before;
        if removed {
            self.clamp_selection();
        }
        removed
    }

    /// Flip whether copying is enabled for a follow.
    pub fn toggle_enabled(&mut self, address: &str) -> Option<bool> {
        let follow = self.get_mut(address)?;
        follow.config.enabled = !follow.config.enabled;
        let enabled = follow.config.enabled;
        // pausing can drop the follow out of the current filter
        self.clamp_selection();
        Some(enabled)
    }

    /// Adjust a follow's copy ratio by `steps` increments.
    pub fn adjust_ratio(&mut self, address: &str, steps: i32) -> Option<u8> {
        let follow = self.get_mut(address)?;
        follow.config.adjust_ratio(steps);
        Some(follow.config.copy_ratio)
    }

    /// Set the per-trade cap. Negative caps are rejected.
    pub fn set_max_per_trade(&mut self, address: &str, max: Decimal) -> bool {
        if max < Decimal::ZERO {
            return false;
        }
        match self.get_mut(address) {
            Some(follow) => {
                follow.config.max_per_trade = max;
                true
            }
            None => false,
        }
    }

    /// Follows matching the current filter, in follow order.
    pub fn visible(&self) -> Vec<&FollowedTrader> {
        projection::project(
            &self.follows,
            |f| self.filter.matches(f),
            projection::identity,
        )
    }

    pub fn visible_count(&self) -> usize {
        self.visible().len()
    }

    pub fn filter_count(&self, filter: FollowFilter) -> usize {
        self.follows.iter().filter(|f| filter.matches(f)).count()
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected_index = if self.visible_count() > 0 {
            Some(0)
        } else {
            None
        };
    }

    pub fn selected(&self) -> Option<&FollowedTrader> {
        self.selected_index
            .and_then(|i| self.visible().get(i).copied())
    }

    /// Totals across all follows, with best and worst by P&L.
    pub fn overview(&self) -> FollowOverview {
        let by_pnl = projection::project(
            &self.follows,
            |_| true,
            projection::descending_by(|f: &FollowedTrader| f.performance.total_pnl),
        );
        let performer = |f: &&FollowedTrader| Performer {
            address: f.address.clone(),
            pnl: f.performance.total_pnl,
        };

        FollowOverview {
            total_followed: self.follows.len(),
            active_followed: self.filter_count(FollowFilter::Active),
            total_invested: self.follows.iter().map(|f| f.performance.total_invested).sum(),
            total_pnl: self.follows.iter().map(|f| f.performance.total_pnl).sum(),
            top_performer: by_pnl.first().map(performer),
            worst_performer: by_pnl.last().map(performer),
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_count();
        self.selected_index = match (count, self.selected_index) {
            (0, _) => None,
            (_, None) => Some(0),
            (n, Some(i)) => Some(i.min(n - 1)),
        };
    }
}
