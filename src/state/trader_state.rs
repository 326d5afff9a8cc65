//! Trader leaderboard state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::MarketTradeHistory;
use crate::error::{Error, Result};
use crate::format;
use crate::projection::{self, Projection, Selector, SortDirection, SortKey};

/// Trader classification tag. Tags are not mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraderTag {
    /// Consistently high win rate; worth emulating.
    SmartMoney,
    /// Consistently poor results; a contrarian signal.
    ReverseIndicator,
    Whale,
    HighFrequency,
    Specialist,
    Newcomer,
}

impl TraderTag {
    pub fn emoji(self) -> &'static str {
        match self {
            Self::SmartMoney => "🏆",
            Self::ReverseIndicator => "🔴",
            Self::Whale => "🐋",
            Self::HighFrequency => "⚡",
            Self::Specialist => "🎯",
            Self::Newcomer => "🌱",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SmartMoney => "Smart money",
            Self::ReverseIndicator => "Reverse indicator",
            Self::Whale => "Whale",
            Self::HighFrequency => "High frequency",
            Self::Specialist => "Specialist",
            Self::Newcomer => "Newcomer",
        }
    }
}

/// Win rate within one market category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expertise {
    pub category: String,
    pub trades: u32,
    /// Percent, 0-100.
    pub win_rate: Decimal,
}

impl Expertise {
    pub fn band(&self) -> ExpertiseBand {
        ExpertiseBand::from_win_rate(self.win_rate)
    }
}

/// Strength of a trader in a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpertiseBand {
    Strong,
    Moderate,
    Weak,
}

impl ExpertiseBand {
    /// 70 and above is strong, 50 and above moderate.
    pub fn from_win_rate(win_rate: Decimal) -> Self {
        if win_rate >= Decimal::from(70) {
            Self::Strong
        } else if win_rate >= Decimal::from(50) {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

/// Summary of how a trader has done lately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceStatus {
    #[default]
    Good,
    Warning,
    Poor,
}

impl PerformanceStatus {
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Good => "✅",
            Self::Warning => "⚠️",
            Self::Poor => "🔴",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecentPerformance {
    pub status: PerformanceStatus,
    pub message: String,
}

/// A tracked wallet on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    /// Wallet address, `0x` followed by 40 hex characters.
    pub address: String,
    pub tags: BTreeSet<TraderTag>,
    /// Lifetime win rate, percent.
    pub win_rate: Decimal,
    pub win_rate_7d: Decimal,
    pub win_rate_30d: Decimal,
    /// Return on investment, signed percent.
    pub roi: Decimal,
    /// Signed USD.
    pub total_profit: Decimal,
    /// Lifetime traded volume, USD.
    pub total_volume: Decimal,
    pub total_trades: u32,
    #[serde(default)]
    pub expertise: Vec<Expertise>,
    #[serde(default)]
    pub recent_performance: RecentPerformance,
    #[serde(default)]
    pub review: String,
    pub joined_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Trader {
    /// `0x1234...abcd` form of the address.
    pub fn short_address(&self) -> String {
        format::short_address(&self.address)
    }

    pub fn has_tag(&self, tag: TraderTag) -> bool {
        self.tags.contains(&tag)
    }

    /// How strongly the trader works as a contrarian signal (0-100).
    pub fn reverse_strength(&self) -> Decimal {
        (Decimal::from(85) - self.win_rate).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    /// Check address format and win-rate bounds.
    pub fn validate(&self) -> Result<()> {
        validate_address(&self.address)?;
        for (name, rate) in [
            ("win_rate", self.win_rate),
            ("win_rate_7d", self.win_rate_7d),
            ("win_rate_30d", self.win_rate_30d),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                return Err(Error::invalid_input(format!(
                    "trader {}: {name} {rate} outside [0, 100]",
                    self.address
                )));
            }
        }
        if let Some(exp) = self
            .expertise
            .iter()
            .find(|e| e.win_rate < Decimal::ZERO || e.win_rate > Decimal::ONE_HUNDRED)
        {
            return Err(Error::invalid_input(format!(
                "trader {}: {} win rate {} outside [0, 100]",
                self.address, exp.category, exp.win_rate
            )));
        }
        Ok(())
    }
}

/// Check that an address is `0x` followed by 40 hex characters.
pub fn validate_address(address: &str) -> Result<()> {
    let valid = address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_input(format!("malformed address: {address}")))
    }
}

/// Leaderboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraderTab {
    #[default]
    SmartMoney,
    Reverse,
    Whale,
    All,
}

impl TraderTab {
    pub const ALL: [TraderTab; 4] = [Self::SmartMoney, Self::Reverse, Self::Whale, Self::All];

    /// The tag this tab requires, `None` for the "all" tab.
    pub fn tag(self) -> Option<TraderTag> {
        match self {
            Self::SmartMoney => Some(TraderTag::SmartMoney),
            Self::Reverse => Some(TraderTag::ReverseIndicator),
            Self::Whale => Some(TraderTag::Whale),
            Self::All => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::SmartMoney => Self::Reverse,
            Self::Reverse => Self::Whale,
            Self::Whale => Self::All,
            Self::All => Self::SmartMoney,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SmartMoney => "🏆 Smart money",
            Self::Reverse => "🔴 Reverse",
            Self::Whale => "🐋 Whales",
            Self::All => "🎯 All",
        }
    }
}

impl Selector<Trader> for TraderTab {
    fn matches(&self, trader: &Trader) -> bool {
        self.tag().is_none_or(|tag| trader.has_tag(tag))
    }
}

/// Tag-membership filter over traders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasTag(pub TraderTag);

impl Selector<Trader> for HasTag {
    fn matches(&self, trader: &Trader) -> bool {
        trader.has_tag(self.0)
    }
}

/// Keeps traders carrying any of the listed tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasAnyTag(pub Vec<TraderTag>);

impl Selector<Trader> for HasAnyTag {
    fn matches(&self, trader: &Trader) -> bool {
        self.0.iter().any(|tag| trader.has_tag(*tag))
    }
}

/// Sort keys for the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraderSort {
    #[default]
    WinRate,
    Roi,
    Profit,
    Volume,
}

impl TraderSort {
    pub const ALL: [TraderSort; 4] = [Self::WinRate, Self::Roi, Self::Profit, Self::Volume];

    pub fn next(self) -> Self {
        match self {
            Self::WinRate => Self::Roi,
            Self::Roi => Self::Profit,
            Self::Profit => Self::Volume,
            Self::Volume => Self::WinRate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::WinRate => "Win rate",
            Self::Roi => "ROI",
            Self::Profit => "Profit",
            Self::Volume => "Volume",
        }
    }
}

impl SortKey<Trader> for TraderSort {
    fn compare(&self, a: &Trader, b: &Trader) -> Ordering {
        match self {
            Self::WinRate => a.win_rate.cmp(&b.win_rate),
            Self::Roi => a.roi.cmp(&b.roi),
            Self::Profit => a.total_profit.cmp(&b.total_profit),
            Self::Volume => a.total_volume.cmp(&b.total_volume),
        }
    }
}

/// A daily win-rate sample.
#[derive(Debug, Clone, PartialEq)]
pub struct WinRatePoint {
    pub date: DateTime<Utc>,
    pub win_rate: Decimal,
}

/// Detail page data for one trader.
#[derive(Debug, Clone, Default)]
pub struct TraderDetail {
    pub address: String,
    pub win_rate_trend: Vec<WinRatePoint>,
    pub history: Vec<MarketTradeHistory>,
}

/// State for the trader leaderboard.
#[derive(Debug, Default)]
pub struct TraderState {
    /// All loaded traders, in source order.
    pub traders: Vec<Trader>,
    /// Current tab.
    pub tab: TraderTab,
    /// Current sort key.
    pub sort: TraderSort,
    /// Current sort direction.
    pub direction: SortDirection,
    /// Currently selected row in the visible list.
    pub selected_index: Option<usize>,
    /// Address of the trader opened in the detail view.
    pub detail_address: Option<String>,
    /// Loaded detail data for `detail_address`.
    pub detail: Option<TraderDetail>,
    /// Whether traders are loading.
    pub loading: bool,
    /// Last update timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

impl TraderState {
    pub fn projection(&self) -> Projection<TraderTab, TraderSort> {
        Projection::new(self.tab, self.sort).with_direction(self.direction)
    }

    /// Traders on the current tab, sorted.
    pub fn visible_traders(&self) -> Vec<&Trader> {
        self.projection().apply(&self.traders)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_traders().len()
    }

    /// Number of traders a tab would show.
    pub fn tab_count(&self, tab: TraderTab) -> usize {
        self.traders.iter().filter(|t| tab.matches(t)).count()
    }

    pub fn cycle_tab(&mut self) {
        self.tab = self.tab.next();
        self.reset_selection();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.reset_selection();
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
        self.reset_selection();
    }

    pub fn selected_trader(&self) -> Option<&Trader> {
        self.selected_index
            .and_then(|i| self.visible_traders().get(i).copied())
    }

    /// Look up a trader by wallet address.
    pub fn find_by_address(&self, address: &str) -> Option<&Trader> {
        projection::find(&self.traders, |t| t.address.eq_ignore_ascii_case(address))
    }

    pub fn detail_trader(&self) -> Option<&Trader> {
        self.detail_address
            .as_deref()
            .and_then(|address| self.find_by_address(address))
    }

    fn reset_selection(&mut self) {
        self.selected_index = if self.visible_count() > 0 {
            Some(0)
        } else {
            None
        };
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    pub(crate) fn trader(n: u8, tags: &[TraderTag], win_rate: Decimal, roi: Decimal) -> Trader {
        Trader {
            address: format!("0x{:040x}", n),
            tags: tags.iter().copied().collect(),
            win_rate,
            win_rate_7d: win_rate,
            win_rate_30d: win_rate,
            roi,
            total_profit: roi * dec!(100),
            total_volume: Decimal::from(n) * dec!(1000),
            total_trades: 10,
            expertise: Vec::new(),
            recent_performance: RecentPerformance::default(),
            review: String::new(),
            joined_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            last_active: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn state() -> TraderState {
        use TraderTag::*;
        TraderState {
            traders: vec![
                trader(1, &[SmartMoney], dec!(70), dec!(40)),
                trader(2, &[SmartMoney, Whale], dec!(90), dec!(25)),
                trader(3, &[ReverseIndicator], dec!(31), dec!(-12)),
                trader(4, &[SmartMoney], dec!(90), dec!(60)),
                trader(5, &[Whale], dec!(55), dec!(5)),
            ],
            ..Default::default()
        }
    }

    fn numbers(traders: &[&Trader]) -> Vec<String> {
        traders.iter().map(|t| t.address[40..].to_string()).collect()
    }

    #[test]
    fn test_default_tab_is_smart_money_by_win_rate() {
        let state = state();
        // 02 and 04 tie at 90 and keep source order
        assert_eq!(numbers(&state.visible_traders()), vec!["02", "04", "01"]);
    }

    #[test]
    fn test_tabs_filter_by_tag() {
        let mut state = state();
        state.tab = TraderTab::Whale;
        assert_eq!(numbers(&state.visible_traders()), vec!["02", "05"]);

        state.tab = TraderTab::Reverse;
        assert_eq!(numbers(&state.visible_traders()), vec!["03"]);

        state.tab = TraderTab::All;
        assert_eq!(state.visible_count(), 5);
    }

    #[test]
    fn test_has_any_tag() {
        let state = state();
        let holders = HasAnyTag(vec![TraderTag::SmartMoney, TraderTag::Whale]);
        let kept = projection::project(
            &state.traders,
            |t| holders.matches(t),
            projection::identity,
        );
        assert_eq!(numbers(&kept), vec!["01", "02", "04", "05"]);

        let nobody = HasAnyTag(Vec::new());
        assert!(!state.traders.iter().any(|t| nobody.matches(t)));
    }

    #[test]
    fn test_tab_counts() {
        let state = state();
        assert_eq!(state.tab_count(TraderTab::SmartMoney), 3);
        assert_eq!(state.tab_count(TraderTab::Reverse), 1);
        assert_eq!(state.tab_count(TraderTab::Whale), 2);
        assert_eq!(state.tab_count(TraderTab::All), 5);
    }

    #[test]
    fn test_sort_cycle() {
        let mut state = state();
        state.cycle_sort();
        assert_eq!(state.sort, TraderSort::Roi);
        assert_eq!(numbers(&state.visible_traders()), vec!["04", "01", "02"]);
        assert_eq!(state.selected_index, Some(0));
    }

    #[test]
    fn test_find_by_address() {
        let state = state();
        let address = format!("0x{:040X}", 3);
        assert!(state.find_by_address(&address).is_some());
        assert!(state.find_by_address("0xdeadbeef").is_none());
        assert!(TraderState::default().find_by_address(&address).is_none());
    }

    #[test]
    fn test_reverse_strength() {
        let t = trader(3, &[TraderTag::ReverseIndicator], dec!(31), dec!(-12));
        assert_eq!(t.reverse_strength(), dec!(54));
        let t = trader(4, &[TraderTag::SmartMoney], dec!(92), dec!(10));
        assert_eq!(t.reverse_strength(), Decimal::ZERO);
    }

    #[test]
    fn test_validate() {
        let mut t = trader(1, &[], dec!(70), dec!(1));
        assert!(t.validate().is_ok());

        t.win_rate_7d = dec!(101);
        assert!(t.validate().is_err());

        t.win_rate_7d = dec!(70);
        t.address = "0x123".to_string();
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_expertise_band() {
        assert_eq!(ExpertiseBand::from_win_rate(dec!(70)), ExpertiseBand::Strong);
        assert_eq!(ExpertiseBand::from_win_rate(dec!(50)), ExpertiseBand::Moderate);
        assert_eq!(ExpertiseBand::from_win_rate(dec!(49.9)), ExpertiseBand::Weak);
    }

    #[test]
    fn test_tag_set_has_no_duplicates() {
        let t = trader(1, &[TraderTag::Whale, TraderTag::Whale], dec!(50), dec!(0));
        assert_eq!(t.tags.len(), 1);
    }
}
