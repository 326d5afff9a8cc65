//! Market-related state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{SmartMoneyPosition, Trade};
use crate::error::{Error, Result};
use crate::projection::{self, Projection, Selector, SortDirection, SortKey};

/// Market status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    #[default]
    Active,
    Closed,
}

impl std::fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// A dated price sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// A dated YES/NO price pair, used by the market detail chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomePricePoint {
    pub timestamp: DateTime<Utc>,
    pub yes_price: Decimal,
    pub no_price: Decimal,
}

/// A binary-outcome prediction market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Market ID.
    pub id: String,
    /// URL-style key used for detail lookups.
    pub slug: String,
    /// Market question/title.
    pub title: String,
    /// Top-level category.
    pub category: String,
    /// Subcategory used by the category filter.
    pub subcategory: String,
    /// Current price (0-1).
    pub current_price: Decimal,
    /// YES outcome price (0-1).
    pub yes_price: Decimal,
    /// NO outcome price (0-1).
    pub no_price: Decimal,
    /// Signed 24h price change, in percent.
    pub price_change_24h: Decimal,
    /// 24h traded volume in USD.
    pub volume_24h: Decimal,
    /// Normalized depth score (0-100).
    pub liquidity: u8,
    /// Resolution date.
    pub end_date: DateTime<Utc>,
    /// Market status.
    pub status: MarketStatus,
    /// Daily prices over the last week.
    #[serde(default)]
    pub price_history_7d: Vec<PricePoint>,
}

impl Market {
    /// Check bounds on price and liquidity.
    pub fn validate(&self) -> Result<()> {
        if self.liquidity > 100 {
            return Err(Error::invalid_input(format!(
                "market {}: liquidity {} exceeds 100",
                self.id, self.liquidity
            )));
        }
        for (name, price) in [
            ("current_price", self.current_price),
            ("yes_price", self.yes_price),
            ("no_price", self.no_price),
        ] {
            if price < Decimal::ZERO || price > Decimal::ONE {
                return Err(Error::invalid_input(format!(
                    "market {}: {name} {price} outside [0, 1]",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// Check if the market is still trading.
    pub fn is_active(&self) -> bool {
        self.status == MarketStatus::Active
    }

    /// Liquidity band used for coloring.
    pub fn liquidity_band(&self) -> LiquidityBand {
        LiquidityBand::from_score(self.liquidity)
    }

    /// Closing prices of the weekly history.
    pub fn history_prices(&self) -> Vec<Decimal> {
        self.price_history_7d.iter().map(|p| p.price).collect()
    }
}

/// Coarse liquidity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidityBand {
    High,
    Medium,
    Low,
}

impl LiquidityBand {
    /// Above 70 is high, above 40 medium.
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            Self::High
        } else if score > 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Category selection for the market list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Subcategory(String),
}

impl CategoryFilter {
    /// Label shown in the filter bar.
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Subcategory(name) => name,
        }
    }
}

/// Markets are kept when the category matches and the search query (if any)
/// appears in the title or category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarketFilter {
    pub category: CategoryFilter,
    pub query: Option<String>,
}

impl Selector<Market> for MarketFilter {
    fn matches(&self, market: &Market) -> bool {
        if let CategoryFilter::Subcategory(name) = &self.category
            && market.subcategory != *name
        {
            return false;
        }

        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            if !market.title.to_lowercase().contains(&query)
                && !market.category.to_lowercase().contains(&query)
                && !market.subcategory.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        true
    }
}

/// Sort keys for the market list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketSort {
    #[default]
    Volume,
    PriceChange,
    Liquidity,
}

impl MarketSort {
    pub const ALL: [MarketSort; 3] = [Self::Volume, Self::PriceChange, Self::Liquidity];

    /// Next sort key in the cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Volume => Self::PriceChange,
            Self::PriceChange => Self::Liquidity,
            Self::Liquidity => Self::Volume,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::PriceChange => "Price change",
            Self::Liquidity => "Liquidity",
        }
    }
}

impl SortKey<Market> for MarketSort {
    fn compare(&self, a: &Market, b: &Market) -> Ordering {
        match self {
            Self::Volume => a.volume_24h.cmp(&b.volume_24h),
            Self::PriceChange => a.price_change_24h.cmp(&b.price_change_24h),
            Self::Liquidity => a.liquidity.cmp(&b.liquidity),
        }
    }
}

/// Detail page data for one market.
#[derive(Debug, Clone, Default)]
pub struct MarketDetail {
    /// Slug of the market this detail belongs to.
    pub slug: String,
    pub price_history: Vec<OutcomePricePoint>,
    pub smart_money: Vec<SmartMoneyPosition>,
    pub recent_trades: Vec<Trade>,
}

impl MarketDetail {
    /// Share of recent notional that was bought, in percent.
    pub fn buy_pressure(&self) -> Option<Decimal> {
        super::trade_state::buy_pressure(&self.recent_trades)
    }
}

/// State for market-related data.
#[derive(Debug, Default)]
pub struct MarketState {
    /// All loaded markets, in source order.
    pub markets: Vec<Market>,
    /// Current filter selection.
    pub filter: MarketFilter,
    /// Current sort key.
    pub sort: MarketSort,
    /// Current sort direction.
    pub direction: SortDirection,
    /// Currently selected row in the visible list.
    pub selected_index: Option<usize>,
    /// Slug of the market opened in the detail view.
    pub detail_slug: Option<String>,
    /// Loaded detail data for `detail_slug`.
    pub detail: Option<MarketDetail>,
    /// Whether markets are currently loading.
    pub loading: bool,
    /// Last update timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

impl MarketState {
    /// The projection for the current selections.
    pub fn projection(&self) -> Projection<MarketFilter, MarketSort> {
        Projection::new(self.filter.clone(), self.sort).with_direction(self.direction)
    }

    /// Markets as displayed: filtered, then sorted.
    pub fn visible_markets(&self) -> Vec<&Market> {
        self.projection().apply(&self.markets)
    }

    /// Number of visible markets.
    pub fn visible_count(&self) -> usize {
        self.visible_markets().len()
    }

    /// Category options: "All" followed by distinct subcategories in first
    /// appearance order.
    pub fn categories(&self) -> Vec<CategoryFilter> {
        let mut categories = vec![CategoryFilter::All];
        for market in &self.markets {
            let option = CategoryFilter::Subcategory(market.subcategory.clone());
            if !categories.contains(&option) {
                categories.push(option);
            }
        }
        categories
    }

    /// Move to the next category option.
    pub fn cycle_category(&mut self) {
        let categories = self.categories();
        let current = categories
            .iter()
            .position(|c| *c == self.filter.category)
            .unwrap_or(0);
        self.filter.category = categories[(current + 1) % categories.len()].clone();
        self.reset_selection();
    }

    /// Move to the next sort key.
    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.reset_selection();
    }

    /// Flip the sort direction.
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
        self.reset_selection();
    }

    /// Set or clear the search query.
    pub fn set_query(&mut self, query: Option<String>) {
        self.filter.query = query.filter(|q| !q.trim().is_empty());
        self.reset_selection();
    }

    /// Get the currently selected market.
    pub fn selected_market(&self) -> Option<&Market> {
        self.selected_index
            .and_then(|i| self.visible_markets().get(i).copied())
    }

    /// Look up a market by slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Market> {
        projection::find(&self.markets, |m| m.slug == slug)
    }

    /// The market opened in the detail view, if it exists.
    pub fn detail_market(&self) -> Option<&Market> {
        self.detail_slug
            .as_deref()
            .and_then(|slug| self.find_by_slug(slug))
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
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn market(id: &str, subcategory: &str, volume: Decimal, change: Decimal, liquidity: u8) -> Market {
        Market {
            id: id.to_string(),
            slug: format!("market-{id}"),
            title: format!("Market {id}"),
            category: "Politics".to_string(),
            subcategory: subcategory.to_string(),
            current_price: dec!(0.5),
            yes_price: dec!(0.5),
            no_price: dec!(0.5),
            price_change_24h: change,
            volume_24h: volume,
            liquidity,
            end_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            status: MarketStatus::Active,
            price_history_7d: Vec::new(),
        }
    }

    fn state() -> MarketState {
        MarketState {
            markets: vec![
                market("1", "国际政治", dec!(1000), dec!(2.5), 80),
                market("2", "地缘政治", dec!(5000), dec!(-1.0), 45),
                market("3", "国际政治", dec!(3000), dec!(7.1), 30),
                market("4", "地缘政治", dec!(3000), dec!(0.4), 80),
            ],
            ..Default::default()
        }
    }

    fn ids(markets: &[&Market]) -> Vec<String> {
        markets.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_default_sort_is_volume_descending() {
        let state = state();
        // 3 and 4 tie on volume and keep source order
        assert_eq!(ids(&state.visible_markets()), vec!["2", "3", "4", "1"]);
    }

    #[test]
    fn test_category_filter() {
        let mut state = state();
        state.filter.category = CategoryFilter::Subcategory("国际政治".to_string());
        let visible = state.visible_markets();
        assert!(visible.iter().all(|m| m.subcategory == "国际政治"));
        assert_eq!(ids(&visible), vec!["3", "1"]);
    }

    #[test]
    fn test_sort_keys() {
        let mut state = state();
        state.sort = MarketSort::PriceChange;
        assert_eq!(ids(&state.visible_markets()), vec!["3", "1", "4", "2"]);

        state.sort = MarketSort::Liquidity;
        assert_eq!(ids(&state.visible_markets()), vec!["1", "4", "2", "3"]);

        state.toggle_direction();
        assert_eq!(ids(&state.visible_markets()), vec!["3", "2", "1", "4"]);
    }

    #[test]
    fn test_categories_and_cycle() {
        let mut state = state();
        assert_eq!(
            state.categories(),
            vec![
                CategoryFilter::All,
                CategoryFilter::Subcategory("国际政治".to_string()),
                CategoryFilter::Subcategory("地缘政治".to_string()),
            ]
        );

        state.cycle_category();
        assert_eq!(state.filter.category.label(), "国际政治");
        state.cycle_category();
        assert_eq!(state.filter.category.label(), "地缘政治");
        state.cycle_category();
        assert_eq!(state.filter.category, CategoryFilter::All);
        assert_eq!(state.selected_index, Some(0));
    }

    #[test]
    fn test_search_query() {
        let mut state = state();
        state.set_query(Some("market 4".to_string()));
        assert_eq!(ids(&state.visible_markets()), vec!["4"]);

        state.set_query(Some("   ".to_string()));
        assert!(state.filter.query.is_none());
        assert_eq!(state.visible_count(), 4);

        state.set_query(Some("nothing".to_string()));
        assert_eq!(state.selected_index, None);
    }

    #[test]
    fn test_find_by_slug() {
        let mut state = state();
        assert_eq!(state.find_by_slug("market-2").map(|m| m.id.as_str()), Some("2"));
        assert!(state.find_by_slug("missing").is_none());

        state.detail_slug = Some("missing".to_string());
        assert!(state.detail_market().is_none());
    }

    #[test]
    fn test_validate_bounds() {
        let mut m = market("1", "国际政治", dec!(1), dec!(0), 50);
        assert!(m.validate().is_ok());

        m.liquidity = 101;
        assert!(m.validate().is_err());

        m.liquidity = 50;
        m.yes_price = dec!(1.2);
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_liquidity_band() {
        assert_eq!(LiquidityBand::from_score(71), LiquidityBand::High);
        assert_eq!(LiquidityBand::from_score(70), LiquidityBand::Medium);
        assert_eq!(LiquidityBand::from_score(40), LiquidityBand::Low);
    }
}
