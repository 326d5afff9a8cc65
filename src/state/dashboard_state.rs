//! Dashboard panels.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{HasTag, Market, MarketSort, Trader, TraderSort, TraderTag};
use crate::projection::{self, KeepAll, Projection};

/// What an alert links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "lowercase")]
pub enum AlertTarget {
    Market(String),
    Trader(String),
}

/// An entry in the alert ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub icon: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub target: AlertTarget,
}

/// Daily market sentiment index (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub date: DateTime<Utc>,
    pub value: Decimal,
}

/// Dashboard data that is not derived from markets or traders.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub alerts: Vec<Alert>,
    pub sentiment: Vec<SentimentPoint>,
}

impl DashboardState {
    pub fn sentiment_values(&self) -> Vec<Decimal> {
        self.sentiment.iter().map(|p| p.value).collect()
    }

    /// Most recent sentiment reading.
    pub fn latest_sentiment(&self) -> Option<Decimal> {
        self.sentiment.last().map(|p| p.value)
    }

    /// Time of the newest dashboard record, used as "now" for relative times.
    pub fn as_of(&self) -> Option<DateTime<Utc>> {
        self.alerts
            .iter()
            .map(|a| a.timestamp)
            .chain(self.sentiment.iter().map(|p| p.date))
            .max()
    }
}

/// Highest 24h-volume markets.
pub fn hot_markets(markets: &[Market], n: usize) -> Vec<&Market> {
    Projection::new(KeepAll, MarketSort::Volume)
        .with_limit(n)
        .apply(markets)
}

/// Smart-money traders by win rate.
pub fn top_smart_money(traders: &[Trader], n: usize) -> Vec<&Trader> {
    Projection::new(HasTag(TraderTag::SmartMoney), TraderSort::WinRate)
        .with_limit(n)
        .apply(traders)
}

/// Reverse-indicator traders, in source order.
pub fn reverse_indicators(traders: &[Trader], n: usize) -> Vec<&Trader> {
    projection::take(
        projection::project(
            traders,
            |t| t.has_tag(TraderTag::ReverseIndicator),
            projection::identity,
        ),
        n,
    )
}
