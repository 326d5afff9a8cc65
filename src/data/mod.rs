//! Data sources for the dashboard.
//!
//! A [`DataSource`] hands out already-validated records; the rest of the
//! application treats them as opaque. [`SnapshotSource`] serves either the
//! built-in sample or a JSON snapshot file and derives detail-page figures
//! through a seeded [`SyntheticGenerator`].

pub mod sample;
mod snapshot;
mod synthetic;

pub use snapshot::SnapshotSource;
pub use synthetic::SyntheticGenerator;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::FollowingConfig;
use crate::error::{Error, Result};
use crate::state::{
    Action, Alert, FollowPerformance, Market, MarketDetail, SentimentPoint, Trade, Trader,
    TraderDetail,
};

/// Everything a snapshot file carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Reference time for derived timestamps. Defaults to the newest record.
    #[serde(default)]
    pub anchor: Option<DateTime<Utc>>,
    pub markets: Vec<Market>,
    pub traders: Vec<Trader>,
    #[serde(default)]
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub sentiment: Vec<SentimentPoint>,
}

impl Snapshot {
    /// Check every record's bounds and formats.
    pub fn validate(&self) -> Result<()> {
        for market in &self.markets {
            market.validate()?;
        }
        for trader in &self.traders {
            trader.validate()?;
        }
        if let Some(trade) = self
            .trades
            .iter()
            .find(|t| t.price < Decimal::ZERO || t.price > Decimal::ONE)
        {
            return Err(Error::invalid_input(format!(
                "trade {}: price {} outside [0, 1]",
                trade.tx_hash, trade.price
            )));
        }
        if let Some(point) = self.sentiment.iter().find(|p| {
            p.value < Decimal::ZERO || p.value > Decimal::ONE_HUNDRED
        }) {
            return Err(Error::invalid_input(format!(
                "sentiment {}: value {} outside [0, 100]",
                point.date, point.value
            )));
        }
        Ok(())
    }

    /// The explicit anchor, else the newest recorded activity in the snapshot.
    ///
    /// Market end dates are deadlines rather than activity and never count.
    pub fn resolve_anchor(&self) -> Option<DateTime<Utc>> {
        self.anchor.or_else(|| {
            self.trades
                .iter()
                .map(|t| t.timestamp)
                .chain(self.alerts.iter().map(|a| a.timestamp))
                .chain(self.sentiment.iter().map(|p| p.date))
                .chain(
                    self.traders
                        .iter()
                        .flat_map(|t| [t.joined_at, t.last_active]),
                )
                .max()
        })
    }
}

/// Provider of dashboard records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// All markets, in source order.
    async fn markets(&self) -> Result<Vec<Market>>;

    /// All traders, in source order.
    async fn traders(&self) -> Result<Vec<Trader>>;

    /// Trades in one market, newest first.
    async fn market_trades(&self, slug: &str) -> Result<Vec<Trade>>;

    /// Alert ticker entries.
    async fn alerts(&self) -> Result<Vec<Alert>>;

    /// Daily sentiment index.
    async fn sentiment(&self) -> Result<Vec<SentimentPoint>>;

    /// Detail page data, `None` for an unknown slug.
    async fn market_detail(&self, slug: &str) -> Result<Option<MarketDetail>>;

    /// Detail page data, `None` for an unknown address.
    async fn trader_detail(&self, address: &str) -> Result<Option<TraderDetail>>;

    /// Copy-trading figures for a followed trader.
    async fn follow_performance(&self, address: &str) -> Result<FollowPerformance>;
}

/// Fetch the list pages and dashboard panels.
pub async fn load_all(source: &dyn DataSource) -> Result<Vec<Action>> {
    let markets = source.markets().await?;
    let traders = source.traders().await?;
    let alerts = source.alerts().await?;
    let sentiment = source.sentiment().await?;

    info!(
        markets = markets.len(),
        traders = traders.len(),
        alerts = alerts.len(),
        "Loaded dashboard data"
    );

    Ok(vec![
        Action::MarketsLoaded(markets),
        Action::TradersLoaded(traders),
        Action::DashboardLoaded { alerts, sentiment },
    ])
}

/// Follow the first `count` traders with the configured defaults.
pub async fn initial_follows(
    source: &dyn DataSource,
    traders: &[Trader],
    count: usize,
    config: &FollowingConfig,
) -> Result<Vec<Action>> {
    let mut actions = Vec::with_capacity(count.min(traders.len()));
    for trader in traders.iter().take(count) {
        match source.follow_performance(&trader.address).await {
            Ok(performance) => actions.push(Action::Followed {
                address: trader.address.clone(),
                config: config.follow_config(),
                performance,
            }),
            Err(e) if e.is_recoverable() => {
                warn!("Skipping follow of {}: {}", trader.short_address(), e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FollowConfig, TraderTag};
    use crate::state::trader_state::tests::trader;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn performance() -> FollowPerformance {
        FollowPerformance {
            total_invested: dec!(2000),
            total_pnl: dec!(150),
            followed_trades: 7,
            last_follow_time: sample::anchor(),
        }
    }

    #[test]
    fn test_load_all_dispatches_each_page() {
        let mut mock = MockDataSource::new();
        mock.expect_markets()
            .times(1)
            .returning(|| Ok(sample::snapshot().markets));
        mock.expect_traders()
            .times(1)
            .returning(|| Ok(sample::snapshot().traders));
        mock.expect_alerts().times(1).returning(|| Ok(Vec::new()));
        mock.expect_sentiment().times(1).returning(|| Ok(Vec::new()));

        let actions = tokio_test::block_on(load_all(&mock)).unwrap();
        assert_eq!(actions.len(), 3);
        assert!(matches!(&actions[0], Action::MarketsLoaded(m) if m.len() == 8));
        assert!(matches!(&actions[1], Action::TradersLoaded(t) if t.len() == 8));
        assert!(matches!(&actions[2], Action::DashboardLoaded { alerts, .. } if alerts.is_empty()));
    }

    #[test]
    fn test_load_all_propagates_errors() {
        let mut mock = MockDataSource::new();
        mock.expect_markets()
            .returning(|| Err(Error::data_source("offline")));

        let err = tokio_test::block_on(load_all(&mock)).unwrap_err();
        assert!(matches!(err, Error::DataSource(_)));
    }

    #[test]
    fn test_initial_follows_uses_configured_defaults() {
        let traders = vec![
            trader(1, &[TraderTag::SmartMoney], dec!(80), dec!(10)),
            trader(2, &[TraderTag::Whale], dec!(60), dec!(5)),
            trader(3, &[TraderTag::Newcomer], dec!(50), dec!(1)),
        ];
        let mut mock = MockDataSource::new();
        mock.expect_follow_performance()
            .times(2)
            .returning(|_| Ok(performance()));

        let config = FollowingConfig {
            copy_ratio: 50,
            max_per_trade: dec!(250),
        };
        let actions =
            tokio_test::block_on(initial_follows(&mock, &traders, 2, &config)).unwrap();

        assert_eq!(actions.len(), 2);
        let Action::Followed {
            address, config, ..
        } = &actions[1]
        else {
            panic!("expected a follow action");
        };
        assert_eq!(address, &traders[1].address);
        assert_eq!(
            config,
            &FollowConfig {
                enabled: true,
                copy_ratio: 50,
                max_per_trade: dec!(250),
            }
        );
    }

    #[test]
    fn test_initial_follows_skips_recoverable_errors() {
        let traders = vec![
            trader(1, &[TraderTag::SmartMoney], dec!(80), dec!(10)),
            trader(2, &[TraderTag::Whale], dec!(60), dec!(5)),
        ];
        let first = traders[0].address.clone();
        let mut mock = MockDataSource::new();
        mock.expect_follow_performance().returning(move |address| {
            if address == first {
                Err(Error::data_source("timeout"))
            } else {
                Ok(performance())
            }
        });

        let actions =
            tokio_test::block_on(initial_follows(&mock, &traders, 5, &FollowingConfig::default()))
                .unwrap();
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn test_snapshot_validation_rejects_out_of_range() {
        let mut snapshot = sample::snapshot();
        snapshot.markets[0].liquidity = 101;
        assert!(snapshot.validate().is_err());

        let mut snapshot = sample::snapshot();
        snapshot.trades[0].price = dec!(1.5);
        assert!(snapshot.validate().is_err());

        let mut snapshot = sample::snapshot();
        snapshot.traders[0].address = "not-an-address".to_string();
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_resolve_anchor() {
        let mut snapshot = sample::snapshot();
        assert_eq!(snapshot.resolve_anchor(), Some(sample::anchor()));

        // the newest sentiment reading sits on the anchor
        snapshot.anchor = None;
        assert_eq!(snapshot.resolve_anchor(), Some(sample::anchor()));

        snapshot.anchor = Some(sample::anchor() + chrono::Duration::days(1));
        assert!(snapshot.resolve_anchor() > Some(sample::anchor()));
        assert_eq!(Snapshot::default().resolve_anchor(), None);
    }

    #[test]
    fn test_resolve_anchor_from_traders_only() {
        let mut snapshot = sample::snapshot();
        snapshot.anchor = None;
        snapshot.trades.clear();
        snapshot.alerts.clear();
        snapshot.sentiment.clear();

        let newest = snapshot.traders.iter().map(|t| t.last_active).max();
        assert!(newest.is_some());
        assert_eq!(snapshot.resolve_anchor(), newest);
        assert!(snapshot.resolve_anchor() < Some(sample::anchor()));
    }
}
