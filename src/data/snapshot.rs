//! In-memory data source backed by a snapshot.

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use super::{DataSource, Snapshot, SyntheticGenerator, sample};
use crate::error::{Error, Result};
use crate::projection;
use crate::state::{
    Alert, FollowPerformance, Market, MarketDetail, SentimentPoint, Trade, Trader, TraderDetail,
};

/// Recent trades shown on the market detail page.
const RECENT_TRADES: usize = 10;

/// Serves a fixed snapshot plus seeded detail figures.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
    generator: SyntheticGenerator,
}

impl SnapshotSource {
    /// Wrap an already-loaded snapshot after validating it.
    ///
    /// A snapshot with no timestamps at all is anchored at the built-in
    /// sample time, so derived figures never depend on the wall clock.
    pub fn new(snapshot: Snapshot, seed: u64) -> Result<Self> {
        snapshot.validate()?;
        let anchor = snapshot.resolve_anchor().unwrap_or_else(sample::anchor);
        Ok(Self {
            snapshot,
            generator: SyntheticGenerator::new(seed, anchor),
        })
    }

    /// The built-in sample data.
    pub fn sample(seed: u64) -> Self {
        Self {
            snapshot: sample::snapshot(),
            generator: SyntheticGenerator::new(seed, sample::anchor()),
        }
    }

    /// Load a JSON snapshot file.
    pub fn from_file(path: &Path, seed: u64) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        info!(
            "Loaded snapshot from {:?}: {} markets, {} traders",
            path,
            snapshot.markets.len(),
            snapshot.traders.len()
        );
        Self::new(snapshot, seed)
    }

    pub fn generator(&self) -> &SyntheticGenerator {
        &self.generator
    }

    fn find_market(&self, slug: &str) -> Option<&Market> {
        projection::find(&self.snapshot.markets, |m| m.slug == slug)
    }

    fn find_trader(&self, address: &str) -> Option<&Trader> {
        projection::find(&self.snapshot.traders, |t| {
            t.address.eq_ignore_ascii_case(address)
        })
    }

    fn trades_in(&self, market: &Market) -> Vec<Trade> {
        projection::project(
            &self.snapshot.trades,
            |t| t.market_id == market.id,
            projection::descending_by(|t: &Trade| t.timestamp),
        )
        .into_iter()
        .cloned()
        .collect()
    }
}

#[async_trait]
impl DataSource for SnapshotSource {
    async fn markets(&self) -> Result<Vec<Market>> {
        Ok(self.snapshot.markets.clone())
    }

    async fn traders(&self) -> Result<Vec<Trader>> {
        Ok(self.snapshot.traders.clone())
    }

    async fn market_trades(&self, slug: &str) -> Result<Vec<Trade>> {
        let market = self
            .find_market(slug)
            .ok_or_else(|| Error::data_source(format!("unknown market: {slug}")))?;
        Ok(self.trades_in(market))
    }

    async fn alerts(&self) -> Result<Vec<Alert>> {
        Ok(self.snapshot.alerts.clone())
    }

    async fn sentiment(&self) -> Result<Vec<SentimentPoint>> {
        Ok(self.snapshot.sentiment.clone())
    }

    async fn market_detail(&self, slug: &str) -> Result<Option<MarketDetail>> {
        let Some(market) = self.find_market(slug) else {
            debug!("No market with slug {}", slug);
            return Ok(None);
        };

        Ok(Some(MarketDetail {
            slug: market.slug.clone(),
            price_history: self.generator.price_history(market),
            smart_money: self
                .generator
                .smart_money_positions(market, &self.snapshot.traders),
            recent_trades: projection::take(self.trades_in(market), RECENT_TRADES),
        }))
    }

    async fn trader_detail(&self, address: &str) -> Result<Option<TraderDetail>> {
        let Some(trader) = self.find_trader(address) else {
            debug!("No trader with address {}", address);
            return Ok(None);
        };

        Ok(Some(TraderDetail {
            address: trader.address.clone(),
            win_rate_trend: self.generator.win_rate_trend(trader),
            history: self
                .generator
                .trade_history(trader, &self.snapshot.markets),
        }))
    }

    async fn follow_performance(&self, address: &str) -> Result<FollowPerformance> {
        Ok(self.generator.follow_performance(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn source() -> SnapshotSource {
        SnapshotSource::sample(42)
    }

    #[tokio::test]
    async fn test_lists_keep_source_order() {
        let source = source();
        let markets = source.markets().await.unwrap();
        assert_eq!(markets[0].slug, "us-election-2024");
        let traders = source.traders().await.unwrap();
        assert_eq!(traders.len(), 8);
    }

    #[tokio::test]
    async fn test_market_trades_newest_first() {
        let trades = source().market_trades("us-election-2024").await.unwrap();
        assert_eq!(trades.len(), 5);
        assert!(trades.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert!(trades.iter().all(|t| t.market_id == "m-001"));
    }

    #[tokio::test]
    async fn test_market_trades_unknown_slug_errors() {
        let err = source().market_trades("nope").await.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_market_detail() {
        let source = source();
        let detail = source
            .market_detail("israel-iran-strike")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.slug, "israel-iran-strike");
        assert_eq!(detail.price_history.len(), 7);
        assert_eq!(detail.recent_trades.len(), 3);
        assert!(detail.buy_pressure().is_some());

        assert!(source.market_detail("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_trader_detail_ignores_case() {
        let source = source();
        let detail = source
            .trader_detail("0x742D35CC6634C0532925A3B844BC454E4438F44E")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.address, "0x742d35cc6634c0532925a3b844bc454e4438f44e");
        assert_eq!(detail.win_rate_trend.len(), 30);
        assert_eq!(detail.history.len(), 3);

        assert!(source.trader_detail("0x00").await.unwrap().is_none());
    }

    #[test]
    fn test_details_are_reproducible() {
        let a = tokio_test::block_on(source().trader_detail("0x8ba1f109551bd432803012645ac136ddd64dba72"))
            .unwrap()
            .unwrap();
        let b = tokio_test::block_on(source().trader_detail("0x8ba1f109551bd432803012645ac136ddd64dba72"))
            .unwrap()
            .unwrap();
        assert_eq!(a.win_rate_trend, b.win_rate_trend);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_sparse_snapshot_is_reproducible() {
        let sparse = || {
            let mut snapshot = sample::snapshot();
            snapshot.anchor = None;
            snapshot.trades.clear();
            snapshot.alerts.clear();
            snapshot.sentiment.clear();
            SnapshotSource::new(snapshot, 42).unwrap()
        };
        let (a, b) = (sparse(), sparse());
        assert_eq!(a.generator().anchor(), b.generator().anchor());
        assert!(a.generator().anchor() <= sample::anchor());

        let address = "0x8ba1f109551bd432803012645ac136ddd64dba72";
        let a = tokio_test::block_on(a.trader_detail(address)).unwrap().unwrap();
        let b = tokio_test::block_on(b.trader_detail(address)).unwrap().unwrap();
        assert_eq!(a.win_rate_trend, b.win_rate_trend);
    }

    #[test]
    fn test_empty_snapshot_uses_fixed_anchor() {
        let source = SnapshotSource::new(Snapshot::default(), 7).unwrap();
        assert_eq!(source.generator().anchor(), sample::anchor());
    }

    #[test]
    fn test_new_rejects_invalid_snapshot() {
        let mut snapshot = sample::snapshot();
        snapshot.markets[2].yes_price = dec!(1.2);
        assert!(matches!(
            SnapshotSource::new(snapshot, 1),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("poli-snapshot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.json");
        std::fs::write(&path, serde_json::to_string(&sample::snapshot()).unwrap()).unwrap();

        let source = SnapshotSource::from_file(&path, 42).unwrap();
        assert_eq!(source.generator().anchor(), sample::anchor());
        let markets = tokio_test::block_on(source.markets()).unwrap();
        assert_eq!(markets, sample::snapshot().markets);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_from_file_reports_bad_json() {
        let dir = std::env::temp_dir().join(format!("poli-bad-snapshot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.json");
        std::fs::write(&path, "{ \"markets\": 3 }").unwrap();

        assert!(matches!(
            SnapshotSource::from_file(&path, 42),
            Err(Error::Serialization(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
