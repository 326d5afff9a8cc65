//! Seeded generator for the values the dashboard derives per entity.
//!
//! Every call reseeds from `(seed, entity key)`, so the same market or trader
//! always gets the same history, positions and follow figures no matter how
//! often or in what order pages are opened. Timestamps are offsets from a
//! fixed anchor rather than the wall clock.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::projection::Selector;
use crate::state::{
    FollowPerformance, HasAnyTag, Market, MarketTradeHistory, Outcome, OutcomePricePoint, PositionResult,
    SmartMoneyPosition, Trade, TradeSide, Trader, TraderTag, WinRatePoint,
};

/// Days of YES/NO history on the market detail page.
pub const PRICE_HISTORY_DAYS: i64 = 7;
/// Days of win-rate trend on the trader detail page.
pub const WIN_RATE_TREND_DAYS: i64 = 30;
/// Markets shown in a trader's history.
pub const HISTORY_MARKETS: usize = 3;
/// Smart-money positions shown per market.
pub const SMART_MONEY_POSITIONS: usize = 3;

/// Deterministic source of derived per-entity figures.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    seed: u64,
    anchor: DateTime<Utc>,
}

impl SyntheticGenerator {
    pub fn new(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self { seed, anchor }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reference "now" for generated timestamps.
    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    fn rng(&self, namespace: &str, key: &str) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ fnv1a(namespace, key))
    }

    /// Daily YES/NO prices jittered by up to ±0.05 around the current ones.
    pub fn price_history(&self, market: &Market) -> Vec<OutcomePricePoint> {
        let mut rng = self.rng("price-history", &market.slug);
        (0..PRICE_HISTORY_DAYS)
            .map(|i| OutcomePricePoint {
                timestamp: self.anchor - Duration::days(PRICE_HISTORY_DAYS - 1 - i),
                yes_price: clamp_price(market.yes_price + jitter(&mut rng, 500, 4)),
                no_price: clamp_price(market.no_price + jitter(&mut rng, 500, 4)),
            })
            .collect()
    }

    /// Positions held in `market` by the first smart-money or whale traders.
    pub fn smart_money_positions(
        &self,
        market: &Market,
        traders: &[Trader],
    ) -> Vec<SmartMoneyPosition> {
        let holders = HasAnyTag(vec![TraderTag::SmartMoney, TraderTag::Whale]);
        traders
            .iter()
            .filter(|t| holders.matches(t))
            .take(SMART_MONEY_POSITIONS)
            .map(|trader| {
                let mut rng = self.rng("position", &format!("{}/{}", market.slug, trader.address));
                SmartMoneyPosition {
                    address: trader.address.clone(),
                    short_address: trader.short_address(),
                    tags: trader.tags.iter().copied().collect(),
                    outcome: outcome(&mut rng),
                    amount: money(&mut rng, 10_000, 60_000),
                    avg_price: clamp_price(market.current_price + jitter(&mut rng, 500, 4)),
                    unrealized_pnl: money(&mut rng, -3_000, 7_000),
                }
            })
            .collect()
    }

    /// Daily win rate over the last month, within ±7.5 points of the lifetime rate.
    pub fn win_rate_trend(&self, trader: &Trader) -> Vec<WinRatePoint> {
        let mut rng = self.rng("win-rate", &trader.address);
        (0..WIN_RATE_TREND_DAYS)
            .map(|i| WinRatePoint {
                date: self.anchor - Duration::days(WIN_RATE_TREND_DAYS - 1 - i),
                win_rate: (trader.win_rate + jitter(&mut rng, 750, 2))
                    .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
            })
            .collect()
    }

    /// Per-market trade history of `trader` over the first few markets.
    pub fn trade_history(&self, trader: &Trader, markets: &[Market]) -> Vec<MarketTradeHistory> {
        markets
            .iter()
            .take(HISTORY_MARKETS)
            .map(|market| {
                let mut rng = self.rng("history", &format!("{}/{}", trader.address, market.slug));
                let count = rng.gen_range(1..=5);
                let mut trades: Vec<Trade> = (0..count)
                    .map(|_| Trade {
                        tx_hash: tx_hash(&mut rng),
                        market_id: market.id.clone(),
                        trader: trader.address.clone(),
                        side: side(&mut rng),
                        outcome: outcome(&mut rng),
                        price: Decimal::new(rng.gen_range(2_500..7_500), 4),
                        size: money(&mut rng, 500, 5_500),
                        timestamp: self.anchor - Duration::minutes(rng.gen_range(0..7 * 24 * 60)),
                        pnl: Some(money(&mut rng, -600, 1_400)),
                    })
                    .collect();
                trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

                MarketTradeHistory {
                    market_slug: market.slug.clone(),
                    market_title: market.title.clone(),
                    trades,
                    total_pnl: money(&mut rng, -1_500, 3_500),
                    result: if rng.gen_bool(0.7) {
                        PositionResult::Won
                    } else {
                        PositionResult::Lost
                    },
                }
            })
            .collect()
    }

    /// Figures for a freshly followed trader.
    pub fn follow_performance(&self, address: &str) -> FollowPerformance {
        let mut rng = self.rng("follow", &address.to_ascii_lowercase());
        FollowPerformance {
            total_invested: money(&mut rng, 1_000, 6_000),
            total_pnl: money(&mut rng, -600, 1_400),
            followed_trades: rng.gen_range(5..25),
            last_follow_time: self.anchor - Duration::minutes(rng.gen_range(0..7 * 24 * 60)),
        }
    }
}

/// FNV-1a over a namespace and key, so different derived series of the same
/// entity do not share a stream.
fn fnv1a(namespace: &str, key: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    namespace
        .bytes()
        .chain(std::iter::once(b'/'))
        .chain(key.bytes())
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Uniform value in `[-bound, bound]` at the given decimal scale.
fn jitter(rng: &mut StdRng, bound: i64, scale: u32) -> Decimal {
    Decimal::new(rng.gen_range(-bound..=bound), scale)
}

/// Dollar amount in `[low, high)` with cents.
fn money(rng: &mut StdRng, low: i64, high: i64) -> Decimal {
    Decimal::new(rng.gen_range(low * 100..high * 100), 2)
}

fn clamp_price(price: Decimal) -> Decimal {
    price.clamp(Decimal::ZERO, Decimal::ONE)
}

fn outcome(rng: &mut StdRng) -> Outcome {
    if rng.gen_bool(0.5) { Outcome::Yes } else { Outcome::No }
}

fn side(rng: &mut StdRng) -> TradeSide {
    if rng.gen_bool(0.5) {
        TradeSide::Buy
    } else {
        TradeSide::Sell
    }
}

fn tx_hash(rng: &mut StdRng) -> String {
    (0..4).fold(String::from("0x"), |mut hash, _| {
        hash.push_str(&format!("{:016x}", rng.r#gen::<u64>()));
        hash
    })
}
