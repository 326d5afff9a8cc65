//! Built-in sample snapshot shown when no snapshot file is configured.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::Snapshot;
use crate::state::{
    Alert, AlertTarget, Expertise, Market, MarketStatus, Outcome, PerformanceStatus, PricePoint,
    RecentPerformance, SentimentPoint, Trade, TradeSide, Trader, TraderTag,
};

/// Reference time the sample data is laid out around.
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 28, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The built-in snapshot.
pub fn snapshot() -> Snapshot {
    let now = anchor();
    let markets = markets(now);
    let traders = traders(now);
    let trades = trades(now, &markets, &traders);

    Snapshot {
        anchor: Some(now),
        alerts: alerts(now, &markets, &traders),
        sentiment: sentiment(now),
        markets,
        traders,
        trades,
    }
}

#[allow(clippy::too_many_arguments)]
fn market(
    now: DateTime<Utc>,
    id: &str,
    slug: &str,
    title: &str,
    subcategory: &str,
    price: Decimal,
    change: Decimal,
    volume: Decimal,
    liquidity: u8,
    days_left: i64,
    history: [Decimal; 7],
) -> Market {
    Market {
        id: id.to_string(),
        slug: slug.to_string(),
        title: title.to_string(),
        category: "政治".to_string(),
        subcategory: subcategory.to_string(),
        current_price: price,
        yes_price: price,
        no_price: Decimal::ONE - price,
        price_change_24h: change,
        volume_24h: volume,
        liquidity,
        end_date: now + Duration::days(days_left),
        status: if days_left > 0 {
            MarketStatus::Active
        } else {
            MarketStatus::Closed
        },
        price_history_7d: history
            .iter()
            .enumerate()
            .map(|(i, price)| PricePoint {
                timestamp: now - Duration::days(6 - i as i64),
                price: *price,
            })
            .collect(),
    }
}

fn markets(now: DateTime<Utc>) -> Vec<Market> {
    vec![
        market(
            now,
            "m-001",
            "us-election-2024",
            "Will the Republican candidate win the 2024 US presidential election?",
            "美国政治",
            dec!(0.62),
            dec!(3.45),
            dec!(4850000),
            92,
            8,
            [dec!(0.55), dec!(0.57), dec!(0.56), dec!(0.58), dec!(0.60), dec!(0.60), dec!(0.62)],
        ),
        market(
            now,
            "m-002",
            "ukraine-ceasefire-2024",
            "Russia x Ukraine ceasefire before end of 2024?",
            "地缘政治",
            dec!(0.18),
            dec!(-5.20),
            dec!(1320000),
            74,
            64,
            [dec!(0.24), dec!(0.23), dec!(0.21), dec!(0.20), dec!(0.19), dec!(0.19), dec!(0.18)],
        ),
        market(
            now,
            "m-003",
            "uk-snap-election",
            "Will the UK call a snap general election in 2025?",
            "国际政治",
            dec!(0.09),
            dec!(0.80),
            dec!(215000),
            38,
            429,
            [dec!(0.08), dec!(0.08), dec!(0.09), dec!(0.09), dec!(0.08), dec!(0.09), dec!(0.09)],
        ),
        market(
            now,
            "m-004",
            "israel-iran-strike",
            "Israel strikes Iranian nuclear facilities by November 30?",
            "地缘政治",
            dec!(0.27),
            dec!(12.50),
            dec!(2640000),
            81,
            33,
            [dec!(0.15), dec!(0.17), dec!(0.19), dec!(0.22), dec!(0.24), dec!(0.24), dec!(0.27)],
        ),
        market(
            now,
            "m-005",
            "germany-coalition-collapse",
            "German governing coalition collapses before 2025?",
            "国际政治",
            dec!(0.44),
            dec!(-1.10),
            dec!(560000),
            55,
            64,
            [dec!(0.47), dec!(0.46), dec!(0.46), dec!(0.45), dec!(0.45), dec!(0.44), dec!(0.44)],
        ),
        market(
            now,
            "m-006",
            "fed-rate-cut-november",
            "Fed cuts rates by 25bps at the November meeting?",
            "经济政策",
            dec!(0.91),
            dec!(0.35),
            dec!(3120000),
            88,
            9,
            [dec!(0.86), dec!(0.88), dec!(0.89), dec!(0.90), dec!(0.90), dec!(0.91), dec!(0.91)],
        ),
        market(
            now,
            "m-007",
            "senate-control-2024",
            "Will Republicans control the Senate after the 2024 election?",
            "美国政治",
            dec!(0.78),
            dec!(1.90),
            dec!(1980000),
            69,
            8,
            [dec!(0.74), dec!(0.75), dec!(0.75), dec!(0.76), dec!(0.77), dec!(0.77), dec!(0.78)],
        ),
        market(
            now,
            "m-008",
            "french-budget-vote",
            "French 2024 budget bill passes without Article 49.3?",
            "国际政治",
            dec!(0.12),
            dec!(-8.00),
            dec!(87000),
            21,
            -2,
            [dec!(0.20), dec!(0.18), dec!(0.17), dec!(0.15), dec!(0.14), dec!(0.13), dec!(0.12)],
        ),
    ]
}

fn expertise(category: &str, trades: u32, win_rate: Decimal) -> Expertise {
    Expertise {
        category: category.to_string(),
        trades,
        win_rate,
    }
}

struct TraderSeed<'a> {
    address: &'a str,
    tags: &'a [TraderTag],
    win_rate: [Decimal; 3],
    roi: Decimal,
    profit: Decimal,
    volume: Decimal,
    trades: u32,
    expertise: Vec<Expertise>,
    status: PerformanceStatus,
    message: &'a str,
    review: &'a str,
    joined_days_ago: i64,
    active_minutes_ago: i64,
}

impl TraderSeed<'_> {
    fn build(self, now: DateTime<Utc>) -> Trader {
        Trader {
            address: self.address.to_string(),
            tags: self.tags.iter().copied().collect(),
            win_rate: self.win_rate[0],
            win_rate_7d: self.win_rate[1],
            win_rate_30d: self.win_rate[2],
            roi: self.roi,
            total_profit: self.profit,
            total_volume: self.volume,
            total_trades: self.trades,
            expertise: self.expertise,
            recent_performance: RecentPerformance {
                status: self.status,
                message: self.message.to_string(),
            },
            review: self.review.to_string(),
            joined_at: now - Duration::days(self.joined_days_ago),
            last_active: now - Duration::minutes(self.active_minutes_ago),
        }
    }
}

fn traders(now: DateTime<Utc>) -> Vec<Trader> {
    use TraderTag::*;

    [
        TraderSeed {
            address: "0x742d35cc6634c0532925a3b844bc454e4438f44e",
            tags: &[SmartMoney, Whale],
            win_rate: [dec!(78.5), dec!(82.0), dec!(80.1)],
            roi: dec!(156.3),
            profit: dec!(1245000),
            volume: dec!(8950000),
            trades: 342,
            expertise: vec![
                expertise("美国政治", 156, dec!(84.0)),
                expertise("地缘政治", 98, dec!(73.5)),
                expertise("经济政策", 88, dec!(69.0)),
            ],
            status: PerformanceStatus::Good,
            message: "Won 8 of the last 10 positions",
            review: "Sizes into election markets early and rarely chases moves.",
            joined_days_ago: 640,
            active_minutes_ago: 12,
        },
        TraderSeed {
            address: "0x8ba1f109551bd432803012645ac136ddd64dba72",
            tags: &[SmartMoney, Specialist],
            win_rate: [dec!(82.3), dec!(79.0), dec!(81.5)],
            roi: dec!(98.7),
            profit: dec!(456000),
            volume: dec!(2310000),
            trades: 187,
            expertise: vec![
                expertise("地缘政治", 121, dec!(86.0)),
                expertise("国际政治", 66, dec!(75.8)),
            ],
            status: PerformanceStatus::Good,
            message: "Steady on geopolitical markets",
            review: "Focuses on conflict resolution markets with deep research.",
            joined_days_ago: 410,
            active_minutes_ago: 95,
        },
        TraderSeed {
            address: "0x1f9090aae28b8a3dceadf281b0f12828e676c326",
            tags: &[SmartMoney, HighFrequency],
            win_rate: [dec!(71.2), dec!(64.0), dec!(69.8)],
            roi: dec!(45.2),
            profit: dec!(189000),
            volume: dec!(5120000),
            trades: 1893,
            expertise: vec![
                expertise("经济政策", 920, dec!(72.4)),
                expertise("美国政治", 973, dec!(70.1)),
            ],
            status: PerformanceStatus::Warning,
            message: "Win rate down 7 points this week",
            review: "Trades around scheduled data releases in small clips.",
            joined_days_ago: 290,
            active_minutes_ago: 3,
        },
        TraderSeed {
            address: "0x3e5e9111ae8eb78fe1cc3bb8915d5d461f3ef9a9",
            tags: &[ReverseIndicator],
            win_rate: [dec!(31.4), dec!(25.0), dec!(28.9)],
            roi: dec!(-42.8),
            profit: dec!(-86000),
            volume: dec!(640000),
            trades: 264,
            expertise: vec![
                expertise("美国政治", 180, dec!(29.4)),
                expertise("国际政治", 84, dec!(35.7)),
            ],
            status: PerformanceStatus::Poor,
            message: "Lost 9 of the last 10 positions",
            review: "Buys momentum at the top; fading this wallet has paid.",
            joined_days_ago: 220,
            active_minutes_ago: 41,
        },
        TraderSeed {
            address: "0xdac17f958d2ee523a2206206994597c13d831ec7",
            tags: &[Whale],
            win_rate: [dec!(58.9), dec!(61.0), dec!(57.2)],
            roi: dec!(22.4),
            profit: dec!(890000),
            volume: dec!(12400000),
            trades: 96,
            expertise: vec![expertise("美国政治", 96, dec!(58.9))],
            status: PerformanceStatus::Good,
            message: "Large YES position on the presidential market",
            review: "Few trades, very large size.",
            joined_days_ago: 510,
            active_minutes_ago: 300,
        },
        TraderSeed {
            address: "0x5aeda56215b167893e80b4fe645ba6d5bab767de",
            tags: &[ReverseIndicator, HighFrequency],
            win_rate: [dec!(24.6), dec!(22.0), dec!(26.3)],
            roi: dec!(-61.5),
            profit: dec!(-142000),
            volume: dec!(980000),
            trades: 1120,
            expertise: vec![
                expertise("地缘政治", 610, dec!(21.0)),
                expertise("经济政策", 510, dec!(28.9)),
            ],
            status: PerformanceStatus::Poor,
            message: "Drawdown deepened this week",
            review: "Overtrades headlines.",
            joined_days_ago: 150,
            active_minutes_ago: 7,
        },
        TraderSeed {
            address: "0xab5801a7d398351b8be11c439e05c5b3259aec9b",
            tags: &[Newcomer],
            win_rate: [dec!(66.7), dec!(66.7), dec!(66.7)],
            roi: dec!(12.0),
            profit: dec!(3600),
            volume: dec!(30000),
            trades: 9,
            expertise: Vec::new(),
            status: PerformanceStatus::Good,
            message: "Only a handful of trades so far",
            review: "",
            joined_days_ago: 12,
            active_minutes_ago: 1440,
        },
        TraderSeed {
            address: "0x00000000219ab540356cbb839cbe05303d7705fa",
            tags: &[SmartMoney],
            win_rate: [dec!(76.0), dec!(70.5), dec!(74.2)],
            roi: dec!(64.9),
            profit: dec!(312000),
            volume: dec!(1870000),
            trades: 421,
            expertise: vec![
                expertise("国际政治", 230, dec!(79.1)),
                expertise("地缘政治", 191, dec!(72.3)),
            ],
            status: PerformanceStatus::Good,
            message: "Consistent across European politics",
            review: "Patient entries, exits before resolution.",
            joined_days_ago: 700,
            active_minutes_ago: 220,
        },
    ]
    .into_iter()
    .map(|seed| seed.build(now))
    .collect()
}

fn trades(now: DateTime<Utc>, markets: &[Market], traders: &[Trader]) -> Vec<Trade> {
    let plan: [(usize, usize, TradeSide, Outcome, Decimal, Decimal, i64); 14] = [
        (0, 0, TradeSide::Buy, Outcome::Yes, dec!(0.61), dec!(25000), 4),
        (0, 4, TradeSide::Buy, Outcome::Yes, dec!(0.62), dec!(80000), 18),
        (0, 3, TradeSide::Sell, Outcome::Yes, dec!(0.60), dec!(1200), 35),
        (0, 2, TradeSide::Buy, Outcome::No, dec!(0.39), dec!(3000), 52),
        (0, 5, TradeSide::Sell, Outcome::No, dec!(0.40), dec!(2100), 80),
        (1, 1, TradeSide::Buy, Outcome::No, dec!(0.82), dec!(15000), 9),
        (1, 3, TradeSide::Buy, Outcome::Yes, dec!(0.19), dec!(4000), 44),
        (3, 1, TradeSide::Buy, Outcome::Yes, dec!(0.26), dec!(12000), 6),
        (3, 5, TradeSide::Sell, Outcome::Yes, dec!(0.25), dec!(3500), 27),
        (3, 0, TradeSide::Buy, Outcome::Yes, dec!(0.24), dec!(20000), 130),
        (5, 2, TradeSide::Buy, Outcome::Yes, dec!(0.90), dec!(9000), 15),
        (5, 7, TradeSide::Sell, Outcome::No, dec!(0.09), dec!(6000), 62),
        (4, 7, TradeSide::Buy, Outcome::No, dec!(0.56), dec!(7000), 240),
        (6, 0, TradeSide::Buy, Outcome::Yes, dec!(0.77), dec!(18000), 300),
    ];

    plan.iter()
        .enumerate()
        .map(|(i, (market, trader, side, outcome, price, size, minutes_ago))| Trade {
            tx_hash: format!("0x{:064x}", 0xa11ce + i),
            market_id: markets[*market].id.clone(),
            trader: traders[*trader].address.clone(),
            side: *side,
            outcome: *outcome,
            price: *price,
            size: *size,
            timestamp: now - Duration::minutes(*minutes_ago),
            pnl: None,
        })
        .collect()
}

fn alerts(now: DateTime<Utc>, markets: &[Market], traders: &[Trader]) -> Vec<Alert> {
    vec![
        Alert {
            id: "a-1".to_string(),
            icon: "🐋".to_string(),
            message: format!(
                "Whale {} bought $50K YES on the presidential market",
                traders[4].short_address()
            ),
            timestamp: now - Duration::minutes(18),
            target: AlertTarget::Market(markets[0].slug.clone()),
        },
        Alert {
            id: "a-2".to_string(),
            icon: "🏆".to_string(),
            message: format!(
                "Smart money {} opened a position on Israel x Iran",
                traders[1].short_address()
            ),
            timestamp: now - Duration::minutes(6),
            target: AlertTarget::Trader(traders[1].address.clone()),
        },
        Alert {
            id: "a-3".to_string(),
            icon: "📈".to_string(),
            message: "Israel x Iran YES up 12.5% in 24h".to_string(),
            timestamp: now - Duration::hours(2),
            target: AlertTarget::Market(markets[3].slug.clone()),
        },
        Alert {
            id: "a-4".to_string(),
            icon: "🔴".to_string(),
            message: format!(
                "Reverse indicator {} went long YES on a ceasefire",
                traders[3].short_address()
            ),
            timestamp: now - Duration::minutes(44),
            target: AlertTarget::Trader(traders[3].address.clone()),
        },
    ]
}

fn sentiment(now: DateTime<Utc>) -> Vec<SentimentPoint> {
    [
        dec!(52),
        dec!(55),
        dec!(51),
        dec!(58),
        dec!(61),
        dec!(59),
        dec!(64),
    ]
    .iter()
    .enumerate()
    .map(|(i, value)| SentimentPoint {
        date: now - Duration::days(6 - i as i64),
        value: *value,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_snapshot_is_valid() {
        snapshot().validate().unwrap();
    }

    #[test]
    fn test_sample_covers_every_leaderboard_tab() {
        let snapshot = snapshot();
        for tag in [
            TraderTag::SmartMoney,
            TraderTag::ReverseIndicator,
            TraderTag::Whale,
        ] {
            assert!(snapshot.traders.iter().any(|t| t.has_tag(tag)));
        }
    }

    #[test]
    fn test_sample_trades_reference_known_records() {
        let snapshot = snapshot();
        for trade in &snapshot.trades {
            assert!(snapshot.markets.iter().any(|m| m.id == trade.market_id));
            assert!(snapshot.traders.iter().any(|t| t.address == trade.trader));
        }
    }
}
