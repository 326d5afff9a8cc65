//! Trades and positions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TraderTag;

/// Trade side (buy/sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Binary market outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

/// An executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Transaction hash.
    pub tx_hash: String,
    /// Market this trade belongs to.
    #[serde(default)]
    pub market_id: String,
    /// Trader address.
    #[serde(default)]
    pub trader: String,
    pub side: TradeSide,
    pub outcome: Outcome,
    /// Execution price (0-1).
    pub price: Decimal,
    /// Number of shares.
    pub size: Decimal,
    pub timestamp: DateTime<Utc>,
    /// Realized P&L, once known.
    #[serde(default)]
    pub pnl: Option<Decimal>,
}

impl Trade {
    /// Trade value in USD.
    pub fn notional(&self) -> Decimal {
        self.size * self.price
    }

    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }
}

/// Share of total notional that was bought, in percent.
///
/// Returns `None` when there is no volume to compare.
pub fn buy_pressure(trades: &[Trade]) -> Option<Decimal> {
    let total: Decimal = trades.iter().map(Trade::notional).sum();
    if total.is_zero() {
        return None;
    }
    let bought: Decimal = trades
        .iter()
        .filter(|t| t.is_buy())
        .map(Trade::notional)
        .sum();
    Some((bought / total * Decimal::ONE_HUNDRED).round_dp(2))
}

/// Whether a resolved market position ended in profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionResult {
    Won,
    Lost,
}

/// A trader's activity in a single market.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketTradeHistory {
    pub market_slug: String,
    pub market_title: String,
    pub trades: Vec<Trade>,
    pub total_pnl: Decimal,
    pub result: PositionResult,
}

/// A tracked trader's open position in a market.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartMoneyPosition {
    pub address: String,
    pub short_address: String,
    pub tags: Vec<TraderTag>,
    pub outcome: Outcome,
    /// Position size in USD.
    pub amount: Decimal,
    pub avg_price: Decimal,
    pub unrealized_pnl: Decimal,
}

impl SmartMoneyPosition {
    pub fn is_profitable(&self) -> bool {
        self.unrealized_pnl > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(side: TradeSide, price: Decimal, size: Decimal) -> Trade {
        Trade {
            tx_hash: "0xabc".to_string(),
            market_id: "m1".to_string(),
            trader: String::new(),
            side,
            outcome: Outcome::Yes,
            price,
            size,
            timestamp: Utc::now(),
            pnl: None,
        }
    }

    #[test]
    fn test_notional() {
        assert_eq!(trade(TradeSide::Buy, dec!(0.62), dec!(1000)).notional(), dec!(620));
    }

    #[test]
    fn test_buy_pressure() {
        let trades = vec![
            trade(TradeSide::Buy, dec!(0.5), dec!(300)),
            trade(TradeSide::Sell, dec!(0.5), dec!(100)),
        ];
        // 150 bought out of 200 total
        assert_eq!(buy_pressure(&trades), Some(dec!(75)));
    }

    #[test]
    fn test_buy_pressure_without_volume() {
        assert_eq!(buy_pressure(&[]), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TradeSide::Sell.to_string(), "SELL");
        assert_eq!(Outcome::No.to_string(), "NO");
    }
}
