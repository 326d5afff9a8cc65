//! Display formatting helpers.
//!
//! Values are formatted for display only; records are never rewritten.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const THOUSAND: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
const BILLION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Compact a number with K/M/B suffixes (`1234567` -> `1.23M`).
pub fn format_number(value: Decimal) -> String {
    let abs = value.abs();
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };

    let (scaled, suffix) = if abs >= BILLION {
        (abs / BILLION, "B")
    } else if abs >= MILLION {
        (abs / MILLION, "M")
    } else if abs >= THOUSAND {
        (abs / THOUSAND, "K")
    } else {
        (abs, "")
    };

    let rounded = scaled.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{sign}{rounded:.2}{suffix}")
}

/// Format a currency amount (`$1.23K`, `-$320.00`).
pub fn format_usd(value: Decimal) -> String {
    let formatted = format_number(value);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${formatted}"),
    }
}

/// Format a signed currency amount, with `+` for gains.
pub fn format_signed_usd(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", format_usd(value))
    } else {
        format_usd(value)
    }
}

/// Parse a typed dollar amount such as `1,500`, `$250` or `99.5`.
pub fn parse_usd(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let digits = text.strip_prefix('$').unwrap_or(text).replace(',', "");
    digits.parse().ok()
}

/// Format a signed percentage (`+3.20%`, `-1.05%`).
pub fn format_signed_percent(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded > Decimal::ZERO {
        format!("+{rounded:.2}%")
    } else {
        format!("{rounded:.2}%")
    }
}

/// Format a price change with an arrow (`↑ 3.20%`).
pub fn format_change(value: Decimal) -> String {
    let arrow = if value > Decimal::ZERO { "↑" } else { "↓" };
    format!("{arrow} {:.2}%", value.abs().round_dp(2))
}

/// Format a 0-1 outcome price (`$0.62`).
pub fn format_price(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format the time elapsed between `then` and `now` (`5m ago`).
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let secs = elapsed.num_seconds();

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3_600 {
        format!("{}m ago", elapsed.num_minutes())
    } else if secs < 86_400 {
        format!("{}h ago", elapsed.num_hours())
    } else if secs < 30 * 86_400 {
        format!("{}d ago", elapsed.num_days())
    } else {
        format_date(then)
    }
}

/// Shorten a wallet address to `0x1234...abcd`.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Truncate to at most `max_chars` characters, adding an ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let head: String = s.chars().take(keep).collect();
    format!("{head}...")
}

/// Render a series as a one-line text sparkline.
pub fn sparkline(values: &[Decimal]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return String::new();
    };
    let range = *max - *min;

    values
        .iter()
        .map(|v| {
            if range.is_zero() {
                return BARS[3];
            }
            let ratio = ((*v - *min) / range * Decimal::from(7))
                .round()
                .to_usize()
                .unwrap_or(0);
            BARS[ratio.min(7)]
        })
        .collect()
}
