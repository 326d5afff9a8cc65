//! Colors and shared styles derived from the theme configuration.

use std::str::FromStr;

use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use rust_decimal::Decimal;

use crate::config::ThemeConfig;
use crate::state::{
    ExpertiseBand, FollowStatus, LiquidityBand, NotificationLevel, PerformanceStatus, TraderTag,
};

/// Resolved theme colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub selection: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_theme(&ThemeConfig::default())
    }
}

impl Palette {
    /// Parse the configured hex colors. Unparseable entries fall back to a
    /// named terminal color.
    pub fn from_theme(theme: &ThemeConfig) -> Self {
        Self {
            primary: parse(&theme.primary, Color::Cyan),
            accent: parse(&theme.accent, Color::Magenta),
            success: parse(&theme.success, Color::Green),
            warning: parse(&theme.warning, Color::Yellow),
            error: parse(&theme.error, Color::Red),
            foreground: parse(&theme.foreground, Color::White),
            muted: parse(&theme.muted, Color::DarkGray),
            border: parse(&theme.border, Color::Gray),
            selection: parse(&theme.selection, Color::DarkGray),
        }
    }

    /// Bordered block with a title.
    pub fn block<'a>(&self, title: impl Into<String>) -> Block<'a> {
        Block::default()
            .title(format!(" {} ", title.into()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border))
            .title_style(Style::default().fg(self.primary).add_modifier(Modifier::BOLD))
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Green for gains, red for losses.
    pub fn signed(&self, value: Decimal) -> Color {
        if value.is_sign_negative() && !value.is_zero() {
            self.error
        } else {
            self.success
        }
    }

    pub fn liquidity(&self, band: LiquidityBand) -> Color {
        match band {
            LiquidityBand::High => self.success,
            LiquidityBand::Medium => self.warning,
            LiquidityBand::Low => self.error,
        }
    }

    pub fn performance(&self, status: PerformanceStatus) -> Color {
        match status {
            PerformanceStatus::Good => self.success,
            PerformanceStatus::Warning => self.warning,
            PerformanceStatus::Poor => self.error,
        }
    }

    pub fn follow_status(&self, status: FollowStatus) -> Color {
        match status {
            FollowStatus::Active => self.success,
            FollowStatus::Warning => self.warning,
            FollowStatus::Paused => self.muted,
        }
    }

    pub fn expertise(&self, band: ExpertiseBand) -> Color {
        match band {
            ExpertiseBand::Strong => self.success,
            ExpertiseBand::Moderate => self.warning,
            ExpertiseBand::Weak => self.error,
        }
    }

    pub fn notification(&self, level: NotificationLevel) -> Color {
        match level {
            NotificationLevel::Info => self.primary,
            NotificationLevel::Success => self.success,
            NotificationLevel::Warning => self.warning,
            NotificationLevel::Error => self.error,
        }
    }
}

/// Fixed color per trader tag.
pub fn tag_color(tag: TraderTag) -> Color {
    match tag {
        TraderTag::SmartMoney => Color::Yellow,
        TraderTag::ReverseIndicator => Color::Red,
        TraderTag::Whale => Color::Blue,
        TraderTag::HighFrequency => Color::Magenta,
        TraderTag::Specialist => Color::Cyan,
        TraderTag::Newcomer => Color::Green,
    }
}

fn parse(value: &str, fallback: Color) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        tracing::warn!("Invalid theme color {:?}, using {:?}", value, fallback);
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parses_hex_colors() {
        let palette = Palette::default();
        assert_eq!(palette.primary, Color::Rgb(0x5c, 0x6b, 0xc0));
        assert_eq!(palette.error, Color::Rgb(0xef, 0x53, 0x50));
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let theme = ThemeConfig {
            primary: "not-a-color".to_string(),
            ..Default::default()
        };
        assert_eq!(Palette::from_theme(&theme).primary, Color::Cyan);
    }

    #[test]
    fn test_signed_color() {
        let palette = Palette::default();
        assert_eq!(palette.signed(dec!(1.5)), palette.success);
        assert_eq!(palette.signed(dec!(-0.01)), palette.error);
        assert_eq!(palette.signed(Decimal::ZERO), palette.success);
    }
}
