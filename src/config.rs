//! Configuration constants and settings for quoting.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon (well below one cent).
pub const EPS: f64 = 0.0001;

/// Default glass reference price per square meter.
pub const DEFAULT_GLASS_PRICE: f64 = 150.0;

/// Default mirror reference price per square meter.
pub const DEFAULT_MIRROR_PRICE: f64 = 200.0;

/// Currency symbol printed in front of money values.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Decimal places kept for areas.
pub const AREA_DECIMALS: i32 = 4;

/// Decimal places kept for money values.
pub const MONEY_DECIMALS: i32 = 2;

/// Maximum description characters shown in the document table.
pub const DESCRIPTION_COLUMN_CHARS: usize = 28;

/// Maximum finish characters shown in the document table.
pub const FINISH_COLUMN_CHARS: usize = 10;

/// Thickness labels offered to the user. Stored as opaque text.
pub const THICKNESS_OPTIONS: [&str; 8] = ["3mm", "4mm", "5mm", "6mm", "8mm", "10mm", "12mm", "Other"];

/// Starting settings for a quoting session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Glass reference price per m².
    pub glass_price: f64,
    /// Mirror reference price per m².
    pub mirror_price: f64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            glass_price: DEFAULT_GLASS_PRICE,
            mirror_price: DEFAULT_MIRROR_PRICE,
        }
    }
}

impl QuoteConfig {
    /// Create a configuration with explicit prices.
    pub fn new(glass_price: f64, mirror_price: f64) -> Self {
        Self {
            glass_price,
            mirror_price,
        }
    }

    /// Override prices that were given, keeping the rest.
    pub fn with_overrides(self, glass_price: Option<f64>, mirror_price: Option<f64>) -> Self {
        Self {
            glass_price: glass_price.unwrap_or(self.glass_price),
            mirror_price: mirror_price.unwrap_or(self.mirror_price),
        }
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }

    /// Round to a number of decimal places, half away from zero.
    #[inline]
    pub fn round_to(value: f64, places: i32) -> f64 {
        let factor = 10f64.powi(places);
        (value * factor).round() / factor
    }
}

/// Money formatting in the quote's fixed currency style.
pub mod money {
    use super::CURRENCY_SYMBOL;

    /// Format a value as `R$ 1.234,56`: period groups thousands, comma
    /// separates cents.
    pub fn format_currency(value: f64) -> String {
        format!("{} {}", CURRENCY_SYMBOL, format_grouped(value))
    }

    /// Format with two decimals, `.` thousands separator and `,` decimal mark.
    pub fn format_grouped(value: f64) -> String {
        let fixed = format!("{:.2}", value.abs());
        let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        // "-0,00" reads badly; only signal a sign when something is left after rounding.
        let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
        if negative {
            format!("-{},{}", grouped, dec_part)
        } else {
            format!("{},{}", grouped, dec_part)
        }
    }

    /// Plain two-decimal price (`150.00`) used on the reference price line.
    pub fn format_plain(value: f64) -> String {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::float_cmp::*;
    use super::money::*;
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(1234.5), "R$ 1.234,50");
        assert_eq!(format_currency(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_currency(999.999), "R$ 1.000,00");
        assert_eq!(format_currency(12.3), "R$ 12,30");
        assert_eq!(format_currency(123456.78), "R$ 123.456,78");
    }

    #[test]
    fn test_format_grouped_negative() {
        assert_eq!(format_grouped(-1234.5), "-1.234,50");
        assert_eq!(format_grouped(-0.001), "0,00");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(format_plain(150.0), "150.00");
        assert_eq!(format_plain(1234.567), "1234.57");
    }

    #[test]
    fn test_round_to() {
        assert!(approx_eq(round_to(1.23456, 4), 1.2346));
        assert!(approx_eq(round_to(495.00000000000006, 2), 495.0));
        assert!(approx_eq(round_to(2.675, 1), 2.7));
        assert!(approx_zero(round_to(0.004, 2)));
    }

    #[test]
    fn test_config_overrides() {
        let config = QuoteConfig::default();
        assert_eq!(config.glass_price, DEFAULT_GLASS_PRICE);
        assert_eq!(config.mirror_price, DEFAULT_MIRROR_PRICE);

        let config = config.with_overrides(Some(180.0), None);
        assert_eq!(config, QuoteConfig::new(180.0, DEFAULT_MIRROR_PRICE));
    }
}
