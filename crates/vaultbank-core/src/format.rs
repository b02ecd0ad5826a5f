//! Display formatting for amounts, dates and the monthly change badge

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use vaultbank_config::CurrencyConfig;
use vaultbank_utils::group_thousands;

use crate::estimate::{ChangeDirection, MonthlyChange};
use crate::time::parse_timestamp;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number formatter configured from the `currency` section.
///
/// The currency label is never embedded in the number; callers render it
/// as a separate badge.
#[derive(Debug, Clone)]
pub struct AmountFormatter {
    decimal_places: u32,
    thousands_separator: String,
    decimal_separator: String,
}

impl Default for AmountFormatter {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

impl From<&CurrencyConfig> for AmountFormatter {
    fn from(config: &CurrencyConfig) -> Self {
        Self {
            decimal_places: config.decimal_places,
            thousands_separator: config.thousands_separator.clone(),
            decimal_separator: config.decimal_separator.clone(),
        }
    }
}

impl AmountFormatter {
    /// Fixed decimals with grouped thousands, e.g. `1234.5` -> `1,234.50`.
    /// Non-finite input is shown as zero.
    pub fn format(&self, amount: f64) -> String {
        let text = round_half_away(amount, self.decimal_places);
        let (integral, fraction) = match text.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (text.as_str(), None),
        };

        let mut out = group_thousands(integral, &self.thousands_separator);
        if let Some(fraction) = fraction {
            out.push_str(&self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

/// Format an amount with the default two-decimal, comma-grouped layout
pub fn format_amount(amount: f64) -> String {
    AmountFormatter::default().format(amount)
}

/// `"{MonthAbbrev} {Day}, {Year}"`, e.g. `Jan 5, 2024`.
/// Unparseable input yields `Invalid date` rather than an error.
pub fn format_date(iso: &str) -> String {
    use chrono::Datelike;

    match parse_timestamp(iso) {
        Some(ts) => format!("{} {}, {}", MONTHS[ts.month0() as usize], ts.day(), ts.year()),
        None => "Invalid date".to_string(),
    }
}

/// Badge text for the balance card: `+12.5% this month ↑`.
/// Returns `None` when there is no change to show.
pub fn format_monthly_change(change: &MonthlyChange) -> Option<String> {
    let direction = change.direction()?;
    let percentage = round_half_away(change.percentage, 1);
    let (sign, arrow) = match direction {
        ChangeDirection::Up => ("+", "↑"),
        ChangeDirection::Down => ("", "↓"),
    };
    Some(format!("{}{}% this month {}", sign, percentage, arrow))
}

/// Round half away from zero and render with exactly `decimal_places`.
/// Values beyond `Decimal`'s range go through float formatting instead.
fn round_half_away(value: f64, decimal_places: u32) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let Some(decimal) = Decimal::from_f64(value) else {
        return format!("{:.*}", decimal_places as usize, value);
    };

    let mut rounded =
        decimal.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimal_places);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(-2500.0), "-2,500.00");
    }

    #[test]
    fn test_format_amount_edge_values() {
        assert_eq!(format_amount(f64::NAN), "0.00");
        assert_eq!(format_amount(f64::INFINITY), "0.00");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_format_amount_beyond_decimal_range() {
        let huge = format_amount(1e30);
        assert!(huge.starts_with("1,000,000,000,000,000,0"), "{}", huge);
        assert!(huge.ends_with(".00"), "{}", huge);
        assert!(format_amount(-1e30).starts_with("-1,000,"));
    }

    #[test]
    fn test_formatter_from_config() {
        let config = CurrencyConfig {
            label: "EUR".to_string(),
            decimal_places: 3,
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        };
        let formatter = AmountFormatter::from(&config);
        assert_eq!(formatter.format(1234567.5), "1.234.567,500");

        let whole = AmountFormatter::from(&CurrencyConfig {
            decimal_places: 0,
            ..CurrencyConfig::default()
        });
        assert_eq!(whole.format(1234.5), "1,235");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-05T10:00:00.000Z"), "Jan 5, 2024");
        assert_eq!(format_date("2023-12-31"), "Dec 31, 2023");
        assert_eq!(format_date("not a date"), "Invalid date");
        assert_eq!(format_date(""), "Invalid date");
    }

    #[test]
    fn test_format_monthly_change() {
        let up = MonthlyChange::new(50.0);
        assert_eq!(format_monthly_change(&up).as_deref(), Some("+50.0% this month ↑"));

        let down = MonthlyChange::new(-12.345);
        assert_eq!(format_monthly_change(&down).as_deref(), Some("-12.3% this month ↓"));

        assert_eq!(format_monthly_change(&MonthlyChange::none()), None);
    }
}
