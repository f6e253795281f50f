//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal, plus lenient parsing of amounts written by people
//! on claim forms ("$10,000", "12 500.00 EUR", "approx. 3,000").

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
    INR,
    AUD,
    CAD,
    SGD,
    HKD,
}

/// Symbols that carry a country prefix must be matched before the bare `$`.
const PREFIXED_DOLLARS: &[(&str, Currency)] = &[
    ("HK$", Currency::HKD),
    ("A$", Currency::AUD),
    ("C$", Currency::CAD),
    ("S$", Currency::SGD),
];

const SINGLE_SYMBOLS: &[(&str, Currency)] = &[
    ("€", Currency::EUR),
    ("£", Currency::GBP),
    ("¥", Currency::JPY),
    ("₹", Currency::INR),
    ("$", Currency::USD),
];

impl Currency {
    /// All supported currencies
    pub const ALL: [Currency; 10] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::INR,
        Currency::AUD,
        Currency::CAD,
        Currency::SGD,
        Currency::HKD,
    ];

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CHF => "CHF",
            Currency::INR => "₹",
            Currency::AUD => "A$",
            Currency::CAD => "C$",
            Currency::SGD => "S$",
            Currency::HKD => "HK$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::INR => "INR",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::SGD => "SGD",
            Currency::HKD => "HKD",
        }
    }

    /// Looks up a currency by its ISO 4217 code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Currency> {
        let code = code.trim();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    /// Detects an explicit currency marker in free text
    ///
    /// ISO codes are matched as whole words; symbols anywhere in the text.
    /// Returns `None` when the text carries no currency marker at all.
    pub fn detect(text: &str) -> Option<Currency> {
        let by_code = text
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|word| word.len() == 3)
            .find_map(Currency::from_code);
        if by_code.is_some() {
            return by_code;
        }

        PREFIXED_DOLLARS
            .iter()
            .chain(SINGLE_SYMBOLS.iter())
            .find(|(symbol, _)| text.contains(symbol))
            .map(|(_, currency)| *currency)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| MoneyError::UnknownCurrency(s.to_string()))
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Ambiguous amount, found {count} figures in '{text}'")]
    AmbiguousAmount { text: String, count: usize },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("amount pattern is a valid regex")
});

// Matched against the text right after a figure: "30k", "1.2 million", "2 lakh".
static MAGNITUDE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:k|m|mm|mn|b|bn|grand|thousands?|millions?|billions?|lakhs?|lacs?|crores?)\b")
        .expect("magnitude pattern is a valid regex")
});

/// A monetary amount with associated currency
///
/// Amounts are stored with 4 decimal places internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Parses an amount as written on a form
    ///
    /// Currency symbols, ISO codes, surrounding words and thousands
    /// separators are ignored. The text must contain exactly one figure:
    /// ranges such as "$20,000-$25,000" are rejected rather than guessed,
    /// as are magnitude words ("$30k", "1.2 million") and a leading minus.
    /// An explicit currency marker that differs from `expected` is a
    /// mismatch; text without a marker is taken to be in `expected`.
    ///
    /// # Errors
    ///
    /// * `MoneyError::CurrencyMismatch` - the text names another currency
    /// * `MoneyError::AmbiguousAmount` - more than one figure present
    /// * `MoneyError::InvalidAmount` - no figure, a scaled figure, or a negative one
    pub fn parse_lenient(text: &str, expected: Currency) -> Result<Money, MoneyError> {
        if let Some(found) = Currency::detect(text) {
            if found != expected {
                return Err(MoneyError::CurrencyMismatch(
                    found.to_string(),
                    expected.to_string(),
                ));
            }
        }

        let figures: Vec<regex::Match<'_>> = AMOUNT_PATTERN.find_iter(text).collect();

        match figures.as_slice() {
            [] => Err(MoneyError::InvalidAmount(format!(
                "no figure in '{}'",
                text.trim()
            ))),
            [figure] => {
                if let Some(suffix) = MAGNITUDE_SUFFIX.find(&text[figure.end()..]) {
                    return Err(MoneyError::InvalidAmount(format!(
                        "scaled figure '{}{}'",
                        figure.as_str(),
                        suffix.as_str()
                    )));
                }
                let sign = text[..figure.start()]
                    .trim_end_matches(|c: char| c.is_whitespace() || c.is_ascii_uppercase() || "$€£¥₹".contains(c));
                if sign.ends_with('-') || sign.ends_with('−') {
                    return Err(MoneyError::InvalidAmount(format!(
                        "negative figure in '{}'",
                        text.trim()
                    )));
                }
                let cleaned = figure.as_str().trim_end_matches(',').replace(',', "");
                let amount = Decimal::from_str(&cleaned)
                    .map_err(|e| MoneyError::InvalidAmount(format!("{}: {}", cleaned, e)))?;
                Ok(Money::new(amount, expected))
            }
            many => Err(MoneyError::AmbiguousAmount {
                text: text.trim().to_string(),
                count: many.len(),
            }),
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly below `limit`
    pub fn is_below(&self, limit: Decimal) -> bool {
        self.amount < limit
    }

}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_parse_dollar_amount_with_separators() {
        let m = Money::parse_lenient("$10,000", Currency::USD).unwrap();
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_parse_trailing_code() {
        let m = Money::parse_lenient("5000 USD", Currency::USD).unwrap();
        assert_eq!(m.amount(), dec!(5000));
    }

    #[test]
    fn test_parse_with_cents_and_prose() {
        let m = Money::parse_lenient("approx. $24,999.99 (rear bumper)", Currency::USD).unwrap();
        assert_eq!(m.amount(), dec!(24999.99));
    }

    #[test]
    fn test_parse_rejects_range() {
        let result = Money::parse_lenient("$20,000-$25,000", Currency::USD);
        assert!(matches!(result, Err(MoneyError::AmbiguousAmount { count: 2, .. })));
    }

    #[test]
    fn test_parse_rejects_foreign_currency() {
        let result = Money::parse_lenient("€12,000", Currency::USD);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_parse_rejects_text_without_figure() {
        let result = Money::parse_lenient("to be assessed", Currency::USD);
        assert!(matches!(result, Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_detect_prefixed_dollar() {
        assert_eq!(Currency::detect("HK$ 3,000"), Some(Currency::HKD));
        assert_eq!(Currency::detect("A$900"), Some(Currency::AUD));
        assert_eq!(Currency::detect("$900"), Some(Currency::USD));
        assert_eq!(Currency::detect("900"), None);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::EUR);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn test_is_below_is_strict() {
        let at = Money::new(dec!(25000), Currency::USD);
        let under = Money::new(dec!(24999.99), Currency::USD);
        assert!(!at.is_below(dec!(25000)));
        assert!(under.is_below(dec!(25000)));
    }

    #[test]
    fn test_display_uses_symbol() {
        let m = Money::new(dec!(5000), Currency::USD);
        assert_eq!(m.to_string(), "$ 5000.00");
    }
}
