//! Currency-tagged price and parsing of provider price strings

use serde::{Deserialize, Serialize};

/// A monetary amount tagged with an ISO 4217 currency code
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Price {
    pub amount: f64,
    /// Upper-case currency code ("USD", "KRW", ...)
    pub currency: String,
}

impl Price {
    #[must_use]
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into().to_uppercase(),
        }
    }

    /// Parse a display price such as `"$1,234"` or `"₩ 123,000"`.
    ///
    /// The first run of digits (with `,` thousands separators and an optional
    /// decimal point) is the amount. The currency comes from the symbol when
    /// one is present, otherwise `default_currency` is used.
    #[must_use]
    pub fn parse(raw: &str, default_currency: &str) -> Option<Self> {
        let amount = first_number(raw)?;
        if !amount.is_finite() {
            return None;
        }
        let currency = currency_from_symbol(raw).unwrap_or(default_currency);
        Some(Self::new(amount, currency))
    }

    #[must_use]
    pub fn same_currency(&self, other: &Price) -> bool {
        self.currency == other.currency
    }

    /// Format with thousands separators, e.g. `KRW 1,234,000` or `USD 95.50`
    #[must_use]
    pub fn format(&self) -> String {
        format!("{} {}", self.currency, format_amount(self.amount))
    }
}

fn currency_from_symbol(raw: &str) -> Option<&'static str> {
    if raw.contains('₩') {
        Some("KRW")
    } else if raw.contains('€') {
        Some("EUR")
    } else if raw.contains('£') {
        Some("GBP")
    } else if raw.contains('¥') {
        Some("JPY")
    } else if raw.contains('$') {
        Some("USD")
    } else {
        None
    }
}

fn first_number(raw: &str) -> Option<f64> {
    let mut run = String::new();
    for ch in raw.chars() {
        if ch.is_ascii_digit() || ch == ',' || ch == '.' {
            run.push(ch);
            continue;
        }
        if run.chars().any(|c| c.is_ascii_digit()) {
            break;
        }
        run.clear();
    }

    if !run.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    run.retain(|c| c != ',');
    run.trim_end_matches('.').parse().ok()
}

fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let whole = rounded.trunc() as i64;
    let cents = ((rounded.fract()).abs() * 100.0).round() as i64;

    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        grouped.insert(0, '-');
    }

    if cents == 0 {
        grouped
    } else {
        format!("{grouped}.{cents:02}")
    }
}
