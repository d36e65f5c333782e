//! Fixed exchange-rate table used to put a flight and a hotel in one currency

use std::collections::HashMap;

use crate::config::ExchangeConfig;
use crate::models::Price;
use crate::{FarescanError, Result};

#[derive(Debug, Clone, Default)]
pub struct ExchangeRates {
    rates: HashMap<(String, String), f64>,
}

impl ExchangeRates {
    /// Build from `"FROM/TO" = rate` pairs; malformed keys are ignored
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let rates = pairs
            .into_iter()
            .filter_map(|(pair, rate)| {
                let (from, to) = pair.split_once('/')?;
                Some((
                    (from.trim().to_uppercase(), to.trim().to_uppercase()),
                    rate,
                ))
            })
            .collect();
        Self { rates }
    }

    #[must_use]
    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.rates.iter().map(|(pair, rate)| (pair.as_str(), *rate)))
    }

    /// Express `price` in `currency`, using the direct rate or the inverse of the reverse rate
    pub fn convert(&self, price: &Price, currency: &str) -> Result<Price> {
        let target = currency.to_uppercase();
        if price.currency == target {
            return Ok(price.clone());
        }

        if let Some(rate) = self.rates.get(&(price.currency.clone(), target.clone())) {
            return Ok(Price::new(price.amount * rate, target));
        }
        if let Some(rate) = self.rates.get(&(target.clone(), price.currency.clone())) {
            return Ok(Price::new(price.amount / rate, target));
        }

        Err(FarescanError::validation(format!(
            "no exchange rate configured from {} to {target}",
            price.currency
        )))
    }
}
