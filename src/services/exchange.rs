// src/services/exchange.rs
use anyhow::Result;
use log::{info, warn};
use reqwest::Client;

use crate::models::{Conversion, ExchangeRates};

pub const SUPPORTED_CURRENCIES: [&str; 9] = ["USD", "EUR", "GBP", "JPY", "PLN", "CHF", "CAD", "AUD", "CNY"];

/// Fetch the latest rates for `base` from an open.er-api style endpoint
pub async fn fetch_exchange_rates(client: &Client, base_url: &str, base: &str) -> Result<ExchangeRates> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), base.to_uppercase());
    info!("Fetching exchange rates from URL: {}", url);

    let rates = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<ExchangeRates>()
        .await?;

    info!("Found {} rates for base {}", rates.rates.len(), rates.base_code);
    Ok(rates)
}

/// Converts with the fetched table; an unknown target converts to 0.
pub fn convert(amount: f64, rates: &ExchangeRates, to: &str) -> Conversion {
    let to = to.to_uppercase();
    let rate = rates.rates.get(&to).copied().filter(|r| *r != 0.0);
    if rate.is_none() {
        warn!("No rate for {} in {} table", to, rates.base_code);
    }

    Conversion {
        amount,
        from: rates.base_code.clone(),
        to,
        rate,
        converted: rate.map(|r| amount * r).unwrap_or(0.0),
    }
}

pub fn swap<'a>(from: &'a str, to: &'a str) -> (&'a str, &'a str) {
    (to, from)
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_CURRENCIES.iter().any(|c| c.eq_ignore_ascii_case(code))
}
