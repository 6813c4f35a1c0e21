// src/handlers/currency.rs
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;
use log::{error, info};
use serde::Deserialize;
use crate::context::AppContext;
use crate::handlers::error::ApiError;
use crate::services::exchange::{convert, fetch_exchange_rates, is_supported, swap, SUPPORTED_CURRENCIES};

#[derive(Debug, Default, Deserialize)]
pub struct ConversionQuery {
    #[serde(default)]
    pub swap: bool,
}

pub async fn get_conversion(
    from: String,
    to: String,
    amount: f64,
    query: ConversionQuery,
    ctx: Arc<AppContext>,
) -> Result<Json, Rejection> {
    let (from, to) = if query.swap {
        let (from, to) = swap(&from, &to);
        (from.to_string(), to.to_string())
    } else {
        (from, to)
    };
    info!("Handling conversion of {} {} to {}", amount, from, to);

    if !amount.is_finite() {
        return Err(warp::reject::custom(ApiError::bad_request("Amount must be a finite number")));
    }

    for code in [&from, &to] {
        if !is_supported(code) {
            return Err(warp::reject::custom(ApiError::bad_request(format!("Unsupported currency: {}", code))));
        }
    }

    let rates = fetch_exchange_rates(&ctx.http, &ctx.config.exchange_rates_url, &from)
        .await
        .map_err(|e| {
            error!("Failed to fetch rates: {:#}", e);
            warp::reject::custom(ApiError::external_error("Failed to fetch exchange rates."))
        })?;

    Ok(warp::reply::json(&convert(amount, &rates, &to)))
}

pub async fn get_currencies() -> Result<Json, Rejection> {
    Ok(warp::reply::json(&SUPPORTED_CURRENCIES))
}
