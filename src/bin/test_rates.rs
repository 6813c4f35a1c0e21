// src/bin/test_rates.rs
use cashmaker::config::AppConfig;
use cashmaker::services::exchange::{convert, fetch_exchange_rates};
use dotenv::dotenv;
use reqwest::Client;

#[tokio::main]
async fn main() -> std::result::Result<(), cashmaker::BoxError> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();
    let rates = fetch_exchange_rates(&Client::new(), &config.exchange_rates_url, "USD").await?;

    println!("Base:          {}", rates.base_code);
    println!("100 USD -> EUR {:?}", convert(100.0, &rates, "EUR"));
    println!("100 USD -> PLN {:?}", convert(100.0, &rates, "PLN"));
    Ok(())
}
