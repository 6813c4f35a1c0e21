// src/bin/test_gemini.rs
use cashmaker::config::AppConfig;
use cashmaker::services::gemini::GeminiClient;
use dotenv::dotenv;
use serde_json::json;

#[tokio::main]
async fn main() -> std::result::Result<(), cashmaker::BoxError> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();
    let gemini = GeminiClient::new(&config.gemini)?;

    let offers = gemini.generate_loan_offers(50_000.0, 60).await?;
    for offer in &offers {
        println!(
            "{:<20} {:<25} RRSO {:>5.2}%  fee {:>4.2}%  {:>9.2} PLN/month",
            offer.bank_name, offer.offer_name, offer.apr, offer.commission, offer.monthly_payment
        );
    }

    let insight = gemini
        .generate_insight("loan", &json!({ "amount": 50_000, "termMonths": 60, "offers": offers }))
        .await?;
    println!("\n{}", insight);
    Ok(())
}
