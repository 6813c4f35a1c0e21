// src/services/gemini.rs
use anyhow::{anyhow, bail, Context};
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::config::GeminiConfig;
use crate::models::LoanOffer;

const OFFER_TEMPERATURE: f64 = 0.8;
pub const EMPTY_INSIGHT_MESSAGE: &str = "Could not generate insight at this time.";

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    MissingApiKey,
    Offers,
    Insight,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerationError::MissingApiKey => write!(f, "API key environment variable not set."),
            GenerationError::Offers => write!(f, "Failed to generate loan offers."),
            GenerationError::Insight => write!(f, "Failed to generate insight."),
        }
    }
}

impl std::error::Error for GenerationError {}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn offer_prompt(amount: f64, term_in_months: u32) -> String {
    format!(
        "Proszę wygeneruj 3 fikcyjne, unikalne oferty kredytu gotówkowego w Polsce na kwotę {} PLN \
na okres {} miesięcy. Zwróć uwagę na realistyczne dane. Uwzględnij różne banki, nazwy ofert, \
RRSO (Rzeczywista Roczna Stopa Oprocentowania), prowizję i wyliczoną miesięczną ratę. \
Format odpowiedzi musi być JSON.",
        amount, term_in_months
    )
}

fn offer_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "bankName": { "type": "STRING", "description": "Nazwa banku (np. \"Bank Innowacji\", \"Cyber Bank\")" },
                "offerName": { "type": "STRING", "description": "Chwytliwa nazwa oferty (np. \"Kredyt na start\", \"Zielona Pożyczka\")" },
                "apr": { "type": "NUMBER", "description": "Rzeczywista Roczna Stopa Oprocentowania (RRSO), np. 10.5" },
                "commission": { "type": "NUMBER", "description": "Prowizja za udzielenie kredytu w procentach, np. 2.0" },
                "monthlyPayment": { "type": "NUMBER", "description": "Obliczona dokładna miesięczna rata kredytu" }
            },
            "required": ["bankName", "offerName", "apr", "commission", "monthlyPayment"]
        }
    })
}

fn insight_prompt(context: &str, data: &Value) -> String {
    format!(
        "As a professional financial advisor, analyze these {} numbers and provide 3-4 concise, \
actionable insights or warnings.\nData: {}\nKeep the tone professional, encouraging, and clear. \
Use markdown for formatting.",
        context, data
    )
}

/// Parses the model's text as a JSON array of offers. The text must be bracket-delimited.
pub fn parse_offers(text: &str) -> anyhow::Result<Vec<LoanOffer>> {
    let text = text.trim();
    if !text.starts_with('[') || !text.ends_with(']') {
        bail!("Invalid JSON array format received from API");
    }

    let value: Value = serde_json::from_str(text).context("Response is not valid JSON")?;
    if !value.is_array() {
        bail!("API did not return an array of offers");
    }

    serde_json::from_value(value).context("Offer objects do not match the expected shape")
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let api_key = config.api_key.clone().ok_or(GenerationError::MissingApiKey)?;
        Ok(GeminiClient {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn generate(&self, prompt: &str, generation_config: Option<GenerationConfig>) -> anyhow::Result<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        debug!("Calling Gemini model {}", self.model);

        let body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini returned {}: {}", status, error_text));
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }

    /// Asks the model for fabricated cash-loan offers. Single attempt.
    pub async fn generate_loan_offers(&self, amount: f64, term_in_months: u32) -> Result<Vec<LoanOffer>, GenerationError> {
        info!("Requesting loan offers for {} PLN over {} months", amount, term_in_months);

        let config = GenerationConfig {
            response_mime_type: Some("application/json"),
            response_schema: Some(offer_schema()),
            temperature: Some(OFFER_TEMPERATURE),
        };

        let result = match self.generate(&offer_prompt(amount, term_in_months), Some(config)).await {
            Ok(text) => parse_offers(&text),
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            error!("Error fetching or parsing loan offers from Gemini API: {:#}", e);
            GenerationError::Offers
        })
    }

    /// Free-text advisor commentary on a calculator's numbers.
    pub async fn generate_insight(&self, context: &str, data: &Value) -> Result<String, GenerationError> {
        info!("Requesting insight for {}", context);

        match self.generate(&insight_prompt(context, data), None).await {
            Ok(text) if text.trim().is_empty() => Ok(EMPTY_INSIGHT_MESSAGE.to_string()),
            Ok(text) => Ok(text),
            Err(e) => {
                error!("Gemini insight error: {:#}", e);
                Err(GenerationError::Insight)
            }
        }
    }
}
