// src/models.rs
use serde::{Serialize, Deserialize};
use std::collections::HashMap;

/// A single fabricated loan offer returned by the AI requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanOffer {
    pub bank_name: String,
    pub offer_name: String,
    pub apr: f64,
    pub commission: f64,
    pub monthly_payment: f64,
}

/// The loan form as it is kept in the storage slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanCalculatorState {
    pub loan_amount: f64,
    pub loan_term: u32,
    pub interest_rate: f64,
    pub loan_offers: Vec<LoanOffer>,
}

impl Default for LoanCalculatorState {
    fn default() -> Self {
        LoanCalculatorState {
            loan_amount: 50_000.0,
            loan_term: 60,
            interest_rate: 8.5,
            loan_offers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub balance: f64,
    pub cumulative_contributions: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub rates: HashMap<String, f64>,
    pub base_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: Option<f64>,
    pub converted: f64,
}

#[derive(Debug, Deserialize)]
pub struct CompoundRequest {
    pub principal: f64,
    pub annual_rate: f64,
    pub monthly_contribution: f64,
    pub years: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    pub amount: f64,
    pub annual_rate: f64,
    #[serde(default)]
    pub term_months: Option<u32>,
    #[serde(default)]
    pub term_years: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SavingsRequest {
    pub target: f64,
    pub current: f64,
    pub years: u32,
    pub annual_rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    pub context: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}
