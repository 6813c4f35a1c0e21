// src/services/loan_state.rs
use serde::{Deserialize, Serialize};
use log::{debug, info, warn};
use crate::models::{LoanCalculatorState, LoanOffer};
use crate::services::calculations::calculate_loan_payment;

pub const MIN_LOAN_AMOUNT: f64 = 1_000.0;
pub const MAX_LOAN_AMOUNT: f64 = 1_000_000.0;
pub const MIN_LOAN_TERM: u32 = 1;
pub const MAX_LOAN_TERM: u32 = 360;
pub const MIN_INTEREST_RATE: f64 = 0.1;
pub const MAX_INTEREST_RATE: f64 = 50.0;

pub const OFFER_FAILURE_MESSAGE: &str = "Could not generate loan offers. Please try again later.";

/// One field edit coming from the loan form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LoanEdit {
    LoanAmount(f64),
    LoanTerm(u32),
    InterestRate(f64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    pub amount: Option<String>,
    pub term: Option<String>,
    pub rate: Option<String>,
}

impl ValidationErrors {
    pub fn is_valid(&self) -> bool {
        self.amount.is_none() && self.term.is_none() && self.rate.is_none()
    }

    pub fn messages(&self) -> Vec<String> {
        [&self.amount, &self.term, &self.rate]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

pub fn validate(state: &LoanCalculatorState) -> ValidationErrors {
    let amount = if state.loan_amount < MIN_LOAN_AMOUNT {
        Some("Minimum loan amount is 1 000 PLN".to_string())
    } else if state.loan_amount > MAX_LOAN_AMOUNT {
        Some("Maximum loan amount is 1 000 000 PLN".to_string())
    } else {
        None
    };

    let term = if state.loan_term < MIN_LOAN_TERM {
        Some("Minimum loan term is 1 month".to_string())
    } else if state.loan_term > MAX_LOAN_TERM {
        Some("Maximum loan term is 360 months (30 years)".to_string())
    } else {
        None
    };

    let rate = if state.interest_rate < MIN_INTEREST_RATE {
        Some("Minimum interest rate is 0.1%".to_string())
    } else if state.interest_rate > MAX_INTEREST_RATE {
        Some("Maximum interest rate is 50%".to_string())
    } else {
        None
    };

    ValidationErrors { amount, term, rate }
}

/// Applies a single field edit. Out-of-range values are kept; validation reports them.
pub fn apply_edit(state: &LoanCalculatorState, edit: &LoanEdit) -> LoanCalculatorState {
    let mut next = state.clone();
    match *edit {
        LoanEdit::LoanAmount(value) => next.loan_amount = value,
        LoanEdit::LoanTerm(value) => next.loan_term = value,
        LoanEdit::InterestRate(value) => next.interest_rate = value,
    }
    next
}

/// Monthly payment for the current form values, if the annuity is computable.
pub fn monthly_payment(state: &LoanCalculatorState) -> Option<f64> {
    calculate_loan_payment(state.loan_amount, state.interest_rate, state.loan_term)
        .map(|p| p.monthly_payment)
        .ok()
}

pub fn min_apr(offers: &[LoanOffer]) -> Option<f64> {
    offers.iter().map(|o| o.apr).reduce(f64::min)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenStatus {
    Idle,
    Validating,
    Generating,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionError {
    InvalidInput(Vec<String>),
    AlreadyGenerating,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TransitionError::InvalidInput(messages) => write!(f, "Invalid loan parameters: {}", messages.join("; ")),
            TransitionError::AlreadyGenerating => write!(f, "Loan offers are already being generated"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// The loan calculator screen: form record plus request status.
///
/// Every method is a pure transition; persisting `state` afterwards is the caller's job.
#[derive(Debug, Clone)]
pub struct LoanScreen {
    pub state: LoanCalculatorState,
    pub status: ScreenStatus,
    pub error: Option<String>,
    pub has_saved_state: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanScreenSnapshot {
    pub state: LoanCalculatorState,
    pub status: ScreenStatus,
    pub error: Option<String>,
    pub validation: ValidationErrors,
    pub is_input_valid: bool,
    pub monthly_payment: Option<f64>,
    pub min_apr: Option<f64>,
    pub has_saved_state: bool,
}

impl LoanScreen {
    pub fn new(has_saved_state: bool) -> Self {
        LoanScreen {
            state: LoanCalculatorState::default(),
            status: ScreenStatus::Idle,
            error: None,
            has_saved_state,
        }
    }

    fn input_status(&self) -> ScreenStatus {
        if validate(&self.state).is_valid() {
            ScreenStatus::Idle
        } else {
            ScreenStatus::Validating
        }
    }

    pub fn edit(&mut self, edit: &LoanEdit) {
        debug!("Applying loan edit: {:?}", edit);
        self.state = apply_edit(&self.state, edit);
        if matches!(self.status, ScreenStatus::Idle | ScreenStatus::Validating) {
            self.status = self.input_status();
        }
    }

    /// Moves to `Generating` and returns the (amount, term) to request offers for.
    pub fn begin_generation(&mut self) -> Result<(f64, u32), TransitionError> {
        if self.status == ScreenStatus::Generating {
            warn!("Offer generation requested while one is in flight");
            return Err(TransitionError::AlreadyGenerating);
        }

        let validation = validate(&self.state);
        if !validation.is_valid() {
            return Err(TransitionError::InvalidInput(validation.messages()));
        }

        self.status = ScreenStatus::Generating;
        self.error = None;
        self.state.loan_offers.clear();
        Ok((self.state.loan_amount, self.state.loan_term))
    }

    pub fn finish_generation<E: std::fmt::Display>(&mut self, result: Result<Vec<LoanOffer>, E>) {
        match result {
            Ok(offers) => {
                info!("Received {} loan offers", offers.len());
                self.state.loan_offers = offers;
                self.status = self.input_status();
            }
            Err(e) => {
                warn!("Loan offer generation failed: {}", e);
                self.error = Some(OFFER_FAILURE_MESSAGE.to_string());
                self.status = ScreenStatus::Error;
            }
        }
    }

    /// Replaces the form with a previously persisted record, if any.
    pub fn restore(&mut self, saved: Option<LoanCalculatorState>) -> bool {
        match saved {
            Some(state) => {
                self.state = state;
                if self.status != ScreenStatus::Generating {
                    self.status = self.input_status();
                    self.error = None;
                }
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> LoanScreenSnapshot {
        let validation = validate(&self.state);
        LoanScreenSnapshot {
            state: self.state.clone(),
            status: self.status,
            error: self.error.clone(),
            is_input_valid: validation.is_valid(),
            validation,
            monthly_payment: monthly_payment(&self.state),
            min_apr: min_apr(&self.state.loan_offers),
            has_saved_state: self.has_saved_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(bank: &str, apr: f64) -> LoanOffer {
        LoanOffer {
            bank_name: bank.to_string(),
            offer_name: "Kredyt na start".to_string(),
            apr,
            commission: 2.0,
            monthly_payment: 1_050.0,
        }
    }

    #[test]
    fn defaults_are_valid() {
        let state = LoanCalculatorState::default();
        assert_eq!(state.loan_amount, 50_000.0);
        assert_eq!(state.loan_term, 60);
        assert_eq!(state.interest_rate, 8.5);
        assert!(state.loan_offers.is_empty());
        assert!(validate(&state).is_valid());
    }

    #[test]
    fn out_of_range_values_are_reported_not_rejected() {
        let state = apply_edit(&LoanCalculatorState::default(), &LoanEdit::LoanAmount(500.0));
        assert_eq!(state.loan_amount, 500.0);

        let state = apply_edit(&state, &LoanEdit::LoanTerm(361));
        let state = apply_edit(&state, &LoanEdit::InterestRate(0.05));
        let errors = validate(&state);
        assert!(errors.amount.is_some());
        assert!(errors.term.is_some());
        assert!(errors.rate.is_some());
        assert_eq!(errors.messages().len(), 3);

        let state = apply_edit(&state, &LoanEdit::LoanAmount(2_000_000.0));
        assert_eq!(validate(&state).amount.as_deref(), Some("Maximum loan amount is 1 000 000 PLN"));
    }

    #[test]
    fn edit_deserializes_from_tagged_json() {
        let edit: LoanEdit = serde_json::from_str(r#"{"field":"loanTerm","value":120}"#).unwrap();
        assert_eq!(edit, LoanEdit::LoanTerm(120));
    }

    #[test]
    fn min_apr_is_absent_without_offers() {
        assert_eq!(min_apr(&[]), None);
        assert_eq!(min_apr(&[offer("A", 12.4), offer("B", 9.9), offer("C", 10.1)]), Some(9.9));
    }

    #[test]
    fn editing_toggles_between_idle_and_validating() {
        let mut screen = LoanScreen::new(false);
        screen.edit(&LoanEdit::LoanAmount(10.0));
        assert_eq!(screen.status, ScreenStatus::Validating);
        assert!(matches!(screen.begin_generation(), Err(TransitionError::InvalidInput(_))));

        screen.edit(&LoanEdit::LoanAmount(10_000.0));
        assert_eq!(screen.status, ScreenStatus::Idle);
    }

    #[test]
    fn generation_success_populates_offers() {
        let mut screen = LoanScreen::new(false);
        screen.state.loan_offers = vec![offer("Old", 20.0)];

        let (amount, term) = screen.begin_generation().unwrap();
        assert_eq!((amount, term), (50_000.0, 60));
        assert_eq!(screen.status, ScreenStatus::Generating);
        assert!(screen.state.loan_offers.is_empty());
        assert_eq!(screen.begin_generation(), Err(TransitionError::AlreadyGenerating));

        // Edits during generation keep the status.
        screen.edit(&LoanEdit::LoanAmount(10.0));
        assert_eq!(screen.status, ScreenStatus::Generating);
        screen.edit(&LoanEdit::LoanAmount(60_000.0));

        screen.finish_generation::<String>(Ok(vec![offer("A", 11.0), offer("B", 9.5)]));
        assert_eq!(screen.status, ScreenStatus::Idle);
        assert_eq!(screen.state.loan_offers.len(), 2);
        assert_eq!(screen.snapshot().min_apr, Some(9.5));
    }

    #[test]
    fn generation_failure_then_retry() {
        let mut screen = LoanScreen::new(false);
        screen.begin_generation().unwrap();
        screen.finish_generation::<&str>(Err("boom"));
        assert_eq!(screen.status, ScreenStatus::Error);
        assert_eq!(screen.error.as_deref(), Some(OFFER_FAILURE_MESSAGE));
        assert!(screen.state.loan_offers.is_empty());

        screen.edit(&LoanEdit::LoanTerm(24));
        assert_eq!(screen.status, ScreenStatus::Error);

        screen.begin_generation().unwrap();
        assert_eq!(screen.status, ScreenStatus::Generating);
        assert_eq!(screen.error, None);
    }

    #[test]
    fn restore_replaces_form_fields() {
        let mut screen = LoanScreen::new(true);
        let saved = LoanCalculatorState {
            loan_amount: 120_000.0,
            loan_term: 84,
            interest_rate: 7.2,
            loan_offers: vec![offer("A", 8.0)],
        };
        assert!(screen.restore(Some(saved.clone())));
        assert_eq!(screen.state, saved);
        assert!(!screen.restore(None));
        assert_eq!(screen.state, saved);
    }

    #[test]
    fn restore_after_failure_clears_error() {
        let mut screen = LoanScreen::new(true);
        screen.begin_generation().unwrap();
        screen.finish_generation::<&str>(Err("boom"));
        assert_eq!(screen.status, ScreenStatus::Error);

        assert!(screen.restore(Some(LoanCalculatorState::default())));
        assert_eq!(screen.status, ScreenStatus::Idle);
        assert_eq!(screen.error, None);
        assert_eq!(screen.snapshot().error, None);
    }

    #[test]
    fn snapshot_reports_monthly_payment() {
        let screen = LoanScreen::new(false);
        let snapshot = screen.snapshot();
        let expected = calculate_loan_payment(50_000.0, 8.5, 60).unwrap().monthly_payment;
        assert_eq!(snapshot.monthly_payment, Some(expected));
        assert!(snapshot.is_input_valid);
        assert_eq!(snapshot.min_apr, None);
    }
}
