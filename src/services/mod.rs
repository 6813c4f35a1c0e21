pub mod calculations;
pub mod exchange;
pub mod gemini;
pub mod loan_state;
pub mod storage;
