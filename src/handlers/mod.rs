pub mod calculators;
pub mod currency;
pub mod error;
pub mod insight;
pub mod loan_screen;
