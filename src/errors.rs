use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MortgageError {
    #[error("invalid input: number of extra payments must equal the loan term, expected {expected} but got {actual}")]
    InvalidInput {
        expected: u32,
        actual: usize,
    },

    #[error("invalid term: a loan must run for at least one month")]
    InvalidTerm,

    #[error("month {month} is outside the loan term of {term_months} months")]
    MonthOutOfRange {
        month: u32,
        term_months: u32,
    },

    #[error("invalid extra payment amount: {amount}")]
    InvalidExtraPayment {
        amount: Money,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MortgageError>;
