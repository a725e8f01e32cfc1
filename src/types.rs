use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for a mortgage
pub type LoanId = Uuid;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// balance remaining (or schedule not yet computed)
    Outstanding,
    /// balance settled within one cent
    PaidOff,
}

/// static parameters of a fixed-rate loan, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_amount: Money,
    pub term_months: u32,
    pub annual_rate: Rate,
    /// one entry per month of the term
    pub extra_payments: Vec<Money>,
}

impl LoanTerms {
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate.monthly_rate()
    }

    /// extra principal offered for a month, zero outside the term
    pub fn extra_payment(&self, month: u32) -> Money {
        self.extra_payments
            .get(month as usize)
            .copied()
            .unwrap_or(Money::ZERO)
    }

    pub fn has_extra_payments(&self) -> bool {
        self.extra_payments.iter().any(|p| !p.is_zero())
    }
}
