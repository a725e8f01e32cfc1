use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{MortgageError, Result};

/// per-month extra principal the borrower elects to pay
///
/// Holds exactly one amount per month of the term. Amounts are what the
/// borrower offers; the amortization pass clamps them to the balance left
/// after the scheduled payment and discards any surplus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPaymentPlan {
    payments: Vec<Money>,
}

impl ExtraPaymentPlan {
    /// no extra payments
    pub fn none(term_months: u32) -> Self {
        Self {
            payments: vec![Money::ZERO; term_months as usize],
        }
    }

    /// the same extra amount every month
    pub fn recurring(term_months: u32, amount: Money) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            payments: vec![amount; term_months as usize],
        })
    }

    /// a single extra payment in one month
    pub fn lump_sum(term_months: u32, month: u32, amount: Money) -> Result<Self> {
        let mut plan = Self::none(term_months);
        plan.add_lump_sum(month, amount)?;
        Ok(plan)
    }

    /// wrap an explicit sequence, taken as-is
    pub fn from_vec(payments: Vec<Money>) -> Self {
        Self { payments }
    }

    /// add `amount` to every month in `from_month..to_month`
    pub fn add_recurring(&mut self, amount: Money, from_month: u32, to_month: u32) -> Result<&mut Self> {
        validate_amount(amount)?;
        self.check_month(from_month)?;
        if to_month as usize > self.payments.len() || to_month < from_month {
            return Err(MortgageError::MonthOutOfRange {
                month: to_month,
                term_months: self.term_months(),
            });
        }

        for payment in &mut self.payments[from_month as usize..to_month as usize] {
            *payment += amount;
        }
        Ok(self)
    }

    pub fn add_lump_sum(&mut self, month: u32, amount: Money) -> Result<&mut Self> {
        validate_amount(amount)?;
        self.check_month(month)?;
        self.payments[month as usize] += amount;
        Ok(self)
    }

    pub fn term_months(&self) -> u32 {
        self.payments.len() as u32
    }

    pub fn get(&self, month: u32) -> Option<Money> {
        self.payments.get(month as usize).copied()
    }

    pub fn as_slice(&self) -> &[Money] {
        &self.payments
    }

    pub fn into_vec(self) -> Vec<Money> {
        self.payments
    }

    /// total offered, before any clamping
    pub fn total(&self) -> Money {
        self.payments.iter().sum()
    }

    fn check_month(&self, month: u32) -> Result<()> {
        if month as usize >= self.payments.len() {
            return Err(MortgageError::MonthOutOfRange {
                month,
                term_months: self.term_months(),
            });
        }
        Ok(())
    }
}

impl From<Vec<Money>> for ExtraPaymentPlan {
    fn from(payments: Vec<Money>) -> Self {
        Self::from_vec(payments)
    }
}

fn validate_amount(amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(MortgageError::InvalidExtraPayment { amount });
    }
    Ok(())
}
