use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::payments::ExtraPaymentPlan;

/// mortgage configuration
///
/// Deserializable from JSON so loans can be described in files or requests.
/// Rates and fractions are in decimal form (0.0425 for 4.25%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageConfig {
    pub home_price: Money,
    /// fraction of the home price paid up front
    pub down_payment: Rate,
    pub term_months: u32,
    pub interest_rate: Rate,
    /// one entry per month of the term; zeros when absent
    #[serde(default)]
    pub extra_payments: Option<Vec<Money>>,
    #[serde(default)]
    pub first_payment_date: Option<NaiveDate>,
}

impl MortgageConfig {
    pub fn new(home_price: Money, down_payment: Rate, term_months: u32, interest_rate: Rate) -> Self {
        Self {
            home_price,
            down_payment,
            term_months,
            interest_rate,
            extra_payments: None,
            first_payment_date: None,
        }
    }

    /// 30-year fixed with the given down payment
    pub fn thirty_year_fixed(home_price: Money, down_payment: Rate, interest_rate: Rate) -> Self {
        Self::new(home_price, down_payment, 360, interest_rate)
    }

    /// 15-year fixed with the given down payment
    pub fn fifteen_year_fixed(home_price: Money, down_payment: Rate, interest_rate: Rate) -> Self {
        Self::new(home_price, down_payment, 180, interest_rate)
    }

    /// conventional loan: 20% down, 30 years
    pub fn conventional(home_price: Money, interest_rate: Rate) -> Self {
        Self::thirty_year_fixed(home_price, Rate::from_decimal(dec!(0.20)), interest_rate)
    }

    pub fn with_extra_payments(mut self, plan: ExtraPaymentPlan) -> Self {
        self.extra_payments = Some(plan.into_vec());
        self
    }

    pub fn with_first_payment_date(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    /// amount financed: home price less the down payment
    pub fn loan_amount(&self) -> Money {
        self.home_price * self.down_payment.complement().as_decimal()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
