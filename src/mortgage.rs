use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::MortgageConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::events::Event;
use crate::payments::{annuity_payment, AmortizationPass, ExtraPaymentPlan};
use crate::schedule::Schedule;
use crate::types::{LoanId, LoanStatus, LoanTerms};

/// fixed-rate mortgage and its amortization engine
///
/// Terms are fixed at construction. The schedule is computed by a single
/// pass on first request and cached for the lifetime of the mortgage, so
/// later calls hand back the same value. The cache is a synchronized
/// once-cell: concurrent first calls wait on one computation.
#[derive(Debug)]
pub struct FixedRateMortgage {
    id: LoanId,
    terms: LoanTerms,
    /// unrounded, so the pass settles even when most of it is interest
    payment: Decimal,
    first_payment_date: Option<NaiveDate>,
    amortized: OnceCell<Amortized>,
}

#[derive(Debug)]
struct Amortized {
    schedule: Schedule,
    events: Vec<Event>,
}

impl FixedRateMortgage {
    /// create a mortgage from a purchase
    ///
    /// `extra_payments` defaults to zeros; when given it must hold exactly
    /// one amount per month. No other range checks are made: negative rates
    /// and down payments outside [0, 1] flow through the arithmetic.
    pub fn new(
        home_price: Money,
        down_payment: Rate,
        term_months: u32,
        annual_rate: Rate,
        extra_payments: Option<Vec<Money>>,
    ) -> Result<Self> {
        let loan_amount = home_price * down_payment.complement().as_decimal();
        Self::from_loan_amount(Uuid::new_v4(), loan_amount, term_months, annual_rate, extra_payments, None)
    }

    pub fn from_config(config: &MortgageConfig) -> Result<Self> {
        Self::from_loan_amount(
            Uuid::new_v4(),
            config.loan_amount(),
            config.term_months,
            config.interest_rate,
            config.extra_payments.clone(),
            config.first_payment_date,
        )
    }

    pub fn builder() -> FixedRateMortgageBuilder {
        FixedRateMortgageBuilder::new()
    }

    fn from_loan_amount(
        id: LoanId,
        loan_amount: Money,
        term_months: u32,
        annual_rate: Rate,
        extra_payments: Option<Vec<Money>>,
        first_payment_date: Option<NaiveDate>,
    ) -> Result<Self> {
        if term_months == 0 {
            return Err(MortgageError::InvalidTerm);
        }

        let extra_payments = match extra_payments {
            Some(payments) => {
                if payments.len() != term_months as usize {
                    return Err(MortgageError::InvalidInput {
                        expected: term_months,
                        actual: payments.len(),
                    });
                }
                payments
            }
            None => ExtraPaymentPlan::none(term_months).into_vec(),
        };

        let payment = annuity_payment(loan_amount.as_decimal(), annual_rate, term_months)?;

        debug!(
            loan_id = %id,
            loan_amount = %loan_amount,
            term_months,
            annual_rate = %annual_rate,
            monthly_payment = %Money::from_decimal(payment),
            "mortgage created"
        );

        Ok(Self {
            id,
            terms: LoanTerms {
                loan_amount,
                term_months,
                annual_rate,
                extra_payments,
            },
            payment,
            first_payment_date,
            amortized: OnceCell::new(),
        })
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn loan_amount(&self) -> Money {
        self.terms.loan_amount
    }

    /// standard fixed monthly payment (principal and interest)
    pub fn monthly_payment(&self) -> Money {
        Money::from_decimal(self.payment)
    }

    pub fn first_payment_date(&self) -> Option<NaiveDate> {
        self.first_payment_date
    }

    /// remaining balance: the loan amount until the schedule has been run
    pub fn balance(&self) -> Money {
        self.amortized
            .get()
            .map(|a| a.schedule.final_balance())
            .unwrap_or(self.terms.loan_amount)
    }

    /// balance settled within one cent
    pub fn is_paid(&self) -> bool {
        self.balance() < Money::CENT
    }

    pub fn status(&self) -> LoanStatus {
        if self.is_paid() {
            LoanStatus::PaidOff
        } else {
            LoanStatus::Outstanding
        }
    }

    /// whether the schedule has already been computed
    pub fn is_amortized(&self) -> bool {
        self.amortized.get().is_some()
    }

    /// month-by-month schedule, computed once and cached
    pub fn schedule(&self) -> &Schedule {
        &self.amortized.get_or_init(|| self.amortize()).schedule
    }

    /// events from the amortization pass, empty until the schedule is computed
    pub fn events(&self) -> &[Event] {
        self.amortized
            .get()
            .map(|a| a.events.as_slice())
            .unwrap_or(&[])
    }

    /// same loan without extra payments
    pub fn baseline(&self) -> Result<FixedRateMortgage> {
        Self::from_loan_amount(
            Uuid::new_v4(),
            self.terms.loan_amount,
            self.terms.term_months,
            self.terms.annual_rate,
            None,
            self.first_payment_date,
        )
    }

    /// interest avoided by the extra payments, against the baseline loan
    pub fn interest_saved(&self) -> Result<Money> {
        let baseline = self.baseline()?;
        Ok(baseline.schedule().total_interest() - self.schedule().total_interest())
    }

    pub fn to_json(&self) -> Result<String> {
        self.schedule().to_json()
    }

    fn amortize(&self) -> Amortized {
        let pass = AmortizationPass::new(self.id, &self.terms, self.payment);
        let (months, events) = pass.run();

        let schedule = Schedule::from_breakdowns(
            self.id,
            self.terms.loan_amount,
            self.monthly_payment(),
            months,
            self.first_payment_date,
        );

        info!(
            loan_id = %self.id,
            term_months = self.terms.term_months,
            payoff_month = ?schedule.payoff_month(),
            total_interest = %schedule.total_interest(),
            "amortization schedule generated"
        );

        Amortized { schedule, events }
    }
}

/// builder for fixed-rate mortgages
#[derive(Debug, Clone)]
pub struct FixedRateMortgageBuilder {
    id: Option<LoanId>,
    home_price: Option<Money>,
    down_payment: Rate,
    /// `None` once a term in years has overflowed the month count
    term_months: Option<u32>,
    interest_rate: Option<Rate>,
    extra_payments: Option<Vec<Money>>,
    first_payment_date: Option<NaiveDate>,
}

impl Default for FixedRateMortgageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedRateMortgageBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            home_price: None,
            down_payment: Rate::ZERO,
            term_months: Some(360),
            interest_rate: None,
            extra_payments: None,
            first_payment_date: None,
        }
    }

    pub fn id(mut self, id: LoanId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn home_price(mut self, price: Money) -> Self {
        self.home_price = Some(price);
        self
    }

    pub fn down_payment(mut self, fraction: Rate) -> Self {
        self.down_payment = fraction;
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn term_years(mut self, years: u32) -> Self {
        self.term_months = years.checked_mul(12);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn extra_payments(mut self, payments: Vec<Money>) -> Self {
        self.extra_payments = Some(payments);
        self
    }

    pub fn extra_payment_plan(mut self, plan: ExtraPaymentPlan) -> Self {
        self.extra_payments = Some(plan.into_vec());
        self
    }

    pub fn first_payment_date(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    pub fn build(self) -> Result<FixedRateMortgage> {
        let home_price = self.home_price.ok_or_else(|| MortgageError::InvalidConfiguration {
            message: "home price is required".to_string(),
        })?;
        let interest_rate = self.interest_rate.ok_or_else(|| MortgageError::InvalidConfiguration {
            message: "interest rate is required".to_string(),
        })?;
        let term_months = self.term_months.ok_or_else(|| MortgageError::InvalidConfiguration {
            message: "term in years does not fit in a month count".to_string(),
        })?;

        let config = MortgageConfig {
            home_price,
            down_payment: self.down_payment,
            term_months,
            interest_rate,
            extra_payments: self.extra_payments,
            first_payment_date: self.first_payment_date,
        };

        FixedRateMortgage::from_loan_amount(
            self.id.unwrap_or_else(Uuid::new_v4),
            config.loan_amount(),
            config.term_months,
            config.interest_rate,
            config.extra_payments,
            config.first_payment_date,
        )
    }
}
