use rust_decimal::Decimal;
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::events::{Event, EventStore};
use crate::types::{LoanId, LoanTerms};

/// one month of the amortization recurrence, before running totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyBreakdown {
    pub month: u32,
    pub principal: Money,
    pub interest: Money,
    pub extra_payment: Money,
    pub balance: Money,
}

impl MonthlyBreakdown {
    fn settled(month: u32, balance: Money) -> Self {
        Self {
            month,
            principal: Money::ZERO,
            interest: Money::ZERO,
            extra_payment: Money::ZERO,
            balance,
        }
    }
}

/// fixed monthly payment that fully amortizes `principal` over `months`
///
/// P = L * r * (1 + r)^n / ((1 + r)^n - 1), or L / n when r is zero.
/// Carried at full decimal precision: at high rates the amortizing part of
/// the payment is far below a cent and must not be rounded away.
pub fn annuity_payment(principal: Decimal, annual_rate: Rate, months: u32) -> Result<Decimal> {
    if months == 0 {
        return Err(MortgageError::InvalidTerm);
    }

    let r = annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound = compound.checked_mul(base).ok_or_else(|| MortgageError::CalculationError {
            message: format!("compounding {annual_rate} over {months} months overflows"),
        })?;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(MortgageError::CalculationError {
            message: format!("annuity factor is undefined for rate {annual_rate} over {months} months"),
        });
    }

    principal
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .and_then(|x| x.checked_div(denominator))
        .ok_or_else(|| MortgageError::CalculationError {
            message: format!("standard payment for {principal} at {annual_rate} overflows"),
        })
}

/// standard payment rounded to money precision, for display
pub fn standard_payment(principal: Money, annual_rate: Rate, months: u32) -> Result<Money> {
    annuity_payment(principal.as_decimal(), annual_rate, months).map(Money::from_decimal)
}

/// single forward pass over the term, owning the running balance
///
/// The recurrence runs on unrounded decimals so rounding error cannot
/// compound month over month. Rows report 8 dp values; the reported
/// principal is the drop in the reported balance less the reported extra
/// payment, so every row balances exactly against the one before it.
pub struct AmortizationPass<'a> {
    loan_id: LoanId,
    terms: &'a LoanTerms,
    monthly_rate: Decimal,
    payment: Decimal,
    balance: Decimal,
    reported_balance: Money,
    events: EventStore,
}

impl<'a> AmortizationPass<'a> {
    pub fn new(loan_id: LoanId, terms: &'a LoanTerms, payment: Decimal) -> Self {
        Self {
            loan_id,
            terms,
            monthly_rate: terms.monthly_rate().as_decimal(),
            payment,
            balance: terms.loan_amount.as_decimal(),
            reported_balance: terms.loan_amount,
            events: EventStore::new(),
        }
    }

    /// balance settled within one cent
    pub fn is_paid(&self) -> bool {
        self.balance < Money::CENT.as_decimal()
    }

    pub fn balance(&self) -> Money {
        self.reported_balance
    }

    /// advance the balance by one month
    pub fn step(&mut self, month: u32) -> MonthlyBreakdown {
        if self.is_paid() {
            return MonthlyBreakdown::settled(month, self.reported_balance);
        }

        let interest = self.balance * self.monthly_rate;
        // last installment never pays more than what remains
        let remaining = if self.payment >= self.balance + interest {
            Decimal::ZERO
        } else {
            self.balance - (self.payment - interest)
        };

        let requested = self.terms.extra_payment(month);
        let extra = requested.as_decimal().min(remaining);
        let extra_payment = Money::from_decimal(extra);
        if extra < requested.as_decimal() {
            debug!(
                loan_id = %self.loan_id,
                month,
                requested = %requested,
                applied = %extra_payment,
                "extra payment clamped to remaining balance"
            );
            self.events.emit(Event::ExtraPaymentClamped {
                loan_id: self.loan_id,
                month,
                requested,
                applied: extra_payment,
            });
        }

        self.balance = remaining - extra;

        if self.is_paid() {
            self.events.emit(Event::LoanPaidOff {
                loan_id: self.loan_id,
                month,
                early: month + 1 < self.terms.term_months,
            });
        }

        let balance = Money::from_decimal(self.balance);
        let principal = self.reported_balance - balance - extra_payment;
        self.reported_balance = balance;

        MonthlyBreakdown {
            month,
            principal,
            interest: Money::from_decimal(interest),
            extra_payment,
            balance,
        }
    }

    /// run every month of the term in order
    pub fn run(mut self) -> (Vec<MonthlyBreakdown>, Vec<Event>) {
        self.events.emit(Event::ScheduleGenerated {
            loan_id: self.loan_id,
            term_months: self.terms.term_months,
            monthly_payment: Money::from_decimal(self.payment),
        });

        let months: Vec<MonthlyBreakdown> =
            (0..self.terms.term_months).map(|month| self.step(month)).collect();

        (months, self.events.take_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn terms(amount: i64, rate: Rate, term_months: u32) -> LoanTerms {
        LoanTerms {
            loan_amount: Money::from_major(amount),
            term_months,
            annual_rate: rate,
            extra_payments: vec![Money::ZERO; term_months as usize],
        }
    }

    fn payment_for(terms: &LoanTerms) -> Decimal {
        annuity_payment(terms.loan_amount.as_decimal(), terms.annual_rate, terms.term_months).unwrap()
    }

    fn final_balance(amount: i64, rate_bps: u32, term_months: u32) -> Money {
        let terms = terms(amount, Rate::from_bps(rate_bps), term_months);
        let payment = payment_for(&terms);
        let (months, _) = AmortizationPass::new(Uuid::new_v4(), &terms, payment).run();
        months.last().map(|m| m.balance).unwrap()
    }

    #[test]
    fn test_standard_payment_thirty_year() {
        let payment = standard_payment(Money::from_major(80_000), Rate::from_percentage(6), 360).unwrap();
        assert_eq!(payment.round_dp(2), Money::from_decimal(dec!(479.64)));
    }

    #[test]
    fn test_standard_payment_zero_rate() {
        let payment = standard_payment(Money::from_major(12_000), Rate::ZERO, 12).unwrap();
        assert_eq!(payment, Money::from_major(1_000));
    }

    #[test]
    fn test_standard_payment_rejects_zero_term() {
        let result = standard_payment(Money::from_major(1_000), Rate::from_percentage(5), 0);
        assert_eq!(result, Err(MortgageError::InvalidTerm));
    }

    #[test]
    fn test_standard_payment_overflow_is_an_error() {
        let result = standard_payment(Money::from_major(100_000), Rate::from_percentage(5_000), 360);
        assert!(matches!(result, Err(MortgageError::CalculationError { .. })));
    }

    #[test]
    fn test_degenerate_negative_rate_is_an_error() {
        // monthly rate of -200% makes (1 + r)^n equal one for even n
        let rate = Rate::from_decimal(dec!(-24));
        let result = standard_payment(Money::from_major(1_000), rate, 2);
        assert!(matches!(result, Err(MortgageError::CalculationError { .. })));
    }

    #[test]
    fn test_first_month_split() {
        let terms = terms(80_000, Rate::from_percentage(6), 360);
        let payment = payment_for(&terms);
        let mut pass = AmortizationPass::new(Uuid::new_v4(), &terms, payment);

        let first = pass.step(0);
        assert_eq!(first.interest, Money::from_major(400));
        assert_eq!(first.principal.round_dp(2), Money::from_decimal(dec!(79.64)));
        assert_eq!(first.balance.round_dp(2), Money::from_decimal(dec!(79920.36)));
        assert_eq!(first.extra_payment, Money::ZERO);
    }

    #[test]
    fn test_pass_settles_by_final_month() {
        let terms = terms(80_000, Rate::from_percentage(6), 360);
        let payment = payment_for(&terms);
        let (months, events) = AmortizationPass::new(Uuid::new_v4(), &terms, payment).run();

        assert_eq!(months.len(), 360);
        assert!(months[359].balance < Money::CENT);
        assert!(!months[359].balance.is_negative());
        assert!(matches!(events.first(), Some(Event::ScheduleGenerated { term_months: 360, .. })));
    }

    #[test]
    fn test_extra_payment_clamped_to_remaining_balance() {
        let mut terms = terms(80_000, Rate::from_percentage(6), 360);
        terms.extra_payments[0] = Money::from_major(1_000_000);
        let payment = payment_for(&terms);
        let mut pass = AmortizationPass::new(Uuid::new_v4(), &terms, payment);

        let first = pass.step(0);
        assert_eq!(first.extra_payment, terms.loan_amount - first.principal);
        assert_eq!(first.balance, Money::ZERO);
        assert!(pass.is_paid());

        let second = pass.step(1);
        assert_eq!(second.interest, Money::ZERO);
        assert_eq!(second.principal, Money::ZERO);
        assert_eq!(second.extra_payment, Money::ZERO);
        assert_eq!(second.balance, Money::ZERO);
    }

    #[test]
    fn test_clamp_and_payoff_events() {
        let mut terms = terms(10_000, Rate::from_percentage(5), 12);
        terms.extra_payments[2] = Money::from_major(50_000);
        let payment = payment_for(&terms);
        let (_, events) = AmortizationPass::new(Uuid::new_v4(), &terms, payment).run();

        assert!(events.iter().any(|e| matches!(
            e,
            Event::ExtraPaymentClamped { month: 2, requested, .. } if *requested == Money::from_major(50_000)
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::LoanPaidOff { month: 2, early: true, .. })));
    }

    #[test]
    fn test_high_rate_loans_settle_by_final_month() {
        for (amount, rate_bps, term_months) in [
            (100_000, 6_000, 360),
            (1_000_000, 3_000, 480),
            (1_000_000, 5_000, 360),
            (1_000_000, 6_000, 480),
            (1_000_000, 8_000, 360),
            (100_000, 8_000, 480),
            (1_000_000, 10_000, 480),
        ] {
            let balance = final_balance(amount, rate_bps, term_months);
            assert!(
                balance < Money::CENT && !balance.is_negative(),
                "{amount} at {rate_bps} bps over {term_months} months left {balance}"
            );
        }
    }

    #[test]
    fn test_high_rate_loan_pays_off_in_final_month() {
        // the amortizing part of the payment is far below a cent here
        let terms = terms(100_000, Rate::from_bps(8_000), 480);
        let payment = payment_for(&terms);
        let (months, events) = AmortizationPass::new(Uuid::new_v4(), &terms, payment).run();

        assert_eq!(months.iter().position(|m| m.balance < Money::CENT), Some(479));
        assert!(months.iter().all(|m| !m.principal.is_negative()));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::LoanPaidOff { month: 479, early: false, .. })));
    }

    #[test]
    fn test_reported_rows_balance_exactly() {
        let mut terms = terms(250_000, Rate::from_bps(737), 360);
        terms.extra_payments[5] = Money::from_str_exact("1234.567891234").unwrap();
        let payment = payment_for(&terms);
        let (months, _) = AmortizationPass::new(Uuid::new_v4(), &terms, payment).run();

        let mut previous = terms.loan_amount;
        for m in &months {
            assert_eq!(previous - m.principal - m.extra_payment, m.balance, "month {}", m.month);
            previous = m.balance;
        }
    }
}
