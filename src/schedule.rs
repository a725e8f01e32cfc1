//! amortization schedule rows and the tabular views built from them
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::MonthlyBreakdown;
use crate::types::LoanId;

/// one month of the schedule, with running totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub principal: Money,
    pub interest: Money,
    pub extra_payment: Money,
    pub balance: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_extra_payment: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

impl ScheduleRow {
    pub fn is_settled(&self) -> bool {
        self.balance < Money::CENT
    }
}

/// full month-by-month schedule for one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub loan_id: LoanId,
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub rows: Vec<ScheduleRow>,
}

impl Schedule {
    /// accumulate running totals over the months, in month order
    pub fn from_breakdowns(
        loan_id: LoanId,
        loan_amount: Money,
        monthly_payment: Money,
        months: Vec<MonthlyBreakdown>,
        first_payment_date: Option<NaiveDate>,
    ) -> Self {
        let mut total_principal = Money::ZERO;
        let mut total_interest = Money::ZERO;
        let mut total_extra_payment = Money::ZERO;

        let rows = months
            .into_iter()
            .map(|m| {
                total_principal += m.principal;
                total_interest += m.interest;
                total_extra_payment += m.extra_payment;

                ScheduleRow {
                    month: m.month,
                    principal: m.principal,
                    interest: m.interest,
                    extra_payment: m.extra_payment,
                    balance: m.balance,
                    total_principal,
                    total_interest,
                    total_extra_payment,
                    payment_date: first_payment_date
                        .and_then(|d| d.checked_add_months(Months::new(m.month))),
                }
            })
            .collect();

        Self {
            loan_id,
            loan_amount,
            monthly_payment,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, month: u32) -> Option<&ScheduleRow> {
        self.rows.get(month as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleRow> {
        self.rows.iter()
    }

    /// first month whose ending balance is settled
    pub fn payoff_month(&self) -> Option<u32> {
        self.rows.iter().find(|r| r.is_settled()).map(|r| r.month)
    }

    pub fn final_balance(&self) -> Money {
        self.rows
            .last()
            .map(|r| r.balance)
            .unwrap_or(self.loan_amount)
    }

    pub fn total_interest(&self) -> Money {
        self.rows.last().map(|r| r.total_interest).unwrap_or(Money::ZERO)
    }

    pub fn total_principal(&self) -> Money {
        self.rows.last().map(|r| r.total_principal).unwrap_or(Money::ZERO)
    }

    pub fn total_extra_payment(&self) -> Money {
        self.rows
            .last()
            .map(|r| r.total_extra_payment)
            .unwrap_or(Money::ZERO)
    }

    /// columnar view for tabular consumers
    pub fn columns(&self) -> ScheduleColumns {
        let mut columns = ScheduleColumns::with_capacity(self.rows.len());
        for row in &self.rows {
            columns.month.push(row.month);
            columns.principal.push(row.principal);
            columns.interest.push(row.interest);
            columns.extra_payment.push(row.extra_payment);
            columns.balance.push(row.balance);
            columns.total_principal.push(row.total_principal);
            columns.total_interest.push(row.total_interest);
            columns.total_extra_payment.push(row.total_extra_payment);
        }
        columns
    }

    pub fn summary(&self) -> ScheduleSummary {
        let term_months = self.rows.len() as u32;
        let payoff_month = self.payoff_month();
        let total_principal = self.total_principal();
        let total_interest = self.total_interest();
        let total_extra_payment = self.total_extra_payment();

        ScheduleSummary {
            loan_id: self.loan_id,
            loan_amount: self.loan_amount,
            monthly_payment: self.monthly_payment,
            term_months,
            payoff_month,
            months_saved: payoff_month
                .map(|m| term_months.saturating_sub(m + 1))
                .unwrap_or(0),
            total_principal,
            total_interest,
            total_extra_payment,
            total_paid: total_principal + total_interest + total_extra_payment,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.rows)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.rows)?)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduleRow;
    type IntoIter = std::slice::Iter<'a, ScheduleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// struct-of-columns form of a schedule, same column names as the rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleColumns {
    pub month: Vec<u32>,
    pub principal: Vec<Money>,
    pub interest: Vec<Money>,
    pub extra_payment: Vec<Money>,
    pub balance: Vec<Money>,
    pub total_principal: Vec<Money>,
    pub total_interest: Vec<Money>,
    pub total_extra_payment: Vec<Money>,
}

impl ScheduleColumns {
    fn with_capacity(n: usize) -> Self {
        Self {
            month: Vec::with_capacity(n),
            principal: Vec::with_capacity(n),
            interest: Vec::with_capacity(n),
            extra_payment: Vec::with_capacity(n),
            balance: Vec::with_capacity(n),
            total_principal: Vec::with_capacity(n),
            total_interest: Vec::with_capacity(n),
            total_extra_payment: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.month.len()
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_empty()
    }
}

/// headline figures for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub loan_id: LoanId,
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub term_months: u32,
    pub payoff_month: Option<u32>,
    /// scheduled months left unused after an early payoff
    pub months_saved: u32,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_extra_payment: Money,
    pub total_paid: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn breakdown(month: u32, principal: i64, interest: i64, extra: i64, balance: i64) -> MonthlyBreakdown {
        MonthlyBreakdown {
            month,
            principal: Money::from_major(principal),
            interest: Money::from_major(interest),
            extra_payment: Money::from_major(extra),
            balance: Money::from_major(balance),
        }
    }

    fn sample() -> Schedule {
        Schedule::from_breakdowns(
            Uuid::new_v4(),
            Money::from_major(300),
            Money::from_major(110),
            vec![
                breakdown(0, 100, 10, 50, 150),
                breakdown(1, 100, 5, 50, 0),
                breakdown(2, 0, 0, 0, 0),
            ],
            None,
        )
    }

    #[test]
    fn test_running_totals() {
        let schedule = sample();
        let second = schedule.row(1).unwrap();
        assert_eq!(second.total_principal, Money::from_major(200));
        assert_eq!(second.total_interest, Money::from_major(15));
        assert_eq!(second.total_extra_payment, Money::from_major(100));
        assert_eq!(schedule.row(2).unwrap().total_principal, Money::from_major(200));
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.payoff_month, Some(1));
        assert_eq!(summary.months_saved, 1);
        assert_eq!(summary.total_paid, Money::from_major(315));
    }

    #[test]
    fn test_columns_match_rows() {
        let schedule = sample();
        let columns = schedule.columns();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns.month, vec![0, 1, 2]);
        assert_eq!(columns.balance[0], Money::from_major(150));
        assert_eq!(columns.total_interest[2], Money::from_major(15));
    }

    #[test]
    fn test_json_field_names() {
        let json = sample().to_json().unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &rows[0];
        for field in [
            "month",
            "principal",
            "interest",
            "extra_payment",
            "balance",
            "total_principal",
            "total_interest",
            "total_extra_payment",
        ] {
            assert!(first.get(field).is_some(), "missing column {field}");
        }
        assert!(first.get("payment_date").is_none());
    }

    #[test]
    fn test_payment_dates_follow_calendar_months() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let schedule = Schedule::from_breakdowns(
            Uuid::new_v4(),
            Money::from_major(300),
            Money::from_major(110),
            vec![breakdown(0, 100, 10, 0, 200), breakdown(1, 100, 5, 0, 100)],
            Some(first),
        );

        assert_eq!(schedule.rows[0].payment_date, Some(first));
        assert_eq!(
            schedule.rows[1].payment_date,
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }
}
