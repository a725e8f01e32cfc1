use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanId;

/// events emitted while a schedule is amortized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ScheduleGenerated {
        loan_id: LoanId,
        term_months: u32,
        monthly_payment: Money,
    },
    /// the borrower offered more extra principal than was left to pay
    ExtraPaymentClamped {
        loan_id: LoanId,
        month: u32,
        requested: Money,
        applied: Money,
    },
    LoanPaidOff {
        loan_id: LoanId,
        month: u32,
        early: bool,
    },
}

/// event store for collecting events during an amortization pass
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
