pub mod amortization;
pub mod extra;

pub use amortization::{annuity_payment, standard_payment, AmortizationPass, MonthlyBreakdown};
pub use extra::ExtraPaymentPlan;
