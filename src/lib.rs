pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod mortgage;
pub mod payments;
pub mod schedule;
pub mod types;

// re-export key types
pub use config::MortgageConfig;
pub use decimal::{Money, Rate};
pub use errors::{MortgageError, Result};
pub use events::{Event, EventStore};
pub use mortgage::{FixedRateMortgage, FixedRateMortgageBuilder};
pub use payments::{
    annuity_payment, standard_payment, AmortizationPass, ExtraPaymentPlan, MonthlyBreakdown,
};
pub use schedule::{Schedule, ScheduleColumns, ScheduleRow, ScheduleSummary};
pub use types::{LoanId, LoanStatus, LoanTerms};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
