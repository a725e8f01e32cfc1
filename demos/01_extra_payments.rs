/// extra payments - compare a plan against the baseline loan
use fixed_rate_mortgage::chrono::NaiveDate;
use fixed_rate_mortgage::{ExtraPaymentPlan, FixedRateMortgage, Money, MortgageConfig, Rate};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // $250 extra every month, plus a $15,000 bonus in the second year
    let mut plan = ExtraPaymentPlan::recurring(360, Money::from_major(250))?;
    plan.add_lump_sum(18, Money::from_major(15_000))?;

    let config = MortgageConfig::conventional(Money::from_major(500_000), Rate::from_bps(575))
        .with_extra_payments(plan)
        .with_first_payment_date(NaiveDate::from_ymd_opt(2025, 3, 1).ok_or("bad date")?);

    let loan = FixedRateMortgage::from_config(&config)?;
    let baseline = loan.baseline()?;

    let with_plan = loan.schedule().summary();
    let without = baseline.schedule().summary();

    println!("payoff month with plan:    {:?}", with_plan.payoff_month);
    println!("payoff month without plan: {:?}", without.payoff_month);
    println!("interest saved:            {}", loan.interest_saved()?.round_dp(2));

    if let Some(last) = with_plan.payoff_month.and_then(|m| loan.schedule().row(m)) {
        println!("paid off on {:?}", last.payment_date);
    }

    for event in loan.events() {
        println!("{event:?}");
    }

    Ok(())
}
