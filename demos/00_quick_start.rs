/// quick start - amortize a conventional 30-year mortgage
use fixed_rate_mortgage::{FixedRateMortgage, Money, Rate};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // $400,000 home, 20% down, 6.5% for 30 years
    let loan = FixedRateMortgage::builder()
        .home_price(Money::from_major(400_000))
        .down_payment(Rate::from_percentage(20))
        .term_years(30)
        .rate(Rate::from_bps(650))
        .build()?;

    println!("loan amount:     {}", loan.loan_amount());
    println!("monthly payment: {}", loan.monthly_payment().round_dp(2));

    for row in loan.schedule().iter().take(3) {
        println!(
            "month {:>3}: interest {} principal {} balance {}",
            row.month,
            row.interest.round_dp(2),
            row.principal.round_dp(2),
            row.balance.round_dp(2),
        );
    }

    println!("{}", serde_json::to_string_pretty(&loan.schedule().summary())?);

    Ok(())
}
