//! Resolve a car loan, then ask what payment earns the lender 20%.
//!
//! Run with `cargo run --example basic_plan`.

use debt_tool::prelude::*;

fn main() -> Result<(), PlanError> {
    env_logger::init();

    let terms = LoanTerms::new(0.065, 12.0, 12.0)?;
    let plan = PaymentPlan::new(terms, Some(24_000.0), None, Some(5.0))?.resolved()?;

    println!("{}", PlanSummary::from_plan(&plan)?);
    println!("Minimum Payment: {:.2}", plan.minimum_payment()?);

    let recommended = plan.plan_from_total_owed(24_000.0 * 1.2)?;
    println!("\nRecommended payment plan is");
    println!("{}", PlanSummary::from_plan(&recommended)?);

    println!("\nBalance at each year end:");
    for point in recommended.timeline()?.points.iter().step_by(12) {
        println!("  {:>5.2} years  {:>10.2}", point.time, point.owed);
    }
    Ok(())
}
