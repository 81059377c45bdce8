//! debt-tool CLI
//!
//! Analyze compound-interest loans from the command line.
//!
//! # Usage
//!
//! ```bash
//! # How long does 300/month take to clear 10,000 at 5%?
//! debt-tool plan 0.05 12 12 --principal 10000 --payment 300
//!
//! # Recommended plan: lender earns 25% over the principal
//! debt-tool plan 0.05 12 12 --principal 10000 --recommended
//!
//! # Payment vs. payoff time for a fixed principal, as JSON
//! debt-tool --format json plan 0.05 12 12 --principal 10000 --graph-tradeoff 1 10
//!
//! # Simulate paying at least 3% of the balance each month
//! debt-tool simulate 5000 50 0.18 --pay-on-owed 0.03
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use debt_tool::analysis::summary::PlanSummary;
use debt_tool::core::error::PlanError;
use debt_tool::core::terms::LoanTerms;
use debt_tool::formula::periodic;
use debt_tool::plan::payment_plan::PaymentPlan;
use debt_tool::plan::timeline::Timeline;
use debt_tool::simulation::schedule::{simulate, Simulation, SimulationConfig};
use serde::Serialize;
use std::error::Error;
use std::process;

/// Analyze compound interest loans to help manage payment plans
#[derive(Parser)]
#[command(name = "debt-tool", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a payment plan from two of principal, payment and time to payoff
    Plan(PlanArgs),
    /// Simulate a repayment schedule one period at a time
    Simulate(SimulateArgs),
    /// Payment needed to pay a debt off in a given number of years
    PaymentNeeded(PaymentNeededArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct PlanArgs {
    /// The interest rate
    interest: f64,
    /// Compound frequency per year
    compound_freq: f64,
    /// Payment frequency per year
    payment_freq: f64,
    /// How much is initially owed
    #[arg(short = 'P', long)]
    principal: Option<f64>,
    /// How much is paid each cycle
    #[arg(short = 'p', long)]
    payment: Option<f64>,
    /// How long it takes to completely pay off all debts, in years
    #[arg(short = 't', long)]
    time_to_payoff: Option<f64>,
    /// List the recommended payment plan
    #[arg(long)]
    recommended: bool,
    /// Lender's return on investment targeted by the recommended plan
    #[arg(short = 'r', long = "return", default_value_t = 0.25)]
    target_return: f64,
    /// Print the tradeoff between the two unknowns over [MIN, MAX]
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    graph_tradeoff: Option<Vec<f64>>,
    /// Print the whole payment timeline
    #[arg(long)]
    graph_timeline: bool,
}

#[derive(Args)]
struct SimulateArgs {
    /// How much is initially owed
    principal: f64,
    /// How much is paid each cycle
    payment: f64,
    /// The interest rate
    interest: f64,
    /// Compound frequency per year
    #[arg(default_value_t = 12.0)]
    n: f64,
    /// Pay at least this fraction of the balance each cycle; the payment
    /// becomes the minimum paid
    #[arg(long, value_name = "FRACTION")]
    pay_on_owed: Option<f64>,
    /// Print the balance after every period
    #[arg(long)]
    schedule: bool,
}

#[derive(Args)]
struct PaymentNeededArgs {
    /// How much is initially owed
    principal: f64,
    /// The interest rate
    interest: f64,
    /// Years to pay the debt off in
    time: f64,
    /// Compound frequency per year
    #[arg(default_value_t = 12.0)]
    n: f64,
}

#[derive(Serialize)]
struct TradeoffOutput {
    x_label: String,
    y_label: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

#[derive(Serialize, Default)]
struct PlanOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<PlanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_payment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommended: Option<PlanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeline: Option<Timeline>,
}

#[derive(Serialize)]
struct PaymentNeededOutput {
    payment: f64,
    years: f64,
    total_paid: f64,
    return_on_investment: f64,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_plan(args: PlanArgs, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let terms = LoanTerms::new(args.interest, args.compound_freq, args.payment_freq)?;
    let mut plan = PaymentPlan::new(terms, args.principal, args.payment, args.time_to_payoff)?;

    if let Some(range) = args.graph_tradeoff {
        let curve = plan.graph_values(range[0], range[1])?;
        let (x, y) = curve.series();
        if format == OutputFormat::Json {
            return print_json(&TradeoffOutput {
                x_label: curve.x_axis().to_string(),
                y_label: curve.y_axis().to_string(),
                x,
                y,
            });
        }
        println!("{}\t{}", curve.x_axis(), curve.y_axis());
        for (x, y) in x.iter().zip(&y) {
            println!("{:.4}\t{:.2}", x, y);
        }
        return Ok(());
    }

    let mut output = PlanOutput::default();

    // A recommended plan only needs the principal, so a plan that cannot
    // be resolved is reported and skipped in that case.
    match plan.resolve() {
        Ok(()) => output.plan = Some(PlanSummary::from_plan(&plan)?),
        Err(e) if args.recommended && plan.principal().is_some() => {
            log::warn!("plan not resolved: {e}");
            eprintln!("Could not resolve plan: {e}");
        }
        Err(e) => return Err(e.into()),
    }
    output.minimum_payment = plan.minimum_payment().ok();

    if args.recommended {
        output.recommended = recommended_summary(&plan, args.target_return)?;
    }

    if args.graph_timeline {
        output.timeline = Some(plan.timeline()?);
    }

    if format == OutputFormat::Json {
        return print_json(&output);
    }

    if let Some(summary) = &output.plan {
        println!("{}", summary);
    }
    if let Some(minimum) = output.minimum_payment {
        println!("Minimum Payment: {:.2}", minimum);
    }
    if let Some(summary) = &output.recommended {
        println!("\nRecommended payment plan is");
        println!("{}", summary);
    }
    if let Some(timeline) = &output.timeline {
        println!("\nTime (years)\tAmount Owed\tTotal Amount Paid");
        for point in &timeline.points {
            println!("{:.4}\t{:.2}\t{:.2}", point.time, point.owed, point.paid);
        }
    }
    Ok(())
}

/// Summary of the plan earning the lender `target_return` over the
/// principal. Without a principal there is nothing to recommend.
fn recommended_summary(
    plan: &PaymentPlan,
    target_return: f64,
) -> Result<Option<PlanSummary>, PlanError> {
    let Some(principal) = plan.principal() else {
        log::info!("no principal given, skipping the recommended plan");
        return Ok(None);
    };
    let recommended = plan.plan_from_total_owed((1.0 + target_return) * principal)?;
    PlanSummary::from_plan(&recommended).map(Some)
}

fn print_simulation(sim: &Simulation, schedule: bool) {
    println!("Will take {:.1} years to pay off.", sim.years);
    println!(
        "Total paid is {:.2}, which is a {:.1}% return on investment for lender.",
        sim.total_paid,
        100.0 * sim.return_on_investment()
    );
    if schedule {
        println!("\nPeriod\tTime (years)\tOwed\tPaid");
        for step in &sim.steps {
            println!(
                "{}\t{:.4}\t{:.2}\t{:.2}",
                step.period, step.time, step.owed, step.paid
            );
        }
    }
}

fn run_simulate(args: SimulateArgs, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let terms = LoanTerms::new(args.interest, args.n, args.n)?;
    let config = SimulationConfig {
        pay_on_owed: args.pay_on_owed,
        ..Default::default()
    };
    let sim = simulate(&terms, args.principal, args.payment, &config)?;

    if format == OutputFormat::Json {
        return print_json(&sim);
    }
    print_simulation(&sim, args.schedule);
    Ok(())
}

fn run_payment_needed(args: PaymentNeededArgs, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let terms = LoanTerms::new(args.interest, args.n, args.n)?;
    let payment = periodic::payment_in_advance(args.principal, args.interest, args.n, args.time)?;
    let sim = simulate(&terms, args.principal, payment, &SimulationConfig::default())?;

    if format == OutputFormat::Json {
        return print_json(&PaymentNeededOutput {
            payment,
            years: args.time,
            total_paid: sim.total_paid,
            return_on_investment: sim.return_on_investment(),
        });
    }
    println!(
        "Should pay {:.2} to pay debt off in {:.1} years.",
        payment, args.time
    );
    println!(
        "Total paid is {:.2}, which is a {:.1}% return on investment for lender.",
        sim.total_paid,
        100.0 * sim.return_on_investment()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan(args) => run_plan(args, cli.format),
        Commands::Simulate(args) => run_simulate(args, cli.format),
        Commands::PaymentNeeded(args) => run_payment_needed(args, cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debt_tool::core::terms::LoanTerms;

    fn terms() -> LoanTerms {
        LoanTerms::new(0.05, 12.0, 12.0).unwrap()
    }

    #[test]
    fn test_recommended_skipped_without_principal() {
        let plan = PaymentPlan::new(terms(), None, Some(300.0), Some(3.0)).unwrap();
        assert_eq!(recommended_summary(&plan, 0.25), Ok(None));
    }

    #[test]
    fn test_recommended_targets_return() {
        let plan = PaymentPlan::new(terms(), Some(10_000.0), None, None).unwrap();
        let summary = recommended_summary(&plan, 0.25).unwrap().unwrap();
        assert_eq!(summary.total_paid.to_string(), "12500.00");
        assert_eq!(summary.return_on_investment.to_string(), "25.00");
    }

    #[test]
    fn test_cli_parses_plan_flags() {
        let cli = Cli::try_parse_from([
            "debt-tool", "--format", "json", "plan", "0.05", "12", "12", "-p", "300", "-t", "3",
            "--recommended",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.principal, None);
                assert_eq!(args.payment, Some(300.0));
                assert!(args.recommended);
                assert_eq!(args.target_return, 0.25);
            }
            _ => panic!("expected plan subcommand"),
        }
    }
}
