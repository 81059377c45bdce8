use criterion::{black_box, criterion_group, criterion_main, Criterion};
use debt_tool::core::terms::LoanTerms;
use debt_tool::plan::payment_plan::PaymentPlan;
use debt_tool::simulation::schedule::{simulate, SimulationConfig};

fn terms() -> LoanTerms {
    LoanTerms::new(0.05, 365.0, 12.0).unwrap()
}

fn bench_resolve(c: &mut Criterion) {
    let plan = PaymentPlan::new(terms(), Some(250_000.0), Some(1_500.0), None).unwrap();

    c.bench_function("resolve_time_to_payoff", |b| {
        b.iter(|| black_box(plan).resolved())
    });
}

fn bench_recommended_plan(c: &mut Criterion) {
    let plan = PaymentPlan::new(terms(), Some(250_000.0), None, None).unwrap();

    c.bench_function("recommended_plan", |b| {
        b.iter(|| plan.plan_from_total_owed(black_box(312_500.0)))
    });
}

fn bench_tradeoff_series(c: &mut Criterion) {
    let plan = PaymentPlan::new(terms(), None, None, Some(30.0)).unwrap();

    c.bench_function("tradeoff_1000_payments", |b| {
        b.iter(|| {
            plan.graph_values(black_box(500.0), black_box(5_000.0))
                .map(|curve| curve.series())
        })
    });
}

fn bench_simulation(c: &mut Criterion) {
    let terms = LoanTerms::new(0.18, 12.0, 12.0).unwrap();
    let config = SimulationConfig {
        pay_on_owed: Some(0.03),
        ..Default::default()
    };

    c.bench_function("simulate_pay_on_owed", |b| {
        b.iter(|| simulate(&terms, black_box(5_000.0), black_box(50.0), &config))
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_recommended_plan,
    bench_tradeoff_series,
    bench_simulation
);
criterion_main!(benches);
