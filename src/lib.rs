//! # debt-tool
//!
//! Compound-interest debt repayment planning.
//!
//! Given any two of principal, periodic payment and time to payoff, this
//! crate derives the third from closed-form amortization formulas, and
//! answers follow-up questions: the minimum sustaining payment, the plan
//! whose lifetime total matches a target, the balance at any time, and
//! tradeoff curves between the unknowns.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: loan terms, quantities, errors
//! - **formula** — Closed-form amortization formulas
//! - **plan** — Payment plan resolution, recommended plans, tradeoff curves, timelines
//! - **analysis** — Rounded summaries for display
//! - **simulation** — Period-by-period schedule simulation

pub mod analysis;
pub mod core;
pub mod formula;
pub mod plan;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::analysis::summary::PlanSummary;
    pub use crate::core::error::PlanError;
    pub use crate::core::quantity::Quantity;
    pub use crate::core::terms::LoanTerms;
    pub use crate::plan::payment_plan::{Known, PaymentPlan, PlanState};
    pub use crate::plan::recommend::SolverConfig;
    pub use crate::plan::timeline::{Timeline, TimelinePoint};
    pub use crate::plan::tradeoff::{TradeoffCurve, TradeoffPoints};
    pub use crate::simulation::schedule::{simulate, Simulation, SimulationConfig};
}
