use crate::core::quantity::Quantity;
use thiserror::Error;

/// Errors arising from loan terms, plan resolution and plan queries.
///
/// Each failure is a distinct kind so callers can branch on the cause
/// and decide the user-facing message themselves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("{name} frequency must be a positive number, got {value}")]
    InvalidFrequency { name: &'static str, value: f64 },

    #[error("interest rate must be a non-negative number, got {0}")]
    InvalidRate(f64),

    #[error("{quantity} must be a non-negative number, got {value}")]
    InvalidQuantity { quantity: Quantity, value: f64 },

    #[error("exactly one unknown is required to resolve a plan, found {unknowns}")]
    NeedExactlyOneUnknown { unknowns: usize },

    #[error("exactly two unknowns are required for a tradeoff curve, found {unknowns}")]
    NeedTwoUnknowns { unknowns: usize },

    #[error("a principal is required for this computation")]
    NeedPrincipal,

    #[error("plan still has {unknowns} unknown value(s); resolve it first")]
    Unresolved { unknowns: usize },

    #[error("payment {payment} is too low to ever pay off the debt (minimum {minimum})")]
    PaymentTooLow { payment: f64, minimum: f64 },

    #[error("time to payoff must be positive, got {0}")]
    NonPositiveTime(f64),

    #[error("payment solve did not converge after {iterations} iterations (last estimate {last})")]
    NonConvergent { iterations: usize, last: f64 },

    #[error("no payment makes the total paid {target} on a principal of {principal}")]
    UnreachableTotal { target: f64, principal: f64 },

    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("plan spans {periods} payment periods, more than the limit of {limit}")]
    TooManyPeriods { periods: f64, limit: usize },
}
