//! Recommended plan search.
//!
//! No closed form gives the payment whose lifetime total equals a
//! target, so it is found with Newton-Raphson on
//!
//! ```text
//! f(p) = p - (1 - a^nm) / (a^(-nm*T/p) - 1) * principal
//! ```
//!
//! where `T` is the target total paid. Paying `p` each period at `m`
//! payments a year for `T / (m*p)` years totals exactly `T`, so the root
//! is the payment that retires the principal in that time.
//!
//! Targets just above the smallest reachable total put the root at very
//! large payments where Newton steps stall or overshoot. When Newton
//! fails, the payment is bisected instead: the lifetime total falls
//! strictly as the payment rises, from unbounded at the minimum payment
//! down to [`formula::minimum_total_paid`].

use crate::core::error::PlanError;
use crate::core::terms::LoanTerms;
use crate::formula;
use crate::plan::payment_plan::PaymentPlan;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Settings for the recommended plan search.
///
/// Both the Newton pass and the bisection fallback get the full
/// iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Stop once successive payment estimates differ by at most this.
    pub tolerance: f64,
    /// Give up with [`PlanError::NonConvergent`] after this many steps.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-6,
            max_iterations: 1000,
        }
    }
}

impl PaymentPlan {
    /// Build the resolved plan whose total paid equals `target_total`,
    /// using the default [`SolverConfig`].
    pub fn plan_from_total_owed(&self, target_total: f64) -> Result<PaymentPlan, PlanError> {
        self.plan_from_total_owed_with(target_total, &SolverConfig::default())
    }

    /// Build the resolved plan whose total paid equals `target_total`.
    ///
    /// Requires a known principal. The search starts from the payment that
    /// retires the principal in one year. Fails with
    /// [`PlanError::UnreachableTotal`] when no payment pays exactly the
    /// target, which on an interest-bearing loan means a target at or
    /// below [`formula::minimum_total_paid`].
    pub fn plan_from_total_owed_with(
        &self,
        target_total: f64,
        config: &SolverConfig,
    ) -> Result<PaymentPlan, PlanError> {
        let principal = self.principal().ok_or(PlanError::NeedPrincipal)?;
        let terms = *self.terms();
        let unreachable = PlanError::UnreachableTotal {
            target: target_total,
            principal,
        };
        if !target_total.is_finite() {
            return Err(unreachable);
        }

        let initial = formula::payment_from_principal_and_time(&terms, principal, 1.0)?;

        let payment = if terms.is_interest_free() {
            // Every payment totals exactly the principal.
            if (target_total - principal).abs() > config.tolerance {
                return Err(unreachable);
            }
            initial
        } else {
            let floor = formula::minimum_total_paid(&terms, principal);
            if principal == 0.0 || target_total <= floor {
                return Err(unreachable);
            }
            newton_payment(
                terms.growth_factor(),
                terms.compounds_per_payment(),
                principal,
                target_total,
                initial,
                config,
            )
            .or_else(|err| {
                debug!("newton search failed ({err}), bisecting the payment instead");
                bisect_payment(&terms, principal, target_total, initial, config)
            })?
        };

        PaymentPlan::new(terms, Some(principal), Some(payment), None)?.resolved()
    }
}

fn newton_payment(
    a: f64,
    nm: f64,
    principal: f64,
    target_total: f64,
    initial: f64,
    config: &SolverConfig,
) -> Result<f64, PlanError> {
    let a_nm = a.powf(nm);
    let ln_a = a.ln();
    let mut payment = initial;

    for iteration in 1..=config.max_iterations {
        let exponent = -nm * target_total / payment;
        let decay = a.powf(exponent);
        let denom = decay - 1.0;

        let f = payment - (1.0 - a_nm) / denom * principal;
        let df = 1.0
            - (a_nm - 1.0) * principal * nm * target_total * ln_a * decay
                / (payment * payment * denom * denom);

        let next = payment - f / df;
        trace!("newton step {iteration}: payment {payment} -> {next}");

        if !next.is_finite() || next <= 0.0 {
            warn!("payment solve left the valid domain at step {iteration} ({next})");
            return Err(PlanError::NonConvergent {
                iterations: iteration,
                last: next,
            });
        }
        if (next - payment).abs() <= config.tolerance {
            debug!("payment solve converged to {next} in {iteration} steps");
            return Ok(next);
        }
        payment = next;
    }

    warn!(
        "payment solve gave up after {} steps at {}",
        config.max_iterations, payment
    );
    Err(PlanError::NonConvergent {
        iterations: config.max_iterations,
        last: payment,
    })
}

/// Bisect the payment whose lifetime total equals `target_total`.
///
/// The bracket starts at the minimum payment, where the total is
/// unbounded, and the upper end doubles from `initial` until its total
/// drops to the target.
fn bisect_payment(
    terms: &LoanTerms,
    principal: f64,
    target_total: f64,
    initial: f64,
    config: &SolverConfig,
) -> Result<f64, PlanError> {
    let total_at = |payment: f64| {
        formula::time_from_principal_and_payment(terms, principal, payment)
            .map_or(f64::INFINITY, |time| {
                terms.payment_frequency() * time * payment
            })
    };

    let mut low = formula::minimum_payment(terms, principal);
    let mut high = initial.max(low);
    let mut iteration = 0;

    while total_at(high) > target_total {
        if iteration == config.max_iterations {
            warn!("no payment bracket found after {iteration} doublings (at {high})");
            return Err(PlanError::NonConvergent {
                iterations: iteration,
                last: high,
            });
        }
        iteration += 1;
        low = high;
        high *= 2.0;
    }

    while iteration < config.max_iterations {
        iteration += 1;
        let mid = 0.5 * (low + high);
        if total_at(mid) > target_total {
            low = mid;
        } else {
            high = mid;
        }
        trace!("bisection step {iteration}: payment in [{low}, {high}]");
        if high - low <= config.tolerance {
            let payment = 0.5 * (low + high);
            debug!("bisection converged to {payment} in {iteration} steps");
            return Ok(payment);
        }
    }

    let last = 0.5 * (low + high);
    warn!(
        "bisection gave up after {} steps at {}",
        config.max_iterations, last
    );
    Err(PlanError::NonConvergent {
        iterations: config.max_iterations,
        last,
    })
}
