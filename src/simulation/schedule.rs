//! Period-by-period simulation of a repayment schedule.
//!
//! Unlike the closed forms, the simulation pays each period's amount
//! before interest compounds, stops exactly when the balance is cleared,
//! and can scale payments with the outstanding balance.

use crate::core::error::PlanError;
use crate::core::quantity::Quantity;
use crate::core::terms::LoanTerms;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Balances within this fraction of the principal count as paid off.
const SETTLED_FRACTION: f64 = 1e-9;

/// Configuration for a schedule simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Pay at least this fraction of the outstanding balance each period.
    /// The fixed payment then acts as a floor. The share is taken from the
    /// current balance every period, so payments fall as the debt does.
    pub pay_on_owed: Option<f64>,
    /// Give up after this many payment periods.
    pub max_periods: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pay_on_owed: None,
            max_periods: 12_000,
        }
    }
}

/// State of the loan after one simulated payment period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStep {
    pub period: usize,
    /// Years since the start.
    pub time: f64,
    /// Balance carried into the next period.
    pub owed: f64,
    /// Cumulative amount paid.
    pub paid: f64,
}

/// Outcome of a simulated repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub principal: f64,
    /// One entry per period, starting with the untouched principal.
    pub steps: Vec<SimulationStep>,
    /// Years until the balance was cleared.
    pub years: f64,
    pub total_paid: f64,
}

impl Simulation {
    /// Number of payments made.
    pub fn periods(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Lender's yield, `total_paid / principal - 1`.
    pub fn return_on_investment(&self) -> f64 {
        if self.principal == 0.0 {
            return 0.0;
        }
        self.total_paid / self.principal - 1.0
    }
}

/// Simulate paying `payment` at the start of every payment period.
///
/// Fails with [`PlanError::PaymentTooLow`] as soon as the balance rises
/// above the principal or stops moving, and with
/// [`PlanError::NonConvergent`] after `config.max_periods` periods.
pub fn simulate(
    terms: &LoanTerms,
    principal: f64,
    payment: f64,
    config: &SimulationConfig,
) -> Result<Simulation, PlanError> {
    for (quantity, value) in [(Quantity::Principal, principal), (Quantity::Payment, payment)] {
        if !value.is_finite() || value < 0.0 {
            return Err(PlanError::InvalidQuantity { quantity, value });
        }
    }
    let growth = terms
        .growth_factor()
        .powf(terms.compounds_per_payment());
    let frequency = terms.payment_frequency();
    let settled = principal * SETTLED_FRACTION;

    let mut owed = principal;
    let mut paid = 0.0;
    let mut period = 0;
    let mut steps = vec![SimulationStep {
        period,
        time: 0.0,
        owed,
        paid,
    }];

    while owed > 0.0 {
        if period == config.max_periods {
            warn!("schedule still owes {owed} after {period} periods");
            return Err(PlanError::NonConvergent {
                iterations: period,
                last: owed,
            });
        }

        let due = config
            .pay_on_owed
            .map_or(payment, |share| payment.max(share * owed));
        period += 1;

        if owed - due <= settled {
            paid += owed;
            owed = 0.0;
        } else {
            paid += due;
            let next = (owed - due) * growth;
            if next > principal || next == owed {
                debug!("balance {next} never shrinks at payment {due} (period {period})");
                return Err(PlanError::PaymentTooLow {
                    payment,
                    minimum: principal * (1.0 - 1.0 / growth),
                });
            }
            owed = next;
        }

        trace!("period {period}: owed {owed}, paid {paid}");
        steps.push(SimulationStep {
            period,
            time: period as f64 / frequency,
            owed,
            paid,
        });
    }

    Ok(Simulation {
        principal,
        years: period as f64 / frequency,
        total_paid: paid,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::periodic;
    use approx::assert_relative_eq;

    fn monthly(rate: f64) -> LoanTerms {
        LoanTerms::new(rate, 12.0, 12.0).unwrap()
    }

    #[test]
    fn test_fixed_payment_schedule() {
        let sim = simulate(&monthly(0.05), 10_000.0, 300.0, &SimulationConfig::default()).unwrap();
        assert_eq!(sim.periods(), 36);
        assert_relative_eq!(sim.years, 3.0);
        assert_relative_eq!(sim.total_paid, 10_740.527_788_804_897, max_relative = 1e-10);
        assert_eq!(sim.steps.last().unwrap().owed, 0.0);
        assert!(sim.return_on_investment() > 0.0);
    }

    #[test]
    fn test_pay_on_owed_schedule() {
        let config = SimulationConfig {
            pay_on_owed: Some(0.03),
            ..Default::default()
        };
        let sim = simulate(&monthly(0.18), 5_000.0, 50.0, &config).unwrap();
        assert_eq!(sim.periods(), 117);
        assert_relative_eq!(sim.years, 9.75);
        assert_relative_eq!(sim.total_paid, 8_750.950_043_079_856, max_relative = 1e-10);
    }

    #[test]
    fn test_pay_on_owed_follows_balance_down() {
        let config = SimulationConfig {
            pay_on_owed: Some(0.03),
            ..Default::default()
        };
        let sim = simulate(&monthly(0.18), 5_000.0, 50.0, &config).unwrap();
        let payments: Vec<f64> = sim.steps.windows(2).map(|w| w[1].paid - w[0].paid).collect();

        assert_relative_eq!(payments[0], 150.0);
        assert_relative_eq!(payments[1], 147.6825, max_relative = 1e-12);
        // The share shrinks with the balance until the fixed payment floors it.
        assert!(payments[1] < payments[0]);
        assert_relative_eq!(payments[100], 50.0, max_relative = 1e-12);
    }

    #[test]
    fn test_payment_in_advance_clears_on_time() {
        let payment = periodic::payment_in_advance(5_000.0, 0.12, 12.0, 2.0).unwrap();
        let sim = simulate(&monthly(0.12), 5_000.0, payment, &SimulationConfig::default()).unwrap();
        assert_eq!(sim.periods(), 24);
        assert_relative_eq!(sim.total_paid, 24.0 * payment, max_relative = 1e-9);
    }

    #[test]
    fn test_divergent_schedule() {
        let err = simulate(&monthly(0.12), 1_000.0, 5.0, &SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, PlanError::PaymentTooLow { payment, .. } if payment == 5.0));
    }

    #[test]
    fn test_period_cap() {
        let config = SimulationConfig {
            max_periods: 10,
            ..Default::default()
        };
        let err = simulate(&monthly(0.05), 10_000.0, 300.0, &config).unwrap_err();
        assert!(matches!(err, PlanError::NonConvergent { iterations: 10, .. }));
    }

    #[test]
    fn test_nothing_owed() {
        let sim = simulate(&monthly(0.05), 0.0, 100.0, &SimulationConfig::default()).unwrap();
        assert_eq!(sim.periods(), 0);
        assert_eq!(sim.years, 0.0);
        assert_eq!(sim.return_on_investment(), 0.0);
    }
}
