use crate::core::error::PlanError;
use crate::core::quantity::Quantity;
use crate::core::terms::LoanTerms;
use crate::formula;
use log::debug;
use serde::{Deserialize, Serialize};

/// The single quantity known by a plan in the [`PlanState::Tradeoff`] state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "quantity", content = "value", rename_all = "snake_case")]
pub enum Known {
    Principal(f64),
    Payment(f64),
    TimeToPayoff(f64),
}

impl Known {
    pub fn quantity(&self) -> Quantity {
        match self {
            Known::Principal(_) => Quantity::Principal,
            Known::Payment(_) => Quantity::Payment,
            Known::TimeToPayoff(_) => Quantity::TimeToPayoff,
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            Known::Principal(v) | Known::Payment(v) | Known::TimeToPayoff(v) => v,
        }
    }
}

/// Which of principal, payment and time to payoff a plan knows.
///
/// `Overdetermined` and `Resolved` both carry all three values. The first
/// means the caller supplied all three, so there is nothing to resolve;
/// the second means the third value was derived and resolving again is
/// a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlanState {
    Unconstrained,
    Tradeoff {
        known: Known,
    },
    MissingPrincipal {
        payment: f64,
        time_to_payoff: f64,
    },
    MissingPayment {
        principal: f64,
        time_to_payoff: f64,
    },
    MissingTimeToPayoff {
        principal: f64,
        payment: f64,
    },
    Overdetermined {
        principal: f64,
        payment: f64,
        time_to_payoff: f64,
    },
    Resolved {
        principal: f64,
        payment: f64,
        time_to_payoff: f64,
    },
}

impl PlanState {
    fn from_knowns(principal: Option<f64>, payment: Option<f64>, time: Option<f64>) -> Self {
        match (principal, payment, time) {
            (None, None, None) => PlanState::Unconstrained,
            (Some(p), None, None) => PlanState::Tradeoff {
                known: Known::Principal(p),
            },
            (None, Some(p), None) => PlanState::Tradeoff {
                known: Known::Payment(p),
            },
            (None, None, Some(t)) => PlanState::Tradeoff {
                known: Known::TimeToPayoff(t),
            },
            (None, Some(payment), Some(time_to_payoff)) => PlanState::MissingPrincipal {
                payment,
                time_to_payoff,
            },
            (Some(principal), None, Some(time_to_payoff)) => PlanState::MissingPayment {
                principal,
                time_to_payoff,
            },
            (Some(principal), Some(payment), None) => {
                PlanState::MissingTimeToPayoff { principal, payment }
            }
            (Some(principal), Some(payment), Some(time_to_payoff)) => PlanState::Overdetermined {
                principal,
                payment,
                time_to_payoff,
            },
        }
    }

    /// Number of quantities not yet known.
    pub fn unknown_count(&self) -> usize {
        match self {
            PlanState::Unconstrained => 3,
            PlanState::Tradeoff { .. } => 2,
            PlanState::MissingPrincipal { .. }
            | PlanState::MissingPayment { .. }
            | PlanState::MissingTimeToPayoff { .. } => 1,
            PlanState::Overdetermined { .. } | PlanState::Resolved { .. } => 0,
        }
    }

    pub fn principal(&self) -> Option<f64> {
        match *self {
            PlanState::Tradeoff {
                known: Known::Principal(p),
            } => Some(p),
            PlanState::MissingPayment { principal, .. }
            | PlanState::MissingTimeToPayoff { principal, .. }
            | PlanState::Overdetermined { principal, .. }
            | PlanState::Resolved { principal, .. } => Some(principal),
            _ => None,
        }
    }

    pub fn payment(&self) -> Option<f64> {
        match *self {
            PlanState::Tradeoff {
                known: Known::Payment(p),
            } => Some(p),
            PlanState::MissingPrincipal { payment, .. }
            | PlanState::MissingTimeToPayoff { payment, .. }
            | PlanState::Overdetermined { payment, .. }
            | PlanState::Resolved { payment, .. } => Some(payment),
            _ => None,
        }
    }

    pub fn time_to_payoff(&self) -> Option<f64> {
        match *self {
            PlanState::Tradeoff {
                known: Known::TimeToPayoff(t),
            } => Some(t),
            PlanState::MissingPrincipal { time_to_payoff, .. }
            | PlanState::MissingPayment { time_to_payoff, .. }
            | PlanState::Overdetermined { time_to_payoff, .. }
            | PlanState::Resolved { time_to_payoff, .. } => Some(time_to_payoff),
            _ => None,
        }
    }
}

/// A loan's payment plan: terms plus whatever of principal, payment and
/// time to payoff is known.
///
/// Build it with two knowns, [`resolve`](Self::resolve) the third, then
/// query derived values. Plans are plain values; derived plans (such as
/// the recommended plan) are new, independent instances.
///
/// # Examples
///
/// ```
/// use debt_tool::core::terms::LoanTerms;
/// use debt_tool::plan::payment_plan::PaymentPlan;
///
/// let terms = LoanTerms::new(0.05, 12.0, 12.0).unwrap();
/// let mut plan = PaymentPlan::new(terms, Some(10_000.0), Some(300.0), None).unwrap();
/// plan.resolve().unwrap();
///
/// let years = plan.time_to_payoff().unwrap();
/// assert!((years - 3.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    terms: LoanTerms,
    state: PlanState,
}

impl PaymentPlan {
    /// Create a plan from the loan terms and any subset of the three
    /// quantities. Known values must be finite and non-negative.
    pub fn new(
        terms: LoanTerms,
        principal: Option<f64>,
        payment: Option<f64>,
        time_to_payoff: Option<f64>,
    ) -> Result<Self, PlanError> {
        for (quantity, value) in [
            (Quantity::Principal, principal),
            (Quantity::Payment, payment),
            (Quantity::TimeToPayoff, time_to_payoff),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(PlanError::InvalidQuantity { quantity, value });
                }
            }
        }
        Ok(Self {
            terms,
            state: PlanState::from_knowns(principal, payment, time_to_payoff),
        })
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn state(&self) -> &PlanState {
        &self.state
    }

    pub fn principal(&self) -> Option<f64> {
        self.state.principal()
    }

    pub fn payment(&self) -> Option<f64> {
        self.state.payment()
    }

    pub fn time_to_payoff(&self) -> Option<f64> {
        self.state.time_to_payoff()
    }

    pub fn unknown_count(&self) -> usize {
        self.state.unknown_count()
    }

    /// True once all three quantities are known.
    pub fn is_complete(&self) -> bool {
        self.unknown_count() == 0
    }

    /// Derive the single missing quantity.
    ///
    /// Requires exactly one unknown. Calling it again on a resolved plan
    /// does nothing.
    pub fn resolve(&mut self) -> Result<(), PlanError> {
        let (principal, payment, time_to_payoff) = match self.state {
            PlanState::Resolved { .. } => return Ok(()),
            PlanState::MissingPrincipal {
                payment,
                time_to_payoff,
            } => {
                debug!("resolving principal from payment {payment} over {time_to_payoff} years");
                let principal =
                    formula::principal_from_payment_and_time(&self.terms, payment, time_to_payoff)?;
                (principal, payment, time_to_payoff)
            }
            PlanState::MissingPayment {
                principal,
                time_to_payoff,
            } => {
                debug!("resolving payment for principal {principal} over {time_to_payoff} years");
                let payment =
                    formula::payment_from_principal_and_time(&self.terms, principal, time_to_payoff)?;
                (principal, payment, time_to_payoff)
            }
            PlanState::MissingTimeToPayoff { principal, payment } => {
                debug!("resolving time to payoff for principal {principal} at payment {payment}");
                let time_to_payoff =
                    formula::time_from_principal_and_payment(&self.terms, principal, payment)?;
                (principal, payment, time_to_payoff)
            }
            ref other => {
                return Err(PlanError::NeedExactlyOneUnknown {
                    unknowns: other.unknown_count(),
                })
            }
        };

        self.state = PlanState::Resolved {
            principal,
            payment,
            time_to_payoff,
        };
        Ok(())
    }

    /// Consuming form of [`resolve`](Self::resolve).
    pub fn resolved(mut self) -> Result<Self, PlanError> {
        self.resolve()?;
        Ok(self)
    }

    /// `(principal, payment, time_to_payoff)` of a fully known plan.
    pub(crate) fn complete_values(&self) -> Result<(f64, f64, f64), PlanError> {
        match self.state {
            PlanState::Resolved {
                principal,
                payment,
                time_to_payoff,
            }
            | PlanState::Overdetermined {
                principal,
                payment,
                time_to_payoff,
            } => Ok((principal, payment, time_to_payoff)),
            ref other => Err(PlanError::Unresolved {
                unknowns: other.unknown_count(),
            }),
        }
    }

    /// Balance owed `at_time` years into the plan.
    ///
    /// Times outside `[0, time_to_payoff]` extrapolate the formula.
    pub fn owed(&self, at_time: f64) -> Result<f64, PlanError> {
        let (principal, payment, _) = self.complete_values()?;
        Ok(formula::owed_at_time(&self.terms, principal, payment, at_time))
    }

    /// Sum of all payments over the life of the plan.
    pub fn total_paid(&self) -> Result<f64, PlanError> {
        let (_, payment, time_to_payoff) = self.complete_values()?;
        Ok(self.terms.payment_frequency() * time_to_payoff * payment)
    }

    /// Lender's yield, `total_paid / principal - 1`.
    ///
    /// Zero for a plan with nothing borrowed.
    pub fn return_on_investment(&self) -> Result<f64, PlanError> {
        let (principal, _, _) = self.complete_values()?;
        let total = self.total_paid()?;
        if principal == 0.0 {
            return Ok(0.0);
        }
        Ok(total / principal - 1.0)
    }

    /// Payment that only covers interest; the balance never shrinks.
    pub fn minimum_payment(&self) -> Result<f64, PlanError> {
        let principal = self.principal().ok_or(PlanError::NeedPrincipal)?;
        Ok(formula::minimum_payment(&self.terms, principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn monthly() -> LoanTerms {
        LoanTerms::new(0.05, 12.0, 12.0).unwrap()
    }

    #[test]
    fn test_state_from_knowns() {
        let plan = PaymentPlan::new(monthly(), Some(1000.0), None, None).unwrap();
        assert_eq!(plan.unknown_count(), 2);
        assert_eq!(
            plan.state(),
            &PlanState::Tradeoff {
                known: Known::Principal(1000.0)
            }
        );

        let plan = PaymentPlan::new(monthly(), None, Some(50.0), Some(2.0)).unwrap();
        assert_eq!(plan.unknown_count(), 1);
        assert_eq!(plan.principal(), None);
        assert_eq!(plan.payment(), Some(50.0));
        assert_eq!(plan.time_to_payoff(), Some(2.0));
    }

    #[test]
    fn test_resolve_time() {
        let mut plan = PaymentPlan::new(monthly(), Some(10_000.0), Some(300.0), None).unwrap();
        plan.resolve().unwrap();
        let expected =
            formula::time_from_principal_and_payment(&monthly(), 10_000.0, 300.0).unwrap();
        assert_eq!(plan.time_to_payoff(), Some(expected));
        assert!(plan.is_complete());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut plan = PaymentPlan::new(monthly(), Some(10_000.0), None, Some(3.0)).unwrap();
        plan.resolve().unwrap();
        let first = plan;
        plan.resolve().unwrap();
        assert_eq!(plan, first);
    }

    #[test]
    fn test_resolve_rejects_wrong_unknown_count() {
        let mut plan = PaymentPlan::new(monthly(), Some(10_000.0), Some(300.0), Some(3.0)).unwrap();
        assert_eq!(
            plan.resolve(),
            Err(PlanError::NeedExactlyOneUnknown { unknowns: 0 })
        );

        let mut plan = PaymentPlan::new(monthly(), Some(10_000.0), None, None).unwrap();
        assert_eq!(
            plan.resolve(),
            Err(PlanError::NeedExactlyOneUnknown { unknowns: 2 })
        );

        let mut plan = PaymentPlan::new(monthly(), None, None, None).unwrap();
        assert_eq!(
            plan.resolve(),
            Err(PlanError::NeedExactlyOneUnknown { unknowns: 3 })
        );
    }

    #[test]
    fn test_resolve_propagates_payment_too_low() {
        let terms = LoanTerms::new(0.10, 1.0, 1.0).unwrap();
        let mut plan = PaymentPlan::new(terms, Some(1000.0), Some(50.0), None).unwrap();
        assert!(matches!(
            plan.resolve(),
            Err(PlanError::PaymentTooLow { .. })
        ));
        // A failed resolve leaves the plan untouched.
        assert_eq!(plan.unknown_count(), 1);
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        let err = PaymentPlan::new(monthly(), Some(-5.0), Some(10.0), None).unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidQuantity {
                quantity: Quantity::Principal,
                value: -5.0
            }
        );
        assert!(PaymentPlan::new(monthly(), None, Some(f64::INFINITY), Some(1.0)).is_err());
    }

    #[test]
    fn test_totals_and_return() {
        let plan = PaymentPlan::new(monthly(), Some(10_000.0), Some(300.0), None)
            .unwrap()
            .resolved()
            .unwrap();
        let total = plan.total_paid().unwrap();
        assert_relative_eq!(total, 12.0 * plan.time_to_payoff().unwrap() * 300.0);
        assert_relative_eq!(
            plan.return_on_investment().unwrap(),
            total / 10_000.0 - 1.0
        );
        assert!(plan.return_on_investment().unwrap() > 0.0);
    }

    #[test]
    fn test_queries_need_complete_plan() {
        let plan = PaymentPlan::new(monthly(), Some(10_000.0), Some(300.0), None).unwrap();
        assert_eq!(plan.owed(1.0), Err(PlanError::Unresolved { unknowns: 1 }));
        assert_eq!(plan.total_paid(), Err(PlanError::Unresolved { unknowns: 1 }));
    }

    #[test]
    fn test_owed_endpoints() {
        let plan = PaymentPlan::new(monthly(), Some(10_000.0), None, Some(4.0))
            .unwrap()
            .resolved()
            .unwrap();
        assert_relative_eq!(plan.owed(0.0).unwrap(), 10_000.0);
        assert!(plan.owed(4.0).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_minimum_payment_needs_principal() {
        let plan = PaymentPlan::new(monthly(), None, Some(100.0), Some(2.0)).unwrap();
        assert_eq!(plan.minimum_payment(), Err(PlanError::NeedPrincipal));

        let plan = PaymentPlan::new(monthly(), Some(12_000.0), None, None).unwrap();
        assert_relative_eq!(plan.minimum_payment().unwrap(), 50.0, max_relative = 1e-12);
    }
}
