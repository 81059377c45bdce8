use crate::core::error::PlanError;
use crate::plan::payment_plan::PaymentPlan;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display view of a complete payment plan.
///
/// Amounts are rounded to cents; the plan itself keeps full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub rate: f64,
    pub compound_frequency: f64,
    pub payment_frequency: f64,
    pub principal: Decimal,
    pub payment: Decimal,
    /// Years, to two decimal places.
    pub time_to_payoff: Decimal,
    pub total_paid: Decimal,
    /// Lender's return as a percentage of principal.
    pub return_on_investment: Decimal,
}

impl PlanSummary {
    /// Summarize a plan with all three quantities known.
    pub fn from_plan(plan: &PaymentPlan) -> Result<Self, PlanError> {
        let (principal, payment, time_to_payoff) = plan.complete_values()?;
        let terms = plan.terms();
        Ok(PlanSummary {
            rate: terms.rate(),
            compound_frequency: terms.compound_frequency(),
            payment_frequency: terms.payment_frequency(),
            principal: cents(principal),
            payment: cents(payment),
            time_to_payoff: cents(time_to_payoff),
            total_paid: cents(plan.total_paid()?),
            return_on_investment: cents(100.0 * plan.return_on_investment()?),
        })
    }
}

fn cents(value: f64) -> Decimal {
    let mut amount = Decimal::from_f64_retain(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2);
    amount.rescale(2);
    amount
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Interest: {:.2}", self.rate)?;
        writeln!(f, "Compound Frequency: {:.2}", self.compound_frequency)?;
        writeln!(f, "Payment Frequency: {:.2}", self.payment_frequency)?;
        writeln!(f, "Principal: {}", self.principal)?;
        writeln!(f, "Payment: {}", self.payment)?;
        writeln!(f, "Time to Payoff: {}", self.time_to_payoff)?;
        writeln!(f, "Total Paid: {}", self.total_paid)?;
        write!(f, "Return on Investment: {}%", self.return_on_investment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::terms::LoanTerms;
    use rust_decimal_macros::dec;

    fn resolved() -> PaymentPlan {
        let terms = LoanTerms::new(0.05, 12.0, 12.0).unwrap();
        PaymentPlan::new(terms, Some(10_000.0), Some(300.0), None)
            .unwrap()
            .resolved()
            .unwrap()
    }

    #[test]
    fn test_summary_rounds_to_cents() {
        let summary = PlanSummary::from_plan(&resolved()).unwrap();
        assert_eq!(summary.principal, dec!(10000.00));
        assert_eq!(summary.payment, dec!(300.00));
        assert_eq!(summary.time_to_payoff, dec!(3.00));
        assert_eq!(summary.total_paid, dec!(10788.70));
        assert_eq!(summary.return_on_investment, dec!(7.89));
    }

    #[test]
    fn test_summary_display() {
        let text = PlanSummary::from_plan(&resolved()).unwrap().to_string();
        assert_eq!(
            text,
            "Interest: 0.05\n\
             Compound Frequency: 12.00\n\
             Payment Frequency: 12.00\n\
             Principal: 10000.00\n\
             Payment: 300.00\n\
             Time to Payoff: 3.00\n\
             Total Paid: 10788.70\n\
             Return on Investment: 7.89%"
        );
    }

    #[test]
    fn test_summary_needs_complete_plan() {
        let terms = LoanTerms::new(0.05, 12.0, 12.0).unwrap();
        let plan = PaymentPlan::new(terms, Some(10_000.0), Some(300.0), None).unwrap();
        assert_eq!(
            PlanSummary::from_plan(&plan),
            Err(PlanError::Unresolved { unknowns: 1 })
        );
    }

    #[test]
    fn test_summary_json_uses_string_amounts() {
        let json = serde_json::to_value(PlanSummary::from_plan(&resolved()).unwrap()).unwrap();
        assert_eq!(json["total_paid"], "10788.70");
        assert_eq!(json["compound_frequency"], 12.0);
    }
}
