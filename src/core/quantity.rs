use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three quantities a payment plan relates.
///
/// A plan knows some of these and derives the rest from the loan terms.
/// The `Display` form is the axis label used for tradeoff curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Initial amount owed.
    Principal,
    /// Amount paid each payment period.
    Payment,
    /// Years until the balance reaches zero.
    TimeToPayoff,
}

impl Quantity {
    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Principal => "Principal",
            Quantity::Payment => "Payment",
            Quantity::TimeToPayoff => "Time To Payoff",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
