use crate::core::error::PlanError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interest and payment schedule of a loan.
///
/// Immutable once constructed. The rate is the nominal annual rate as a
/// fraction (0.05 for 5%); both frequencies are counts per year and may
/// be fractional.
///
/// # Examples
///
/// ```
/// use debt_tool::core::terms::LoanTerms;
///
/// let terms = LoanTerms::new(0.05, 12.0, 12.0).unwrap();
/// assert!((terms.growth_factor() - (1.0 + 0.05 / 12.0)).abs() < 1e-15);
/// assert_eq!(terms.compounds_per_payment(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTerms")]
pub struct LoanTerms {
    rate: f64,
    compound_frequency: f64,
    payment_frequency: f64,
}

#[derive(Deserialize)]
struct RawTerms {
    rate: f64,
    compound_frequency: f64,
    payment_frequency: f64,
}

impl TryFrom<RawTerms> for LoanTerms {
    type Error = PlanError;

    fn try_from(raw: RawTerms) -> Result<Self, Self::Error> {
        LoanTerms::new(raw.rate, raw.compound_frequency, raw.payment_frequency)
    }
}

impl LoanTerms {
    /// Validate and build loan terms.
    ///
    /// The rate must be finite and non-negative; both frequencies must be
    /// finite and strictly positive.
    pub fn new(
        rate: f64,
        compound_frequency: f64,
        payment_frequency: f64,
    ) -> Result<Self, PlanError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(PlanError::InvalidRate(rate));
        }
        for (name, value) in [
            ("compound", compound_frequency),
            ("payment", payment_frequency),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlanError::InvalidFrequency { name, value });
            }
        }
        Ok(Self {
            rate,
            compound_frequency,
            payment_frequency,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn compound_frequency(&self) -> f64 {
        self.compound_frequency
    }

    pub fn payment_frequency(&self) -> f64 {
        self.payment_frequency
    }

    /// Growth of the balance over one compounding period, `1 + rate/n`.
    pub fn growth_factor(&self) -> f64 {
        1.0 + self.rate / self.compound_frequency
    }

    /// Compounding periods per payment period.
    pub fn compounds_per_payment(&self) -> f64 {
        self.compound_frequency / self.payment_frequency
    }

    /// Compounding periods elapsed over `years`.
    pub fn compounds_over(&self, years: f64) -> f64 {
        self.compound_frequency * years
    }

    /// True when no interest accrues. Closed forms switch to their
    /// `a -> 1` limits in that case.
    pub fn is_interest_free(&self) -> bool {
        self.rate == 0.0
    }
}

impl fmt::Display for LoanTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}% compounded {}x/yr, paid {}x/yr",
            self.rate * 100.0,
            self.compound_frequency,
            self.payment_frequency
        )
    }
}
