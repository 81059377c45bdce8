//! Tradeoff curves between the two unknowns of a one-known plan.
//!
//! With only the principal known, every payoff time has a matching
//! payment; with only the payment known, every payoff time has a matching
//! principal; with only the time known, every payment has a matching
//! principal. A [`TradeoffCurve`] samples one of these relationships.

use crate::core::error::PlanError;
use crate::core::quantity::Quantity;
use crate::core::terms::LoanTerms;
use crate::formula;
use crate::plan::payment_plan::{Known, PaymentPlan, PlanState};

/// Number of samples taken across a payment-axis range.
const PAYMENT_AXIS_SAMPLES: usize = 1000;

/// Most samples a time-axis range may need.
pub const MAX_TRADEOFF_SAMPLES: usize = 100_000;

/// A sampled tradeoff between two unknown quantities.
///
/// The curve is a plain description of the samples; [`points`] builds a
/// fresh lazy iterator each time, so the curve can be walked any number
/// of times.
///
/// [`points`]: TradeoffCurve::points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeoffCurve {
    terms: LoanTerms,
    known: Known,
    x_min: f64,
    step: f64,
    len: usize,
}

impl TradeoffCurve {
    /// Quantity stepped along the x axis.
    pub fn x_axis(&self) -> Quantity {
        match self.known {
            Known::Principal(_) | Known::Payment(_) => Quantity::TimeToPayoff,
            Known::TimeToPayoff(_) => Quantity::Payment,
        }
    }

    /// Quantity solved for at each x.
    pub fn y_axis(&self) -> Quantity {
        match self.known {
            Known::Principal(_) => Quantity::Payment,
            Known::Payment(_) | Known::TimeToPayoff(_) => Quantity::Principal,
        }
    }

    /// Spacing between consecutive x values.
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn points(&self) -> TradeoffPoints {
        TradeoffPoints {
            curve: *self,
            next: 1,
        }
    }

    /// All samples as parallel x and y vectors.
    pub fn series(&self) -> (Vec<f64>, Vec<f64>) {
        self.points().unzip()
    }

    fn y_at(&self, x: f64) -> f64 {
        match self.known {
            Known::Principal(principal) => {
                principal / formula::present_value_factor(&self.terms, x)
            }
            Known::Payment(payment) => formula::present_value_factor(&self.terms, x) * payment,
            Known::TimeToPayoff(time) => formula::present_value_factor(&self.terms, time) * x,
        }
    }
}

/// Iterator over the `(x, y)` samples of a [`TradeoffCurve`].
#[derive(Debug, Clone)]
pub struct TradeoffPoints {
    curve: TradeoffCurve,
    next: usize,
}

impl Iterator for TradeoffPoints {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.curve.len {
            return None;
        }
        let x = self.curve.x_min + self.next as f64 * self.curve.step;
        self.next += 1;
        Some((x, self.curve.y_at(x)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.curve.len.saturating_add(1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TradeoffPoints {}

impl PaymentPlan {
    /// Sample the tradeoff between the two unknowns across `[x_min, x_max]`.
    ///
    /// Requires exactly one known quantity. When the x axis is time, x
    /// advances one payment period per sample; when it is the payment,
    /// the range is split into 1000 samples. Samples start one step above
    /// `x_min` and the last one may pass `x_max` by less than a step.
    /// A time range needing more than [`MAX_TRADEOFF_SAMPLES`] steps is
    /// rejected as [`PlanError::InvalidRange`].
    pub fn graph_values(&self, x_min: f64, x_max: f64) -> Result<TradeoffCurve, PlanError> {
        let known = match self.state() {
            PlanState::Tradeoff { known } => *known,
            other => {
                return Err(PlanError::NeedTwoUnknowns {
                    unknowns: other.unknown_count(),
                })
            }
        };
        if !x_min.is_finite() || !x_max.is_finite() || x_min < 0.0 || x_max <= x_min {
            return Err(PlanError::InvalidRange {
                min: x_min,
                max: x_max,
            });
        }
        if let Known::TimeToPayoff(time) = known {
            if time <= 0.0 {
                return Err(PlanError::NonPositiveTime(time));
            }
        }

        let terms = *self.terms();
        let span = x_max - x_min;
        let (step, len) = match known {
            Known::Principal(_) | Known::Payment(_) => {
                let step = 1.0 / terms.payment_frequency();
                // Guard against span/step landing a hair above an integer.
                let steps = ((span / step) - 1e-9).ceil().max(1.0);
                if steps > MAX_TRADEOFF_SAMPLES as f64 {
                    return Err(PlanError::InvalidRange {
                        min: x_min,
                        max: x_max,
                    });
                }
                (step, steps as usize)
            }
            Known::TimeToPayoff(_) => (span / PAYMENT_AXIS_SAMPLES as f64, PAYMENT_AXIS_SAMPLES),
        };

        Ok(TradeoffCurve {
            terms,
            known,
            x_min,
            step,
            len,
        })
    }
}
