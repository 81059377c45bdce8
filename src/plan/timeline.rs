use crate::core::error::PlanError;
use crate::formula;
use crate::plan::payment_plan::PaymentPlan;
use serde::{Deserialize, Serialize};

/// Most payment periods a timeline will lay out.
pub const MAX_TIMELINE_PERIODS: usize = 12_000;

/// Balance and cumulative payments at one payment date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Years since the start of the plan.
    pub time: f64,
    /// Balance owed after this payment.
    pub owed: f64,
    /// Total paid so far.
    pub paid: f64,
}

/// Payment-by-payment course of a complete plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub points: Vec<TimelinePoint>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&TimelinePoint> {
        self.points.last()
    }
}

impl PaymentPlan {
    /// Balance and cumulative paid at every payment date.
    ///
    /// Starts at `(0, principal, 0)` and adds one point per payment period
    /// until time to payoff is reached. A fractional final period shows up
    /// as a slightly negative closing balance.
    ///
    /// Fails with [`PlanError::TooManyPeriods`] for plans longer than
    /// [`MAX_TIMELINE_PERIODS`] payments.
    pub fn timeline(&self) -> Result<Timeline, PlanError> {
        let (principal, payment, time_to_payoff) = self.complete_values()?;
        let terms = self.terms();
        let frequency = terms.payment_frequency();

        let periods = (time_to_payoff * frequency - 1e-9).ceil().max(0.0);
        if periods > MAX_TIMELINE_PERIODS as f64 {
            return Err(PlanError::TooManyPeriods {
                periods,
                limit: MAX_TIMELINE_PERIODS,
            });
        }
        let periods = periods as usize;
        let points = (0..=periods)
            .map(|k| {
                let time = k as f64 / frequency;
                TimelinePoint {
                    time,
                    owed: formula::owed_at_time(terms, principal, payment, time),
                    paid: k as f64 * payment,
                }
            })
            .collect();

        Ok(Timeline { points })
    }
}
