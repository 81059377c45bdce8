//! Closed-form amortization formulas.
//!
//! Every function here relates principal, payment and time to payoff for
//! a given set of [`LoanTerms`]. With `a = 1 + rate/n` the growth factor
//! per compounding period, `nm` the compounding periods per payment and
//! `nt` the compounding periods over the horizon:
//!
//! - principal = (a^-nt - 1) / (1 - a^nm) * payment
//! - payment   = (1 - a^nm) / (a^-nt - 1) * principal
//! - time      = -ln((1 - a^nm) * principal / payment + 1) / (n * ln a)
//! - owed(t)   = a^nt * principal - payment * (1 - a^nt) / (1 - a^nm)
//!
//! Exponents are real-valued throughout. Interest-free terms use the
//! limits of the same expressions as `a -> 1`.

pub mod periodic;

use crate::core::error::PlanError;
use crate::core::terms::LoanTerms;

/// Value today of one unit paid every payment period for `time` years.
pub(crate) fn present_value_factor(terms: &LoanTerms, time: f64) -> f64 {
    if terms.is_interest_free() {
        return terms.payment_frequency() * time;
    }
    let a = terms.growth_factor();
    let nm = terms.compounds_per_payment();
    let nt = terms.compounds_over(time);
    (a.powf(-nt) - 1.0) / (1.0 - a.powf(nm))
}

/// Value at `time` of one unit paid every payment period since zero.
fn accumulated_value_factor(terms: &LoanTerms, time: f64) -> f64 {
    if terms.is_interest_free() {
        return terms.payment_frequency() * time;
    }
    let a = terms.growth_factor();
    let nm = terms.compounds_per_payment();
    let nt = terms.compounds_over(time);
    (1.0 - a.powf(nt)) / (1.0 - a.powf(nm))
}

/// Principal that a fixed `payment` retires in exactly `time` years.
pub fn principal_from_payment_and_time(
    terms: &LoanTerms,
    payment: f64,
    time: f64,
) -> Result<f64, PlanError> {
    if time <= 0.0 {
        return Err(PlanError::NonPositiveTime(time));
    }
    Ok(present_value_factor(terms, time) * payment)
}

/// Payment per period that retires `principal` in exactly `time` years.
pub fn payment_from_principal_and_time(
    terms: &LoanTerms,
    principal: f64,
    time: f64,
) -> Result<f64, PlanError> {
    if time <= 0.0 {
        return Err(PlanError::NonPositiveTime(time));
    }
    Ok(principal / present_value_factor(terms, time))
}

/// Years until `payment` per period retires `principal`.
///
/// Fails with [`PlanError::PaymentTooLow`] when the payment does not
/// exceed the interest accrued per payment period: the balance then never
/// reaches zero.
pub fn time_from_principal_and_payment(
    terms: &LoanTerms,
    principal: f64,
    payment: f64,
) -> Result<f64, PlanError> {
    if principal == 0.0 {
        return Ok(0.0);
    }
    let too_low = || PlanError::PaymentTooLow {
        payment,
        minimum: minimum_payment(terms, principal),
    };
    if payment <= 0.0 {
        return Err(too_low());
    }
    if terms.is_interest_free() {
        return Ok(principal / (payment * terms.payment_frequency()));
    }

    let a = terms.growth_factor();
    let nm = terms.compounds_per_payment();
    let tmp = (1.0 - a.powf(nm)) * principal / payment + 1.0;
    if tmp <= 0.0 {
        return Err(too_low());
    }
    Ok(-tmp.ln() / (terms.compound_frequency() * a.ln()))
}

/// Payment that exactly offsets one payment period of interest.
///
/// Any payment at or below this leaves the balance flat or growing.
pub fn minimum_payment(terms: &LoanTerms, principal: f64) -> f64 {
    let a = terms.growth_factor();
    (a.powf(terms.compounds_per_payment()) - 1.0) * principal
}

/// Smallest lifetime total any payment can reach on `principal`.
///
/// As the payment grows the plan shrinks towards a single instant, but
/// the fractional period still accrues interest, so the total paid
/// approaches `principal * (a^nm - 1) / (nm * ln a)` from above and
/// never reaches it. Interest-free terms always total the principal.
pub fn minimum_total_paid(terms: &LoanTerms, principal: f64) -> f64 {
    if terms.is_interest_free() {
        return principal;
    }
    let a = terms.growth_factor();
    let nm = terms.compounds_per_payment();
    principal * (a.powf(nm) - 1.0) / (nm * a.ln())
}

/// Balance after `time` years of paying `payment` per period.
///
/// Defined for any `time`; outside `[0, time_to_payoff]` the formula
/// extrapolates (negative balances past payoff).
pub fn owed_at_time(terms: &LoanTerms, principal: f64, payment: f64, time: f64) -> f64 {
    let growth = if terms.is_interest_free() {
        1.0
    } else {
        terms.growth_factor().powf(terms.compounds_over(time))
    };
    growth * principal - payment * accumulated_value_factor(terms, time)
}
