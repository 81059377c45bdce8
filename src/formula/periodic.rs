//! Single-frequency variants: one payment per compounding period.
//!
//! These take the raw rate and frequency rather than [`LoanTerms`] and
//! back the period-by-period schedule simulation.
//!
//! [`LoanTerms`]: crate::core::terms::LoanTerms

use crate::core::error::PlanError;

/// Amount owed after `elapsed` years of paying `payment` each period.
pub fn amount_owed(principal: f64, rate: f64, frequency: f64, elapsed: f64, payment: f64) -> f64 {
    let periods = frequency * elapsed;
    if rate == 0.0 {
        return principal - payment * periods;
    }
    let growth = (1.0 + rate / frequency).powf(periods);
    growth * principal - payment * (growth - 1.0) * frequency / rate
}

/// Years until `payment` each period retires `principal`.
pub fn time_to_pay_off(
    principal: f64,
    rate: f64,
    frequency: f64,
    payment: f64,
) -> Result<f64, PlanError> {
    let minimum = payment_minimum(principal, rate, frequency);
    if payment <= 0.0 {
        return Err(PlanError::PaymentTooLow { payment, minimum });
    }
    if rate == 0.0 {
        return Ok(principal / (payment * frequency));
    }
    let a = 1.0 + rate / frequency;
    let tmp = (1.0 - a) * principal + payment;
    if tmp <= 0.0 {
        return Err(PlanError::PaymentTooLow { payment, minimum });
    }
    Ok((payment.ln() - tmp.ln()) / (frequency * a.ln()))
}

/// Payment each period, made at the end of the period, that retires
/// `principal` in `time` years.
pub fn payment_needed(
    principal: f64,
    rate: f64,
    frequency: f64,
    time: f64,
) -> Result<f64, PlanError> {
    if time <= 0.0 {
        return Err(PlanError::NonPositiveTime(time));
    }
    let periods = frequency * time;
    if rate == 0.0 {
        return Ok(principal / periods);
    }
    let a = 1.0 + rate / frequency;
    Ok(a.powf(periods) * (1.0 - a) / (1.0 - a.powf(periods)) * principal)
}

/// Payment each period, made at the start of the period before interest
/// compounds, that retires `principal` in `time` years.
pub fn payment_in_advance(
    principal: f64,
    rate: f64,
    frequency: f64,
    time: f64,
) -> Result<f64, PlanError> {
    let payment = payment_needed(principal, rate, frequency, time)?;
    Ok(payment / (1.0 + rate / frequency))
}

/// Smallest payment that keeps the balance from growing.
pub fn payment_minimum(principal: f64, rate: f64, frequency: f64) -> f64 {
    rate / frequency * principal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_amount_owed_hits_zero_at_payoff() {
        let time = time_to_pay_off(10_000.0, 0.05, 12.0, 300.0).unwrap();
        assert!(amount_owed(10_000.0, 0.05, 12.0, time, 300.0).abs() < 1e-8);
        assert_eq!(amount_owed(10_000.0, 0.05, 12.0, 0.0, 300.0), 10_000.0);
    }

    #[test]
    fn test_amount_owed_zero_rate() {
        assert_eq!(amount_owed(1200.0, 0.0, 12.0, 0.5, 100.0), 600.0);
    }

    #[test]
    fn test_payment_needed_round_trips() {
        let payment = payment_needed(5_000.0, 0.18, 12.0, 3.0).unwrap();
        let time = time_to_pay_off(5_000.0, 0.18, 12.0, payment).unwrap();
        assert_relative_eq!(time, 3.0, max_relative = 1e-10);
    }

    #[test]
    fn test_payment_in_advance_is_discounted() {
        let arrears = payment_needed(5_000.0, 0.12, 12.0, 2.0).unwrap();
        let advance = payment_in_advance(5_000.0, 0.12, 12.0, 2.0).unwrap();
        assert_relative_eq!(advance * 1.01, arrears, max_relative = 1e-12);
    }

    #[test]
    fn test_low_payment_rejected() {
        assert!(matches!(
            time_to_pay_off(1_000.0, 0.12, 12.0, 9.0),
            Err(PlanError::PaymentTooLow { .. })
        ));
        assert_relative_eq!(payment_minimum(1_000.0, 0.12, 12.0), 10.0, max_relative = 1e-12);
    }
}
