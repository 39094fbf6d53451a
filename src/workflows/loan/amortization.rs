//! Equated monthly installment arithmetic.

/// Reducing-balance EMI rounded to two decimal places.
///
/// A zero tenure yields the full principal; a zero rate spreads the principal
/// evenly across the tenure. Tenures long enough to overflow the compounding
/// factor converge on interest-only repayment.
pub fn monthly_installment(principal: u64, tenure_months: u32, annual_rate_percent: f64) -> f64 {
    let principal = principal as f64;
    if tenure_months == 0 {
        return round_currency(principal);
    }

    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    if monthly_rate == 0.0 {
        return round_currency(principal / f64::from(tenure_months));
    }

    let growth = i32::try_from(tenure_months)
        .map(|periods| (1.0 + monthly_rate).powi(periods))
        .unwrap_or(f64::INFINITY);
    if !growth.is_finite() {
        return round_currency(principal * monthly_rate);
    }
    round_currency(principal * monthly_rate * growth / (growth - 1.0))
}

/// Tolerance, in cents, for binary representation error when a value sits on a
/// half cent.
const HALF_CENT_TOLERANCE: f64 = 1e-6;

/// Rounds to two decimal places with halves going away from zero.
///
/// Decimal halves such as `1.005` are stored slightly below the half in binary;
/// values within `HALF_CENT_TOLERANCE` cents of a half are treated as the half.
pub fn round_currency(amount: f64) -> f64 {
    let cents = amount * 100.0;
    (cents + HALF_CENT_TOLERANCE.copysign(cents)).round() / 100.0
}
