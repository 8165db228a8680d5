//! Conversion of exact fractions into monetary amounts.
//!
//! Each amount is computed from the exact fraction and rounded exactly once,
//! half to even, at the requested precision.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

use super::fraction::Fraction;

/// Minor-unit precision used when the caller does not name one.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// The largest precision a [`Decimal`] can carry.
pub const MAX_DECIMAL_PLACES: u32 = 28;

fn overflow(what: &str) -> EngineError {
    EngineError::invariant(format!("overflow while computing {}", what))
}

fn check_precision(decimal_places: u32) -> EngineResult<()> {
    if decimal_places > MAX_DECIMAL_PLACES {
        return Err(EngineError::invariant(format!(
            "precision of {} decimal places is not representable",
            decimal_places
        )));
    }
    Ok(())
}

/// Checks that `amount` can be counted in units of `10^-decimal_places`.
///
/// Every share is at most the whole amount, so an amount that passes can be
/// split at that precision without overflow.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] on `estate_value` when the amount is
/// too large for the precision, and [`EngineError::ArithmeticInvariantViolation`]
/// when the precision itself is not representable.
pub fn ensure_representable(amount: Decimal, decimal_places: u32) -> EngineResult<()> {
    check_precision(decimal_places)?;
    let unit = Decimal::new(1, decimal_places);
    match amount.checked_div(unit) {
        Some(_) => Ok(()),
        None => Err(EngineError::invalid_input(
            "estate_value",
            format!(
                "{} is too large to divide at {} decimal places",
                amount, decimal_places
            ),
        )),
    }
}

/// Computes `fraction × amount`, rounded half to even at `decimal_places`.
///
/// # Errors
///
/// Returns [`EngineError::ArithmeticInvariantViolation`] if the amount cannot
/// be carried at the requested precision. Callers should screen the amount
/// with [`ensure_representable`] first.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{apply_fraction, Fraction};
/// use rust_decimal::Decimal;
///
/// let amount = apply_fraction(Decimal::new(1000, 0), Fraction::new(3, 7), 2).unwrap();
/// assert_eq!(amount, Decimal::new(42857, 2));
/// ```
pub fn apply_fraction(amount: Decimal, fraction: Fraction, decimal_places: u32) -> EngineResult<Decimal> {
    check_precision(decimal_places)?;

    let numerator = Decimal::try_from_i128_with_scale(fraction.numerator(), 0)
        .map_err(|_| overflow("share numerator"))?;
    let denominator = Decimal::try_from_i128_with_scale(fraction.denominator(), 0)
        .map_err(|_| overflow("share denominator"))?;

    // Multiply first to keep the product exact; divide first only when it would overflow.
    let exact = amount
        .checked_mul(numerator)
        .and_then(|product| product.checked_div(denominator))
        .or_else(|| {
            amount
                .checked_div(denominator)
                .and_then(|quotient| quotient.checked_mul(numerator))
        })
        .ok_or_else(|| overflow("share amount"))?;

    let mut rounded =
        exact.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(decimal_places);
    Ok(rounded)
}

/// The fraction as a percentage with two decimal places. Display only.
pub fn percentage(fraction: Fraction) -> EngineResult<Decimal> {
    apply_fraction(Decimal::ONE_HUNDRED, fraction, 2)
}
