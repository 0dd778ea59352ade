//! Scaled-integer amounts
//!
//! Tink encodes money as an unscaled integer and a power-of-ten scale, so
//! `{"unscaledValue": "-1250", "scale": "2"}` is `-12.50`.

use rust_decimal::{Decimal, RoundingStrategy};

use super::transaction::RecordError;

/// Decimal places kept after normalisation
pub const AMOUNT_DP: u32 = 2;

/// Convert `unscaled × 10^(-scale)` into a decimal rounded to two places.
///
/// A negative scale multiplies by `10^|scale|`. The sign of `unscaled` is kept.
///
/// # Errors
/// Will return an error if the scale is outside what a `Decimal` can hold.
pub fn normalize(unscaled: i64, scale: i64) -> Result<Decimal, RecordError> {
    let out_of_range = || RecordError::InvalidValue {
        field: "amount.value.scale",
        value: scale.to_string(),
    };

    if scale == 0 {
        return Ok(Decimal::from(unscaled));
    }

    if scale < 0 {
        let exponent = u32::try_from(-scale).map_err(|_| out_of_range())?;
        let factor = 10_i64.checked_pow(exponent).ok_or_else(out_of_range)?;
        return Decimal::from(unscaled)
            .checked_mul(Decimal::from(factor))
            .ok_or_else(out_of_range);
    }

    let scale = u32::try_from(scale).map_err(|_| out_of_range())?;
    let value = Decimal::try_new(unscaled, scale).map_err(|_| out_of_range())?;

    Ok(value.round_dp_with_strategy(AMOUNT_DP, RoundingStrategy::MidpointAwayFromZero))
}
