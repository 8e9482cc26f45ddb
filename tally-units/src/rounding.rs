//! Rounding policy
//!
//! Store-time quantization rounds half away from zero: 0.5 -> 1, -0.5 -> -1,
//! 2.5 -> 3, never to even. The conversion engine applies `round_to_integer`
//! in exactly one place, when a display value becomes a stored base value.
//! Display formatting uses `round_to_places` with its own decimal-places rule.

use tally_core::{Number, UnitsError};

/// Round to the nearest integer, ties away from zero
pub fn round_half_away(x: &Number) -> Number {
    let magnitude = x.abs();
    let whole = magnitude.floor();
    let twice_fraction = magnitude.sub(&whole).mul(&Number::from_i64(2));

    let rounded = if twice_fraction >= Number::from_i64(1) {
        whole.add(&Number::from_i64(1))
    } else {
        whole
    };

    if x.is_negative() {
        rounded.neg()
    } else {
        rounded
    }
}

/// Round to a storable integer
pub fn round_to_integer(x: &Number) -> Result<i64, UnitsError> {
    round_half_away(x).to_i64().ok_or_else(|| {
        UnitsError::InvalidQuantity(format!("{} is outside the storable range", x))
    })
}

/// Round to `places` decimal places, ties away from zero
pub fn round_places(x: &Number, places: u32) -> Result<Number, UnitsError> {
    let scale = Number::from_i64(10).pow(places);
    Ok(round_half_away(&x.mul(&scale)).checked_div(&scale)?)
}

/// Display rounding for f64 values. Works on the shortest decimal form of
/// `x`, so 1.005 rounds to 1.01 even though the f64 is slightly below it.
pub fn round_to_places(x: f64, places: u32) -> Result<f64, UnitsError> {
    let exact = Number::from_f64(x)?;
    round_places(&exact, places)?.to_f64().ok_or_else(|| {
        UnitsError::InvalidQuantity(format!("{} cannot be represented after rounding", x))
    })
}
