//! Conversion engine
//!
//! The only place where a display value becomes a stored integer and back,
//! and where unit prices are normalized to base units. Values are lifted
//! into exact decimals from their shortest f64 form, multiplied by the exact
//! unit factor, and rounded once (half away from zero) on the way to storage.

use tally_core::{Number, UnitsError};
use tracing::{debug, warn};
use crate::{Dimension, ParsedInput, PriceConversion, StoredQuantity, Unit};
use crate::rounding::round_to_integer;
use crate::units::UNITS;

/// Quantize a display value to an integer count of base units.
///
/// `unit` must belong to `dimension`; a unit of another dimension is an
/// unknown unit here, never a guess.
pub fn to_base(dimension: Dimension, value: f64, unit: &str) -> Result<StoredQuantity, UnitsError> {
    let unit = UNITS.lookup(dimension, unit)?;
    let exact = finite(value)?;
    let base_value = round_to_integer(&unit.to_base(&exact))?;

    debug!(%dimension, value, unit = %unit.symbol, base_value, "quantity stored");
    Ok(StoredQuantity::new(base_value, dimension))
}

/// Express a stored quantity in a display unit. No rounding is applied;
/// the caller formats for display.
pub fn from_base(stored: &StoredQuantity, unit: &str) -> Result<f64, UnitsError> {
    let unit = resolve_for(stored.dimension, unit)?;
    let value = unit.from_base(&Number::from_i64(stored.base_value))?;
    to_f64(&value)
}

/// Convert a display value between two units of one dimension, unrounded
pub fn convert(dimension: Dimension, value: f64, from: &str, to: &str) -> Result<f64, UnitsError> {
    let from = UNITS.lookup(dimension, from)?;
    let to = resolve_for(dimension, to)?;
    let exact = finite(value)?;
    to_f64(&from.convert_to(&exact, to)?)
}

/// Normalize a price per display unit to a price per base unit
pub fn unit_price_to_base(
    dimension: Dimension,
    price_per_unit: f64,
    unit: &str,
) -> Result<PriceConversion, UnitsError> {
    let unit = UNITS.lookup(dimension, unit)?;
    let price = finite(price_per_unit)?;
    let price_per_base = to_f64(&price.checked_div(unit.factor())?)?;

    debug!(%dimension, price_per_unit, unit = %unit.symbol, price_per_base, "price normalized");
    Ok(PriceConversion { price_per_base, dimension })
}

/// Store a parsed entry-form value for a field of known dimension.
///
/// The parsed token is resolved within `dimension`. A bare number is taken
/// to be in `default_unit`.
pub fn store_parsed(
    dimension: Dimension,
    parsed: &ParsedInput,
    default_unit: &str,
) -> Result<StoredQuantity, UnitsError> {
    let unit = parsed.unit.as_deref().unwrap_or(default_unit);
    to_base(dimension, parsed.qty, unit)
}

/// Resolve a unit for a quantity of known dimension, telling apart units
/// that do not exist from units of another dimension
pub(crate) fn resolve_for(dimension: Dimension, symbol: &str) -> Result<&'static Unit, UnitsError> {
    match UNITS.get(symbol) {
        Some(unit) if unit.dimension == dimension => Ok(unit),
        Some(unit) => {
            warn!(%dimension, found = %unit.dimension, symbol, "unit dimension mismatch");
            Err(UnitsError::dimension_mismatch(dimension, unit.dimension, symbol))
        }
        None => {
            warn!(%dimension, symbol, "unknown unit");
            Err(UnitsError::unknown_unit(dimension, symbol))
        }
    }
}

fn finite(value: f64) -> Result<Number, UnitsError> {
    if !value.is_finite() {
        warn!(value, "non-finite quantity rejected");
        return Err(UnitsError::InvalidQuantity(format!("{} is not a finite number", value)));
    }
    Ok(Number::from_f64(value)?)
}

fn to_f64(value: &Number) -> Result<f64, UnitsError> {
    value.to_f64().ok_or_else(|| {
        UnitsError::InvalidQuantity(format!("{} is outside the f64 range", value))
    })
}
