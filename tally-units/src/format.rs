//! Display formatting for stored quantities and money

use tally_core::{Number, UnitsError};
use crate::{DisplayOptions, DisplayQuantity, StoredQuantity};
use crate::convert::resolve_for;
use crate::rounding::{round_half_away, round_places};

/// Render a stored quantity in a display unit: `"12.50 kg"`, `"7 ea"`.
///
/// Counts are rendered as plain integers, everything else with
/// `quantity_decimals` places.
pub fn format_quantity(
    stored: &StoredQuantity,
    unit: &str,
    options: &DisplayOptions,
) -> Result<String, UnitsError> {
    let unit = resolve_for(stored.dimension, unit)?;
    let exact = unit.from_base(&Number::from_i64(stored.base_value))?;
    let value = format_value(&exact, stored.dimension.is_count(), options.quantity_decimals)?;
    Ok(format!("{} {}", value, unit.symbol))
}

/// Render a display quantity with the same rules as `format_quantity`
pub fn format_display(quantity: &DisplayQuantity, options: &DisplayOptions) -> Result<String, UnitsError> {
    let exact = Number::from_f64(quantity.value)?;
    let value = format_value(&exact, quantity.dimension().is_count(), options.quantity_decimals)?;
    Ok(format!("{} {}", value, quantity.unit.symbol))
}

/// Render an amount of money with `money_decimals` places
pub fn format_money(amount: f64, options: &DisplayOptions) -> Result<String, UnitsError> {
    let exact = Number::from_f64(amount)?;
    Ok(round_places(&exact, options.money_decimals)?.as_decimal(options.money_decimals))
}

fn format_value(exact: &Number, is_count: bool, places: u32) -> Result<String, UnitsError> {
    if is_count {
        Ok(round_half_away(exact).as_decimal(0))
    } else {
        Ok(round_places(exact, places)?.as_decimal(places))
    }
}
