//! Tally Units - Quantity normalization for stock, recipes and costing
//!
//! Turns human-entered quantities into integer base-unit values for
//! storage, renders them back in any unit of the same dimension, and
//! normalizes unit prices so costs entered per pound and per kilogram can
//! be compared and summed.
//!
//! Dimensions and base units:
//! - Length (mm): mm, cm, m, km, in, ft, yd, mi
//! - Area (mm²): mm2, cm2, m2, ha, km2, in2, ft2, yd2, acre
//! - Volume (mm³): mm3, cm3, ml, l, m3, in3, fl_oz, pt, qt, gal, ft3, yd3
//! - Weight (mg): mg, g, kg, t, gr, oz, lb, st
//! - Count (ea): ea
//!
//! ```
//! use tally_units::{parse_quantity, store_parsed, from_base, Dimension};
//!
//! let parsed = parse_quantity("5'").unwrap();
//! let stored = store_parsed(Dimension::Length, &parsed, "mm").unwrap();
//! assert_eq!(stored.base_value, 1524);
//! assert!((from_base(&stored, "in").unwrap() - 60.0).abs() < 1e-9);
//! ```

mod dimension;
mod unit;
mod units;
mod rounding;
mod quantity;
mod convert;
mod parse;
mod config;
mod format;

pub use dimension::{Dimension, UnitSystem};
pub use unit::Unit;
pub use units::{
    UNITS, UnitRegistry, UnitGroups, normalize_symbol,
    units_for, dimension_of, is_imperial, factor_to_base, base_unit,
};
pub use rounding::{round_half_away, round_to_integer, round_places, round_to_places};
pub use quantity::{DisplayQuantity, StoredQuantity, PriceConversion};
pub use convert::{to_base, from_base, convert, unit_price_to_base, store_parsed};
pub use parse::{parse_quantity, ParsedInput, InputSystem};
pub use config::{DisplayOptions, ENV_UNIT_SYSTEM, ENV_QUANTITY_DECIMALS, ENV_MONEY_DECIMALS};
pub use format::{format_quantity, format_display, format_money};

pub use tally_core::{UnitsError, ErrorReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_form_flow() {
        let options = DisplayOptions::default();
        let parsed = parse_quantity("1,250 g").unwrap();
        let default_unit = options.default_unit(Dimension::Weight);
        let stored = store_parsed(Dimension::Weight, &parsed, &default_unit.symbol).unwrap();

        assert_eq!(stored, StoredQuantity::new(1_250_000, Dimension::Weight));
        assert_eq!(format_quantity(&stored, "kg", &options).unwrap(), "1.25 kg");
    }

    #[test]
    fn test_costing_flow() {
        // Recipe needs 750 g of an ingredient priced at $4.00/kg
        let required = to_base(Dimension::Weight, 750.0, "g").unwrap();
        let price = unit_price_to_base(Dimension::Weight, 4.0, "kg").unwrap();
        let cost = price.total_for(&required).unwrap();
        assert_eq!(format_money(cost, &DisplayOptions::default()).unwrap(), "3.00");
    }

    #[test]
    fn test_error_report_for_rejected_entry() {
        let parsed = parse_quantity("5 kg").unwrap();
        let err = store_parsed(Dimension::Length, &parsed, "mm").unwrap_err();
        let report = ErrorReport::from(&err);
        assert_eq!(report.code, "UNKNOWN_UNIT");
        assert_eq!(report.message, "unknown unit 'KG' for length");
    }

    #[test]
    fn test_registry_is_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || to_base(Dimension::Length, i as f64, "ft").unwrap())
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let stored = handle.join().unwrap();
            assert_eq!(stored.base_value, (i as f64 * 304.8).round() as i64);
        }
    }
}
