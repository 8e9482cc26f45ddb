//! Quantity types - display amounts, stored base amounts, normalized prices

use std::fmt;
use serde::{Serialize, Deserialize};
use tally_core::{Number, UnitsError};
use crate::{convert, Dimension, Unit};
use crate::convert::resolve_for;
use crate::units::UNITS;

/// A human-facing amount in any unit of its dimension
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayQuantity {
    pub value: f64,
    pub unit: &'static Unit,
}

impl DisplayQuantity {
    /// Create a display quantity, resolving `unit` within `dimension`.
    /// NaN and infinities are rejected.
    pub fn new(dimension: Dimension, value: f64, unit: &str) -> Result<Self, UnitsError> {
        if !value.is_finite() {
            return Err(UnitsError::InvalidQuantity(format!("{} is not a finite number", value)));
        }
        let unit = UNITS.lookup(dimension, unit)?;
        Ok(DisplayQuantity { value, unit })
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension
    }

    /// Quantize to the stored form
    pub fn to_stored(&self) -> Result<StoredQuantity, UnitsError> {
        convert::to_base(self.dimension(), self.value, &self.unit.symbol)
    }

    /// Same amount expressed in another unit of the dimension
    pub fn convert_to(&self, unit: &str) -> Result<DisplayQuantity, UnitsError> {
        let target = resolve_for(self.dimension(), unit)?;
        let value = convert::convert(self.dimension(), self.value, &self.unit.symbol, &target.symbol)?;
        Ok(DisplayQuantity { value, unit: target })
    }
}

impl fmt::Display for DisplayQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol)
    }
}

/// The persisted form of a quantity: an integer count of base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredQuantity {
    pub base_value: i64,
    pub dimension: Dimension,
}

impl StoredQuantity {
    pub fn new(base_value: i64, dimension: Dimension) -> Self {
        StoredQuantity { base_value, dimension }
    }

    pub fn zero(dimension: Dimension) -> Self {
        StoredQuantity { base_value: 0, dimension }
    }

    pub fn base_unit(&self) -> &'static Unit {
        UNITS.base_unit(self.dimension)
    }

    /// Render in a display unit; no rounding is applied
    pub fn to_display(&self, unit: &str) -> Result<DisplayQuantity, UnitsError> {
        let value = convert::from_base(self, unit)?;
        let unit = resolve_for(self.dimension, unit)?;
        Ok(DisplayQuantity { value, unit })
    }

    /// Sum two stored quantities of the same dimension
    pub fn checked_add(&self, other: &StoredQuantity) -> Result<StoredQuantity, UnitsError> {
        if self.dimension != other.dimension {
            return Err(UnitsError::dimension_mismatch(
                self.dimension,
                other.dimension,
                other.base_unit().symbol.clone(),
            ));
        }
        let base_value = self.base_value.checked_add(other.base_value).ok_or_else(|| {
            UnitsError::InvalidQuantity("sum is outside the storable range".to_string())
        })?;
        Ok(StoredQuantity::new(base_value, self.dimension))
    }
}

impl fmt::Display for StoredQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base_value, self.dimension.base_symbol())
    }
}

/// A unit price normalized to the base unit of its dimension.
///
/// `price_per_base * stored.base_value` is the total cost no matter which
/// display unit the price was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceConversion {
    pub price_per_base: f64,
    pub dimension: Dimension,
}

impl PriceConversion {
    /// Total cost of a stored quantity at this price. The product is taken
    /// exactly and rounded to f64 once.
    pub fn total_for(&self, stored: &StoredQuantity) -> Result<f64, UnitsError> {
        if stored.dimension != self.dimension {
            return Err(UnitsError::dimension_mismatch(
                self.dimension,
                stored.dimension,
                stored.base_unit().symbol.clone(),
            ));
        }
        let total = Number::from_f64(self.price_per_base)?.mul(&Number::from_i64(stored.base_value));
        total.to_f64().ok_or_else(|| {
            UnitsError::InvalidQuantity(format!("total for {} is outside the f64 range", stored))
        })
    }

    /// Price per display unit (the inverse of `unit_price_to_base`)
    pub fn per_unit(&self, unit: &str) -> Result<f64, UnitsError> {
        let unit = UNITS.lookup(self.dimension, unit)?;
        Ok(self.price_per_base * unit.factor_f64()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quantity_resolves_unit() {
        let q = DisplayQuantity::new(Dimension::Length, 2.5, "M").unwrap();
        assert_eq!(q.unit.symbol, "m");
        assert_eq!(q.to_string(), "2.5 m");
        assert!(DisplayQuantity::new(Dimension::Length, 2.5, "kg").is_err());
    }

    #[test]
    fn test_display_quantity_rejects_non_finite() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = DisplayQuantity::new(Dimension::Weight, v, "kg").unwrap_err();
            assert!(matches!(err, UnitsError::InvalidQuantity(_)));
        }
    }

    #[test]
    fn test_display_to_stored() {
        let q = DisplayQuantity::new(Dimension::Weight, 1.5, "kg").unwrap();
        assert_eq!(q.to_stored().unwrap(), StoredQuantity::new(1_500_000, Dimension::Weight));
    }

    #[test]
    fn test_display_convert_to() {
        let q = DisplayQuantity::new(Dimension::Length, 1.0, "ft").unwrap();
        let inches = q.convert_to("in").unwrap();
        assert_eq!(inches.unit.symbol, "in");
        assert!((inches.value - 12.0).abs() < 1e-9);

        let err = q.convert_to("kg").unwrap_err();
        assert_eq!(err, UnitsError::dimension_mismatch(Dimension::Length, Dimension::Weight, "kg"));
        assert!(matches!(q.convert_to("furlong"), Err(UnitsError::UnknownUnit { .. })));
    }

    #[test]
    fn test_stored_to_display() {
        let stored = StoredQuantity::new(2_540, Dimension::Length);
        let q = stored.to_display("cm").unwrap();
        assert!((q.value - 254.0).abs() < 1e-9);
        assert!(stored.to_display("lb").is_err());
    }

    #[test]
    fn test_checked_add() {
        let a = StoredQuantity::new(500, Dimension::Weight);
        let b = StoredQuantity::new(250, Dimension::Weight);
        assert_eq!(a.checked_add(&b).unwrap().base_value, 750);

        let c = StoredQuantity::new(1, Dimension::Count);
        assert!(matches!(a.checked_add(&c), Err(UnitsError::DimensionMismatch { .. })));

        let max = StoredQuantity::new(i64::MAX, Dimension::Count);
        assert!(max.checked_add(&c).is_err());
    }

    #[test]
    fn test_stored_serialized_shape() {
        let stored = StoredQuantity::new(1969000, Dimension::Area);
        let json = serde_json::to_value(stored).unwrap();
        assert_eq!(json["base_value"], 1969000);
        assert_eq!(json["dimension"], "area");
        assert_eq!(stored.to_string(), "1969000 mm2");
    }

    #[test]
    fn test_price_total_rejects_other_dimension() {
        let price = PriceConversion { price_per_base: 0.01, dimension: Dimension::Weight };
        let stored = StoredQuantity::new(100, Dimension::Volume);
        assert!(price.total_for(&stored).is_err());
    }

    #[test]
    fn test_price_total_beyond_f64_integers() {
        // 2^53 + 1 is not an f64; the exact product rounds to the nearest f64
        let price = PriceConversion { price_per_base: 3.0, dimension: Dimension::Count };
        let stored = StoredQuantity::new(9_007_199_254_740_993, Dimension::Count);
        assert_eq!(price.total_for(&stored).unwrap(), 27_021_597_764_222_980.0);
    }

    #[test]
    fn test_price_per_unit() {
        let price = PriceConversion { price_per_base: 0.002, dimension: Dimension::Weight };
        assert!((price.per_unit("g").unwrap() - 2.0).abs() < 1e-12);
        assert!(price.per_unit("ea").is_err());
    }
}
