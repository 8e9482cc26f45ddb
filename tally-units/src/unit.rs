//! Unit representation with its factor to the dimension's base unit

use std::fmt;
use serde::{Serialize, Deserialize};
use tally_core::{Number, UnitsError};
use crate::{Dimension, UnitSystem};

/// A unit of measurement belonging to exactly one dimension and one family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// The unit symbol (e.g., "mm", "cm2", "lb", "ea")
    pub symbol: String,
    /// The unit name (e.g., "millimeter", "square inch")
    pub name: String,
    pub dimension: Dimension,
    pub system: UnitSystem,
    /// Exact factor to the base unit (base_value = value * to_base_factor)
    pub to_base_factor: Number,
}

impl Unit {
    pub fn new(
        symbol: &str,
        name: &str,
        dimension: Dimension,
        system: UnitSystem,
        to_base_factor: Number,
    ) -> Self {
        Unit {
            symbol: symbol.to_string(),
            name: name.to_string(),
            dimension,
            system,
            to_base_factor,
        }
    }

    pub fn factor(&self) -> &Number {
        &self.to_base_factor
    }

    /// Factor as f64, for callers that only need an approximation
    pub fn factor_f64(&self) -> Result<f64, UnitsError> {
        self.to_base_factor.to_f64().ok_or_else(|| {
            UnitsError::InvalidQuantity(format!("factor of '{}' is not representable", self.symbol))
        })
    }

    /// Check if this is the base unit of its dimension
    pub fn is_base(&self) -> bool {
        self.to_base_factor == Number::from_i64(1)
    }

    pub fn is_imperial(&self) -> bool {
        self.system == UnitSystem::Imperial
    }

    /// Check if two units can be converted into each other
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Exact value in base units, before any rounding
    pub fn to_base(&self, value: &Number) -> Number {
        value.mul(&self.to_base_factor)
    }

    /// Exact value in this unit for an amount of base units
    pub fn from_base(&self, base_value: &Number) -> Result<Number, UnitsError> {
        Ok(base_value.checked_div(&self.to_base_factor)?)
    }

    /// Convert a value from this unit to another unit of the same dimension
    pub fn convert_to(&self, value: &Number, target: &Unit) -> Result<Number, UnitsError> {
        if !self.is_compatible(target) {
            return Err(UnitsError::dimension_mismatch(
                self.dimension,
                target.dimension,
                target.symbol.clone(),
            ));
        }
        target.from_base(&self.to_base(value))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
