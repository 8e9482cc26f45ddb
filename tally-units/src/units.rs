//! Unit registry - the static tables of every unit the engine accepts
//!
//! Length and weight units carry literal factors. Area and volume units are
//! derived from the length table (square or cube of a length factor times an
//! exact rational multiplier) when the registry is built, so retuning a
//! length factor moves every dependent area and volume factor with it.

use std::collections::HashMap;
use std::sync::LazyLock;
use serde::Serialize;
use tally_core::{Number, UnitsError};
use tracing::warn;
use crate::{Dimension, Unit, UnitSystem};

/// Global unit registry, built once on first use and never mutated
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(|| {
    UnitRegistry::build().expect("built-in unit tables hold valid decimal factors")
});

/// Millimeters per international inch
const MM_PER_INCH: &str = "25.4";

/// Milligrams per international avoirdupois pound
const MG_PER_POUND: &str = "453592.37";

// (symbol, name, factor to mm)
const METRIC_LENGTH: [(&str, &str, i64); 4] = [
    ("mm", "millimeter", 1),
    ("cm", "centimeter", 10),
    ("m", "meter", 1_000),
    ("km", "kilometer", 1_000_000),
];

// (symbol, name, inches)
const IMPERIAL_LENGTH: [(&str, &str, i64); 4] = [
    ("in", "inch", 1),
    ("ft", "foot", 12),
    ("yd", "yard", 36),
    ("mi", "mile", 63_360),
];

// (symbol, name, factor to mg)
const METRIC_WEIGHT: [(&str, &str, i64); 4] = [
    ("mg", "milligram", 1),
    ("g", "gram", 1_000),
    ("kg", "kilogram", 1_000_000),
    ("t", "tonne", 1_000_000_000),
];

// (symbol, name, pounds as numerator/denominator)
const IMPERIAL_WEIGHT: [(&str, &str, i64, i64); 4] = [
    ("gr", "grain", 1, 7_000),
    ("oz", "ounce", 1, 16),
    ("lb", "pound", 1, 1),
    ("st", "stone", 14, 1),
];

/// A unit derived from a power of a length unit
struct Derived {
    symbol: &'static str,
    name: &'static str,
    system: UnitSystem,
    length: &'static str,
    num: i64,
    den: i64,
}

const fn derived(
    symbol: &'static str,
    name: &'static str,
    system: UnitSystem,
    length: &'static str,
    num: i64,
    den: i64,
) -> Derived {
    Derived { symbol, name, system, length, num, den }
}

const AREA: &[Derived] = &[
    derived("mm2", "square millimeter", UnitSystem::Metric, "mm", 1, 1),
    derived("cm2", "square centimeter", UnitSystem::Metric, "cm", 1, 1),
    derived("m2", "square meter", UnitSystem::Metric, "m", 1, 1),
    derived("ha", "hectare", UnitSystem::Metric, "m", 10_000, 1),
    derived("km2", "square kilometer", UnitSystem::Metric, "km", 1, 1),
    derived("in2", "square inch", UnitSystem::Imperial, "in", 1, 1),
    derived("ft2", "square foot", UnitSystem::Imperial, "ft", 1, 1),
    derived("yd2", "square yard", UnitSystem::Imperial, "yd", 1, 1),
    derived("acre", "acre", UnitSystem::Imperial, "ft", 43_560, 1),
];

// US customary liquid measures are defined in cubic inches (gal = 231 in³)
const VOLUME: &[Derived] = &[
    derived("mm3", "cubic millimeter", UnitSystem::Metric, "mm", 1, 1),
    derived("cm3", "cubic centimeter", UnitSystem::Metric, "cm", 1, 1),
    derived("ml", "milliliter", UnitSystem::Metric, "cm", 1, 1),
    derived("l", "liter", UnitSystem::Metric, "cm", 1_000, 1),
    derived("m3", "cubic meter", UnitSystem::Metric, "m", 1, 1),
    derived("in3", "cubic inch", UnitSystem::Imperial, "in", 1, 1),
    derived("fl_oz", "US fluid ounce", UnitSystem::Imperial, "in", 231, 128),
    derived("pt", "US pint", UnitSystem::Imperial, "in", 231, 8),
    derived("qt", "US quart", UnitSystem::Imperial, "in", 231, 4),
    derived("gal", "US gallon", UnitSystem::Imperial, "in", 231, 1),
    derived("ft3", "cubic foot", UnitSystem::Imperial, "ft", 1, 1),
    derived("yd3", "cubic yard", UnitSystem::Imperial, "yd", 1, 1),
];

const ALIASES: &[(&str, &str)] = &[
    // length
    ("millimeter", "mm"), ("millimeters", "mm"), ("centimeter", "cm"), ("centimeters", "cm"),
    ("meter", "m"), ("meters", "m"), ("metre", "m"), ("metres", "m"),
    ("inch", "in"), ("inches", "in"), ("foot", "ft"), ("feet", "ft"),
    ("yard", "yd"), ("yards", "yd"), ("mile", "mi"), ("miles", "mi"),
    // area
    ("sq_in", "in2"), ("sqin", "in2"), ("sq_ft", "ft2"), ("sqft", "ft2"),
    ("sq_yd", "yd2"), ("sq_m", "m2"), ("sqm", "m2"), ("acres", "acre"),
    // volume
    ("cc", "cm3"), ("liter", "l"), ("liters", "l"), ("litre", "l"), ("litres", "l"),
    ("floz", "fl_oz"), ("gallon", "gal"), ("gallons", "gal"), ("cu_in", "in3"), ("cu_ft", "ft3"),
    // weight
    ("gram", "g"), ("grams", "g"), ("kilogram", "kg"), ("kilograms", "kg"),
    ("pound", "lb"), ("pounds", "lb"), ("lbs", "lb"), ("ounce", "oz"), ("ounces", "oz"),
    // count
    ("each", "ea"), ("pc", "ea"), ("pcs", "ea"), ("unit", "ea"), ("units", "ea"),
];

/// Fold a free-form unit string to its lookup key: lowercase, `²`/`^2`
/// to `2`, `³`/`^3` to `3`, hyphens and spaces to underscore.
pub fn normalize_symbol(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    for c in symbol.trim().chars() {
        match c {
            '²' => out.push('2'),
            '³' => out.push('3'),
            '^' => {}
            '-' | ' ' => out.push('_'),
            c => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Units of one dimension, split by family in presentation order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitGroups<'a> {
    pub metric: Vec<&'a Unit>,
    pub imperial: Vec<&'a Unit>,
}

impl<'a> UnitGroups<'a> {
    /// Metric group first, then imperial
    pub fn iter(&self) -> impl Iterator<Item = &'a Unit> + '_ {
        self.metric.iter().chain(self.imperial.iter()).copied()
    }

    pub fn symbols(&self) -> Vec<&'a str> {
        self.iter().map(|u| u.symbol.as_str()).collect()
    }
}

/// Registry of all known units
pub struct UnitRegistry {
    units: Vec<Unit>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
    by_dimension: [Vec<usize>; 5],
    base: [usize; 5],
}

impl UnitRegistry {
    /// Build the registry from the static tables
    pub fn build() -> Result<Self, UnitsError> {
        let mut registry = UnitRegistry {
            units: Vec::new(),
            index: HashMap::new(),
            aliases: HashMap::new(),
            by_dimension: Default::default(),
            base: [0; 5],
        };

        registry.register_length_units()?;
        registry.register_area_units()?;
        registry.register_volume_units()?;
        registry.register_weight_units()?;
        registry.register(Unit::new(
            "ea", "each", Dimension::Count, UnitSystem::Metric, Number::from_i64(1),
        ));

        for &(alias, symbol) in ALIASES {
            registry.alias(alias, symbol);
        }

        for dim in Dimension::ALL {
            let base = registry.index.get(dim.base_symbol()).copied().ok_or_else(|| {
                UnitsError::unknown_unit(dim, dim.base_symbol())
            })?;
            if !registry.units[base].is_base() {
                return Err(UnitsError::InvalidQuantity(format!(
                    "base unit '{}' must have factor 1", dim.base_symbol()
                )));
            }
            registry.base[dim.index()] = base;
        }

        Ok(registry)
    }

    /// Get a unit by symbol or alias, in any dimension
    pub fn get(&self, symbol: &str) -> Option<&Unit> {
        let key = normalize_symbol(symbol);
        let key = self.aliases.get(&key).unwrap_or(&key);
        self.index.get(key).map(|&i| &self.units[i])
    }

    /// Resolve a symbol strictly within a dimension
    pub fn lookup(&self, dimension: Dimension, symbol: &str) -> Result<&Unit, UnitsError> {
        match self.get(symbol) {
            Some(unit) if unit.dimension == dimension => Ok(unit),
            _ => {
                warn!(%dimension, symbol, "unit not found in dimension");
                Err(UnitsError::unknown_unit(dimension, symbol))
            }
        }
    }

    /// Units of a dimension grouped for selection controls
    pub fn units_for(&self, dimension: Dimension) -> UnitGroups<'_> {
        let (imperial, metric): (Vec<&Unit>, Vec<&Unit>) = self.by_dimension[dimension.index()]
            .iter()
            .map(|&i| &self.units[i])
            .partition(|u| u.is_imperial());
        UnitGroups { metric, imperial }
    }

    /// Reverse lookup from a free-form unit string; None for unknown units
    pub fn dimension_of(&self, symbol: &str) -> Option<Dimension> {
        self.get(symbol).map(|u| u.dimension)
    }

    pub fn is_imperial(&self, dimension: Dimension, symbol: &str) -> bool {
        matches!(self.get(symbol), Some(u) if u.dimension == dimension && u.is_imperial())
    }

    pub fn factor_to_base(&self, dimension: Dimension, symbol: &str) -> Result<f64, UnitsError> {
        self.lookup(dimension, symbol)?.factor_f64()
    }

    pub fn base_unit(&self, dimension: Dimension) -> &Unit {
        &self.units[self.base[dimension.index()]]
    }

    /// Get all unit symbols
    pub fn symbols(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.symbol.as_str()).collect()
    }

    fn register(&mut self, unit: Unit) {
        let i = self.units.len();
        self.index.insert(normalize_symbol(&unit.symbol), i);
        self.by_dimension[unit.dimension.index()].push(i);
        self.units.push(unit);
    }

    fn alias(&mut self, alias: &str, symbol: &str) {
        self.aliases.insert(normalize_symbol(alias), normalize_symbol(symbol));
    }

    fn length_factor(&self, symbol: &str) -> Result<Number, UnitsError> {
        self.index
            .get(symbol)
            .map(|&i| self.units[i].to_base_factor.clone())
            .ok_or_else(|| UnitsError::unknown_unit(Dimension::Length, symbol))
    }

    fn register_length_units(&mut self) -> Result<(), UnitsError> {
        for (symbol, name, mm) in METRIC_LENGTH {
            self.register(Unit::new(symbol, name, Dimension::Length, UnitSystem::Metric, Number::from_i64(mm)));
        }

        let inch = Number::from_str(MM_PER_INCH)?;
        for (symbol, name, inches) in IMPERIAL_LENGTH {
            let factor = inch.mul(&Number::from_i64(inches));
            self.register(Unit::new(symbol, name, Dimension::Length, UnitSystem::Imperial, factor));
        }
        Ok(())
    }

    fn register_derived(&mut self, dimension: Dimension, table: &[Derived]) -> Result<(), UnitsError> {
        let power = dimension.length_power().ok_or_else(|| {
            UnitsError::InvalidQuantity(format!("{} is not derived from length", dimension))
        })?;

        for def in table {
            let multiplier = Number::from_ratio(def.num, def.den)?;
            let factor = self.length_factor(def.length)?.pow(power).mul(&multiplier);
            self.register(Unit::new(def.symbol, def.name, dimension, def.system, factor));
        }
        Ok(())
    }

    fn register_area_units(&mut self) -> Result<(), UnitsError> {
        self.register_derived(Dimension::Area, AREA)
    }

    fn register_volume_units(&mut self) -> Result<(), UnitsError> {
        self.register_derived(Dimension::Volume, VOLUME)
    }

    fn register_weight_units(&mut self) -> Result<(), UnitsError> {
        for (symbol, name, mg) in METRIC_WEIGHT {
            self.register(Unit::new(symbol, name, Dimension::Weight, UnitSystem::Metric, Number::from_i64(mg)));
        }

        let pound = Number::from_str(MG_PER_POUND)?;
        for (symbol, name, num, den) in IMPERIAL_WEIGHT {
            let factor = pound.mul(&Number::from_ratio(num, den)?);
            self.register(Unit::new(symbol, name, Dimension::Weight, UnitSystem::Imperial, factor));
        }
        Ok(())
    }
}

// ========== Registry shortcuts ==========

/// Units of a dimension, split into metric and imperial groups
pub fn units_for(dimension: Dimension) -> UnitGroups<'static> {
    UNITS.units_for(dimension)
}

pub fn dimension_of(symbol: &str) -> Option<Dimension> {
    UNITS.dimension_of(symbol)
}

pub fn is_imperial(dimension: Dimension, symbol: &str) -> bool {
    UNITS.is_imperial(dimension, symbol)
}

pub fn factor_to_base(dimension: Dimension, symbol: &str) -> Result<f64, UnitsError> {
    UNITS.factor_to_base(dimension, symbol)
}

pub fn base_unit(dimension: Dimension) -> &'static Unit {
    UNITS.base_unit(dimension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(dimension: Dimension, symbol: &str) -> Number {
        UNITS.lookup(dimension, symbol).unwrap().factor().clone()
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("CM²"), "cm2");
        assert_eq!(normalize_symbol("in^3"), "in3");
        assert_eq!(normalize_symbol(" fl oz "), "fl_oz");
        assert_eq!(normalize_symbol("fl-oz"), "fl_oz");
    }

    #[test]
    fn test_base_units_have_factor_one() {
        for dim in Dimension::ALL {
            let base = UNITS.base_unit(dim);
            assert_eq!(base.symbol, dim.base_symbol());
            assert!(base.is_base());
            assert_eq!(base.dimension, dim);
        }
    }

    #[test]
    fn test_base_unit_is_unique() {
        for dim in Dimension::ALL {
            let bases = UNITS.units_for(dim).iter().filter(|u| u.is_base()).count();
            assert_eq!(bases, 1, "{} must have exactly one factor-1 unit", dim);
        }
    }

    #[test]
    fn test_metric_factors_are_powers_of_ten() {
        assert_eq!(factor(Dimension::Length, "cm"), Number::from_i64(10));
        assert_eq!(factor(Dimension::Length, "m"), Number::from_i64(1000));
        assert_eq!(factor(Dimension::Weight, "kg"), Number::from_i64(1_000_000));
        assert_eq!(factor(Dimension::Volume, "l"), Number::from_i64(1_000_000));
        assert_eq!(factor(Dimension::Area, "m2"), Number::from_i64(1_000_000));
    }

    #[test]
    fn test_imperial_constants() {
        assert_eq!(factor(Dimension::Length, "in"), Number::from_str("25.4").unwrap());
        assert_eq!(factor(Dimension::Length, "ft"), Number::from_str("304.8").unwrap());
        assert_eq!(factor(Dimension::Weight, "lb"), Number::from_str("453592.37").unwrap());
        assert_eq!(factor(Dimension::Weight, "oz"), Number::from_str("28349.523125").unwrap());
        assert_eq!(factor(Dimension::Volume, "gal"), Number::from_str("3785411.784").unwrap());
    }

    #[test]
    fn test_area_factors_are_squares_of_length() {
        let inch = factor(Dimension::Length, "in");
        assert_eq!(factor(Dimension::Area, "in2"), inch.pow(2));

        let foot = factor(Dimension::Length, "ft");
        assert_eq!(factor(Dimension::Area, "ft2"), foot.pow(2));

        let f_in = UNITS.factor_to_base(Dimension::Length, "in").unwrap();
        let f_in2 = UNITS.factor_to_base(Dimension::Area, "in2").unwrap();
        assert!((f_in2 - f_in * f_in).abs() < 1e-9);
    }

    #[test]
    fn test_volume_factors_are_cubes_of_length() {
        let inch = factor(Dimension::Length, "in");
        assert_eq!(factor(Dimension::Volume, "in3"), inch.pow(3));
        assert_eq!(factor(Dimension::Volume, "ml"), factor(Dimension::Length, "cm").pow(3));
    }

    #[test]
    fn test_get_is_case_insensitive_and_follows_aliases() {
        assert_eq!(UNITS.get("KG").unwrap().symbol, "kg");
        assert_eq!(UNITS.get("Inches").unwrap().symbol, "in");
        assert_eq!(UNITS.get("m²").unwrap().symbol, "m2");
        assert_eq!(UNITS.get("fl oz").unwrap().symbol, "fl_oz");
        assert_eq!(UNITS.get("pcs").unwrap().symbol, "ea");
        assert!(UNITS.get("furlong").is_none());
    }

    #[test]
    fn test_lookup_is_scoped_to_dimension() {
        assert!(UNITS.lookup(Dimension::Weight, "lb").is_ok());
        let err = UNITS.lookup(Dimension::Length, "lb").unwrap_err();
        assert!(matches!(err, UnitsError::UnknownUnit { .. }));
    }

    #[test]
    fn test_units_for_groups() {
        let groups = units_for(Dimension::Length);
        assert_eq!(groups.metric.iter().map(|u| u.symbol.as_str()).collect::<Vec<_>>(), ["mm", "cm", "m", "km"]);
        assert_eq!(groups.imperial.iter().map(|u| u.symbol.as_str()).collect::<Vec<_>>(), ["in", "ft", "yd", "mi"]);

        let count = units_for(Dimension::Count);
        assert_eq!(count.symbols(), ["ea"]);
        assert!(count.imperial.is_empty());
    }

    #[test]
    fn test_units_for_is_ordered_by_factor() {
        for dim in Dimension::ALL {
            let groups = units_for(dim);
            for group in [&groups.metric, &groups.imperial] {
                for pair in group.windows(2) {
                    assert!(pair[0].factor() <= pair[1].factor(), "{} before {}", pair[0], pair[1]);
                }
            }
        }
    }

    #[test]
    fn test_dimension_of() {
        assert_eq!(dimension_of("kg"), Some(Dimension::Weight));
        assert_eq!(dimension_of("ft2"), Some(Dimension::Area));
        assert_eq!(dimension_of("each"), Some(Dimension::Count));
        assert_eq!(dimension_of("parsec"), None);
    }

    #[test]
    fn test_is_imperial() {
        assert!(is_imperial(Dimension::Length, "ft"));
        assert!(!is_imperial(Dimension::Length, "cm"));
        // lb is imperial, but not a length unit
        assert!(!is_imperial(Dimension::Length, "lb"));
        assert!(!is_imperial(Dimension::Count, "ea"));
    }

    #[test]
    fn test_factor_to_base_unknown() {
        assert!(factor_to_base(Dimension::Volume, "furlong").is_err());
        assert!((factor_to_base(Dimension::Count, "ea").unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_families_are_disjoint() {
        for dim in Dimension::ALL {
            let groups = units_for(dim);
            for unit in &groups.metric {
                assert!(!groups.imperial.iter().any(|u| u.symbol == unit.symbol));
            }
        }
    }
}
