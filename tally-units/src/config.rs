//! Display options
//!
//! Which family the host presents by default and how many decimal places
//! quantities and money are rendered with. Stored values never depend on
//! these settings.

use serde::{Serialize, Deserialize};
use tally_core::UnitsError;
use crate::{Dimension, Unit, UnitSystem};
use crate::units::UNITS;

pub const ENV_UNIT_SYSTEM: &str = "TALLY_UNIT_SYSTEM";
pub const ENV_QUANTITY_DECIMALS: &str = "TALLY_QUANTITY_DECIMALS";
pub const ENV_MONEY_DECIMALS: &str = "TALLY_MONEY_DECIMALS";

/// Upper bound on configurable decimal places
const MAX_DECIMALS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub system: UnitSystem,
    pub quantity_decimals: u32,
    pub money_decimals: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            system: UnitSystem::Metric,
            quantity_decimals: 2,
            money_decimals: 2,
        }
    }
}

impl DisplayOptions {
    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, UnitsError> {
        let options: DisplayOptions = serde_json::from_str(json)
            .map_err(|e| UnitsError::Config(e.to_string()))?;
        options.validate()
    }

    /// Read options from `TALLY_*` environment variables
    pub fn from_env() -> Result<Self, UnitsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary key lookup; unset keys keep their
    /// defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UnitsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = DisplayOptions::default();

        if let Some(system) = lookup(ENV_UNIT_SYSTEM) {
            options.system = system.parse()?;
        }
        if let Some(places) = lookup(ENV_QUANTITY_DECIMALS) {
            options.quantity_decimals = parse_places(ENV_QUANTITY_DECIMALS, &places)?;
        }
        if let Some(places) = lookup(ENV_MONEY_DECIMALS) {
            options.money_decimals = parse_places(ENV_MONEY_DECIMALS, &places)?;
        }

        options.validate()
    }

    fn validate(self) -> Result<Self, UnitsError> {
        for (name, places) in [
            ("quantity_decimals", self.quantity_decimals),
            ("money_decimals", self.money_decimals),
        ] {
            if places > MAX_DECIMALS {
                return Err(UnitsError::Config(format!(
                    "{} must be at most {}, got {}", name, MAX_DECIMALS, places
                )));
            }
        }
        Ok(self)
    }

    /// Unit an entry form preselects for a field of this dimension
    pub fn default_unit(&self, dimension: Dimension) -> &'static Unit {
        let symbol = match (self.system, dimension) {
            (_, Dimension::Count) => "ea",
            (UnitSystem::Metric, dim) => dim.base_symbol(),
            (UnitSystem::Imperial, Dimension::Length) => "in",
            (UnitSystem::Imperial, Dimension::Area) => "in2",
            (UnitSystem::Imperial, Dimension::Volume) => "in3",
            (UnitSystem::Imperial, Dimension::Weight) => "lb",
        };
        UNITS.lookup(dimension, symbol).unwrap_or_else(|_| UNITS.base_unit(dimension))
    }
}

fn parse_places(key: &str, value: &str) -> Result<u32, UnitsError> {
    value
        .trim()
        .parse()
        .map_err(|_| UnitsError::Config(format!("{} must be a non-negative integer, got '{}'", key, value)))
}
