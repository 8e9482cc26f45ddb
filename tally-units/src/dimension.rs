//! Dimensions and unit systems
//!
//! The set of dimensions is closed. Every table lookup and conversion
//! dispatches on `Dimension` with an exhaustive match, so a new dimension
//! cannot be added without deciding its base unit.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use tally_core::UnitsError;

/// Physical quantity category. Units are only comparable within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Length,
    Area,
    Volume,
    Weight,
    Count,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Length,
        Dimension::Area,
        Dimension::Volume,
        Dimension::Weight,
        Dimension::Count,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Area => "area",
            Dimension::Volume => "volume",
            Dimension::Weight => "weight",
            Dimension::Count => "count",
        }
    }

    /// Symbol of the canonical storage unit. Stored quantities are integers
    /// in this unit.
    pub fn base_symbol(&self) -> &'static str {
        match self {
            Dimension::Length => "mm",
            Dimension::Area => "mm2",
            Dimension::Volume => "mm3",
            Dimension::Weight => "mg",
            Dimension::Count => "ea",
        }
    }

    /// Power of length this dimension is built from (m, m², m³).
    /// Area and volume factors are derived from length factors with it.
    pub fn length_power(&self) -> Option<u32> {
        match self {
            Dimension::Length => Some(1),
            Dimension::Area => Some(2),
            Dimension::Volume => Some(3),
            Dimension::Weight | Dimension::Count => None,
        }
    }

    pub fn is_count(&self) -> bool {
        matches!(self, Dimension::Count)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Dimension::Length => 0,
            Dimension::Area => 1,
            Dimension::Volume => 2,
            Dimension::Weight => 3,
            Dimension::Count => 4,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dimension {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "length" => Ok(Dimension::Length),
            "area" => Ok(Dimension::Area),
            "volume" => Ok(Dimension::Volume),
            "weight" => Ok(Dimension::Weight),
            "count" => Ok(Dimension::Count),
            _ => Err(UnitsError::UnknownDimension(s.to_string())),
        }
    }
}

/// The two disjoint unit families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn name(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for UnitSystem {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(UnitsError::Config(format!("unknown unit system '{}'", s))),
        }
    }
}
