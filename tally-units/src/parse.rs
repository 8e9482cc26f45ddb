//! Smart quantity parsing - free text like "10 kg", "5'" or "3.5"
//!
//! The parser does not know which dimension the field represents. It only
//! splits the number from the unit token and classifies the token's family;
//! the conversion engine rejects tokens that do not belong to the field.

use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::trace;
use crate::{Dimension, UnitSystem};
use crate::units::UNITS;

/// Family a parsed unit token belongs to. Bare numbers and count units are
/// `Each`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSystem {
    Metric,
    Imperial,
    Each,
}

impl From<UnitSystem> for InputSystem {
    fn from(system: UnitSystem) -> Self {
        match system {
            UnitSystem::Metric => InputSystem::Metric,
            UnitSystem::Imperial => InputSystem::Imperial,
        }
    }
}

impl fmt::Display for InputSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSystem::Metric => write!(f, "metric"),
            InputSystem::Imperial => write!(f, "imperial"),
            InputSystem::Each => write!(f, "each"),
        }
    }
}

/// Parser output: the number, the uppercased unit token (if any), and its
/// family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInput {
    pub qty: f64,
    pub unit: Option<String>,
    pub system: InputSystem,
}

/// Parse a single free-text quantity field.
///
/// Returns `None` when there is no number to read; never panics.
///
/// Supported forms:
/// - Bare numbers: "3.5", "-2", ".5", "1,250"
/// - Number and unit: "10 kg", "10kg", "1.969 m2", "12 fl oz"
/// - Quote shorthand: `5'` (feet), `6"` (inches)
pub fn parse_quantity(input: &str) -> Option<ParsedInput> {
    let cleaned: String = input.trim().chars().filter(|&c| c != ',').collect();

    let Some((number, rest)) = split_number(&cleaned) else {
        trace!(input, "no number in quantity input");
        return None;
    };

    let qty: f64 = number.parse().ok().filter(|q: &f64| q.is_finite())?;

    let token = rest.trim();
    if token.is_empty() {
        return Some(ParsedInput { qty, unit: None, system: InputSystem::Each });
    }

    if !is_unit_token(token) {
        trace!(input, token, "unrecognized unit token");
        return None;
    }

    let unit = expand_quotes(token).unwrap_or_else(|| token.to_uppercase());
    let system = classify(&unit);

    Some(ParsedInput { qty, unit: Some(unit), system })
}

/// Split a leading decimal number (optional sign, digits, optional fraction)
/// from the remainder of the input
fn split_number(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }

    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }

    if digits == 0 {
        return None;
    }

    Some((&s[..end], &s[end..]))
}

/// Unit tokens are a quote shorthand or a word starting with a letter.
/// Digits and inner spaces only occur inside registered symbols such as
/// `m2` or `fl oz`; anything else is not a unit.
fn is_unit_token(token: &str) -> bool {
    if expand_quotes(token).is_some() {
        return true;
    }

    let mut chars = token.chars();
    let well_formed = matches!(chars.next(), Some(c) if c.is_alphabetic())
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '²' | '³' | '^' | '_' | '-' | ' '));
    if !well_formed {
        return false;
    }

    let registered_only = token.chars().any(|c| c.is_ascii_digit() || c == ' ');
    !registered_only || UNITS.get(token).is_some()
}

/// `"` and `''` mean inches, `'` means feet
fn expand_quotes(token: &str) -> Option<String> {
    match token {
        "\"" | "''" | "″" => Some("INCH".to_string()),
        "'" | "′" => Some("FT".to_string()),
        _ => None,
    }
}

/// Family of an uppercased unit token; unknown tokens count as `Each`
fn classify(unit: &str) -> InputSystem {
    match unit {
        "KG" | "G" | "MG" => InputSystem::Metric,
        "INCH" | "FT" => InputSystem::Imperial,
        _ => match UNITS.get(unit) {
            Some(u) if u.dimension == Dimension::Count => InputSystem::Each,
            Some(u) => u.system.into(),
            None => InputSystem::Each,
        },
    }
}
