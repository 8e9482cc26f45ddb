//! Engine errors
//!
//! Conversion failures are never guessed around or defaulted. They propagate
//! to the caller (an entry form, a costing projection) which decides how to
//! present them. `ErrorReport` is the serializable shape for that hand-off.

use crate::NumberError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const INVALID_QUANTITY: &str = "INVALID_QUANTITY";
    pub const UNKNOWN_DIMENSION: &str = "UNKNOWN_DIMENSION";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const OVERFLOW: &str = "OVERFLOW";
}

/// Errors raised by the conversion engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitsError {
    /// Symbol not present in the requested dimension's table
    #[error("unknown unit '{symbol}'{}", for_dimension(.dimension))]
    UnknownUnit {
        dimension: Option<String>,
        symbol: String,
    },

    /// Unit belongs to a different dimension than the quantity
    #[error("unit '{symbol}' is a {found} unit, expected a {expected} unit")]
    DimensionMismatch {
        expected: String,
        found: String,
        symbol: String,
    },

    /// Non-finite or unrepresentable value reached the engine
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("unknown dimension '{0}'")]
    UnknownDimension(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Number(#[from] NumberError),
}

fn for_dimension(dimension: &Option<String>) -> String {
    match dimension {
        Some(d) => format!(" for {}", d),
        None => String::new(),
    }
}

impl UnitsError {
    pub fn unknown_unit(dimension: impl ToString, symbol: impl Into<String>) -> Self {
        UnitsError::UnknownUnit {
            dimension: Some(dimension.to_string()),
            symbol: symbol.into(),
        }
    }

    pub fn unknown_symbol(symbol: impl Into<String>) -> Self {
        UnitsError::UnknownUnit {
            dimension: None,
            symbol: symbol.into(),
        }
    }

    pub fn dimension_mismatch(
        expected: impl ToString,
        found: impl ToString,
        symbol: impl Into<String>,
    ) -> Self {
        UnitsError::DimensionMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            symbol: symbol.into(),
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            UnitsError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            UnitsError::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            UnitsError::InvalidQuantity(_) => codes::INVALID_QUANTITY,
            UnitsError::UnknownDimension(_) => codes::UNKNOWN_DIMENSION,
            UnitsError::Config(_) => codes::CONFIG_ERROR,
            UnitsError::Number(NumberError::ParseError(_)) => codes::PARSE_ERROR,
            UnitsError::Number(NumberError::DivisionByZero) => codes::DIV_ZERO,
            UnitsError::Number(NumberError::DomainError(_)) => codes::DOMAIN_ERROR,
            UnitsError::Number(NumberError::Overflow) => codes::OVERFLOW,
        }
    }

    /// Suggestion for fixing the error, if there is a useful one
    pub fn suggestion(&self) -> Option<String> {
        match self {
            UnitsError::UnknownUnit { dimension: Some(d), .. } => {
                Some(format!("Pick one of the {} units offered for this field", d))
            }
            UnitsError::UnknownUnit { dimension: None, .. } => {
                Some("Check the unit spelling".to_string())
            }
            UnitsError::DimensionMismatch { expected, .. } => {
                Some(format!("Use a {} unit for this quantity", expected))
            }
            UnitsError::InvalidQuantity(_) => Some("Enter a finite number".to_string()),
            UnitsError::UnknownDimension(_) => {
                Some("Use one of: length, area, volume, weight, count".to_string())
            }
            UnitsError::Config(_) => None,
            UnitsError::Number(_) => None,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            UnitsError::Config(_) => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The operation failed; the caller must block the save
    Error,
    /// The engine cannot be used as configured
    Fatal,
}

/// Structured error record for collaborators that render messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    pub severity: Severity,
}

impl From<&UnitsError> for ErrorReport {
    fn from(err: &UnitsError) -> Self {
        ErrorReport {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion: err.suggestion(),
            severity: err.severity(),
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_unit_message() {
        let err = UnitsError::unknown_unit("length", "lb");
        assert_eq!(err.to_string(), "unknown unit 'lb' for length");
        assert_eq!(err.code(), codes::UNKNOWN_UNIT);

        let err = UnitsError::unknown_symbol("furlong");
        assert_eq!(err.to_string(), "unknown unit 'furlong'");
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = UnitsError::dimension_mismatch("length", "weight", "kg");
        assert_eq!(err.to_string(), "unit 'kg' is a weight unit, expected a length unit");
        assert_eq!(err.code(), codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_number_error_codes() {
        let err: UnitsError = NumberError::DivisionByZero.into();
        assert_eq!(err.code(), codes::DIV_ZERO);
        assert_eq!(err.to_string(), "Division by zero");
    }

    #[test]
    fn test_error_report_json() {
        let err = UnitsError::InvalidQuantity("NaN".to_string());
        let report = ErrorReport::from(&err);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "INVALID_QUANTITY");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["message"], "invalid quantity: NaN");
        assert_eq!(json["suggestion"], "Enter a finite number");
    }

    #[test]
    fn test_report_display() {
        let report = ErrorReport::from(&UnitsError::Config("bad".to_string()));
        assert_eq!(report.to_string(), "[CONFIG_ERROR] invalid configuration: bad");
        assert_eq!(report.severity, Severity::Fatal);
    }
}
