//! Tally Core - Fundamental types
//!
//! This crate provides the core types used throughout Tally:
//! - `Number`: Exact decimal numbers for unit factors and conversions
//! - `UnitsError`: The conversion engine's error taxonomy
//! - `ErrorReport`: Serializable error record for UI collaborators

mod number;
mod error;

pub use number::{Number, NumberError};
pub use error::{UnitsError, ErrorReport, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, UnitsError, ErrorReport, Severity};
    pub use crate::error::codes;
}
