//! Exact decimal numbers using dashu
//!
//! Unit factors such as 25.4 or 453.59237 are exact in base 10, so products
//! and quotients of factors never pick up binary floating point error before
//! the single rounding step that produces a stored integer.

use std::cmp::Ordering;
use std::fmt;
use dashu_float::DBig;
use dashu_float::ops::Abs;
use dashu_int::IBig;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("not a number: '{0}'")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("outside the domain: {0}")]
    DomainError(String),

    #[error("Overflow: result too large")]
    Overflow,
}

/// Significant decimal digits kept through multiplication and division
const PRECISION: usize = 50;

/// Exact decimal number backed by dashu-float's `DBig`
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    fn wrap(value: DBig) -> Self {
        Number { inner: value.with_precision(PRECISION).value() }
    }

    /// Parse "123", "-3.14", "1.5e3" or "25e3"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();
        let invalid = || NumberError::ParseError(s.to_string());

        if let Some((mantissa, exponent)) = s
            .split_once(|c: char| c == 'e' || c == 'E')
            .filter(|(mantissa, _)| !mantissa.contains('.'))
        {
            let mantissa: IBig = mantissa.parse().map_err(|_| invalid())?;
            let exponent: isize = exponent.parse().map_err(|_| invalid())?;
            return Ok(Self::wrap(DBig::from_parts(mantissa, exponent)));
        }

        s.parse::<DBig>().map(Self::wrap).map_err(|_| invalid())
    }

    pub fn from_i64(n: i64) -> Self {
        Self::wrap(DBig::from(n))
    }

    /// `num / den`, exact whenever the quotient terminates within the
    /// working precision
    pub fn from_ratio(num: i64, den: i64) -> Result<Self, NumberError> {
        Self::from_i64(num).checked_div(&Self::from_i64(den))
    }

    /// Lift an f64 through its shortest round-trip decimal form, so `0.1`
    /// becomes exactly `0.1`. NaN and infinities are rejected.
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        if !f.is_finite() {
            return Err(NumberError::DomainError(format!("non-finite value {}", f)));
        }
        // f64 Display is positional and round-trips
        Self::from_str(&f.to_string())
    }

    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    pub fn is_integer(&self) -> bool {
        self.inner.clone().floor() == self.inner
    }

    pub fn add(&self, other: &Self) -> Self {
        Number { inner: &self.inner + &other.inner }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Number { inner: &self.inner - &other.inner }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Number { inner: &self.inner * &other.inner }
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        Ok(Number { inner: &self.inner / &other.inner })
    }

    /// Non-negative integer power by repeated multiplication
    pub fn pow(&self, exp: u32) -> Self {
        (0..exp).fold(Self::from_i64(1), |acc, _| acc.mul(self))
    }

    pub fn neg(&self) -> Self {
        Number { inner: -self.inner.clone() }
    }

    pub fn abs(&self) -> Self {
        Number { inner: Abs::abs(self.inner.clone()) }
    }

    /// Largest integer not above the value
    pub fn floor(&self) -> Self {
        Number { inner: self.inner.clone().floor() }
    }

    /// Significand and base-10 exponent
    fn parts(&self) -> (IBig, isize) {
        self.inner.clone().into_repr().into_parts()
    }

    /// None when the value is fractional or does not fit in an i64
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        let (significand, exponent) = self.parts();
        let scale = IBig::from(10u8).pow(exponent.unsigned_abs());
        let whole = if exponent >= 0 { significand * scale } else { significand / scale };
        whole.try_into().ok()
    }

    /// Nearest f64; None when the magnitude is beyond f64 range
    pub fn to_f64(&self) -> Option<f64> {
        let (significand, exponent) = self.parts();
        let value: f64 = format!("{}e{}", significand, exponent).parse().ok()?;
        value.is_finite().then_some(value)
    }

    /// Every digit, positional notation
    pub fn to_plain_string(&self) -> String {
        let (_, exponent) = self.parts();
        self.as_decimal(exponent.min(0).unsigned_abs() as u32)
    }

    /// Fixed-point rendering with exactly `places` fractional digits.
    /// Extra digits are cut, not rounded; round first.
    pub fn as_decimal(&self, places: u32) -> String {
        let (significand, exponent) = self.parts();
        let negative = significand < IBig::ZERO;
        let mut digits = if negative { (-significand).to_string() } else { significand.to_string() };

        // scale the digit string to units of 10^-places
        let shift = exponent + places as isize;
        if shift >= 0 {
            digits.push_str(&"0".repeat(shift as usize));
        } else {
            let cut = shift.unsigned_abs();
            if cut >= digits.len() {
                digits = "0".to_string();
            } else {
                digits.truncate(digits.len() - cut);
            }
        }

        let places = places as usize;
        if digits.len() <= places {
            digits.insert_str(0, &"0".repeat(places + 1 - digits.len()));
        }

        let mut out = String::with_capacity(digits.len() + 2);
        if negative && digits.bytes().any(|b| b != b'0') {
            out.push('-');
        }
        let (whole, fraction) = digits.split_at(digits.len() - places);
        out.push_str(whole);
        if places > 0 {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_f64() {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "{}", self.to_plain_string()),
        }
    }
}

// Serialized as a decimal string so no digits are lost to f64
impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_plain_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Number::from_str(&text).map_err(de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(Ordering::Equal)
    }
}
