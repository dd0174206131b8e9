//! Arbitrary precision numbers using dashu
//!
//! Uses dashu-float (DBig) for exact decimal arithmetic. Values parsed from
//! text keep every digit; there is no binary floating point anywhere on the
//! path from a matched token to a rendered string.

use dashu_float::DBig;
use dashu_int::IBig;
use serde::{Deserialize, Serialize, Serializer, Deserializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// Working precision for calculations (decimal digits).
///
/// Numeric tokens are capped well below this, so products of a token and a
/// conversion factor stay exact.
const DEFAULT_PRECISION: usize = 96;

/// Thousands separators accepted inside a numeric token
const GROUP_SEPARATORS: [char; 3] = [',', ' ', '\''];

/// Arbitrary precision decimal number
///
/// Built on dashu-float's DBig. All operations return Results or new
/// Numbers - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    /// Ensure a DBig has adequate precision for calculations
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(DEFAULT_PRECISION).value()
    }

    /// Create from string representation
    /// Supports: "123", "3.14", "-42", "602214076e15"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NumberError::ParseError(s.to_string()));
        }

        // Scientific notation with integer mantissa: "52665e-11"
        if (s.contains('e') || s.contains('E')) && !s.contains('.') {
            let s_lower = s.to_lowercase();
            let parts: Vec<&str> = s_lower.split('e').collect();
            if parts.len() == 2 {
                let mantissa: IBig = parts[0].parse()
                    .map_err(|_| NumberError::ParseError(s.to_string()))?;
                let exp: isize = parts[1].parse()
                    .map_err(|_| NumberError::ParseError(s.to_string()))?;

                let result = DBig::from_parts(mantissa, exp);
                return Ok(Self { inner: Self::with_work_precision(result) });
            }
        }

        let inner: DBig = s.parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;

        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    /// Parse a numeric token that may carry thousands separators.
    ///
    /// Commas, spaces and apostrophes are stripped first; the dot is the only
    /// decimal point. `"43,778,147.0000016"` parses to exactly 43778147.0000016.
    pub fn from_grouped(s: &str) -> Result<Self, NumberError> {
        let cleaned: String = s.trim()
            .chars()
            .filter(|c| !GROUP_SEPARATORS.contains(c))
            .collect();

        if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
            return Err(NumberError::ParseError(s.to_string()));
        }

        Self::from_str(&cleaned)
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// Create `significand * 10^-places` exactly (e.g., `from_scaled(3048, 4)` is 0.3048)
    pub fn from_scaled(significand: i64, places: u32) -> Self {
        Self::from_parts(IBig::from(significand), -(places as isize))
    }

    /// Create from a scaled integer: `significand * 10^exponent`
    fn from_parts(significand: IBig, exponent: isize) -> Self {
        Self { inner: Self::with_work_precision(DBig::from_parts(significand, exponent)) }
    }

    /// Significand and decimal exponent of the stored value
    fn repr(&self) -> (IBig, isize) {
        self.inner.clone().into_repr().into_parts()
    }

    // ========== Predicates ==========

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    /// Check if strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.inner > DBig::ZERO
    }

    /// Check if value is an integer
    pub fn is_integer(&self) -> bool {
        let floor_val = self.inner.clone().floor();
        self.inner == floor_val
    }

    // ========== Basic Arithmetic ==========

    /// Addition
    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    /// Multiplication
    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    // ========== Decimal precision ==========

    /// Number of digits after the decimal point needed to represent the value
    pub fn fractional_digits(&self) -> usize {
        let (significand, exponent) = self.repr();
        if significand == IBig::ZERO || exponent >= 0 {
            0
        } else {
            exponent.unsigned_abs()
        }
    }

    /// Round to `places` fractional digits, ties to even
    pub fn quantize(&self, places: usize) -> Self {
        Self::from_parts(self.scaled(places), -(places as isize))
    }

    /// Sign and absolute digit string of the value rounded to `places`
    /// fractional digits, with the decimal point removed.
    ///
    /// 12.5 at 2 places is `(false, "1250")`; 0.004 at 2 places is `(false, "0")`.
    pub fn scaled_digits(&self, places: usize) -> (bool, String) {
        let scaled = self.scaled(places);
        let negative = scaled < IBig::ZERO;
        let magnitude = if negative { -scaled } else { scaled };
        (negative, magnitude.to_string())
    }

    /// The value times 10^places as an integer, rounded half to even
    fn scaled(&self, places: usize) -> IBig {
        let (significand, exponent) = self.repr();
        let shift = exponent + places as isize;
        if shift >= 0 {
            significand * pow10(shift.unsigned_abs())
        } else {
            div_round_half_even(significand, pow10(shift.unsigned_abs()))
        }
    }

    // ========== Conversion ==========

    /// Try to convert to i64
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        self.scaled(0).try_into().ok()
    }

    /// Render as an exact decimal string without trailing fractional zeros
    pub fn to_plain_string(&self) -> String {
        let (significand, exponent) = self.repr();
        if significand == IBig::ZERO {
            return "0".to_string();
        }

        let negative = significand < IBig::ZERO;
        let digits = if negative { (-significand).to_string() } else { significand.to_string() };

        let mut out = String::new();
        if negative {
            out.push('-');
        }

        if exponent >= 0 {
            out.push_str(&digits);
            out.push_str(&"0".repeat(exponent.unsigned_abs()));
            return out;
        }

        let frac_len = exponent.unsigned_abs();
        let padded = if digits.len() <= frac_len {
            format!("{}{}", "0".repeat(frac_len + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - frac_len);
        let frac_part = frac_part.trim_end_matches('0');

        out.push_str(int_part);
        if !frac_part.is_empty() {
            out.push('.');
            out.push_str(frac_part);
        }
        out
    }
}

/// 10^n as an integer
fn pow10(n: usize) -> IBig {
    let ten = IBig::from(10u8);
    let mut result = IBig::from(1u8);
    for _ in 0..n {
        result = result * ten.clone();
    }
    result
}

/// Integer division rounding ties to even (the decimal context default)
fn div_round_half_even(numerator: IBig, divisor: IBig) -> IBig {
    let negative = numerator < IBig::ZERO;
    let magnitude = if negative { -numerator } else { numerator };

    let quotient = magnitude.clone() / divisor.clone();
    let remainder = magnitude % divisor.clone();
    let twice = remainder * IBig::from(2u8);

    let round_up = twice > divisor
        || (twice == divisor && quotient.clone() % IBig::from(2u8) != IBig::ZERO);
    let quotient = if round_up { quotient + IBig::from(1u8) } else { quotient };

    if negative { -quotient } else { quotient }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // DBig implements PartialOrd, use it and treat None as Equal
        self.inner.partial_cmp(&other.inner).unwrap_or(std::cmp::Ordering::Equal)
    }
}
