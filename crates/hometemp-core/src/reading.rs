//! Reading data model
//!
//! A [`Reading`] is one timestamped temperature/humidity sample as stored in
//! the spreadsheet. Values are kept as fixed-point hundredths ([`Centi`]) so
//! comparisons and axis arithmetic are exact.

use core::fmt;
use core::str::FromStr;

use alloc::string::String;
use thiserror_no_std::Error;

/// Fixed-point value in hundredths (e.g. `2312` is `23.12`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Centi(i32);

/// Reasons a cell can fail to parse as a decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecimalError {
    #[error("not a decimal number")]
    Invalid,
    #[error("value is not finite")]
    NotFinite,
    #[error("value out of range")]
    OutOfRange,
}

impl Centi {
    pub const ZERO: Self = Self(0);

    /// Create from a raw hundredths count
    pub const fn from_hundredths(hundredths: i32) -> Self {
        Self(hundredths)
    }

    /// Create from whole units (e.g. `Centi::from_units(2)` is `2.00`)
    pub const fn from_units(units: i32) -> Self {
        Self(units * 100)
    }

    /// Raw hundredths count
    pub const fn hundredths(self) -> i32 {
        self.0
    }

    /// Round a double to two fractional digits, half-to-even.
    ///
    /// The rounding is applied to the exact binary value of `value`, so
    /// `1.005` (stored as `1.00499999...`) rounds down to `1.00` while
    /// `23.125` (exactly representable) is a true tie and rounds to `23.12`.
    pub fn from_f64_half_even(value: f64) -> Result<Self, DecimalError> {
        if !value.is_finite() {
            return Err(DecimalError::NotFinite);
        }

        let bits = value.to_bits();
        let negative = (bits >> 63) == 1;
        let exponent_bits = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & ((1u64 << 52) - 1);

        // value = mantissa * 2^exponent
        let (mantissa, exponent) = if exponent_bits == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), exponent_bits - 1075)
        };

        // mantissa < 2^53, so the scaled value stays below 2^60
        let scaled = mantissa as u128 * 100;

        let magnitude = if exponent >= 0 {
            if exponent > 40 {
                return Err(DecimalError::OutOfRange);
            }
            scaled << exponent
        } else {
            let shift = exponent.unsigned_abs();
            if shift >= 127 {
                0
            } else {
                let quotient = scaled >> shift;
                let remainder = scaled & ((1u128 << shift) - 1);
                let half = 1u128 << (shift - 1);
                if remainder > half || (remainder == half && quotient & 1 == 1) {
                    quotient + 1
                } else {
                    quotient
                }
            }
        };

        let magnitude = i32::try_from(magnitude).map_err(|_| DecimalError::OutOfRange)?;
        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// Parse decimal cell text and round it half-to-even
    pub fn parse_half_even(text: &str) -> Result<Self, DecimalError> {
        let value: f64 = text.trim().parse().map_err(|_| DecimalError::Invalid)?;
        Self::from_f64_half_even(value)
    }

    /// Convert to float for plotting
    pub fn as_f32(self) -> f32 {
        self.0 as f32 / 100.0
    }

    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl FromStr for Centi {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_half_even(s)
    }
}

impl fmt::Display for Centi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// One temperature/humidity sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    timestamp: String,
    temperature: Centi,
    humidity: Centi,
}

impl Reading {
    pub fn new(timestamp: impl Into<String>, temperature: Centi, humidity: Centi) -> Self {
        Self {
            timestamp: timestamp.into(),
            temperature,
            humidity,
        }
    }

    /// Timestamp text exactly as stored in the sheet
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn temperature(&self) -> Centi {
        self.temperature
    }

    pub fn humidity(&self) -> Centi {
        self.humidity
    }

    /// Short time-of-day label used on the chart's x-axis
    pub fn time_label(&self) -> &str {
        time_label(&self.timestamp)
    }
}

/// Extract `HH:MM` from a timestamp such as `2021-03-04 12:34:56`.
///
/// Takes the last whitespace-separated token and cuts it before its last
/// colon. A token without a colon yields an empty label.
pub fn time_label(timestamp: &str) -> &str {
    let time = timestamp.split(' ').next_back().unwrap_or("");
    match time.rfind(':') {
        Some(idx) => &time[..idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_half_even_tie_rounds_down_to_even() {
        assert_eq!(Centi::parse_half_even("23.125").unwrap().to_string(), "23.12");
    }

    #[test]
    fn test_half_even_above_tie_rounds_up() {
        // 23.135 is stored as 23.13500000000000156..., just above the midpoint
        assert_eq!(Centi::parse_half_even("23.135").unwrap().to_string(), "23.14");
    }

    #[test]
    fn test_rounding_uses_binary_value() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(Centi::parse_half_even("1.005").unwrap(), Centi::from_hundredths(100));
    }

    #[test]
    fn test_negative_values() {
        let value = Centi::parse_half_even("-3.5").unwrap();
        assert_eq!(value.hundredths(), -350);
        assert_eq!(value.to_string(), "-3.50");
        assert_eq!(Centi::from_hundredths(-5).to_string(), "-0.05");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Centi::parse_half_even(" 45.6 ").unwrap().hundredths(), 4560);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Centi::parse_half_even("warm"), Err(DecimalError::Invalid));
        assert_eq!(Centi::parse_half_even(""), Err(DecimalError::Invalid));
        assert_eq!(Centi::parse_half_even("NaN"), Err(DecimalError::NotFinite));
        assert_eq!(Centi::parse_half_even("inf"), Err(DecimalError::NotFinite));
        assert_eq!(Centi::parse_half_even("1e30"), Err(DecimalError::OutOfRange));
    }

    #[test]
    fn test_tiny_values_round_to_zero() {
        assert_eq!(Centi::from_f64_half_even(1e-300).unwrap(), Centi::ZERO);
        assert_eq!(Centi::from_f64_half_even(0.004).unwrap(), Centi::ZERO);
        assert_eq!(Centi::from_f64_half_even(0.005).unwrap().hundredths(), 1);
    }

    #[test]
    fn test_integer_values_are_exact() {
        assert_eq!(Centi::from_f64_half_even(20.0).unwrap(), Centi::from_units(20));
    }

    #[test]
    fn test_time_label() {
        assert_eq!(time_label("2021-03-04 12:34:56"), "12:34");
        assert_eq!(time_label("12:34:56"), "12:34");
        assert_eq!(time_label("2021-03-04"), "");
        assert_eq!(time_label(""), "");
    }

    #[test]
    fn test_reading_accessors() {
        let reading = Reading::new(
            "2021-03-04 07:05:00",
            Centi::from_hundredths(2150),
            Centi::from_hundredths(4800),
        );
        assert_eq!(reading.timestamp(), "2021-03-04 07:05:00");
        assert_eq!(reading.time_label(), "07:05");
        assert_eq!(reading.temperature().as_f32(), 21.5);
        assert_eq!(reading.humidity(), Centi::from_units(48));
    }
}
