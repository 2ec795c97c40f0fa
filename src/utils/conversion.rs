//! Length conversion between a fixed set of units

use std::str::FromStr;

use derive_more::Display;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::consts::CONVERSION_DECIMALS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Please enter a valid number (got '{0}')")]
    InvalidNumber(String),

    #[error("Invalid unit conversion: unknown unit '{0}'")]
    InvalidUnit(String),
}

/// A length unit, with its ratio to the centimeter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Unit {
    #[display("cm")]
    Cm,
    #[display("meter")]
    Meter,
    #[display("inch")]
    Inch,
    #[display("foot")]
    Foot,
}

impl Unit {
    /// Length of one unit, in centimeters
    pub fn rate(self) -> f64 {
        match self {
            Unit::Cm => 1.0,
            Unit::Meter => 100.0,
            Unit::Inch => 2.54,
            Unit::Foot => 30.48,
        }
    }
}

impl FromStr for Unit {
    type Err = ConversionError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "cm" => Ok(Unit::Cm),
            "meter" => Ok(Unit::Meter),
            "inch" => Ok(Unit::Inch),
            "foot" => Ok(Unit::Foot),
            other => Err(ConversionError::InvalidUnit(other.to_owned())),
        }
    }
}

/// Rounds half away from zero to the converter precision
fn round_fixed(value: f64) -> f64 {
    let scale = 10f64.powi(CONVERSION_DECIMALS);
    let scaled = value * scale;
    // Too large to carry any decimal anyway
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Converts `value` from one unit to another, rounded to 4 decimals
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, ConversionError> {
    if !value.is_finite() {
        return Err(ConversionError::InvalidNumber(value.to_string()));
    }

    let converted = value * (from.rate() / to.rate());
    if !converted.is_finite() {
        return Err(ConversionError::InvalidNumber(value.to_string()));
    }

    Ok(round_fixed(converted))
}

/// Converts raw field values. The number is checked before the units.
pub fn convert_raw(value: &str, from: &str, to: &str) -> Result<f64, ConversionError> {
    let number = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ConversionError::InvalidNumber(value.to_owned()))?;

    let from = Unit::from_str(from)?;
    let to = Unit::from_str(to)?;

    convert(number, from, to)
}

/// Renders a converted value with exactly 4 decimals.
///
/// Zero is always printed unsigned, including negative results that
/// rounded to zero: `-0.00001` gives `0.0000`, not `-0.0000`.
pub fn format_fixed4(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", CONVERSION_DECIMALS as usize, value)
}
