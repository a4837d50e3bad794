//! Weather payload decoder trait

use core::fmt;

use crate::weather::WeatherReport;

/// Reasons a weather payload was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Body is not valid JSON (or not UTF-8)
    Syntax,
    /// Top-level value is not an object
    NotAnObject,
    /// `name` missing or not a string
    Name,
    /// `weather[0].icon` missing or not a string
    Icon,
    /// `main.temp` missing or not a number
    Temperature,
    /// `sys.sunset` missing or not an integer
    Sunset,
    /// `sys.sunrise` missing or not an integer
    Sunrise,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self {
            DecodeError::Syntax => "syntax",
            DecodeError::NotAnObject => "root",
            DecodeError::Name => "name",
            DecodeError::Icon => "icon",
            DecodeError::Temperature => "temp",
            DecodeError::Sunset => "sunset",
            DecodeError::Sunrise => "sunrise",
        };
        f.write_str(field)
    }
}

/// Trait for turning a raw response body into a weather record
pub trait WeatherDecoder {
    /// Decode one response body
    fn decode(&self, body: &[u8]) -> Result<WeatherReport, DecodeError>;
}
