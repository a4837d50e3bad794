//! JSON weather payload decoder
//!
//! Reads the handful of fields the face needs from a current-conditions
//! response and ignores everything else.

use omaha_core::traits::{DecodeError, WeatherDecoder};
use omaha_core::weather::WeatherReport;
use serde_json::Value;
use tracing::trace;

/// Decoder for current-conditions JSON
///
/// Expected shape (other keys are ignored):
///
/// ```json
/// { "name": "Omaha",
///   "weather": [{ "icon": "10d" }],
///   "main": { "temp": 290.15 },
///   "sys": { "sunrise": 1700000000, "sunset": 1700040000 } }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWeatherDecoder;

impl JsonWeatherDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

impl WeatherDecoder for JsonWeatherDecoder {
    fn decode(&self, body: &[u8]) -> Result<WeatherReport, DecodeError> {
        let root: Value = serde_json::from_slice(body).map_err(|_| DecodeError::Syntax)?;
        if !root.is_object() {
            return Err(DecodeError::NotAnObject);
        }

        let place_name = root
            .get("name")
            .and_then(Value::as_str)
            .ok_or(DecodeError::Name)?;
        let icon_code = root
            .pointer("/weather/0/icon")
            .and_then(Value::as_str)
            .ok_or(DecodeError::Icon)?;
        let temperature_kelvin = root
            .pointer("/main/temp")
            .and_then(Value::as_f64)
            .ok_or(DecodeError::Temperature)?;
        let sunset = root
            .pointer("/sys/sunset")
            .and_then(Value::as_i64)
            .ok_or(DecodeError::Sunset)?;
        let sunrise = root
            .pointer("/sys/sunrise")
            .and_then(Value::as_i64)
            .ok_or(DecodeError::Sunrise)?;

        trace!(place = place_name, icon = icon_code, "decoded weather payload");
        Ok(WeatherReport {
            place_name: place_name.to_string(),
            icon_code: icon_code.to_string(),
            temperature_kelvin,
            sunset,
            sunrise,
        })
    }
}
