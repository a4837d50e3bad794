//! Weather record and its on-face presentation state

use alloc::format;
use alloc::string::String;

use crate::traits::WallTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Longest place name shown unabridged (characters)
pub const MAX_PLACE_CHARS: usize = 20;

/// Characters kept before the ellipsis when a place name is abridged
const ABRIDGED_PLACE_CHARS: usize = 17;

/// Decoded weather for one location
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Human-readable place name
    pub place_name: String,
    /// Provider icon code (e.g. `"10d"`)
    pub icon_code: String,
    /// Current temperature in Kelvin
    pub temperature_kelvin: f64,
    /// Sunset, Unix time
    pub sunset: i64,
    /// Sunrise, Unix time
    pub sunrise: i64,
}

impl WeatherReport {
    /// Asset path of the icon image
    pub fn icon_asset(&self) -> String {
        format!("images/{}.png", self.icon_code)
    }

    /// Temperature in Celsius
    pub fn celsius(&self) -> f64 {
        self.temperature_kelvin - KELVIN_OFFSET
    }

    /// Place name shortened for the face
    ///
    /// Names longer than [`MAX_PLACE_CHARS`] keep their first 17 characters
    /// followed by `...`.
    pub fn place_label(&self) -> String {
        if self.place_name.chars().count() <= MAX_PLACE_CHARS {
            return self.place_name.clone();
        }
        let mut label: String = self.place_name.chars().take(ABRIDGED_PLACE_CHARS).collect();
        label.push_str("...");
        label
    }
}

/// Temperature unit shown on the face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TemperatureScale {
    /// Degrees Celsius
    #[default]
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
}

impl TemperatureScale {
    /// Unit suffix
    pub fn symbol(&self) -> char {
        match self {
            TemperatureScale::Celsius => 'C',
            TemperatureScale::Fahrenheit => 'F',
        }
    }

    /// The other scale
    pub fn toggled(&self) -> Self {
        match self {
            TemperatureScale::Celsius => TemperatureScale::Fahrenheit,
            TemperatureScale::Fahrenheit => TemperatureScale::Celsius,
        }
    }
}

/// What the face currently shows for weather
///
/// Only a successful cycle replaces the report; failed cycles leave the
/// previous one in place.
#[derive(Debug, Clone, Default)]
pub struct WeatherDisplay {
    report: Option<WeatherReport>,
    updated_at: Option<WallTime>,
    scale: TemperatureScale,
}

impl WeatherDisplay {
    /// Create an empty display
    pub fn new(scale: TemperatureScale) -> Self {
        Self {
            report: None,
            updated_at: None,
            scale,
        }
    }

    /// Replace the report after a successful cycle
    pub fn apply(&mut self, report: WeatherReport, at: WallTime) {
        self.report = Some(report);
        self.updated_at = Some(at);
    }

    /// Check if a report has ever been applied
    pub fn is_ready(&self) -> bool {
        self.report.is_some()
    }

    /// Last applied report
    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    /// Wall time of the last applied report
    pub fn updated_at(&self) -> Option<WallTime> {
        self.updated_at
    }

    /// Current scale
    pub fn scale(&self) -> TemperatureScale {
        self.scale
    }

    /// Flip between Celsius and Fahrenheit
    pub fn toggle_scale(&mut self) {
        self.scale = self.scale.toggled();
    }

    /// Temperature in the current scale, truncated to whole degrees
    pub fn temperature(&self) -> Option<i32> {
        let celsius = self.report.as_ref()?.celsius();
        let value = match self.scale {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        };
        Some(value as i32)
    }

    /// Two-line weather text: place, then `HH:MM: <temp>°<unit>`
    pub fn text(&self) -> Option<String> {
        let report = self.report.as_ref()?;
        let at = self.updated_at.unwrap_or_default();
        let temperature = self.temperature()?;
        Some(format!(
            "{}\n{}: {}°{}",
            report.place_label(),
            at,
            temperature,
            self.scale.symbol()
        ))
    }
}

/// Angle of a sun marker on the 12-hour dial, in degrees
///
/// 0° points at 3 o'clock and angles grow clockwise, so 12 o'clock is -90°.
/// `utc_offset_s` shifts the Unix timestamp into local time, saturating at
/// the ends of the `i64` range.
pub fn sun_marker_angle(epoch: i64, utc_offset_s: i32) -> f32 {
    let local = epoch.saturating_add(i64::from(utc_offset_s));
    let second_of_day = local.rem_euclid(86_400);
    let hour = (second_of_day / 3_600) % 12;
    let minute = (second_of_day % 3_600) / 60;
    (hour * 30) as f32 + minute as f32 * 0.5 - 90.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(kelvin: f64) -> WeatherReport {
        WeatherReport {
            place_name: String::from("Omaha"),
            icon_code: String::from("10d"),
            temperature_kelvin: kelvin,
            sunset: 0,
            sunrise: 0,
        }
    }

    #[test]
    fn test_icon_asset() {
        assert_eq!(report(280.0).icon_asset(), "images/10d.png");
    }

    #[test]
    fn test_place_label_abridged() {
        let mut r = report(280.0);
        r.place_name = String::from("Twenty chars exactly");
        assert_eq!(r.place_label(), "Twenty chars exactly");

        r.place_name = String::from("Llanfairpwllgwyngyll Station");
        assert_eq!(r.place_label(), "Llanfairpwllgwyng...");
        assert_eq!(r.place_label().chars().count(), 20);
    }

    #[test]
    fn test_temperature_scales() {
        let mut display = WeatherDisplay::new(TemperatureScale::Celsius);
        assert_eq!(display.temperature(), None);

        display.apply(report(293.65), WallTime::new(14, 7));
        assert_eq!(display.temperature(), Some(20));

        display.toggle_scale();
        assert_eq!(display.scale(), TemperatureScale::Fahrenheit);
        assert_eq!(display.temperature(), Some(68));
    }

    #[test]
    fn test_below_zero_truncates_toward_zero() {
        let mut display = WeatherDisplay::new(TemperatureScale::Celsius);
        display.apply(report(270.65), WallTime::default());
        assert_eq!(display.temperature(), Some(-2));
    }

    #[test]
    fn test_text() {
        let mut display = WeatherDisplay::default();
        assert!(display.text().is_none());
        assert!(!display.is_ready());

        display.apply(report(293.55), WallTime::new(8, 30));
        assert!(display.is_ready());
        assert_eq!(display.text().as_deref(), Some("Omaha\n08:30: 20°C"));
    }

    #[test]
    fn test_sun_marker_angle() {
        // 06:00 UTC points straight down
        assert_eq!(sun_marker_angle(6 * 3_600, 0), 90.0);
        // 18:30 local is 06:30 on the dial
        assert_eq!(sun_marker_angle(16 * 3_600 + 1_800, 2 * 3_600), 105.0);
        // Noon and midnight both point up
        assert_eq!(sun_marker_angle(12 * 3_600, 0), -90.0);
        assert_eq!(sun_marker_angle(0, 0), -90.0);
        // Negative local time wraps into the previous day
        assert_eq!(sun_marker_angle(0, -3_600), 240.0);
    }

    #[test]
    fn test_sun_marker_angle_extreme_timestamps() {
        for (epoch, offset) in [
            (i64::MAX, 3_600),
            (i64::MAX, i32::MAX),
            (i64::MIN, -3_600),
            (i64::MIN, i32::MIN),
            (i64::MAX, 0),
            (i64::MIN, 0),
        ] {
            let angle = sun_marker_angle(epoch, offset);
            assert!((-90.0..270.0).contains(&angle), "{} for {}", angle, epoch);
        }
        // Saturates to i64::MAX rather than wrapping
        assert_eq!(
            sun_marker_angle(i64::MAX, 3_600),
            sun_marker_angle(i64::MAX, 0)
        );
    }
}
