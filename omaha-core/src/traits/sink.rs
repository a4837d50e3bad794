//! Presentation sink trait

use crate::weather::WeatherDisplay;

/// Trait for the face that shows weather and errors
///
/// Purely a consumer: implementations never call back into the core.
pub trait PresentationSink {
    /// A weather cycle succeeded; `display` holds the fresh report
    fn show_weather(&mut self, display: &WeatherDisplay);

    /// The error log changed; `text` is the full rendered log
    fn show_errors(&mut self, text: &str);
}
