//! Weather data
//!
//! The fetch orchestrator and the record it produces for the face.

pub mod fetch;
pub mod report;

pub use fetch::{FetchAttempt, FetchOrchestrator};
pub use report::{sun_marker_angle, TemperatureScale, WeatherDisplay, WeatherReport};
