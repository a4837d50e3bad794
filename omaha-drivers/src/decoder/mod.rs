//! Weather payload decoders

pub mod json;

pub use json::JsonWeatherDecoder;
