//! Presentation sinks

pub mod terminal;

pub use terminal::{sun_marker_position, TerminalSink};
