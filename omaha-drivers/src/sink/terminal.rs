//! Terminal presentation sink
//!
//! Prints what the watch face would draw: the weather text, the icon asset,
//! the sunrise/sunset marker positions, and the error field.

use std::io::{self, Stdout, Write};

use omaha_core::traits::PresentationSink;
use omaha_core::weather::{sun_marker_angle, WeatherDisplay};
use tracing::warn;

/// Dial diameter used when reporting marker positions
const DIAL_SIZE: f32 = 360.0;

/// Marker diameter used when reporting marker positions
const MARKER_SIZE: f32 = 16.0;

/// Top-left corner of a sun marker on a square dial
///
/// The marker's centre sits on a circle inset by half the marker size, at
/// `angle_deg` (0° = 3 o'clock, clockwise).
pub fn sun_marker_position(angle_deg: f32, dial_size: f32, marker_size: f32) -> (f32, f32) {
    let radius = (dial_size - marker_size) / 2.0;
    let centre = dial_size / 2.0;
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    (
        centre + radius * cos - marker_size / 2.0,
        centre + radius * sin - marker_size / 2.0,
    )
}

/// Sink that writes the face contents as text
pub struct TerminalSink<W = Stdout> {
    out: W,
    utc_offset_s: i32,
}

impl TerminalSink<Stdout> {
    /// Print to standard output
    pub fn stdout(utc_offset_s: i32) -> Self {
        Self::new(io::stdout(), utc_offset_s)
    }
}

impl<W: Write> TerminalSink<W> {
    /// Print to `out`, placing sun markers in local time
    pub fn new(out: W, utc_offset_s: i32) -> Self {
        Self { out, utc_offset_s }
    }

    /// Take back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_weather(&mut self, display: &WeatherDisplay) -> io::Result<()> {
        let (Some(report), Some(text)) = (display.report(), display.text()) else {
            return Ok(());
        };
        writeln!(self.out, "[weather] {}", text.replace('\n', " | "))?;
        writeln!(self.out, "[icon] {}", report.icon_asset())?;
        for (label, epoch) in [("sunrise", report.sunrise), ("sunset", report.sunset)] {
            let angle = sun_marker_angle(epoch, self.utc_offset_s);
            let (x, y) = sun_marker_position(angle, DIAL_SIZE, MARKER_SIZE);
            writeln!(self.out, "[{}] {:.1}° at ({:.0}, {:.0})", label, angle, x, y)?;
        }
        self.out.flush()
    }

    fn write_errors(&mut self, text: &str) -> io::Result<()> {
        for line in text.lines() {
            writeln!(self.out, "[error] {}", line)?;
        }
        self.out.flush()
    }
}

impl<W: Write> PresentationSink for TerminalSink<W> {
    fn show_weather(&mut self, display: &WeatherDisplay) {
        if let Err(err) = self.write_weather(display) {
            warn!(%err, "failed to print weather");
        }
    }

    fn show_errors(&mut self, text: &str) {
        if let Err(err) = self.write_errors(text) {
            warn!(%err, "failed to print errors");
        }
    }
}
