use gpxroute::pipeline::{MessageChannel, Response};
use gpxroute::sink::{DrawingSink, SinkError, VectorObject};
use std::io::Write;
use tracing::{info, warn};

/// Terminal stand-in for the plugin UI: responses go out as JSON lines,
/// notifications go to stderr.
pub struct ConsoleChannel<W: Write> {
    out: W,
}

impl<W: Write> ConsoleChannel<W> {
    pub fn new(out: W) -> Self {
        ConsoleChannel { out }
    }
}

impl<W: Write> MessageChannel for ConsoleChannel<W> {
    fn post_message(&mut self, response: &Response) {
        if let Err(e) = write_json_line(&mut self.out, response) {
            warn!("failed to write response: {e}");
        }
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn resize_window(&mut self, width: u32, height: u32) {
        info!("host window resize to {width}x{height}");
    }
}

/// Drawing surface that prints each inserted path object as a JSON line.
pub struct ConsoleSink<W: Write> {
    out: W,
    center: (f64, f64),
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, center: (f64, f64)) -> Self {
        ConsoleSink { out, center }
    }
}

impl<W: Write> DrawingSink for ConsoleSink<W> {
    fn viewport_center(&self) -> (f64, f64) {
        self.center
    }

    fn append(&mut self, object: VectorObject) -> Result<(), SinkError> {
        write_json_line(&mut self.out, &object).map_err(|e| SinkError(e.to_string()))
    }
}

pub fn write_json_line<W: Write, T: serde::Serialize>(
    out: &mut W,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
