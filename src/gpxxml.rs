use crate::parser::{ParseError, ensure_content};
use crate::{Sample, Track};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use time::OffsetDateTime;
use tracing::{debug, warn};

#[derive(Clone, Copy, PartialEq)]
enum Capture {
    Nothing,
    Elevation,
    Time,
}

#[derive(Default)]
struct PendingPoint {
    lat: Option<String>,
    lon: Option<String>,
    ele: Option<f64>,
    time: Option<OffsetDateTime>,
}

impl PendingPoint {
    fn from_start(e: &BytesStart) -> Self {
        let mut point = PendingPoint::default();
        for attr in e.attributes().flatten() {
            let Ok(value) = std::str::from_utf8(&attr.value) else {
                continue;
            };
            match attr.key.as_ref() {
                b"lat" => point.lat = Some(value.to_string()),
                b"lon" => point.lon = Some(value.to_string()),
                _ => {}
            }
        }
        point
    }

    fn finish(self, index: usize, samples: &mut Vec<Sample>) {
        match Sample::from_attributes(self.lat.as_deref(), self.lon.as_deref()) {
            Ok(sample) => samples.push(sample.with_elevation(self.ele).with_time(self.time)),
            Err(e) => warn!("skipping track point {index}: {e}"),
        }
    }
}

/// Parses a GPX document and returns its track points in document order.
///
/// The first element must be the `gpx` container (matched case-insensitively);
/// anything else is rejected before a single point is read. Track points with
/// unusable coordinates are skipped, and unreadable `ele`/`time` children are
/// dropped from an otherwise valid point.
pub fn parse_structured(source: &str) -> Result<Track, ParseError> {
    ensure_content(source)?;

    let mut reader = Reader::from_reader(source.as_bytes());
    let mut buf = Vec::new();
    let mut samples = Vec::new();

    let mut seen_root = false;
    let mut depth = 0usize;
    let mut point_count = 0;
    let mut current: Option<PendingPoint> = None;
    let mut capture = Capture::Nothing;
    let mut text = String::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Err(e) => {
                return Err(ParseError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                });
            }
            // the reader does not check for elements left open at end of input
            Ok(Event::Eof) if depth > 0 => {
                return Err(ParseError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: "unexpected end of document".to_string(),
                });
            }
            Ok(Event::Eof) => break,
            Ok(event) => event.into_owned(),
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) if !seen_root => {
                if !e.local_name().as_ref().eq_ignore_ascii_case(b"gpx") {
                    return Err(ParseError::MissingRoot);
                }
                seen_root = true;
                if matches!(event, Event::Empty(_)) {
                    break;
                }
                depth += 1;
            }

            Event::Start(ref e) => {
                depth += 1;
                let name = e.local_name();
                if name.as_ref() == b"trkpt" {
                    point_count += 1;
                    current = Some(PendingPoint::from_start(e));
                } else if current.is_some() {
                    capture = match name.as_ref() {
                        b"ele" => Capture::Elevation,
                        b"time" => Capture::Time,
                        _ => Capture::Nothing,
                    };
                    text.clear();
                }
            }

            Event::Empty(ref e) => {
                if e.local_name().as_ref() == b"trkpt" {
                    point_count += 1;
                    PendingPoint::from_start(e).finish(point_count, &mut samples);
                }
            }

            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                let name = e.local_name();
                if name.as_ref() == b"trkpt" {
                    if let Some(point) = current.take() {
                        point.finish(point_count, &mut samples);
                    }
                    capture = Capture::Nothing;
                } else if let Some(point) = current.as_mut() {
                    match capture {
                        Capture::Elevation => point.ele = parse_elevation(&text, point_count),
                        Capture::Time => point.time = parse_time(&text, point_count),
                        Capture::Nothing => {}
                    }
                    capture = Capture::Nothing;
                }
            }

            Event::Text(ref e) => {
                if capture != Capture::Nothing
                    && let Ok(chunk) = std::str::from_utf8(e)
                {
                    text.push_str(chunk);
                }
            }

            _ => {}
        }

        buf.clear();
    }

    if !seen_root {
        return Err(ParseError::MissingRoot);
    }
    if point_count == 0 {
        return Err(ParseError::NoTrackPoints);
    }

    debug!("structured parse kept {} of {point_count} track points", samples.len());
    Track::new(samples).ok_or(ParseError::NoValidSamples)
}

fn parse_elevation(text: &str, index: usize) -> Option<f64> {
    match text.trim().parse::<f64>() {
        Ok(ele) if ele.is_finite() => Some(ele),
        _ => {
            warn!("ignoring unreadable elevation {text:?} on track point {index}");
            None
        }
    }
}

fn parse_time(text: &str, index: usize) -> Option<OffsetDateTime> {
    match OffsetDateTime::parse(
        text.trim(),
        &time::format_description::well_known::Iso8601::DEFAULT,
    ) {
        Ok(time) => Some(time),
        Err(e) => {
            warn!("ignoring unreadable timestamp {text:?} on track point {index}: {e}");
            None
        }
    }
}
