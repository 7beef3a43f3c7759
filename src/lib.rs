use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

pub mod distance;
pub mod gpxxml;
pub mod parser;
pub mod pattern;
pub mod pipeline;
pub mod projection;
pub mod sink;
pub mod storage;
pub mod summary;

pub use distance::{DEFAULT_DRIFT_THRESHOLD_M, DistanceEngine, haversine_distance};
pub use parser::{MarkupParser, ParseError, PatternParser, TrackParser};
pub use pipeline::{MessageChannel, Orchestrator, PipelineConfig, PipelineError, Request, Response};
pub use projection::{GeometryBounds, PathCommand, PathDescription, fit_dimensions, project};
pub use storage::{StorageError, StoredTrack, TrackStore};
pub use summary::{TrackStatistics, TrackSummarizer, summarize};

/// A single recorded position.
///
/// Coordinates are validated on construction; a `Sample` always holds finite,
/// in-range degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele: Option<f64>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<OffsetDateTime>,
}

/// Why a single track point was rejected. Parsers log these and move on.
#[derive(Debug, Error, PartialEq)]
pub enum MalformedFieldError {
    #[error("missing {field} attribute")]
    Missing { field: &'static str },

    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} is not finite: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

impl Sample {
    pub fn new(lat: f64, lon: f64) -> Result<Self, MalformedFieldError> {
        Ok(Sample {
            lat: check_coordinate("lat", lat, 90.0)?,
            lon: check_coordinate("lon", lon, 180.0)?,
            ele: None,
            time: None,
        })
    }

    /// Builds a sample from raw `lat`/`lon` attribute text.
    pub fn from_attributes(
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<Self, MalformedFieldError> {
        let lat = parse_coordinate("lat", lat)?;
        let lon = parse_coordinate("lon", lon)?;
        Sample::new(lat, lon)
    }

    pub fn with_elevation(mut self, ele: Option<f64>) -> Self {
        self.ele = ele;
        self
    }

    pub fn with_time(mut self, time: Option<OffsetDateTime>) -> Self {
        self.time = time;
        self
    }
}

fn parse_coordinate(field: &'static str, raw: Option<&str>) -> Result<f64, MalformedFieldError> {
    let raw = raw.ok_or(MalformedFieldError::Missing { field })?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| MalformedFieldError::NotANumber {
            field,
            value: raw.to_string(),
        })
}

fn check_coordinate(field: &'static str, value: f64, limit: f64) -> Result<f64, MalformedFieldError> {
    if !value.is_finite() {
        return Err(MalformedFieldError::NonFinite { field, value });
    }
    if value.abs() > limit {
        return Err(MalformedFieldError::OutOfRange { field, value });
    }
    Ok(value)
}

/// An ordered, non-empty run of samples in recording order.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    samples: Vec<Sample>,
}

impl Track {
    /// Returns `None` for an empty list; a track always has at least one sample.
    pub fn new(samples: Vec<Sample>) -> Option<Self> {
        if samples.is_empty() {
            None
        } else {
            Some(Track { samples })
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that numeric attribute strings become a sample.
    #[test]
    fn test_sample_from_attributes() {
        let sample = Sample::from_attributes(Some("37.7749"), Some(" -122.4194 ")).unwrap();
        assert_eq!(sample.lat, 37.7749);
        assert_eq!(sample.lon, -122.4194);
        assert!(sample.ele.is_none());
        assert!(sample.time.is_none());
    }

    /// Tests that non-numeric coordinates are rejected.
    #[test]
    fn test_sample_rejects_non_numeric() {
        let err = Sample::from_attributes(Some("abc"), Some("1.0")).unwrap_err();
        assert_eq!(
            err,
            MalformedFieldError::NotANumber {
                field: "lat",
                value: "abc".to_string()
            }
        );
    }

    /// Tests that a missing coordinate attribute is rejected.
    #[test]
    fn test_sample_rejects_missing_attribute() {
        let err = Sample::from_attributes(Some("1.0"), None).unwrap_err();
        assert_eq!(err, MalformedFieldError::Missing { field: "lon" });
    }

    /// Tests that NaN and infinite coordinates are rejected.
    #[test]
    fn test_sample_rejects_non_finite() {
        // "NaN" and "inf" parse as f64, so they must be caught after parsing
        assert!(matches!(
            Sample::from_attributes(Some("NaN"), Some("1.0")),
            Err(MalformedFieldError::NonFinite { field: "lat", .. })
        ));
        assert!(matches!(
            Sample::from_attributes(Some("1.0"), Some("inf")),
            Err(MalformedFieldError::NonFinite { field: "lon", .. })
        ));
    }

    /// Tests that coordinates outside the valid lat/lon range are rejected.
    #[test]
    fn test_sample_rejects_out_of_range() {
        assert!(matches!(
            Sample::new(90.5, 0.0),
            Err(MalformedFieldError::OutOfRange { field: "lat", .. })
        ));
        assert!(matches!(
            Sample::new(0.0, -180.1),
            Err(MalformedFieldError::OutOfRange { field: "lon", .. })
        ));
        assert!(Sample::new(-90.0, 180.0).is_ok());
    }

    /// Tests that a track cannot be built from zero samples.
    #[test]
    fn test_track_requires_samples() {
        assert!(Track::new(Vec::new()).is_none());

        let track = Track::new(vec![Sample::new(1.0, 2.0).unwrap()]).unwrap();
        assert_eq!(track.len(), 1);
        assert!(!track.is_empty());
    }

    /// Tests the stored JSON shape of a sample.
    #[test]
    fn test_sample_serde_shape() {
        let time = OffsetDateTime::parse(
            "2023-01-01T10:00:00Z",
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .unwrap();
        let sample = Sample::new(40.0, -105.0)
            .unwrap()
            .with_elevation(Some(1600.0))
            .with_time(Some(time));

        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["lat"], 40.0);
        assert_eq!(json["lon"], -105.0);
        assert_eq!(json["ele"], 1600.0);
        assert_eq!(json["time"], "2023-01-01T10:00:00Z");

        let bare = serde_json::to_string(&Sample::new(1.0, 2.0).unwrap()).unwrap();
        assert_eq!(bare, r#"{"lat":1.0,"lon":2.0}"#);

        let back: Sample = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample);
    }
}
