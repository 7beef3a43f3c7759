//! Track extraction entry points.
//!
//! Two strategies are kept apart on purpose: [`MarkupParser`] walks the XML
//! document and captures elevation and timestamps, while [`PatternParser`]
//! scans raw text for `trkpt` records and only recovers coordinates.

use crate::Track;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("File content is empty")]
    Empty,

    #[error("Not a valid GPX file")]
    MissingRoot,

    #[error("XML syntax error at position {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("No track points found")]
    NoTrackPoints,

    #[error("No valid track points found")]
    NoValidSamples,
}

/// Something that turns GPX text into a [`Track`].
pub trait TrackParser {
    fn parse(&self, source: &str) -> Result<Track, ParseError>;
}

/// Full document parse; see [`crate::gpxxml::parse_structured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupParser;

/// Degraded text scan; see [`crate::pattern::parse_pattern`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternParser;

impl TrackParser for MarkupParser {
    fn parse(&self, source: &str) -> Result<Track, ParseError> {
        crate::gpxxml::parse_structured(source)
    }
}

impl TrackParser for PatternParser {
    fn parse(&self, source: &str) -> Result<Track, ParseError> {
        crate::pattern::parse_pattern(source)
    }
}

pub(crate) fn ensure_content(source: &str) -> Result<(), ParseError> {
    if source.trim().is_empty() {
        Err(ParseError::Empty)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<gpx><trk><trkseg>
        <trkpt lat="40.0" lon="-105.0"><time>2023-01-01T10:00:00Z</time></trkpt>
        <trkpt lat="40.0001" lon="-105.0001"><time>2023-01-01T10:00:05Z</time></trkpt>
    </trkseg></trk></gpx>"#;

    /// Tests that both parsers can be used through the same trait object.
    #[test]
    fn test_parsers_share_capability() {
        let parsers: [&dyn TrackParser; 2] = [&MarkupParser, &PatternParser];
        for parser in parsers {
            let track = parser.parse(DOCUMENT).unwrap();
            assert_eq!(track.len(), 2);
        }
    }

    /// Tests that only the structured parser keeps timestamps.
    #[test]
    fn test_modes_differ_in_fidelity() {
        let structured = MarkupParser.parse(DOCUMENT).unwrap();
        let pattern = PatternParser.parse(DOCUMENT).unwrap();

        assert!(structured.iter().all(|s| s.time.is_some()));
        assert!(pattern.iter().all(|s| s.time.is_none()));
    }

    /// Tests that empty input fails the same way in both modes.
    #[test]
    fn test_empty_source_rejected_by_both() {
        assert_eq!(MarkupParser.parse("").unwrap_err(), ParseError::Empty);
        assert_eq!(PatternParser.parse("  \n ").unwrap_err(), ParseError::Empty);
    }
}
