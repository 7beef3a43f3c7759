use crate::parser::{ParseError, ensure_content};
use crate::{Sample, Track};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static TRKPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<trkpt\s+lat="([^"]+)"\s+lon="([^"]+)"\s*(?:/>|>.*?</trkpt>)"#)
        .expect("track point pattern compiles")
});

/// Scans raw text for `<trkpt lat="..." lon="...">` records.
///
/// This is the degraded mode: no document structure is checked and only
/// coordinates are recovered, so the resulting samples never carry elevation
/// or time. Records are taken in match order.
pub fn parse_pattern(source: &str) -> Result<Track, ParseError> {
    ensure_content(source)?;

    let mut samples = Vec::new();
    let mut matched = 0;

    for caps in TRKPT.captures_iter(source) {
        matched += 1;
        let lat = caps.get(1).map(|m| m.as_str());
        let lon = caps.get(2).map(|m| m.as_str());
        match Sample::from_attributes(lat, lon) {
            Ok(sample) => samples.push(sample),
            Err(e) => warn!("skipping invalid coordinate point {matched}: {e}"),
        }
    }

    if matched == 0 {
        return Err(ParseError::NoTrackPoints);
    }

    debug!("pattern scan kept {} of {matched} track points", samples.len());
    Track::new(samples).ok_or(ParseError::NoValidSamples)
}
