use crate::host::write_json_line;
use gpxroute::distance::DistanceEngine;
use gpxroute::parser::{MarkupParser, TrackParser};
use gpxroute::summary::TrackSummarizer;
use std::error::Error;
use std::io;
use tokio::io::AsyncReadExt;

pub async fn stats_command(drift_threshold: f64) -> Result<(), Box<dyn Error>> {
    let mut content = String::new();
    tokio::io::stdin().read_to_string(&mut content).await?;

    // Structured parse: the pattern scan drops the timestamps pace depends on
    let track = MarkupParser.parse(&content)?;
    let stats = TrackSummarizer::with_engine(DistanceEngine::new(drift_threshold)).summarize(&track);

    write_json_line(&mut io::stdout(), &stats)
}
