use crate::distance::DistanceEngine;
use crate::{Sample, Track};
use serde::Serialize;
use tracing::debug;

/// Totals derived from a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackStatistics {
    pub point_count: usize,
    pub total_distance_m: f64,
    pub duration_s: f64,
    /// Minutes per kilometer; zero when no distance was covered.
    pub pace_min_per_km: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackSummarizer {
    engine: DistanceEngine,
}

impl TrackSummarizer {
    pub fn with_engine(engine: DistanceEngine) -> Self {
        TrackSummarizer { engine }
    }

    /// Never fails: missing timestamps or a stationary track just produce zeros.
    pub fn summarize(&self, track: &Track) -> TrackStatistics {
        let total_distance_m: f64 = track
            .samples()
            .windows(2)
            .map(|pair| self.engine.distance(&pair[0], &pair[1]))
            .sum();

        let duration_s = elapsed_seconds(track.samples());

        let pace_min_per_km = if total_distance_m > 0.0 {
            (duration_s / 60.0) / (total_distance_m / 1000.0)
        } else {
            0.0
        };

        debug!("summarized {} points: {total_distance_m:.1}m in {duration_s}s", track.len());

        TrackStatistics {
            point_count: track.len(),
            total_distance_m,
            duration_s,
            pace_min_per_km,
        }
    }
}

/// [`TrackSummarizer::summarize`] with the default drift threshold.
pub fn summarize(track: &Track) -> TrackStatistics {
    TrackSummarizer::default().summarize(track)
}

// First and last timestamp in scan order, not the first and last sample.
fn elapsed_seconds(samples: &[Sample]) -> f64 {
    let mut stamps = samples.iter().filter_map(|s| s.time);
    let Some(start) = stamps.next() else {
        return 0.0;
    };
    let Some(end) = stamps.last() else {
        return 0.0;
    };
    (end - start).as_seconds_f64().max(0.0)
}
