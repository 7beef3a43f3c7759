//! Geographic to canvas projection.
//!
//! Canvas coordinates have their origin at the top-left, so latitude is
//! inverted: the northernmost sample lands on `y = 0`.

use crate::{Sample, Track};
use serde::Serialize;

/// Side length of the fixed canvas used by [`project_to_unit_square`].
pub const UNIT_SQUARE_SIZE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeometryBounds {
    pub fn of(track: &Track) -> Self {
        track.iter().fold(
            GeometryBounds {
                min_lat: f64::INFINITY,
                max_lat: f64::NEG_INFINITY,
                min_lon: f64::INFINITY,
                max_lon: f64::NEG_INFINITY,
            },
            |b, s| GeometryBounds {
                min_lat: b.min_lat.min(s.lat),
                max_lat: b.max_lat.max(s.lat),
                min_lon: b.min_lon.min(s.lon),
                max_lon: b.max_lon.max(s.lon),
            },
        )
    }

    pub fn lat_range(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_range(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

/// Sizes a canvas to the track's aspect ratio.
///
/// The wider geographic extent gets `base_size` and the other axis is scaled
/// down to match. A single-point track has no aspect ratio and gets a square.
pub fn fit_dimensions(bounds: &GeometryBounds, base_size: f64) -> (f64, f64) {
    let lat_range = bounds.lat_range();
    let lon_range = bounds.lon_range();

    if lat_range == 0.0 && lon_range == 0.0 {
        (base_size, base_size)
    } else if lon_range > lat_range {
        (base_size, base_size * (lat_range / lon_range))
    } else {
        (base_size * (lon_range / lat_range), base_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandKind {
    MoveTo,
    LineTo,
}

impl CommandKind {
    pub fn letter(self) -> char {
        match self {
            CommandKind::MoveTo => 'M',
            CommandKind::LineTo => 'L',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathCommand {
    pub kind: CommandKind,
    pub x: f64,
    pub y: f64,
}

/// An open polyline in canvas space, one command per sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathDescription {
    commands: Vec<PathCommand>,
    width: f64,
    height: f64,
}

impl PathDescription {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Vector path data: `M x y L x y ...`.
    pub fn to_path_data(&self) -> String {
        self.commands
            .iter()
            .map(|cmd| format!("{} {} {}", cmd.kind.letter(), cmd.x, cmd.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Projects a track onto a `width` x `height` canvas, keeping sample order.
///
/// Coordinates are scaled independently per axis, so callers wanting the
/// track's true shape should size the canvas with [`fit_dimensions`]. An axis
/// with no extent collapses onto its midline.
pub fn project(track: &Track, width: f64, height: f64) -> PathDescription {
    let bounds = GeometryBounds::of(track);
    let lat_range = bounds.lat_range();
    let lon_range = bounds.lon_range();

    build_path(track, width, height, |s| {
        let x = if lon_range == 0.0 {
            width / 2.0
        } else {
            (s.lon - bounds.min_lon) / lon_range * width
        };
        let y = if lat_range == 0.0 {
            height / 2.0
        } else {
            (bounds.max_lat - s.lat) / lat_range * height
        };
        (x, y)
    })
}

/// Stretches a track over a fixed 1000 x 1000 canvas, ignoring aspect ratio.
pub fn project_to_unit_square(track: &Track) -> PathDescription {
    let bounds = GeometryBounds::of(track);
    let lat_range = bounds.lat_range();
    let lon_range = bounds.lon_range();

    build_path(track, UNIT_SQUARE_SIZE, UNIT_SQUARE_SIZE, |s| {
        let u = if lon_range == 0.0 {
            0.5
        } else {
            (s.lon - bounds.min_lon) / lon_range
        };
        let v = if lat_range == 0.0 {
            0.5
        } else {
            1.0 - (s.lat - bounds.min_lat) / lat_range
        };
        (u * UNIT_SQUARE_SIZE, v * UNIT_SQUARE_SIZE)
    })
}

fn build_path<F>(track: &Track, width: f64, height: f64, position: F) -> PathDescription
where
    F: Fn(&Sample) -> (f64, f64),
{
    let commands = track
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let (x, y) = position(sample);
            PathCommand {
                kind: if i == 0 {
                    CommandKind::MoveTo
                } else {
                    CommandKind::LineTo
                },
                // absorb float overshoot at the bounds
                x: x.max(0.0).min(width),
                y: y.max(0.0).min(height),
            }
        })
        .collect();

    PathDescription {
        commands,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(points: &[(f64, f64)]) -> Track {
        Track::new(
            points
                .iter()
                .map(|&(lat, lon)| Sample::new(lat, lon).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn assert_well_formed(path: &PathDescription, samples: usize) {
        assert_eq!(path.len(), samples);
        assert_eq!(path.commands()[0].kind, CommandKind::MoveTo);
        assert!(path.commands()[1..].iter().all(|c| c.kind == CommandKind::LineTo));
        for c in path.commands() {
            assert!(c.x >= 0.0 && c.x <= path.width(), "x out of range: {}", c.x);
            assert!(c.y >= 0.0 && c.y <= path.height(), "y out of range: {}", c.y);
        }
    }

    /// Tests that bounds cover every sample.
    #[test]
    fn test_bounds() {
        let bounds = GeometryBounds::of(&track(&[(1.0, 5.0), (3.0, 2.0), (2.0, 9.0)]));
        assert_eq!(bounds.min_lat, 1.0);
        assert_eq!(bounds.max_lat, 3.0);
        assert_eq!(bounds.min_lon, 2.0);
        assert_eq!(bounds.max_lon, 9.0);
        assert_eq!(bounds.lat_range(), 2.0);
        assert_eq!(bounds.lon_range(), 7.0);
    }

    /// Tests that canvas sizes follow the track's aspect ratio.
    #[test]
    fn test_fit_dimensions() {
        let wide = GeometryBounds::of(&track(&[(0.0, 0.0), (1.0, 4.0)]));
        assert_eq!(fit_dimensions(&wide, 400.0), (400.0, 100.0));

        let tall = GeometryBounds::of(&track(&[(0.0, 0.0), (2.0, 1.0)]));
        assert_eq!(fit_dimensions(&tall, 400.0), (200.0, 400.0));

        let line = GeometryBounds::of(&track(&[(0.0, 0.0), (0.0, 1.0)]));
        assert_eq!(fit_dimensions(&line, 280.0), (280.0, 0.0));

        let dot = GeometryBounds::of(&track(&[(5.0, 5.0)]));
        assert_eq!(fit_dimensions(&dot, 280.0), (280.0, 280.0));
    }

    /// Tests that the bounding box corners map to the canvas corners.
    #[test]
    fn test_project_corners() {
        let path = project(&track(&[(0.0, 0.0), (1.0, 2.0), (0.5, 1.0)]), 200.0, 100.0);
        assert_well_formed(&path, 3);

        let c = path.commands();
        // south-west corner is bottom-left, north-east is top-right
        assert_eq!((c[0].x, c[0].y), (0.0, 100.0));
        assert_eq!((c[1].x, c[1].y), (200.0, 0.0));
        assert_eq!((c[2].x, c[2].y), (100.0, 50.0));
    }

    /// Tests that samples keep their order and duplicates stay in the path.
    #[test]
    fn test_project_preserves_order_and_duplicates() {
        let points = [(0.0, 0.0), (1.0, 1.0), (1.0, 1.0), (0.0, 0.0)];
        let path = project(&track(&points), 100.0, 100.0);
        assert_well_formed(&path, 4);
        assert_eq!(path.commands()[1], path.commands()[2]);
        assert_eq!((path.commands()[3].x, path.commands()[3].y), (0.0, 100.0));
    }

    /// Tests that a track with no latitude range is centered vertically.
    #[test]
    fn test_project_degenerate_latitude() {
        let path = project(&track(&[(10.0, 1.0), (10.0, 2.0), (10.0, 3.0)]), 300.0, 120.0);
        assert_well_formed(&path, 3);
        assert!(path.commands().iter().all(|c| c.y == 60.0));
        assert_eq!(path.commands()[2].x, 300.0);
    }

    /// Tests that a track with no longitude range is centered horizontally.
    #[test]
    fn test_project_degenerate_longitude() {
        let path = project(&track(&[(1.0, 7.0), (2.0, 7.0)]), 50.0, 80.0);
        assert_well_formed(&path, 2);
        assert!(path.commands().iter().all(|c| c.x == 25.0));
    }

    /// Tests that a single point becomes one move command.
    #[test]
    fn test_project_single_point() {
        let path = project(&track(&[(45.0, 7.0)]), 400.0, 400.0);
        assert_eq!(path.len(), 1);
        assert_eq!(path.commands()[0].kind, CommandKind::MoveTo);
        assert_eq!((path.commands()[0].x, path.commands()[0].y), (200.0, 200.0));
    }

    /// Tests that a zero-height canvas keeps every y at zero.
    #[test]
    fn test_project_zero_height_canvas() {
        // a flat east-west line sized by fit_dimensions gets height 0
        let t = track(&[(0.0, 0.0), (0.0, 1.0)]);
        let (w, h) = fit_dimensions(&GeometryBounds::of(&t), 400.0);
        let path = project(&t, w, h);
        assert_well_formed(&path, 2);
        assert!(path.commands().iter().all(|c| c.y == 0.0));
    }

    /// Tests that a track is stretched over the 1000 by 1000 square.
    #[test]
    fn test_project_to_unit_square() {
        let path = project_to_unit_square(&track(&[(0.0, 0.0), (1.0, 4.0), (0.5, 2.0)]));
        assert_well_formed(&path, 3);
        assert_eq!(path.width(), UNIT_SQUARE_SIZE);
        assert_eq!(path.height(), UNIT_SQUARE_SIZE);

        let c = path.commands();
        assert_eq!((c[0].x, c[0].y), (0.0, 1000.0));
        assert_eq!((c[1].x, c[1].y), (1000.0, 0.0));
        assert_eq!((c[2].x, c[2].y), (500.0, 500.0));
    }

    /// Tests that a single point fits the unit square without NaN.
    #[test]
    fn test_project_to_unit_square_degenerate() {
        let path = project_to_unit_square(&track(&[(3.0, 3.0), (3.0, 3.0)]));
        assert!(path.commands().iter().all(|c| c.x == 500.0 && c.y == 500.0));
    }

    /// Tests the path data string format.
    #[test]
    fn test_to_path_data() {
        let path = project(&track(&[(0.0, 0.0), (1.0, 2.0)]), 200.0, 100.0);
        assert_eq!(path.to_path_data(), "M 0 100 L 200 0");

        let fractional = project(&track(&[(0.0, 0.0), (1.0, 4.0), (0.5, 1.0)]), 10.0, 5.0);
        assert_eq!(fractional.to_path_data(), "M 0 5 L 10 0 L 2.5 2.5");
    }
}
