use crate::projection::PathDescription;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("drawing surface rejected path: {0}")]
pub struct SinkError(pub String);

/// The host drawing surface.
pub trait DrawingSink {
    /// Center of the caller's current view, in canvas units.
    fn viewport_center(&self) -> (f64, f64);

    fn append(&mut self, object: VectorObject) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WindingRule {
    NonZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrokeCap {
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrokeJoin {
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgb,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub stroke: Stroke,
    pub stroke_weight: f64,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
}

/// A positioned, styled vector path ready for the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorObject {
    pub name: String,
    pub winding_rule: WindingRule,
    pub data: String,
    #[serde(flatten)]
    pub style: StrokeStyle,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl VectorObject {
    /// Wraps a projected path, centering it on `center`.
    pub fn centered(
        name: &str,
        path: &PathDescription,
        style: StrokeStyle,
        center: (f64, f64),
    ) -> Self {
        VectorObject {
            name: name.to_string(),
            winding_rule: WindingRule::NonZero,
            data: path.to_path_data(),
            style,
            x: center.0 - path.width() / 2.0,
            y: center.1 - path.height() / 2.0,
            width: path.width(),
            height: path.height(),
        }
    }
}
