//! Request dispatch between the host UI, storage, and the drawing surface.
//!
//! [`Orchestrator::handle`] is the only entry point. It runs one request to
//! completion and never lets an error escape: failures become a user
//! notification plus an `error` message on the channel.

use crate::parser::ParseError;
use crate::pattern::parse_pattern;
use crate::projection::{GeometryBounds, fit_dimensions, project};
use crate::sink::{DrawingSink, Rgb, SinkError, Stroke, StrokeCap, StrokeJoin, StrokeStyle, VectorObject};
use crate::storage::{StorageError, StoredTrack, TRACK_SLOT, TrackStore};
use crate::{Sample, Track};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    ParseGpx {
        #[serde(default)]
        content: String,
    },
    ShowRoute,
    /// Hosts may send fractional sizes; they are rounded before the resize.
    ResizeWindow {
        width: f64,
        height: f64,
    },
    Log {
        #[serde(default)]
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    ParseComplete {
        points: Vec<Sample>,
        route_width: f64,
        route_height: f64,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("No route data available")]
    NoData,

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("malformed request: {0}")]
    Request(#[from] serde_json::Error),
}

/// The host UI side of the conversation.
pub trait MessageChannel {
    fn post_message(&mut self, response: &Response);

    /// Short user-visible status text.
    fn notify(&mut self, message: &str);

    fn resize_window(&mut self, width: u32, height: u32);
}

/// Layout and styling constants.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Longest side of the route preview computed on parse.
    pub preview_base_size: f64,
    /// Longest side of the path inserted on render.
    pub render_base_size: f64,
    pub min_window_width: f64,
    pub max_window_width: f64,
    pub window_margin: f64,
    pub min_window_height: f64,
    /// Vertical space kept free for buttons and text around the preview.
    pub chrome_height: f64,
    pub route_name: String,
    pub stroke_color: Rgb,
    pub stroke_weight: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            preview_base_size: 280.0,
            render_base_size: 400.0,
            min_window_width: 280.0,
            max_window_width: 400.0,
            window_margin: 40.0,
            min_window_height: 320.0,
            chrome_height: 160.0,
            route_name: "Running Route".to_string(),
            stroke_color: Rgb {
                r: 0.988,
                g: 0.318,
                b: 0.0,
            },
            stroke_weight: 2.0,
        }
    }
}

impl PipelineConfig {
    /// Host window size that fits a preview of the given size.
    pub fn window_size(&self, route_width: f64, route_height: f64) -> (u32, u32) {
        let width = (route_width + self.window_margin)
            .min(self.max_window_width)
            .max(self.min_window_width);
        let height = (route_height + self.chrome_height).max(self.min_window_height);
        (width.round() as u32, height.round() as u32)
    }

    fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            stroke: Stroke {
                color: self.stroke_color,
                opacity: 1.0,
            },
            stroke_weight: self.stroke_weight,
            stroke_cap: StrokeCap::Round,
            stroke_join: StrokeJoin::Round,
        }
    }
}

pub struct Orchestrator<S, C, D> {
    store: S,
    channel: C,
    sink: D,
    config: PipelineConfig,
}

impl<S: TrackStore, C: MessageChannel, D: DrawingSink> Orchestrator<S, C, D> {
    pub fn new(store: S, channel: C, sink: D) -> Self {
        Orchestrator {
            store,
            channel,
            sink,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Handles one request. Returns whatever was posted back on the channel.
    pub async fn handle(&mut self, request: Request) -> Option<Response> {
        let result = match request {
            Request::Log { message } => {
                info!("UI log: {message}");
                return None;
            }
            Request::ResizeWindow { width, height } => {
                self.channel
                    .resize_window(width.round() as u32, height.round() as u32);
                return None;
            }
            Request::ParseGpx { content } => self.parse_gpx(&content).await.map(Some),
            Request::ShowRoute => self.show_route().await.map(|()| None),
        };
        self.finish(result)
    }

    /// Decodes a JSON request and handles it; undecodable input is reported
    /// like any other failure.
    pub async fn handle_json(&mut self, message: &str) -> Option<Response> {
        match serde_json::from_str::<Request>(message) {
            Ok(request) => self.handle(request).await,
            Err(e) => self.finish(Err(e.into())),
        }
    }

    fn finish(&mut self, result: Result<Option<Response>, PipelineError>) -> Option<Response> {
        match result {
            Ok(Some(response)) => {
                self.channel.post_message(&response);
                Some(response)
            }
            Ok(None) => None,
            Err(e) => {
                error!("Error during processing: {e}");
                self.channel.notify(&format!("Error: {e}"));
                let response = Response::Error {
                    message: e.to_string(),
                };
                self.channel.post_message(&response);
                Some(response)
            }
        }
    }

    async fn parse_gpx(&mut self, content: &str) -> Result<Response, PipelineError> {
        let track = parse_pattern(content)?;
        info!("parsed {} track points", track.len());

        let bounds = GeometryBounds::of(&track);
        let (route_width, route_height) = fit_dimensions(&bounds, self.config.preview_base_size);
        let (window_width, window_height) = self.config.window_size(route_width, route_height);
        self.channel.resize_window(window_width, window_height);

        let points = track.into_samples();
        self.store
            .set(
                TRACK_SLOT,
                &StoredTrack {
                    points: points.clone(),
                },
            )
            .await?;

        Ok(Response::ParseComplete {
            points,
            route_width,
            route_height,
        })
    }

    async fn show_route(&mut self) -> Result<(), PipelineError> {
        let stored = self
            .store
            .get(TRACK_SLOT)
            .await?
            .ok_or(PipelineError::NoData)?;
        let track = Track::new(stored.points).ok_or(PipelineError::NoData)?;

        let bounds = GeometryBounds::of(&track);
        let (width, height) = fit_dimensions(&bounds, self.config.render_base_size);
        debug!(?bounds, width, height, "projecting route");

        let path = project(&track, width, height);
        let object = VectorObject::centered(
            &self.config.route_name,
            &path,
            self.config.stroke_style(),
            self.sink.viewport_center(),
        );
        self.sink.append(object)?;

        self.channel.notify("Route created successfully");
        Ok(())
    }
}
