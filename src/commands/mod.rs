use crate::StyleArgs;
use gpxroute::pipeline::{PipelineConfig, Response};
use std::error::Error;
use thiserror::Error;

pub mod parse;
pub mod render;
pub mod serve;
pub mod stats;

/// A failure the orchestrator already reported on the channel. It only
/// carries the non-zero exit.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Reported(pub String);

fn fail_on_error(response: Option<Response>) -> Result<(), Box<dyn Error>> {
    match response {
        Some(Response::Error { message }) => Err(Reported(message).into()),
        _ => Ok(()),
    }
}

fn pipeline_config(style: StyleArgs) -> PipelineConfig {
    PipelineConfig {
        route_name: style.route_name,
        stroke_weight: style.stroke_weight,
        ..PipelineConfig::default()
    }
}
