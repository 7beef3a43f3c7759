use super::{fail_on_error, pipeline_config};
use crate::RenderArgs;
use crate::host::{ConsoleChannel, ConsoleSink, write_json_line};
use gpxroute::pipeline::{Orchestrator, PipelineError, Request};
use gpxroute::projection::project_to_unit_square;
use gpxroute::storage::{FileStore, TRACK_SLOT, TrackStore};
use gpxroute::Track;
use serde::Serialize;
use std::error::Error;
use std::io;
use std::path::PathBuf;

#[derive(Serialize)]
struct UnitSquarePath {
    width: f64,
    height: f64,
    data: String,
}

pub async fn render_command(state: PathBuf, args: RenderArgs) -> Result<(), Box<dyn Error>> {
    if args.unit_square {
        return unit_square_command(state).await;
    }

    let center = (args.viewport.viewport_x, args.viewport.viewport_y);
    let mut orchestrator = Orchestrator::new(
        FileStore::new(state),
        ConsoleChannel::new(io::stdout()),
        ConsoleSink::new(io::stdout(), center),
    )
    .with_config(pipeline_config(args.style));

    let response = orchestrator.handle(Request::ShowRoute).await;
    fail_on_error(response)
}

async fn unit_square_command(state: PathBuf) -> Result<(), Box<dyn Error>> {
    let stored = FileStore::new(state)
        .get(TRACK_SLOT)
        .await?
        .ok_or(PipelineError::NoData)?;
    let track = Track::new(stored.points).ok_or(PipelineError::NoData)?;

    let path = project_to_unit_square(&track);
    write_json_line(
        &mut io::stdout(),
        &UnitSquarePath {
            width: path.width(),
            height: path.height(),
            data: path.to_path_data(),
        },
    )
}
