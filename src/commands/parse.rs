use super::fail_on_error;
use crate::host::{ConsoleChannel, ConsoleSink};
use gpxroute::pipeline::{Orchestrator, Request};
use gpxroute::storage::FileStore;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

pub async fn parse_command(state: PathBuf) -> Result<(), Box<dyn Error>> {
    let mut content = String::new();
    tokio::io::stdin().read_to_string(&mut content).await?;

    let mut orchestrator = Orchestrator::new(
        FileStore::new(state),
        ConsoleChannel::new(io::stdout()),
        ConsoleSink::new(io::stdout(), (0.0, 0.0)),
    );

    let response = orchestrator.handle(Request::ParseGpx { content }).await;
    fail_on_error(response)
}
