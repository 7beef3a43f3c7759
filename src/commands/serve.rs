use super::pipeline_config;
use crate::ServeArgs;
use crate::host::{ConsoleChannel, ConsoleSink};
use gpxroute::pipeline::Orchestrator;
use gpxroute::storage::FileStore;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

pub async fn serve_command(state: PathBuf, args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let center = (args.viewport.viewport_x, args.viewport.viewport_y);
    let mut orchestrator = Orchestrator::new(
        FileStore::new(state),
        ConsoleChannel::new(io::stdout()),
        ConsoleSink::new(io::stdout(), center),
    )
    .with_config(pipeline_config(args.style));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        // Failures are already reported on the channel; keep serving.
        orchestrator.handle_json(&line).await;
    }

    debug!("request stream closed");
    Ok(())
}
