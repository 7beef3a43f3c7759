use clap::{Args, Parser, Subcommand};
use gpxroute::DEFAULT_DRIFT_THRESHOLD_M;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod host;

#[derive(Parser)]
#[command(
    name = "gpxroute",
    about = "Turn GPX tracks into drawable route paths and running stats"
)]
struct Cli {
    /// File holding the last parsed track between invocations
    #[arg(long, global = true, default_value = "gpxroute-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Parse a GPX document from stdin and store its track points")]
    Parse,

    #[command(about = "Project the stored track into a vector path")]
    Render(RenderArgs),

    #[command(about = "Print distance, duration and pace for a GPX document read from stdin")]
    Stats {
        /// Steps longer than this many meters are ignored as GPS drift
        #[arg(long, default_value_t = DEFAULT_DRIFT_THRESHOLD_M)]
        drift_threshold: f64,
    },

    #[command(about = "Handle JSON requests from stdin, one per line")]
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct ViewportArgs {
    /// Horizontal center of the viewport the route is placed in
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    viewport_x: f64,

    /// Vertical center of the viewport the route is placed in
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    viewport_y: f64,
}

#[derive(Args)]
pub struct StyleArgs {
    /// Name given to the inserted route path
    #[arg(long, default_value = "Running Route")]
    route_name: String,

    /// Stroke width of the inserted route path
    #[arg(long, default_value_t = 2.0)]
    stroke_weight: f64,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    viewport: ViewportArgs,

    #[command(flatten)]
    style: StyleArgs,

    /// Stretch the track over a fixed 1000x1000 canvas instead
    #[arg(long)]
    unit_square: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    viewport: ViewportArgs,

    #[command(flatten)]
    style: StyleArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        // failures handled by the orchestrator were already shown by the channel
        if !e.is::<commands::Reported>() {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Parse => commands::parse::parse_command(cli.state).await,
        Commands::Render(args) => commands::render::render_command(cli.state, args).await,
        Commands::Stats { drift_threshold } => commands::stats::stats_command(drift_threshold).await,
        Commands::Serve(args) => commands::serve::serve_command(cli.state, args).await,
    }
}
