use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use clipmerge::{
    config::Config,
    merge::{MergeEngine, MergeRequest},
};

#[derive(Parser)]
#[command(
    name = "clipmerge",
    version,
    about = "Merge two video clips and an optional audio track into one movie",
    long_about = "Clipmerge places two clips back to back, corrects portrait/landscape orientation to a fixed render target, lays an optional audio track under the combined video, and exports a single streaming-optimized movie file."
)]
struct Cli {
    /// First video clip
    first: PathBuf,

    /// Second video clip, appended after the first
    second: PathBuf,

    /// Optional audio track laid under the combined video
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Directory for the exported movie
    #[arg(short, long, default_value = "exports")]
    output_dir: PathBuf,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting clipmerge v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    let request = MergeRequest {
        first: cli.first,
        second: cli.second,
        audio: cli.audio,
        output_dir: cli.output_dir,
    };

    let engine = MergeEngine::new(config);
    let outcome = engine.merge(&request).await?;

    info!("Merged movie saved to: {:?}", outcome.movie.path);
    if let Some(library_path) = outcome.library_path {
        info!("Library copy: {:?}", library_path);
    }

    Ok(())
}
