use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pulseboard::analytics::DayBucketer;
use pulseboard::cli::{import, show, show::Section};
use pulseboard::config::Config;
use pulseboard::dashboard;
use pulseboard::source::{open_source, SourceKind};
use pulseboard::store::SnapshotStore;

#[derive(Parser)]
#[command(name = "pulseboard")]
#[command(about = "Task and note activity dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "pulseboard.yaml")]
    config: String,

    /// Override the configured record source
    #[arg(short, long, value_enum)]
    source: Option<SourceKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full dashboard
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Show task and note counters
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Show per-day counts for the last week
    Weekly {
        #[arg(long)]
        json: bool,
    },

    /// Show the task activity heatmap
    Heatmap {
        #[arg(long)]
        json: bool,
    },

    /// Show the merged recent activity feed
    Timeline {
        #[arg(long)]
        json: bool,
    },

    /// Load JSON snapshots into the local store
    Import {
        /// Tasks snapshot (JSON array)
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Notes snapshot (JSON array)
        #[arg(long)]
        notes: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config; the subscriber needs its log level
    let config_path = Config::locate(&cli.config);
    let config = match &config_path {
        Some(path) => Config::from_file(path)?,
        // No config file found, use defaults
        None => Config::default(),
    };

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &config_path {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
        None => tracing::debug!("no config file found, using defaults"),
    }

    let (section, json) = match cli.command {
        Commands::Import { tasks, notes } => {
            let store = SnapshotStore::open(&config.database_path())?;
            return import::run(&store, tasks.as_deref(), notes.as_deref());
        }
        Commands::Show { json } => (Section::All, json),
        Commands::Stats { json } => (Section::Stats, json),
        Commands::Weekly { json } => (Section::Weekly, json),
        Commands::Heatmap { json } => (Section::Heatmap, json),
        Commands::Timeline { json } => (Section::Timeline, json),
    };

    let kind = cli.source.unwrap_or(config.source.kind);
    let source = open_source(&config, kind)?;
    let bucketer = DayBucketer::now(config.dashboard.timezone);

    let dashboard = dashboard::load(source.as_ref(), &bucketer, &config.dashboard_options()).await?;
    show::run(&dashboard, section, json, config.dashboard.excerpt_chars)
}
