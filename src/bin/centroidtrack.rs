use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use centroidtrack_rs::{AppConfig, Orchestrator, ReplayDetector, ReplayFeed, output};

/// Track objects across several replayed detection feeds in parallel.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON run configuration (tracker settings, classes, feeds)
    #[arg(short, long)]
    config: PathBuf,

    /// Output JSON path, overrides the config file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop all feeds after this many seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    run(args)
}

fn run(args: Args) -> Result<ExitCode> {
    let config = AppConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let output_path = args.output.unwrap_or_else(|| config.output.clone());

    let mut orchestrator = Orchestrator::new(config.tracker.clone(), config.class_filter());
    for feed in &config.feeds {
        let source = ReplayFeed::open(&feed.path).with_context(|| {
            format!("failed to open feed `{}` at {}", feed.id, feed.path.display())
        })?;
        orchestrator.add_feed(feed.id.clone(), source, ReplayDetector);
    }

    if let Some(secs) = args.deadline_secs {
        let cancel = orchestrator.cancel_token();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            warn!(secs, "deadline reached, stopping feeds");
            cancel.cancel();
        });
    }

    let report = orchestrator.run();

    output::write_json(&output_path, &report.records)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    info!(
        records = report.records.len(),
        path = %output_path.display(),
        "output written"
    );

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(summary) => info!(
                feed = %outcome.feed_id,
                frames = summary.frames,
                tracks = summary.tracks,
                detection_failures = summary.detection_failures,
                "feed done"
            ),
            Err(err) => error!(feed = %outcome.feed_id, error = %err, "feed failed"),
        }
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
