//! `btr-train` - fit the trip duration model on a CSV of historical trips
//! and print the model summary.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use btr_job::JobConfig;

/// Train the trip duration model
#[derive(Parser, Debug)]
#[command(name = "btr-train", version, about)]
struct Args {
    /// CSV file of historical trips, with a header row
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // the report owns stdout, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = JobConfig::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    btr_job::run(&config, &args.path, &mut out)
        .with_context(|| format!("training on {} failed", args.path.display()))?;

    Ok(())
}
