//! Offline model trainer.
//!
//! Reads a labeled CSV, fits the gradient-boosted classifier, reports
//! held-out accuracy, and writes the artifact the server loads at startup.
//! Any malformed input is fatal; nothing is recovered or imputed.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heartrisk::training::{self, TrainConfig};

#[derive(Parser, Debug)]
#[clap(
    name = "train",
    version,
    about = "Train the heart-disease risk classifier"
)]
struct Args {
    /// Labeled CSV with a `target` column plus the 13 feature columns.
    data: PathBuf,

    /// Output path for the model artifact.
    #[clap(long, default_value = "heart_model.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heartrisk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let report = training::run(&TrainConfig::new(args.data, args.output))
        .context("training failed")?;

    tracing::info!(
        "Done: {:.2}% accuracy on {} held-out rows",
        report.accuracy * 100.0,
        report.test_rows
    );
    Ok(())
}
