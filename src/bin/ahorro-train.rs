//! Trains both model stages from a JSON catalog and writes a snapshot.
//!
//! Usage: ahorro-train <products.json> <snapshot-dir>

use ahorro::data::JsonFileSource;
use ahorro::error::Result;
use ahorro::train::Trainer;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn run(data_path: &str, snapshot_dir: &str) -> Result<()> {
    let source = JsonFileSource::new(data_path);
    let trainer = Trainer::default();
    let (snapshot, report) = trainer.train(&source)?;

    for candidate in &report.candidates {
        info!(
            model = candidate.name,
            r2 = candidate.r2,
            rmse = candidate.rmse,
            mae = candidate.mae,
            "candidate metrics"
        );
    }
    info!(
        best_model = %report.best_model,
        r2 = report.best_r2,
        platform_accuracy = report.platform_accuracy,
        n_samples = report.n_samples,
        "training complete"
    );

    snapshot.save(snapshot_dir)?;
    info!(dir = snapshot_dir, "snapshot written");
    Ok(())
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for piping.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (data_path, snapshot_dir) = match args.as_slice() {
        [_, data, dir] => (data.as_str(), dir.as_str()),
        _ => {
            eprintln!("usage: ahorro-train <products.json> <snapshot-dir>");
            return ExitCode::from(2);
        }
    };

    match run(data_path, snapshot_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "training failed");
            ExitCode::FAILURE
        }
    }
}
