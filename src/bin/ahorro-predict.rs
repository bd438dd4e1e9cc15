//! Predicts a deal from a trained snapshot and prints it as JSON.
//!
//! Usage: ahorro-predict <snapshot-dir> [query-json]
//!
//! The query is a JSON object like `{"category": "Electronics",
//! "budget": 12000, "platform": "Amazon"}`; every field is optional.
//! When the argument is omitted the query is read from stdin.

use ahorro::error::{AhorroError, Result};
use ahorro::pipeline::{DealPrediction, DealQuery, InferencePipeline};
use ahorro::snapshot::Snapshot;
use serde::Serialize;
use std::io::Read;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Envelope {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<DealPrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn read_query(arg: Option<&str>) -> Result<DealQuery> {
    let raw = match arg {
        Some(json) => json.to_string(),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DealQuery::default());
    }
    serde_json::from_str(raw).map_err(|e| AhorroError::Serialization(format!("query: {e}")))
}

fn run(snapshot_dir: &str, query_arg: Option<&str>) -> Result<DealPrediction> {
    let query = read_query(query_arg)?;
    let snapshot = Snapshot::load(snapshot_dir)?;
    let pipeline = InferencePipeline::new(snapshot);
    pipeline.predict(&query)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (snapshot_dir, query_arg) = match args.as_slice() {
        [_, dir] => (dir.as_str(), None),
        [_, dir, json] => (dir.as_str(), Some(json.as_str())),
        _ => {
            eprintln!("usage: ahorro-predict <snapshot-dir> [query-json]");
            return ExitCode::from(2);
        }
    };

    let envelope = match run(snapshot_dir, query_arg) {
        Ok(prediction) => Envelope {
            success: true,
            prediction: Some(prediction),
            error: None,
        },
        Err(e) => Envelope {
            success: false,
            prediction: None,
            error: Some(e.to_string()),
        },
    };
    let failed = !envelope.success;

    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("serialization failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
