//! Replay recorded collect responses through the long-run analysis.
//!
//! Each FILE is one collect response body, given in collection order. An
//! optional sibling `FILE.meta.json` carries the request's
//! `{"durationSeconds": .., "statusCode": .., "reasonPhrase": ..}`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use mp_analysis::validation::validate_relationships;
use mp_analysis::{CollectionBundle, LongCollectionBundle, ResponseStatus, ValidationResult};
use mp_core::{LongRunConfig, MpError, MpErrorCode, MpResult};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "mp-long-run")]
#[command(about = "Report growth across recorded Management Pack collections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Recorded collect response bodies, one per collection, oldest first
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Long run duration, e.g. 6h, 90m, 30s (default: config, else 6h)
    #[arg(long)]
    duration: Option<String>,

    /// Collection interval, e.g. 5m (default: config, else 5m)
    #[arg(long)]
    interval: Option<String>,

    /// Configuration file path (mp.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Print the validation result as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecordingMeta {
    duration_seconds: f64,
    status_code: Option<u16>,
    reason_phrase: Option<String>,
}

impl RecordingMeta {
    fn status(&self) -> ResponseStatus {
        match self.status_code {
            None | Some(200) => ResponseStatus::ok(),
            Some(code) => ResponseStatus::new(
                code,
                self.reason_phrase.clone().unwrap_or_default(),
            ),
        }
    }
}

fn meta_path(file: &Path) -> PathBuf {
    let mut name = OsString::from(file.as_os_str());
    name.push(".meta.json");
    PathBuf::from(name)
}

fn read_meta(file: &Path) -> MpResult<RecordingMeta> {
    let path = meta_path(file);
    if !path.exists() {
        return Ok(RecordingMeta::default());
    }
    let text = std::fs::read_to_string(&path).map_err(|e| MpError::io(&path, e))?;
    Ok(serde_json::from_str(&text)?)
}

fn load_bundle(collection_number: usize, file: &Path) -> MpResult<CollectionBundle> {
    let body = std::fs::read_to_string(file).map_err(|e| MpError::io(file, e))?;
    let meta = read_meta(file)?;
    debug!(
        collection = collection_number,
        file = %file.display(),
        duration = meta.duration_seconds,
        "Loaded recorded collection"
    );
    Ok(CollectionBundle::new(
        collection_number,
        meta.status(),
        body,
        meta.duration_seconds,
    ))
}

fn load_config(cli: &Cli) -> MpResult<LongRunConfig> {
    let mut config = match &cli.config {
        Some(path) => LongRunConfig::load(path)?,
        None => LongRunConfig::default(),
    };
    if let Some(duration) = &cli.duration {
        config.duration = Some(duration.clone());
    }
    if let Some(interval) = &cli.interval {
        config.collection_interval = Some(interval.clone());
    }
    Ok(config)
}

fn run(cli: &Cli) -> MpResult<ExitCode> {
    let config = load_config(cli)?;
    mp_core::tracing::init_tracing(&config.logging)?;

    let duration = config.effective_duration()?;
    let interval = config.effective_collection_interval()?;

    let mut run = LongCollectionBundle::new(interval, duration)
        .with_highlight_config(config.highlights.clone());
    for (i, file) in cli.files.iter().enumerate() {
        run.add(load_bundle(i + 1, file)?);
    }
    info!(
        collections = run.collection_bundles().len(),
        duration_seconds = duration,
        interval_seconds = interval,
        "Replaying long run"
    );

    let highlights = run.validate();
    let mut relationship_results: Vec<(usize, ValidationResult)> = Vec::new();
    for bundle in run.collection_bundles() {
        let result = validate_relationships(&bundle.status, &bundle.body);
        if !result.is_empty() {
            relationship_results.push((bundle.collection_number, result));
        }
    }

    let mut combined = highlights.clone();
    combined.extend(relationship_results.iter().map(|(_, r)| r.clone()));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&combined)?);
    } else {
        println!("{run}");
        print!("{highlights}");
        for (collection, result) in &relationship_results {
            println!("\nCollection {collection}:");
            print!("{result}");
        }
    }

    Ok(if combined.error_count > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.error_code());
            ExitCode::from(2)
        }
    }
}
