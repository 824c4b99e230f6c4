//! `oc-declare`: check and discover OC-DECLARE constraints on OCEL 2.0 logs
//!
//! ```text
//! oc-declare info <LOG>
//! oc-declare evaluate <LOG> --arcs <ARCS.json>
//! oc-declare discover <LOG> [--threshold 0.8] [--graph]
//! oc-declare schema
//! ```
//!
//! Results are written as JSON to stdout (or `--output`), logs go to stderr (`RUST_LOG`, default `info`).
use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oc_declare::{
    engine::{protocol::wire_schemas, EngineConfig, EngineHandle},
    graph::{DiscoveryMaterializer, LayoutOptions},
    OCDeclareArc, OcelFormat,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Check and discover OC-DECLARE constraints
#[derive(Debug, Parser)]
#[command(name = "oc-declare", version, about)]
struct Args {
    /// JSON file with the engine configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the JSON result to this file instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print object type / activity involvement counts of a log
    Info {
        /// OCEL 2.0 log (.json, .jsonocel, .xml or .xmlocel)
        log: PathBuf,
        /// Log format (inferred from the file extension by default)
        #[arg(long)]
        format: Option<OcelFormat>,
    },
    /// Evaluate arcs on a log
    Evaluate {
        /// OCEL 2.0 log
        log: PathBuf,
        /// JSON file containing an array of arcs
        #[arg(long)]
        arcs: PathBuf,
        /// Log format (inferred from the file extension by default)
        #[arg(long)]
        format: Option<OcelFormat>,
    },
    /// Discover arcs satisfied by at least a `threshold` fraction of their activations
    Discover {
        /// OCEL 2.0 log
        log: PathBuf,
        /// Confidence threshold in [0, 1]
        #[arg(long, default_value_t = 0.8)]
        threshold: f64,
        /// Output positioned graph nodes and edges instead of arcs
        #[arg(long)]
        graph: bool,
        /// Log format (inferred from the file extension by default)
        #[arg(long)]
        format: Option<OcelFormat>,
    },
    /// Print JSON schemas of the wire types
    Schema,
}

/// One row of the `evaluate` output
#[derive(Debug, Serialize)]
struct EvaluationRow {
    arc: String,
    total: usize,
    violating: usize,
    percent: f64,
    no_data: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
}

fn read_log(path: &Path, format: Option<OcelFormat>) -> Result<(Vec<u8>, OcelFormat)> {
    let format = format
        .or_else(|| OcelFormat::from_path(path))
        .with_context(|| {
            format!(
                "cannot infer the format of {}; pass --format json|xml",
                path.display()
            )
        })?;
    let bytes = fs::read(path).with_context(|| format!("reading log {}", path.display()))?;
    Ok((bytes, format))
}

fn read_arcs(path: &Path) -> Result<Vec<OCDeclareArc>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading arcs {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing arcs {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

async fn load(engine: &EngineHandle, log: &Path, format: Option<OcelFormat>) -> Result<()> {
    let (bytes, format) = read_log(log, format)?;
    engine
        .load(bytes, format)
        .await
        .with_context(|| format!("loading {}", log.display()))?;
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let output = args.output.as_deref();
    if let Command::Schema = args.command {
        return write_json(&wire_schemas(), output);
    }
    let config = load_config(args.config.as_deref())?;
    let engine = EngineHandle::spawn(config)?;
    match args.command {
        Command::Info { log, format } => {
            let (bytes, format) = read_log(&log, format)?;
            let info = engine
                .load(bytes, format)
                .await
                .with_context(|| format!("loading {}", log.display()))?;
            write_json(&info, output)?;
        }
        Command::Evaluate { log, arcs, format } => {
            let arcs = read_arcs(&arcs)?;
            load(&engine, &log, format).await?;
            let results = engine.evaluate(arcs.clone()).await?;
            let rows: Vec<EvaluationRow> = arcs
                .iter()
                .zip(results)
                .map(|(arc, res)| {
                    let percentage = res.violation_percentage();
                    EvaluationRow {
                        arc: arc.as_template_string(),
                        total: res.total,
                        violating: res.violating,
                        percent: percentage.percent,
                        no_data: percentage.no_data,
                    }
                })
                .collect();
            write_json(&rows, output)?;
        }
        Command::Discover {
            log,
            threshold,
            graph,
            format,
        } => {
            load(&engine, &log, format).await?;
            let arcs = engine.discover(threshold).await?;
            for arc in &arcs {
                info!("{arc}");
            }
            if graph {
                let materialized =
                    DiscoveryMaterializer::new(LayoutOptions::default()).materialize(&arcs, &[]);
                write_json(&materialized, output)?;
            } else {
                write_json(&arcs, output)?;
            }
        }
        Command::Schema => {}
    }
    engine.shutdown()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    run(Args::parse()).await
}
