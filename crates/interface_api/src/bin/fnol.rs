//! FNOL Triage - one-shot CLI
//!
//! Triages a single claim document, writes the output record to a file
//! and prints it with the elapsed time.
//!
//! ```bash
//! fnol forms/ACORD-filled.pdf
//! fnol claim.txt --output out.json --pretty --backend disabled
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use domain_claims::{ClaimPipeline, DocumentHandle};
use infra_llm::{build_inference, FileTextSource, InferenceBackend};
use interface_api::{config::FnolSettings, telemetry::init_tracing};

#[derive(Debug, Parser)]
#[command(name = "fnol", version, about = "Triage one First Notice of Loss document")]
struct Cli {
    /// Claim document (.pdf or text)
    path: PathBuf,

    /// Where to write the output record
    #[arg(short, long, default_value = "claim_processed_output.json")]
    output: PathBuf,

    /// Pretty-print the record on stdout
    #[arg(long)]
    pretty: bool,

    /// Settings file (default: ./fnol.toml when present)
    #[arg(short, long, env = "FNOL_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the configured inference backend
    #[arg(long)]
    backend: Option<InferenceBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = FnolSettings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(backend) = cli.backend {
        settings.inference.backend = backend;
    }
    init_tracing(&settings.log_level, settings.log_format);

    let config = Arc::new(settings.pipeline_config()?);
    let inference = build_inference(settings.inference.backend, settings.http_client_config())?;
    let pipeline = ClaimPipeline::new(config, inference);
    let source = FileTextSource::new();

    let start = Instant::now();
    let record = pipeline
        .process_document(&source, &DocumentHandle::path(&cli.path))
        .await;
    let elapsed = start.elapsed();

    let output = record.output();
    tokio::fs::write(&cli.output, serde_json::to_string_pretty(&output)?)
        .await
        .with_context(|| format!("writing {}", cli.output.display()))?;

    let printed = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", printed);
    println!(
        "Route: {} | saved to {} | processed in {:.2}s",
        record.route(),
        cli.output.display(),
        elapsed.as_secs_f64()
    );

    Ok(())
}
