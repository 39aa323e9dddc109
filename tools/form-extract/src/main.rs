use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use extraction_service::{ExtractionService, MissingValuePolicy, ServiceConfig, ValueMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reconstruct form fields from a saved document-analysis result (JSON with a `Blocks` array).
#[derive(Debug, Parser)]
#[command(name = "form-extract", version)]
struct Args {
    /// Analysis result file, or `-` for stdin.
    input: String,
    /// Document-type label selecting a registered template.
    #[arg(short = 't', long, env = "FORM_EXTRACT_DOCUMENT_TYPE")]
    document_type: Option<String>,
    /// Service config (JSON).
    #[arg(short, long, env = "FORM_EXTRACT_CONFIG")]
    config: Option<PathBuf>,
    /// Extra rule templates (JSON array); overrides `templates_path` from the config.
    #[arg(long)]
    templates: Option<PathBuf>,
    /// Report every value of repeated fields instead of the first one.
    #[arg(long)]
    all_values: bool,
    /// Skip key blocks without a value link instead of failing.
    #[arg(long)]
    skip_missing: bool,
    /// Correlation id written into logs and the response meta.
    #[arg(long)]
    invocation_id: Option<String>,
    #[arg(long)]
    pretty: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "form_extract=info,extraction_service=info,form_extractor=debug"
    } else {
        "form_extract=warn,extraction_service=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_config(args: &Args) -> anyhow::Result<ServiceConfig> {
    let mut cfg = match &args.config {
        Some(path) => ServiceConfig::from_json_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(path) = &args.templates {
        cfg.templates_path = Some(path.clone());
    }
    if args.all_values {
        cfg.value_mode = ValueMode::All;
    }
    if args.skip_missing {
        cfg.missing_value_policy = MissingValuePolicy::Skip;
    }
    Ok(cfg)
}

fn read_input(input: &str) -> anyhow::Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).context("reading stdin")?;
        return Ok(buf);
    }
    fs::read(input).with_context(|| format!("reading {input}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let svc = ExtractionService::new(build_config(&args)?)?;
    let raw = read_input(&args.input)?;
    let invocation_id = args
        .invocation_id
        .clone()
        .unwrap_or_else(|| format!("cli-{:x}", chrono::Utc::now().timestamp_millis()));
    tracing::info!(%invocation_id, input = %args.input, bytes = raw.len(), "extracting");

    let envelope = svc.handle_json(&invocation_id, args.document_type.as_deref(), &raw);
    let out = if args.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{out}");

    if !envelope.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
