//! glass-quote - CLI tool to replay a quoting session and export the PDF quote.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use glass_quote::{export_quote, load_session, parse_script_file, review_ledger, Totals};

/// Price glass and mirror cutting jobs and export a PDF quote.
#[derive(Parser, Debug)]
#[command(name = "glass-quote")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session script (JSON) to replay
    #[arg(short, long)]
    input: PathBuf,

    /// Output PDF file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Starting glass price per m² (overrides the script)
    #[arg(long)]
    glass_price: Option<f64>,

    /// Starting mirror price per m² (overrides the script)
    #[arg(long)]
    mirror_price: Option<f64>,

    /// Replay and review only, don't write a document
    #[arg(long)]
    validate: bool,

    /// Fail if any action was rejected or the review found errors
    #[arg(long)]
    strict: bool,

    /// Output the ledger and totals as JSON
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Processing: {}", args.input.display());

    // Parse the session script
    let script = parse_script_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let config = script
        .config()
        .with_overrides(args.glass_price, args.mirror_price);

    // Replay the session
    let (ledger, report) = load_session(&script, config)
        .with_context(|| format!("Failed to replay {}", args.input.display()))?;

    info!(
        "Replayed {} action(s): {} item(s) in quote",
        report.applied,
        ledger.len()
    );

    for rejected in &report.rejected {
        warn!("Action {} not applied: {}", rejected.position, rejected.error);
    }

    // Review
    let review = review_ledger(&ledger);

    for warning in &review.warnings {
        warn!("{}", warning);
    }

    for err in &review.errors {
        error!("{}", err);
    }

    if args.strict && (!report.all_applied() || !review.passed) {
        anyhow::bail!("Session has rejected actions or review errors");
    }

    // Debug output
    if args.debug {
        #[derive(serde::Serialize)]
        struct DebugView<'a> {
            ledger: &'a glass_quote::Ledger,
            totals: Totals,
        }

        let view = DebugView {
            ledger: &ledger,
            totals: ledger.totals(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    // Validate-only mode
    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    // Generate output
    let generated_at = chrono::Local::now().naive_local();
    let (file_name, pdf) = export_quote(&ledger, generated_at)?;

    // Write output
    let output_path = args.output.unwrap_or_else(|| {
        args.input
            .parent()
            .map(|dir| dir.join(&file_name))
            .unwrap_or_else(|| PathBuf::from(&file_name))
    });

    std::fs::write(&output_path, &pdf)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Generated: {}", output_path.display());

    Ok(())
}
