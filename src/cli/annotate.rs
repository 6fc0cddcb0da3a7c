use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::info;

use crate::annotation::pool::{available_workers, clamp_workers};
use crate::annotation::{annotate, AnnotationConfig, RunSummary};
use crate::cli::{Cli, OutputFormat};
use crate::core::reference::ReferenceDir;
use crate::parsing::tsv::{read_variant_file, validate_header_file, write_resolved_file};
use crate::utils::validation::{make_absolute, validate_paths};

/// Execute an annotation run (or validation only)
///
/// # Errors
///
/// Returns an error for any fatal condition: invalid paths or header, no
/// chromosomes, no resolved rows, or a failure writing the output.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let input = make_absolute(&cli.input)?;
    let output = make_absolute(&cli.output)?;
    let ref_dir = make_absolute(&cli.ref_dir)?;

    let workers = clamp_workers(
        cli.processes.unwrap_or_else(available_workers),
        available_workers(),
    );

    validate_paths(&input, &output, &ref_dir)?;

    if cli.validate_only {
        if !cli.skip_header_check {
            validate_header_file(&input).context("Validation failed")?;
        }
        eprintln!("Validation successful - input appears valid");
        return Ok(());
    }

    let started = Instant::now();
    if cli.no_log_file {
        info!("Starting variant annotation (logging to console)");
    } else {
        info!(
            "Starting variant annotation (logging to {})",
            cli.log_file.display()
        );
    }

    let records = read_variant_file(&input, !cli.skip_header_check)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    if !cli.skip_header_check {
        info!("Header validation passed");
    }
    info!("Read {} variants from {}", records.len(), input.display());

    let config = AnnotationConfig {
        workers,
        max_variants_per_chrom: cli.max_variants_per_chrom,
        progress_interval: Duration::from_secs(cli.progress_interval),
    };
    let aggregate = annotate(records, &ReferenceDir::new(&ref_dir), &config)?;

    write_resolved_file(&output, &aggregate.records)
        .with_context(|| format!("Failed to save results to {}", output.display()))?;
    info!("Saved results to {}", output.display());

    let summary = RunSummary::new(&aggregate, output, started);
    summary.log();
    if matches!(cli.format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
