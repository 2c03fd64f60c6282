use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cli::args::{Cli, Commands};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::models::LocationCode;
use crate::processors::{
    BuildReport, Catalog, CatalogBuilder, IntegrityChecker, Inventory, ParallelProcessor,
};
use crate::readers::{CatalogReader, ManifestReader};
use crate::utils::filename::{dds_path_for, generate_default_catalog_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::CatalogWriter;

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli)?;

    let config = CatalogConfig::load(cli.config.as_deref())?;
    let config = if cli.quiet {
        config.with_progress(false)
    } else {
        config
    };

    match cli.command {
        Commands::Build {
            manifest,
            output_file,
            max_workers,
            on_conflict,
        } => {
            let config = config.with_overrides(max_workers, on_conflict)?;
            let output_file = output_file
                .unwrap_or_else(|| generate_default_catalog_filename(&config.output_dir));

            println!("Building catalog...");
            println!("Manifest: {}", manifest.display());
            println!("Output file: {}", output_file.display());
            println!(
                "Workers: {}, On conflict: {:?}",
                config.max_workers, config.on_conflict
            );

            let (catalog, report) = build_catalog(&manifest, &config).await?;
            println!("\n{}", report.summary());

            let checker = IntegrityChecker::new();
            let integrity_report = checker.check_catalog(&catalog);
            if !integrity_report.is_clean() {
                warn!(
                    "Catalog has {} integrity issues",
                    integrity_report.violations.len()
                );
                println!("{}", checker.generate_summary(&integrity_report));
            }

            if catalog.is_empty() {
                warn!("No variables catalogued; writing an empty catalog");
            }

            let file_info = CatalogWriter::new().write_catalog(&catalog, &output_file)?;
            println!("\n{}", file_info.summary());

            println!("Catalog complete!");
        }

        Commands::Validate {
            manifest,
            max_workers,
            on_conflict,
        } => {
            let config = config.with_overrides(max_workers, on_conflict)?;

            println!("Validating catalog inputs...");
            println!("Manifest: {}", manifest.display());

            let (catalog, report) = build_catalog(&manifest, &config).await?;
            println!("\n{}", report.summary());

            let checker = IntegrityChecker::new();
            let integrity_report = checker.check_catalog(&catalog);
            println!("{}", checker.generate_summary(&integrity_report));

            if integrity_report.has_errors() {
                println!(
                    "❌ Catalog would be malformed: {} integrity issues",
                    integrity_report.violations.len()
                );
            } else if integrity_report.is_clean() && report.skipped.is_empty() {
                println!("✅ All inventories merged cleanly");
            } else {
                println!(
                    "⚠️  Found {} integrity issues, {} inventories skipped",
                    integrity_report.violations.len(),
                    report.skipped.len()
                );
            }
        }

        Commands::Inspect {
            das,
            dds,
            collection,
            base_url,
            file_url,
            json,
        } => {
            let dds = dds.unwrap_or_else(|| dds_path_for(&das));
            let das_text =
                std::fs::read_to_string(&das).map_err(|e| CatalogError::read(&das, e))?;
            let dds_text =
                std::fs::read_to_string(&dds).map_err(|e| CatalogError::read(&dds, e))?;

            let file_url = file_url.unwrap_or_else(|| das.to_string_lossy().into_owned());
            let location = LocationCode::from_file_url(base_url, collection, &file_url)?;
            let inventory = Inventory::build(location, &das_text, &dds_text)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&inventory)?);
            } else {
                println!("{}", inventory.summary());
            }
        }

        Commands::Info { file, sample } => {
            println!("Reading catalog file: {}", file.display());

            let records = CatalogReader::new().read_catalog(&file)?;
            let locations: usize = records.iter().map(|r| r.locations.len()).sum();
            let file_size = std::fs::metadata(&file)?.len();

            println!("\nCatalog Summary:");
            println!("- Variables: {}", records.len());
            println!("- Locations: {}", locations);
            println!("- File size: {:.1} KB", file_size as f64 / 1024.0);

            if sample > 0 {
                println!("\nSample Records (showing up to {} records):", sample);
                for (i, record) in records.iter().take(sample).enumerate() {
                    let best = record
                        .locations
                        .first()
                        .map(|l| format!("{} ({})", l.collection_code, l.tag))
                        .unwrap_or_default();
                    println!(
                        "  {}. {} [{}] {} ({}), {} locations, best: {}",
                        i + 1,
                        record.name,
                        record.ndims,
                        record.long_name,
                        record.units,
                        record.locations.len(),
                        best
                    );
                }
            }
        }
    }

    Ok(())
}

/// Manifest to catalog: read the text pages, inventory them in parallel,
/// then merge in manifest order.
pub async fn build_catalog(
    manifest_path: &Path,
    config: &CatalogConfig,
) -> Result<(Catalog, BuildReport)> {
    let reader = ManifestReader::new(config.max_workers);
    let manifest = reader.read_manifest(manifest_path)?;

    let spinner = ProgressReporter::new_spinner("Reading DAS/DDS text...", !config.show_progress);
    let pages = reader.read_pages(&manifest).await?;
    spinner.finish_with_message(&format!("Read {} files", pages.len()));

    let progress = ProgressReporter::new(
        pages.len() as u64,
        "Building inventories...",
        !config.show_progress,
    );

    let batch = ParallelProcessor::new(config.max_workers)
        .with_conflict_policy(config.on_conflict)
        .build_inventories(&pages, Some(&progress))?;

    progress.set_message("Merging inventories...");
    let (catalog, mut report) = CatalogBuilder::new()
        .with_conflict_policy(config.on_conflict)
        .build(&batch.inventories)?;

    let mut excluded = batch.excluded;
    report.inventories_seen += excluded.len();
    excluded.append(&mut report.excluded_locations);
    report.excluded_locations = excluded;

    let mut skipped = batch.skipped;
    report.inventories_seen += skipped.len();
    skipped.append(&mut report.skipped);
    report.skipped = skipped;

    progress.finish_with_message(&format!("Catalogued {} variables", catalog.len()));
    info!(
        "Catalog built from {} of {} files",
        report.inventories_contributing, report.inventories_seen
    );

    Ok((catalog, report))
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("merra_catalog={}", log_level)));

    let result = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init(),
    };
    result.map_err(|e| CatalogError::Config(e.to_string()))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
