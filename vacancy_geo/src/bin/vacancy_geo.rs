//! Vacancy geocoding command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Clean the raw vacancy export
//! vacancy-geo clean --input Data/vacancies.csv --output Data_cleaned/vacancies_cleaned.csv
//!
//! # Geocode organization locations and add job-to-organization distances
//! vacancy-geo distance \
//!   --records Data_cleaned/vacancies_cleaned.csv \
//!   --gazetteer Data/cities_gps.csv \
//!   --output Data_cleaned/dataset_final.csv \
//!   --audit Data_cleaned/city_matches.csv \
//!   --report Data_cleaned/run_report.json
//! ```
//!
//! Settings come from `--config`, or `vacancy_geo.toml` in a standard
//! location, or built-in defaults; command-line flags override them.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use polars::prelude::DataFrame;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use vacancy_geo::algorithms::fuzzy::Scorer;
use vacancy_geo::config::GeoConfig;
use vacancy_geo::io::loaders::{load_gazetteer, load_records};
use vacancy_geo::io::writers::{create_output, write_frame_csv, write_json, write_match_audit_csv};
use vacancy_geo::preprocessing::DistancePipeline;
use vacancy_geo::services::report::{InputChecksums, RunReport};
use vacancy_geo::transformations::cleaning::{clean_vacancies, CLEANING_INPUT_COLUMNS};
use vacancy_geo::transformations::projection::validate_schema;

#[derive(Parser, Debug)]
#[command(
    name = "vacancy-geo",
    version,
    about = "Clean job-vacancy data and compute job-to-organization distances"
)]
struct Cli {
    /// TOML configuration file (defaults to vacancy_geo.toml in a standard location)
    #[arg(long, global = true, env = "VACANCY_GEO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the cleaning rules to a raw vacancy export
    Clean(CleanArgs),
    /// Match organization locations and compute distances
    Distance(DistanceArgs),
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Raw vacancy file (.csv or .json)
    #[arg(long)]
    input: PathBuf,

    /// Cleaned CSV output
    #[arg(long)]
    output: PathBuf,

    /// Optional JSON file receiving per-rule drop counts
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Keep rows whose organization location occurs only once
    #[arg(long, default_value_t = false)]
    keep_singletons: bool,
}

#[derive(Args, Debug)]
struct DistanceArgs {
    /// Cleaned vacancy file (.csv or .json)
    #[arg(long)]
    records: PathBuf,

    /// Reference city table (.csv or .json)
    #[arg(long)]
    gazetteer: PathBuf,

    /// Projected CSV output
    #[arg(long)]
    output: PathBuf,

    /// Optional CSV with the best gazetteer match per distinct name
    #[arg(long)]
    audit: Option<PathBuf>,

    /// Optional JSON run report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Minimum fuzzy score (0-100) a match needs to be kept
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Similarity scorer (ratio, levenshtein or jaro_winkler)
    #[arg(long)]
    scorer: Option<Scorer>,

    /// Keep records whose organization location occurs only once
    #[arg(long, default_value_t = false)]
    keep_singletons: bool,

    /// Match names on the current thread only
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Gazetteer column holding the city name
    #[arg(long)]
    name_column: Option<String>,

    /// Gazetteer column holding the latitude
    #[arg(long)]
    latitude_column: Option<String>,

    /// Gazetteer column holding the longitude
    #[arg(long)]
    longitude_column: Option<String>,
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Clean(args) => run_clean(config, args),
        Command::Distance(args) => run_distance(config, args),
    }
}

fn load_config(path: Option<&Path>) -> Result<GeoConfig> {
    match path {
        Some(path) => {
            info!("Using configuration {}", path.display());
            GeoConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))
        }
        None => Ok(GeoConfig::from_default_location()
            .context("Failed to load default configuration")?
            .unwrap_or_default()),
    }
}

fn run_clean(config: GeoConfig, args: CleanArgs) -> Result<()> {
    let mut rules = config.cleaning;
    if args.keep_singletons {
        rules.drop_singleton_names = false;
    }

    let loaded = load_records(&args.input)
        .with_context(|| format!("Failed to load vacancies from {}", args.input.display()))?;
    ensure_columns(&loaded.records, &CLEANING_INPUT_COLUMNS, &args.input)?;

    let (mut cleaned, summary) =
        clean_vacancies(loaded.records, &rules).context("Failed to clean vacancies")?;

    let file = create_output(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_frame_csv(file, &mut cleaned)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(
        "Wrote {} cleaned records to {}",
        cleaned.height(),
        args.output.display()
    );

    if let Some(path) = args.summary {
        let file = create_output(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_json(file, &summary).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

fn run_distance(mut config: GeoConfig, args: DistanceArgs) -> Result<()> {
    if let Some(threshold) = args.threshold {
        config.matching.threshold = threshold;
    }
    if let Some(scorer) = args.scorer {
        config.matching.scorer = scorer;
    }
    if args.keep_singletons {
        config.filtering.drop_singleton_names = false;
    }
    if args.sequential {
        config.matching.parallel = false;
    }
    if let Some(column) = args.name_column {
        config.gazetteer.name_column = column;
    }
    if let Some(column) = args.latitude_column {
        config.gazetteer.latitude_column = column;
    }
    if let Some(column) = args.longitude_column {
        config.gazetteer.longitude_column = column;
    }
    config.validate().context("Invalid configuration")?;

    let records = load_records(&args.records)
        .with_context(|| format!("Failed to load vacancies from {}", args.records.display()))?;
    let gazetteer = load_gazetteer(&args.gazetteer, &config.gazetteer)
        .with_context(|| format!("Failed to load gazetteer from {}", args.gazetteer.display()))?;

    let pipeline_config = config.to_pipeline_config();
    let pipeline = DistancePipeline::with_config(pipeline_config.clone());
    ensure_columns(&records.records, &pipeline.required_columns(), &args.records)?;

    let mut output = pipeline
        .compute_distances(records.records, &gazetteer.gazetteer)
        .context("Distance computation failed")?;

    let file = create_output(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_frame_csv(file, &mut output.table)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(
        "Wrote {} records with distances to {}",
        output.table.height(),
        args.output.display()
    );

    if let Some(path) = args.audit {
        let file = create_output(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_match_audit_csv(file, &output.matches)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if let Some(path) = args.report {
        let report = RunReport::new(
            &output,
            &pipeline_config,
            InputChecksums {
                records: Some(records.checksum),
                gazetteer: Some(gazetteer.checksum),
            },
        )
        .context("Failed to build run report")?;
        let file = create_output(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_json(file, &report).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Run report written to {}", path.display());
    }

    Ok(())
}

/// Report every missing column at once rather than failing on the first.
fn ensure_columns<S: AsRef<str>>(df: &DataFrame, required: &[S], source: &Path) -> Result<()> {
    let (valid, issues) = validate_schema(df, required);
    if !valid {
        for issue in &issues {
            error!("{}: {}", source.display(), issue);
        }
        bail!(
            "{} is missing {} required column(s)",
            source.display(),
            issues.len()
        );
    }
    Ok(())
}
