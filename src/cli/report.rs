//! CLI command for energy balance reports
//!
//! Loads a location, its consumption profile, and the city's insolation
//! series from files, caps the requested range, and renders the report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use tracing::info;

use crate::config::settings::Settings;
use crate::error::{ProsumerError, ProsumerResult};
use crate::export::{write_csv, write_json};
use crate::import::{load_consumption, load_insolation, load_locations};
use crate::models::select_location;
use crate::reports::{ReportAggregator, ReportData};

/// Output format for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary and daily table
    Terminal,
    /// Hourly rows as CSV
    Csv,
    /// Full report as JSON
    Json,
}

/// Arguments for `report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Location JSON file (one location or a list)
    #[arg(short, long)]
    pub location: PathBuf,

    /// Location name or ID when the file holds several (defaults to the primary one)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Consumption profile (CSV or day_hour-keyed JSON)
    #[arg(short, long)]
    pub consumption: PathBuf,

    /// Insolation samples CSV
    #[arg(short, long)]
    pub insolation: PathBuf,

    /// First day of the report (inclusive)
    #[arg(short, long)]
    pub start: String,

    /// Last day of the report (inclusive, defaults to the start date)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Output format (defaults to terminal, or to the output file's extension)
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the report command
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> ProsumerResult<()> {
    let start_date = parse_date(&args.start, &settings.date_format, "start")?;
    let end_date = match &args.end {
        Some(end) => parse_date(end, &settings.date_format, "end")?,
        None => start_date,
    };
    check_range_cap(start_date, end_date, settings.max_report_days)?;

    let locations = load_locations(&args.location)?;
    let location = select_location(&locations, args.name.as_deref())?;
    let slots = load_consumption(&args.consumption, location.id)?;
    let samples = load_insolation(&args.insolation, &settings.date_format)?;

    let aggregator = ReportAggregator::new(settings.estimator()?);
    let report = aggregator.build(location, &slots, &samples, start_date, end_date)?;

    let format = args
        .format
        .unwrap_or_else(|| infer_format(args.output.as_deref()));

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                ProsumerError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            render(&report, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| ProsumerError::Export(e.to_string()))?;
            info!(path = %path.display(), rows = report.rows.len(), "report written");
            println!("Report exported to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            render(&report, format, &mut handle)?;
        }
    }

    Ok(())
}

fn render<W: Write>(report: &ReportData, format: ReportFormat, writer: &mut W) -> ProsumerResult<()> {
    match format {
        ReportFormat::Terminal => write!(writer, "{}", report.format_terminal())
            .map_err(|e| ProsumerError::Export(e.to_string())),
        ReportFormat::Csv => write_csv(report, writer),
        ReportFormat::Json => write_json(report, writer),
    }
}

fn infer_format(output: Option<&Path>) -> ReportFormat {
    match output.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => ReportFormat::Json,
        Some(_) => ReportFormat::Csv,
        None if output.is_some() => ReportFormat::Csv,
        None => ReportFormat::Terminal,
    }
}

/// Parse a command-line date with the configured format
pub fn parse_date(value: &str, format: &str, label: &str) -> ProsumerResult<NaiveDate> {
    NaiveDate::parse_from_str(value, format).map_err(|_| {
        ProsumerError::Validation(format!(
            "Invalid {} date: '{}'. Expected format {}",
            label, value, format
        ))
    })
}

/// Refuse ranges longer than the configured cap
///
/// An inverted range passes through; the engine reports it.
pub fn check_range_cap(start: NaiveDate, end: NaiveDate, max_days: u32) -> ProsumerResult<()> {
    let days = (end - start).num_days() + 1;
    if days > i64::from(max_days) {
        return Err(ProsumerError::Validation(format!(
            "Report range of {} days exceeds the limit of {} days",
            days, max_days
        )));
    }
    Ok(())
}
