// Entry point and CLI flow.
//
// - `load` reads a CSV export and prints load diagnostics.
// - `window` prints the current and comparison windows for a date.
// - `report` loads, partitions and compares the records, writes the CSV
//   and JSON outputs, and previews each table on the console.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rake_report::config::{OutputFormat, ReportConfig};
use rake_report::output::preview_table;
use rake_report::reports::{self, dimension_title};
use rake_report::store::RecordStore;
use rake_report::types::{Dimension, PeriodWindow, ReportingWindow};
use rake_report::util::{format_int, parse_date_arg};
use rake_report::window::{custom_window, resolve_reporting_window};

#[derive(Parser)]
#[command(name = "rake-report")]
#[command(about = "Compare rake loading by commodity and station across periods")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV export and print diagnostics
    Load { csv: PathBuf },
    /// Show the reporting windows for a date
    Window {
        /// Reference date (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<NaiveDate>,
    },
    /// Generate comparison reports
    Report(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    csv: PathBuf,
    /// Reference date for the weekly window (defaults to today)
    #[arg(long, value_parser = parse_date_arg, conflicts_with_all = ["from", "to"])]
    today: Option<NaiveDate>,
    /// Start of an explicit current window
    #[arg(long, value_parser = parse_date_arg, requires = "to")]
    from: Option<NaiveDate>,
    /// End of an explicit current window
    #[arg(long, value_parser = parse_date_arg, requires = "from")]
    to: Option<NaiveDate>,
    /// Start of an explicit comparison window
    #[arg(long, value_parser = parse_date_arg, requires = "compare_to")]
    compare_from: Option<NaiveDate>,
    /// End of an explicit comparison window
    #[arg(long, value_parser = parse_date_arg, requires = "compare_from")]
    compare_to: Option<NaiveDate>,
    #[arg(long, env = "RAKE_REPORT_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,
    /// Decimal places for share-of-total percentages (1 or 2)
    #[arg(long, env = "RAKE_REPORT_SHARE_PLACES", default_value_t = 2)]
    share_places: u32,
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

impl ReportArgs {
    fn config(&self) -> Result<ReportConfig> {
        let config = ReportConfig {
            output_dir: self.output_dir.clone(),
            share_places: self.share_places,
            preview_rows: self.preview_rows,
            format: self.format,
        }
        .validate()?;
        Ok(config)
    }

    fn window(&self) -> Result<ReportingWindow> {
        let mut window = match (self.from, self.to) {
            (Some(from), Some(to)) => custom_window(from, to)?,
            _ => resolve_reporting_window(self.today.unwrap_or_else(today)),
        };
        if let (Some(from), Some(to)) = (self.compare_from, self.compare_to) {
            window.previous = PeriodWindow::new(from, to)?;
        }
        Ok(window)
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn describe(label: &str, window: &PeriodWindow) {
    println!(
        "{:<10} {} to {} ({} days)",
        label, window.start, window.end, window.days
    );
}

fn handle_load(csv: &Path) -> Result<()> {
    let store = RecordStore::load(csv)
        .with_context(|| format!("failed to load {}", csv.display()))?;
    let report = store.load_report();
    println!(
        "Processing dataset... ({} rows read, {} loaded)",
        format_int(report.total_rows),
        format_int(report.loaded_rows)
    );
    println!(
        "Note: {} rows skipped for a missing or unreadable date.",
        format_int(report.skipped_rows)
    );
    if !report.skipped_lines.is_empty() {
        let lines: Vec<String> = report.skipped_lines.iter().map(u64::to_string).collect();
        println!("Skipped lines: {}", lines.join(", "));
    }
    if report.coerced_fields > 0 {
        println!(
            "Info: {} numeric cells could not be read and count as zero.",
            format_int(report.coerced_fields)
        );
    }
    Ok(())
}

fn handle_window(today_arg: Option<NaiveDate>) {
    let window = resolve_reporting_window(today_arg.unwrap_or_else(today));
    describe("Current", &window.current);
    describe("Previous", &window.previous);
}

fn handle_report(args: &ReportArgs) -> Result<()> {
    let config = args.config()?;
    let window = args.window()?;
    let store = RecordStore::load(&args.csv)
        .with_context(|| format!("failed to load {}", args.csv.display()))?;

    let summary = reports::build_summary(&store, window, config.share_places);
    let tables = reports::render_tables(&summary, config.share_places);
    let written = reports::write_reports(&summary, &tables, &config)
        .context("failed to write reports")?;

    if config.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    describe("Current", &window.current);
    describe("Previous", &window.previous);
    println!(
        "Records: {} loaded, {} current, {} previous\n",
        format_int(summary.records.loaded),
        format_int(summary.records.current),
        format_int(summary.records.previous)
    );

    let note = format!("Top {} by current tonnage", config.preview_rows);
    preview_table(
        &dimension_title(Dimension::Commodity),
        Some(&note),
        &tables.commodity,
        config.preview_rows,
    );
    preview_table(
        &dimension_title(Dimension::Station),
        Some(&note),
        &tables.station,
        config.preview_rows,
    );
    preview_table(
        "Commodity / Station Share",
        None,
        &tables.breakdown,
        config.preview_rows,
    );

    for path in written {
        println!("(Exported to {})", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rake_report=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Load { csv } => handle_load(csv)?,
        Commands::Window { today } => handle_window(*today),
        Commands::Report(args) => handle_report(args)?,
    }
    Ok(())
}
