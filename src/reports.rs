use crate::compare::compute_comparison;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::output::{write_csv, write_json};
use crate::share::commodity_breakdown;
use crate::store::RecordStore;
use crate::types::{
    BreakdownTableRow, CommodityBreakdown, Comparison, ComparisonRow, ComparisonTableRow,
    Dimension, PeriodStats, RecordCounts, ReportSummary, ReportingWindow,
};
use crate::util::{format_int, format_number};
use std::cmp::Ordering;
use std::path::PathBuf;
use tracing::{debug, info};

pub const COMMODITY_FILE: &str = "commodity_comparison.csv";
pub const STATION_FILE: &str = "station_comparison.csv";
pub const BREAKDOWN_FILE: &str = "commodity_station_breakdown.csv";
pub const SUMMARY_FILE: &str = "summary.json";

const TOTAL_LABEL: &str = "Total";

fn by_current_tonnage(a: &ComparisonRow, b: &ComparisonRow) -> Ordering {
    b.current
        .stats
        .tonnage
        .partial_cmp(&a.current.stats.tonnage)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.key.cmp(&b.key))
}

fn table_row(
    key: String,
    current: &PeriodStats,
    previous: &PeriodStats,
    units: f64,
    pct: f64,
) -> ComparisonTableRow {
    ComparisonTableRow {
        key,
        runs: format_int(current.stats.runs),
        avg_per_day: format_number(current.avg_per_day, 2),
        wagons: format_int(current.stats.wagons),
        tonnage: format_number(current.stats.tonnage, 3),
        freight: format_number(current.stats.freight, 2),
        prev_runs: format_int(previous.stats.runs),
        prev_avg_per_day: format_number(previous.avg_per_day, 2),
        prev_wagons: format_int(previous.stats.wagons),
        prev_tonnage: format_number(previous.stats.tonnage, 3),
        prev_freight: format_number(previous.stats.freight, 2),
        change_in_units: format_number(units, 3),
        change_in_percent: format_number(pct, 2),
    }
}

/// Rows sorted by current tonnage (largest first, ties by key), then a
/// `Total` row.
pub fn comparison_table(comparison: &Comparison) -> Vec<ComparisonTableRow> {
    let mut rows: Vec<&ComparisonRow> = comparison.rows.iter().collect();
    rows.sort_by(|a, b| by_current_tonnage(a, b));

    let totals = &comparison.totals;
    rows.into_iter()
        .map(|r| {
            table_row(
                r.key.clone(),
                &r.current,
                &r.previous,
                r.change_in_units,
                r.change_in_percent,
            )
        })
        .chain(std::iter::once(table_row(
            TOTAL_LABEL.to_string(),
            &totals.current,
            &totals.previous,
            totals.change_in_units,
            totals.change_in_percent,
        )))
        .collect()
}

/// Each commodity row is followed by its station rows. Commodity rows
/// leave `Station` empty.
pub fn breakdown_table(
    breakdown: &[CommodityBreakdown],
    share_places: u32,
) -> Vec<BreakdownTableRow> {
    let places = share_places as usize;
    let mut out = Vec::new();
    for commodity in breakdown {
        let row = &commodity.row;
        out.push(BreakdownTableRow {
            commodity: row.key.clone(),
            station: String::new(),
            runs: format_int(row.current.stats.runs),
            tonnage: format_number(row.current.stats.tonnage, 3),
            prev_tonnage: format_number(row.previous.stats.tonnage, 3),
            change_in_percent: format_number(row.change_in_percent, 2),
            share_of_commodity: format_number(commodity.share_of_commodity, places),
            share_of_total: format_number(commodity.share_of_total, places),
        });
        let mut stations: Vec<_> = commodity.stations.iter().collect();
        stations.sort_by(|a, b| by_current_tonnage(&a.row, &b.row));
        for station in stations {
            out.push(BreakdownTableRow {
                commodity: row.key.clone(),
                station: station.row.key.clone(),
                runs: format_int(station.row.current.stats.runs),
                tonnage: format_number(station.row.current.stats.tonnage, 3),
                prev_tonnage: format_number(station.row.previous.stats.tonnage, 3),
                change_in_percent: format_number(station.row.change_in_percent, 2),
                share_of_commodity: format_number(station.share_of_commodity, places),
                share_of_total: format_number(station.share_of_total, places),
            });
        }
    }
    out
}

/// Compute every comparison for `window` from the records in `store`.
pub fn build_summary(
    store: &RecordStore,
    window: ReportingWindow,
    share_places: u32,
) -> ReportSummary {
    let current = store.select(&window.current);
    let previous = store.select(&window.previous);
    debug!(
        current = current.len(),
        previous = previous.len(),
        "partitioned records into windows"
    );

    let compare = |dimension| {
        compute_comparison(
            current.iter().copied(),
            previous.iter().copied(),
            window.current.days,
            window.previous.days,
            dimension,
        )
    };
    let commodity = compare(Dimension::Commodity);
    let station = compare(Dimension::Station);
    let breakdown = commodity_breakdown(
        &current,
        &previous,
        window.current.days,
        window.previous.days,
        share_places,
    );

    ReportSummary {
        window,
        records: RecordCounts {
            loaded: store.len(),
            current: current.len(),
            previous: previous.len(),
        },
        commodity,
        station,
        breakdown,
    }
}

/// Tables for one summary, ready for preview or export.
pub struct ReportTables {
    pub commodity: Vec<ComparisonTableRow>,
    pub station: Vec<ComparisonTableRow>,
    pub breakdown: Vec<BreakdownTableRow>,
}

pub fn render_tables(summary: &ReportSummary, share_places: u32) -> ReportTables {
    ReportTables {
        commodity: comparison_table(&summary.commodity),
        station: comparison_table(&summary.station),
        breakdown: breakdown_table(&summary.breakdown, share_places),
    }
}

/// Write the three CSV tables and `summary.json` into the configured
/// output directory. Returns the paths written.
pub fn write_reports(
    summary: &ReportSummary,
    tables: &ReportTables,
    config: &ReportConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&config.output_dir)?;
    let path = |name: &str| config.output_dir.join(name);

    let written = vec![
        path(COMMODITY_FILE),
        path(STATION_FILE),
        path(BREAKDOWN_FILE),
        path(SUMMARY_FILE),
    ];
    write_csv(&written[0], &tables.commodity)?;
    write_csv(&written[1], &tables.station)?;
    write_csv(&written[2], &tables.breakdown)?;
    write_json(&written[3], summary)?;

    info!(
        dir = %config.output_dir.display(),
        commodities = summary.commodity.rows.len(),
        stations = summary.station.rows.len(),
        "reports written"
    );
    Ok(written)
}

pub fn dimension_title(dimension: Dimension) -> String {
    format!("{}-wise Loading Comparison", dimension.label())
}
