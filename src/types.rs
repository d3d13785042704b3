use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Label used for records whose grouping field is null or blank.
pub const UNKNOWN_KEY: &str = "Unknown";

/// One row of a loading export as it comes off the CSV reader. Every
/// column is kept as an optional string; the loader decides what to do
/// with malformed cells.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date", alias = "date")]
    pub date: Option<String>,
    #[serde(rename = "Station", alias = "station")]
    pub station: Option<String>,
    #[serde(rename = "Commodity", alias = "commodity")]
    pub commodity: Option<String>,
    #[serde(rename = "Wagons", alias = "wagons")]
    pub wagons: Option<String>,
    #[serde(rename = "Tonnage", alias = "tonnage")]
    pub tonnage: Option<String>,
    #[serde(rename = "Freight", alias = "freight")]
    pub freight: Option<String>,
}

/// A single rake movement. Numeric fields stay optional so a missing
/// value is distinguishable from a real zero; the aggregation code
/// treats both the same way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRecord {
    pub date: NaiveDate,
    pub station: Option<String>,
    pub commodity: Option<String>,
    pub wagons: Option<u32>,
    pub tonnage: Option<f64>,
    pub freight: Option<f64>,
}

impl OperationRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            station: None,
            commodity: None,
            wagons: None,
            tonnage: None,
            freight: None,
        }
    }
}

/// The field a comparison report is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Commodity,
    Station,
}

impl Dimension {
    pub fn select<'a>(&self, record: &'a OperationRecord) -> Option<&'a str> {
        match self {
            Dimension::Commodity => record.commodity.as_deref(),
            Dimension::Station => record.station.as_deref(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Commodity => "Commodity",
            Dimension::Station => "Station",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatTuple {
    pub runs: u64,
    pub wagons: u64,
    pub tonnage: f64,
    pub freight: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    #[serde(flatten)]
    pub stats: StatTuple,
    pub avg_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub key: String,
    pub current: PeriodStats,
    pub previous: PeriodStats,
    pub change_in_units: f64,
    pub change_in_percent: f64,
}

/// Grand totals across every row of a comparison. Averages and
/// variation are recomputed from the summed figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsRow {
    pub current: PeriodStats,
    pub previous: PeriodStats,
    pub change_in_units: f64,
    pub change_in_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub totals: TotalsRow,
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportingWindow {
    pub current: PeriodWindow,
    pub previous: PeriodWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationShare {
    pub row: ComparisonRow,
    pub share_of_commodity: f64,
    pub share_of_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityBreakdown {
    pub row: ComparisonRow,
    /// 100 when the commodity moved any tonnage this period, else 0.
    pub share_of_commodity: f64,
    pub share_of_total: f64,
    pub stations: Vec<StationShare>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ComparisonTableRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub key: String,
    #[serde(rename = "Rakes")]
    #[tabled(rename = "Rakes")]
    pub runs: String,
    #[serde(rename = "RakesPerDay")]
    #[tabled(rename = "RakesPerDay")]
    pub avg_per_day: String,
    #[serde(rename = "Wagons")]
    #[tabled(rename = "Wagons")]
    pub wagons: String,
    #[serde(rename = "TonnageMT")]
    #[tabled(rename = "TonnageMT")]
    pub tonnage: String,
    #[serde(rename = "Freight")]
    #[tabled(rename = "Freight")]
    pub freight: String,
    #[serde(rename = "PrevRakes")]
    #[tabled(rename = "PrevRakes")]
    pub prev_runs: String,
    #[serde(rename = "PrevRakesPerDay")]
    #[tabled(rename = "PrevRakesPerDay")]
    pub prev_avg_per_day: String,
    #[serde(rename = "PrevWagons")]
    #[tabled(rename = "PrevWagons")]
    pub prev_wagons: String,
    #[serde(rename = "PrevTonnageMT")]
    #[tabled(rename = "PrevTonnageMT")]
    pub prev_tonnage: String,
    #[serde(rename = "PrevFreight")]
    #[tabled(rename = "PrevFreight")]
    pub prev_freight: String,
    #[serde(rename = "VariationMT")]
    #[tabled(rename = "VariationMT")]
    pub change_in_units: String,
    #[serde(rename = "VariationPct")]
    #[tabled(rename = "VariationPct")]
    pub change_in_percent: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BreakdownTableRow {
    #[serde(rename = "Commodity")]
    #[tabled(rename = "Commodity")]
    pub commodity: String,
    #[serde(rename = "Station")]
    #[tabled(rename = "Station")]
    pub station: String,
    #[serde(rename = "Rakes")]
    #[tabled(rename = "Rakes")]
    pub runs: String,
    #[serde(rename = "TonnageMT")]
    #[tabled(rename = "TonnageMT")]
    pub tonnage: String,
    #[serde(rename = "PrevTonnageMT")]
    #[tabled(rename = "PrevTonnageMT")]
    pub prev_tonnage: String,
    #[serde(rename = "VariationPct")]
    #[tabled(rename = "VariationPct")]
    pub change_in_percent: String,
    #[serde(rename = "ShareOfCommodity")]
    #[tabled(rename = "ShareOfCommodity")]
    pub share_of_commodity: String,
    #[serde(rename = "ShareOfTotal")]
    #[tabled(rename = "ShareOfTotal")]
    pub share_of_total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordCounts {
    pub loaded: usize,
    pub current: usize,
    pub previous: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub window: ReportingWindow,
    pub records: RecordCounts,
    pub commodity: Comparison,
    pub station: Comparison,
    pub breakdown: Vec<CommodityBreakdown>,
}
