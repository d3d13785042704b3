use crate::error::Result;
use crate::types::{OperationRecord, RawRow};
use crate::util::{parse_date_safe, parse_f64_safe, parse_u32_safe};
use csv::{ByteRecord, ReaderBuilder};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    pub coerced_fields: usize,
    /// 1-based source line where each skipped record starts.
    pub skipped_lines: Vec<u64>,
}

pub fn load_records(path: impl AsRef<Path>) -> Result<(Vec<OperationRecord>, LoadReport)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let (records, report) = read_records(file)?;
    info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.skipped_rows,
        coerced = report.coerced_fields,
        "loaded operation records"
    );
    Ok((records, report))
}

/// Trimmed cell text, `None` when blank.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).map_or(true, str::is_empty)
}

/// Rows without a usable date are skipped. Numeric cells that cannot be
/// read become `None` and are counted in `coerced_fields`.
pub fn read_records<R: Read>(source: R) -> Result<(Vec<OperationRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(source);
    let mut report = LoadReport::default();
    let mut records: Vec<OperationRecord> = Vec::new();

    let headers = rdr.byte_headers()?.clone();
    let mut raw = ByteRecord::new();
    while rdr.read_byte_record(&mut raw)? {
        report.total_rows += 1;
        // Quoted cells may span lines, so the record position is the only
        // reliable source line.
        let line = raw.position().map_or(0, |p| p.line());
        let row = match raw.deserialize::<RawRow>(Some(&headers)) {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable row");
                report.skipped_rows += 1;
                report.skipped_lines.push(line);
                continue;
            }
        };

        // A record has to be attributable to a day to land in a period.
        let date = match parse_date_safe(row.date.as_deref()) {
            Some(d) => d,
            None => {
                warn!(line, date = ?row.date, "skipping row without a usable date");
                report.skipped_rows += 1;
                report.skipped_lines.push(line);
                continue;
            }
        };

        let wagons = parse_u32_safe(row.wagons.as_deref());
        let tonnage = parse_f64_safe(row.tonnage.as_deref());
        let freight = parse_f64_safe(row.freight.as_deref());
        report.coerced_fields += [
            wagons.is_none() && !is_blank(row.wagons.as_deref()),
            tonnage.is_none() && !is_blank(row.tonnage.as_deref()),
            freight.is_none() && !is_blank(row.freight.as_deref()),
        ]
        .iter()
        .filter(|c| **c)
        .count();

        records.push(OperationRecord {
            date,
            station: optional_text(row.station),
            commodity: optional_text(row.commodity),
            wagons,
            tonnage,
            freight,
        });
    }

    report.loaded_rows = records.len();
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
Date,Station,Commodity,Wagons,Tonnage,Freight
2024-06-10,BSL,Coal,58,\"3,850.5\",1200000
11/06/2024,NGP,Cement,42,2700.25,
12-06-2024, ,  ,n/a,,
not a date,AK,Coal,10,100,100
,AK,Coal,10,100,100
";

    #[test]
    fn reads_rows_and_reports_diagnostics() {
        let (records, report) = read_records(SAMPLE.as_bytes()).expect("read");
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.loaded_rows, 3);
        assert_eq!(report.skipped_rows, 2);
        assert_eq!(report.coerced_fields, 1);
        assert_eq!(report.skipped_lines, vec![5, 6]);

        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(records[0].station.as_deref(), Some("BSL"));
        assert_eq!(records[0].wagons, Some(58));
        assert_eq!(records[0].tonnage, Some(3850.5));
        assert_eq!(records[0].freight, Some(1_200_000.0));

        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        assert_eq!(records[1].freight, None);
    }

    #[test]
    fn blank_dimensions_and_bad_numbers_become_none() {
        let (records, _) = read_records(SAMPLE.as_bytes()).expect("read");
        let blank = &records[2];
        assert_eq!(blank.station, None);
        assert_eq!(blank.commodity, None);
        assert_eq!(blank.wagons, None);
        assert_eq!(blank.tonnage, None);
    }

    #[test]
    fn skipped_lines_follow_multiline_cells() {
        let csv = "\
Date,Station,Commodity,Wagons,Tonnage,Freight
2024-06-10,BSL,\"Coal
washed\",58,3850,1000
31/02/2024,AK,Gypsum,40,400,100
2024-06-11,NGP,Coal,42,2700,900
";
        let (records, report) = read_records(csv.as_bytes()).expect("read");
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(records[0].commodity.as_deref(), Some("Coal\nwashed"));
        assert_eq!(report.skipped_lines, vec![4]);
    }

    #[test]
    fn accepts_lowercase_headers() {
        let csv = "date,station,commodity,wagons,tonnage,freight\n2024-01-02,BSL,Coal,1,2,3\n";
        let (records, report) = read_records(csv.as_bytes()).expect("read");
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(records[0].commodity.as_deref(), Some("Coal"));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("rakes.csv");
        fs::write(&path, SAMPLE).expect("write");
        let (records, report) = load_records(&path).expect("load");
        assert_eq!(records.len(), 3);
        assert_eq!(report.loaded_rows, 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = load_records(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, crate::error::ReportError::Io(_)));
    }
}
