// Caller-owned holder for loaded records.
//
// The CLI loads a CSV once and then runs several reports against it;
// the store is created by the caller and passed by reference to
// whatever needs the records.
use std::path::Path;

use crate::error::Result;
use crate::loader::{load_records, LoadReport};
use crate::types::{OperationRecord, PeriodWindow};

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<OperationRecord>,
    load_report: LoadReport,
}

impl RecordStore {
    pub fn new(records: Vec<OperationRecord>) -> Self {
        let load_report = LoadReport {
            total_rows: records.len(),
            loaded_rows: records.len(),
            ..LoadReport::default()
        };
        Self {
            records,
            load_report,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let (records, load_report) = load_records(path)?;
        Ok(Self {
            records,
            load_report,
        })
    }

    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn select(&self, window: &PeriodWindow) -> Vec<&OperationRecord> {
        window.select(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
