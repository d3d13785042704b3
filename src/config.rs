use std::path::PathBuf;

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Settings for one report run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    /// Decimal places for share-of-total percentages. Held constant
    /// within a report so shares line up.
    pub share_places: u32,
    pub preview_rows: usize,
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            share_places: 2,
            preview_rows: 5,
            format: OutputFormat::Table,
        }
    }
}

impl ReportConfig {
    pub fn validate(self) -> Result<Self> {
        if !(1..=2).contains(&self.share_places) {
            return Err(ReportError::InvalidConfig(format!(
                "share places must be 1 or 2, got {}",
                self.share_places
            )));
        }
        Ok(self)
    }
}
